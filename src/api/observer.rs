use serde_json::Value;

use super::endpoints::Endpoint;
use super::error::ApiError;

/// Receives the outcome of every client call
///
/// Called exactly once per operation, after the response is parsed or the
/// failure is known. Implementations must not panic; the return value of
/// the operation does not depend on them.
pub trait RequestObserver: Send + Sync {
    fn on_success(&self, endpoint: Endpoint, payload: &Value);
    fn on_failure(&self, endpoint: Endpoint, error: &ApiError);
}

/// Writes one log line per call
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_success(&self, endpoint: Endpoint, payload: &Value) {
        match endpoint {
            Endpoint::Challenge => match payload.as_str() {
                Some(phrase) => log::info!("Challenge phrase: {}", phrase),
                None => log::info!("Challenge phrase: {}", payload),
            },
            _ => log::info!("{} response: {}", endpoint, payload),
        }
    }

    fn on_failure(&self, endpoint: Endpoint, error: &ApiError) {
        log::error!("{} request failed: {}", endpoint, error);
    }
}
