use url::Url;

use super::error::ApiError;

/// Remote operations exposed by the voice service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Challenge,
    Enroll,
    Verify,
    UserExists,
}

impl Endpoint {
    /// Operation name used in log lines and observer callbacks
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::Challenge => "challenge",
            Endpoint::Enroll => "enroll",
            Endpoint::Verify => "verify",
            Endpoint::UserExists => "user_exists",
        }
    }

    /// HTTP method
    pub fn method(&self) -> reqwest::Method {
        match self {
            Endpoint::Enroll | Endpoint::Verify => reqwest::Method::POST,
            _ => reqwest::Method::GET,
        }
    }

    /// Path segments under the base URL
    ///
    /// `user_id` is only used by [`Endpoint::UserExists`], where it is a
    /// single segment.
    fn segments<'a>(&self, user_id: Option<&'a str>) -> Vec<&'a str> {
        match self {
            Endpoint::Health => vec!["health"],
            Endpoint::Challenge => vec!["voice", "challenge"],
            Endpoint::Enroll => vec!["voice", "enroll"],
            Endpoint::Verify => vec!["voice", "verify"],
            Endpoint::UserExists => vec!["voice", "user", user_id.unwrap_or_default(), "exists"],
        }
    }

    /// Absolute URL for this operation under `base`
    ///
    /// Any path already on `base` is kept as a prefix.
    pub fn url(&self, base: &Url, user_id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Request(format!("Base URL cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(self.segments(user_id));
        Ok(url)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
