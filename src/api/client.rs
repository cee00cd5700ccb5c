use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::endpoints::Endpoint;
use super::error::ApiError;
use super::models::{
    ChallengeResponse, EnrollResponse, HealthResponse, UserExistsResponse, VerifyResponse,
};
use super::observer::{LogObserver, RequestObserver};
use crate::audio::{AudioSource, AUDIO_CONTENT_TYPE, AUDIO_FILE_NAME};
use crate::config::ApiConfig;

/// Client for the voice authentication service
///
/// Stateless: every call is independent and calls may run concurrently.
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct VoiceAuthClient {
    http: reqwest::Client,
    config: ApiConfig,
    observer: Option<Arc<dyn RequestObserver>>,
}

impl fmt::Debug for VoiceAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceAuthClient")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl VoiceAuthClient {
    /// Create a client that logs every call through [`LogObserver`]
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        log::debug!(
            "Voice auth client ready: env={}, base_url={}, timeout={}ms",
            config.environment(),
            config.base_url(),
            config.timeout_ms()
        );

        Ok(Self {
            http,
            config,
            observer: Some(Arc::new(LogObserver)),
        })
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Drop the observer; calls produce no side effects
    pub fn without_observer(mut self) -> Self {
        self.observer = None;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Absolute URL for an endpoint
    pub fn url(&self, endpoint: Endpoint, user_id: Option<&str>) -> Result<Url, ApiError> {
        endpoint.url(self.config.url(), user_id)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let result = self.get_json(Endpoint::Health, None).await;
        self.report(Endpoint::Health, result)
    }

    /// GET /voice/challenge, returning the phrase the user must speak
    pub async fn get_challenge_phrase(&self) -> Result<String, ApiError> {
        let result = self
            .get_json::<ChallengeResponse>(Endpoint::Challenge, None)
            .await
            .map(|(challenge, _)| {
                let phrase = challenge.phrase;
                (phrase.clone(), Value::String(phrase))
            });
        self.report(Endpoint::Challenge, result)
    }

    /// POST /voice/enroll
    pub async fn enroll_user(
        &self,
        user_id: &str,
        phrase: &str,
        audio: impl Into<AudioSource>,
    ) -> Result<EnrollResponse, ApiError> {
        let audio = audio.into();
        let result = self
            .post_voice(Endpoint::Enroll, user_id, phrase, &audio)
            .await;
        self.report(Endpoint::Enroll, result)
    }

    /// POST /voice/verify
    pub async fn verify_user(
        &self,
        user_id: &str,
        phrase: &str,
        audio: impl Into<AudioSource>,
    ) -> Result<VerifyResponse, ApiError> {
        let audio = audio.into();
        let result = self
            .post_voice(Endpoint::Verify, user_id, phrase, &audio)
            .await;
        self.report(Endpoint::Verify, result)
    }

    /// GET /voice/user/{user_id}/exists
    pub async fn user_exists(&self, user_id: &str) -> Result<UserExistsResponse, ApiError> {
        let result = self.get_json(Endpoint::UserExists, Some(user_id)).await;
        self.report(Endpoint::UserExists, result)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        user_id: Option<&str>,
    ) -> Result<(T, Value), ApiError> {
        let request = self.request(endpoint, user_id)?;
        self.send(request).await
    }

    async fn post_voice<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        user_id: &str,
        phrase: &str,
        audio: &AudioSource,
    ) -> Result<(T, Value), ApiError> {
        let form = voice_form(user_id, phrase, audio).await?;
        let request = self.request(endpoint, None)?.multipart(form);
        self.send(request).await
    }

    fn request(&self, endpoint: Endpoint, user_id: Option<&str>) -> Result<RequestBuilder, ApiError> {
        Ok(self.http.request(endpoint.method(), self.url(endpoint, user_id)?))
    }

    /// Send a request and parse a 2xx JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<(T, Value), ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;
        let typed = T::deserialize(&value)?;
        Ok((typed, value))
    }

    fn report<T>(&self, endpoint: Endpoint, result: Result<(T, Value), ApiError>) -> Result<T, ApiError> {
        match result {
            Ok((typed, payload)) => {
                if let Some(observer) = &self.observer {
                    observer.on_success(endpoint, &payload);
                }
                Ok(typed)
            }
            Err(error) => {
                if let Some(observer) = &self.observer {
                    observer.on_failure(endpoint, &error);
                }
                Err(error)
            }
        }
    }
}

/// Multipart body shared by enroll and verify
async fn voice_form(user_id: &str, phrase: &str, audio: &AudioSource) -> Result<Form, ApiError> {
    let bytes = audio.read().await?;
    let audio_part = Part::bytes(bytes)
        .file_name(AUDIO_FILE_NAME)
        .mime_str(AUDIO_CONTENT_TYPE)?;

    Ok(Form::new()
        .text("user_id", user_id.to_string())
        .text("phrase_expected", phrase.to_string())
        .part("audio_file", audio_part))
}
