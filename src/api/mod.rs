//! HTTP client for the voice authentication service
//!
//! Wraps the service's challenge, enrollment and verification endpoints
//! behind a typed async interface with a uniform base URL, timeout and
//! header set.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod observer;

pub use client::VoiceAuthClient;
pub use endpoints::Endpoint;
pub use error::ApiError;
pub use models::{
    ChallengeResponse, EnrollResponse, HealthResponse, UserExistsResponse, VerifyResponse,
};
pub use observer::{LogObserver, RequestObserver};
