//! Client library for the voice authentication API

pub mod api;
pub mod audio;
pub mod config;
pub mod paths;
pub mod validation;

pub use api::{ApiError, Endpoint, RequestObserver, VoiceAuthClient};
pub use audio::AudioSource;
pub use config::{ApiConfig, ApiProfile, ClientConfig, Environment};
