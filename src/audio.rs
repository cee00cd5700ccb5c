//! Audio payloads for enrollment and verification uploads

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::ApiError;

/// Content type declared for the uploaded audio part
pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";
/// File name declared for the uploaded audio part
pub const AUDIO_FILE_NAME: &str = "audio.wav";

/// Sample rate the voice service normalizes recordings to
pub const EXPECTED_SAMPLE_RATE: u32 = 16_000;

/// Where the audio for an upload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// WAV file on disk, read when the request is sent
    File(PathBuf),
    /// Audio already held in memory
    Bytes(Vec<u8>),
}

impl AudioSource {
    /// Parse a locator: plain path or `file://` URI
    pub fn from_locator(locator: &str) -> Self {
        match url::Url::parse(locator) {
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::File(path),
                Err(()) => Self::File(PathBuf::from(locator)),
            },
            _ => Self::File(PathBuf::from(locator)),
        }
    }

    /// Load the audio bytes
    pub async fn read(&self) -> Result<Vec<u8>, ApiError> {
        match self {
            Self::File(path) => tokio::fs::read(path).await.map_err(|source| ApiError::Audio {
                path: path.clone(),
                source,
            }),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }
}

impl From<PathBuf> for AudioSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for AudioSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<&str> for AudioSource {
    fn from(locator: &str) -> Self {
        Self::from_locator(locator)
    }
}

impl From<String> for AudioSource {
    fn from(locator: String) -> Self {
        Self::from_locator(&locator)
    }
}

impl From<Vec<u8>> for AudioSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Format summary of a WAV file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WavSummary {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub duration_ms: u64,
}

impl WavSummary {
    /// Whether the recording already matches what the service expects
    pub fn is_service_native(&self) -> bool {
        self.sample_rate == EXPECTED_SAMPLE_RATE && self.channels == 1
    }
}

/// Read the header of a WAV file
pub fn wav_summary(path: &Path) -> Result<WavSummary> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    // duration() counts frames, not samples
    let frames = reader.duration() as u64;
    let duration_ms = if spec.sample_rate > 0 {
        frames * 1000 / spec.sample_rate as u64
    } else {
        0
    };

    Ok(WavSummary {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        duration_ms,
    })
}
