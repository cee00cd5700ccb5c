//! API profiles and environment selection
//!
//! A profile is a base URL plus request timeout for one deployment
//! environment. The application picks one profile at startup and hands the
//! resulting [`ApiConfig`] to the client; nothing here is global.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::validation::{validate_base_url, validate_timeout_ms, ValidationError};

/// Environment variable naming the active environment
pub const ENV_VAR: &str = "VOICE_AUTH_ENV";

/// Default request timeout for every built-in profile
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Select the environment from the process environment
    ///
    /// `VOICE_AUTH_ENV` wins when set to a known value; otherwise debug
    /// builds run against development and release builds against production.
    pub fn detect() -> Self {
        match std::env::var(ENV_VAR) {
            Ok(value) => match value.parse() {
                Ok(env) => env,
                Err(e) => {
                    log::warn!("Ignoring {}: {}", ENV_VAR, e);
                    Self::from_build()
                }
            },
            Err(_) => Self::from_build(),
        }
    }

    /// Environment implied by the build profile
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ValidationError::InvalidFormat(format!(
                "Invalid environment '{}', must be 'development' or 'production'",
                other
            ))),
        }
    }
}

/// Base URL and timeout for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProfile {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ApiProfile {
    pub fn development() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn production() -> Self {
        Self {
            base_url: "https://api.voiceauth.example.com".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url)?;
        validate_timeout_ms(self.timeout_ms)?;
        Ok(())
    }
}

/// Both profiles, keyed by environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profiles {
    #[serde(default = "ApiProfile::development")]
    pub development: ApiProfile,
    #[serde(default = "ApiProfile::production")]
    pub production: ApiProfile,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            development: ApiProfile::development(),
            production: ApiProfile::production(),
        }
    }
}

impl Profiles {
    pub fn get(&self, env: Environment) -> &ApiProfile {
        match env {
            Environment::Development => &self.development,
            Environment::Production => &self.production,
        }
    }
}

/// Resolved, read-only client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    environment: Environment,
    base_url: Url,
    timeout_ms: u64,
}

impl ApiConfig {
    /// Build a config from explicit values
    pub fn new(
        environment: Environment,
        base_url: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, ValidationError> {
        let base_url: String = base_url.into();
        let base_url = validate_base_url(&base_url)?;
        validate_timeout_ms(timeout_ms)?;

        Ok(Self {
            environment,
            base_url,
            timeout_ms,
        })
    }

    /// Build a config from a profile
    pub fn from_profile(environment: Environment, profile: &ApiProfile) -> Result<Self, ValidationError> {
        Self::new(environment, profile.base_url.clone(), profile.timeout_ms)
    }

    /// Built-in profile for an environment
    pub fn for_environment(environment: Environment) -> Result<Self, ValidationError> {
        Self::from_profile(environment, Profiles::default().get(environment))
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Parsed base URL that endpoint paths are appended to
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Client configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Pinned environment; when absent the environment is detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default)]
    pub profiles: Profiles,
}

impl ClientConfig {
    /// Load config from file or create default
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: ClientConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            log::info!("Config loaded from: {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            fs::write(path, toml_str)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            log::info!("Default config created at: {}", path.display());
            Ok(config)
        }
    }

    /// Resolve the active profile
    ///
    /// Precedence: `explicit` (CLI flag), the file's `environment` key, then
    /// [`Environment::detect`].
    pub fn resolve(&self, explicit: Option<Environment>) -> Result<ApiConfig, ValidationError> {
        let environment = explicit
            .or(self.environment)
            .unwrap_or_else(Environment::detect);
        let profile = self.profiles.get(environment);
        let config = ApiConfig::from_profile(environment, profile)?;

        log::debug!(
            "Resolved {} profile: base_url={}, timeout={}ms",
            environment,
            config.base_url(),
            config.timeout_ms()
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let dev = ApiConfig::for_environment(Environment::Development).unwrap();
        assert_eq!(dev.base_url(), "http://localhost:8000");
        assert_eq!(dev.timeout_ms(), 30_000);
        assert_eq!(dev.timeout(), Duration::from_secs(30));

        let prod = ApiConfig::for_environment(Environment::Production).unwrap();
        assert_eq!(prod.base_url(), "https://api.voiceauth.example.com");
        assert_eq!(prod.timeout_ms(), 30_000);
    }

    #[test]
    fn test_resolve_does_not_leak_other_profile() {
        let config = ClientConfig {
            environment: None,
            profiles: Profiles {
                development: ApiProfile {
                    base_url: "http://10.0.0.5:8001".to_string(),
                    timeout_ms: 1_500,
                },
                production: ApiProfile {
                    base_url: "https://voice.example.org".to_string(),
                    timeout_ms: 45_000,
                },
            },
        };

        let dev = config.resolve(Some(Environment::Development)).unwrap();
        assert_eq!(dev.environment(), Environment::Development);
        assert_eq!(dev.base_url(), "http://10.0.0.5:8001");
        assert_eq!(dev.timeout_ms(), 1_500);

        let prod = config.resolve(Some(Environment::Production)).unwrap();
        assert_eq!(prod.environment(), Environment::Production);
        assert_eq!(prod.base_url(), "https://voice.example.org");
        assert_eq!(prod.timeout_ms(), 45_000);
    }

    #[test]
    fn test_resolve_prefers_explicit_over_file() {
        let config = ClientConfig {
            environment: Some(Environment::Production),
            profiles: Profiles::default(),
        };

        let resolved = config.resolve(None).unwrap();
        assert_eq!(resolved.environment(), Environment::Production);

        let resolved = config.resolve(Some(Environment::Development)).unwrap();
        assert_eq!(resolved.environment(), Environment::Development);
    }

    #[test]
    fn test_resolve_rejects_invalid_profile() {
        let mut config = ClientConfig::default();
        config.profiles.development.base_url = "ftp://files.example.com".to_string();
        assert!(config.resolve(Some(Environment::Development)).is_err());
        // Production stays usable
        assert!(config.resolve(Some(Environment::Production)).is_ok());

        config.profiles.production.timeout_ms = 0;
        assert!(config.resolve(Some(Environment::Production)).is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new(Environment::Development, "http://localhost:8000/", 30_000).unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" dev ".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
        assert!("".parse::<Environment>().is_err());
    }

    #[test]
    fn test_env_var_selects_profile() {
        // The only test that reads VOICE_AUTH_ENV; the others pin the environment
        std::env::set_var(ENV_VAR, "production");
        let resolved = ClientConfig::default().resolve(None);

        std::env::set_var(ENV_VAR, "bogus");
        let fallback = ClientConfig::default().resolve(None);

        std::env::remove_var(ENV_VAR);

        let resolved = resolved.unwrap();
        assert_eq!(resolved.environment(), Environment::Production);
        assert_eq!(resolved.base_url(), "https://api.voiceauth.example.com");
        assert_eq!(fallback.unwrap().environment(), Environment::from_build());
    }

    #[test]
    fn test_environment_from_build() {
        assert_eq!(
            Environment::from_build().is_development(),
            cfg!(debug_assertions)
        );
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = ClientConfig {
            environment: Some(Environment::Development),
            profiles: Profiles::default(),
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("environment = \"development\""));
        assert!(toml_str.contains("[profiles.production]"));

        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_partial_toml_uses_defaults() {
        let parsed: ClientConfig = toml::from_str(
            r#"
            [profiles.development]
            base_url = "http://192.168.1.20:8000"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.environment, None);
        assert_eq!(parsed.profiles.development.base_url, "http://192.168.1.20:8000");
        assert_eq!(parsed.profiles.development.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(parsed.profiles.production, ApiProfile::production());
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = ClientConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, ClientConfig::default());

        fs::write(
            &path,
            "environment = \"production\"\n[profiles.production]\nbase_url = \"https://voice.example.org\"\ntimeout_ms = 10000\n",
        )
        .unwrap();

        let loaded = ClientConfig::load_or_create(&path).unwrap();
        assert_eq!(loaded.environment, Some(Environment::Production));
        let resolved = loaded.resolve(None).unwrap();
        assert_eq!(resolved.base_url(), "https://voice.example.org");
        assert_eq!(resolved.timeout_ms(), 10_000);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "environment = \"staging\"\n").unwrap();

        assert!(ClientConfig::load_or_create(&path).is_err());
    }
}
