use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Client paths following OS conventions
#[derive(Clone, Debug)]
pub struct AppPaths {
    /// Configuration directory (config.toml with API profiles)
    pub config: PathBuf,
}

impl AppPaths {
    /// Resolve OS-specific paths for the voice auth client
    ///
    /// # Platform Paths
    ///
    /// - Linux: `~/.config/voice-auth/`
    /// - macOS: `~/Library/Application Support/com.LotusEmberLabs.voice-auth/`
    /// - Windows: `%APPDATA%\LotusEmberLabs\voice-auth\config\`
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "LotusEmberLabs", "voice-auth")
            .context("Failed to determine project directories")?;

        Ok(Self {
            config: proj_dirs.config_dir().to_path_buf(),
        })
    }

    /// Create the config directory
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config).context("Failed to create config directory")?;
        log::debug!("Config directory: {}", self.config.display());
        Ok(())
    }

    /// Get path to config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }
}
