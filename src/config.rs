use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::browser::WaitUntil;
use crate::PaperFormat;

/// Default deadline for navigation plus the idle wait.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for the browser process to come up.
pub const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub wait_until: WaitUntil,
    pub timeouts: Timeouts,
    pub pdf: PdfSettings,
    pub browser: BrowserSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub launch: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: DEFAULT_NAVIGATION_TIMEOUT,
            launch: DEFAULT_LAUNCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfSettings {
    pub format: PaperFormat,
    pub landscape: bool,
    pub print_background: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Chrome/Chromium binary; auto-detected when unset.
    pub executable: Option<PathBuf>,
    pub sandbox: bool,
    /// Extra command-line switches passed to the browser.
    pub args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            sandbox: true,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

impl Config {
    /// `~/.config/webpdf/config.toml` (platform equivalent elsewhere).
    pub fn central_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("webpdf").join("config.toml"))
    }

    /// Priority: explicit path > central config (if present) > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.is_file() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.navigation.is_zero() {
            return Err(ConfigError::Invalid(
                "timeouts.navigation must be greater than zero".to_string(),
            ));
        }
        if self.timeouts.launch.is_zero() {
            return Err(ConfigError::Invalid(
                "timeouts.launch must be greater than zero".to_string(),
            ));
        }
        if let Some(exe) = &self.browser.executable {
            if exe.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "browser.executable must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
