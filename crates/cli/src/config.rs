use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelfmark_core::LabelStyle;
use shelfmark_core::model::CodeKind;

/// CLI settings, read from TOML.
///
/// ```toml
/// default_kind = "qr"
///
/// [style]
/// qr_width = 192
/// columns = 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_kind: CodeKind,
    pub style: LabelStyle,
}

impl Config {
    /// Gets the platform-specific config file path.
    ///
    /// - Linux: `~/.config/shelfmark/config.toml`
    /// - macOS: `~/Library/Application Support/shelfmark/config.toml`
    /// - Windows: `%APPDATA%\shelfmark\config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(dir.join("shelfmark").join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), else the default file if it
    /// exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_from(None, &Self::default_path()?),
        }
    }

    fn load_from(explicit: Option<&Path>, default: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if !default.exists() {
            log::debug!("no config at {}, using defaults", default.display());
            return Ok(Self::default());
        }
        Self::from_file(default)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .style
            .validate()
            .with_context(|| format!("Invalid label style in {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
