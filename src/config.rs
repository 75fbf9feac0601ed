//! Codec configuration.
//!
//! Handles loading and validating `croppa.toml`. The file is sparse: every
//! key has a default and user values override them one by one.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # Confinement pattern. Exactly one capture group: the part of the path
//! # that is relative to the crops root. Omit to accept any path.
//! # path = "uploads/(.*)$"
//!
//! # Paths matching this pattern bypass instruction encoding entirely.
//! # ignore = "\\.(svg|webp)$"
//!
//! # Prepended to every produced URL (e.g. a CDN host).
//! # url_prefix = "https://cdn.example.com/uploads"
//!
//! jpeg_quality = 95         # Default JPEG quality (0-100)
//! interlace = true          # Default progressive/interlaced output
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! A loaded [`CroppaConfig`] is plain data. Compile it once into a
//! [`UrlCodec`](crate::instruction::UrlCodec) and share that by reference.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid {key} pattern: {source}")]
    Regex {
        key: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Codec configuration loaded from `croppa.toml`.
///
/// Constructed once per process and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CroppaConfig {
    /// Confinement pattern with exactly one capture group. The captured text
    /// is the path relative to the crops root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Paths matching this pattern are never encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,
    /// Prefix prepended to every produced URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
    /// JPEG quality used when a request carries no `quality(..)` option.
    pub jpeg_quality: u32,
    /// Interlacing used when a request carries no `interlace(..)` option.
    pub interlace: bool,
}

impl Default for CroppaConfig {
    fn default() -> Self {
        Self {
            path: None,
            ignore: None,
            url_prefix: None,
            jpeg_quality: 95,
            interlace: true,
        }
    }
}

impl CroppaConfig {
    /// Validate config values are within acceptable ranges and that the
    /// patterns compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "jpeg_quality must be 0-100".into(),
            ));
        }
        if let Some(confine) = self.confinement()? {
            // captures_len counts the implicit whole-match group
            if confine.captures_len() != 2 {
                return Err(ConfigError::Validation(format!(
                    "path pattern must have exactly one capture group, found {}",
                    confine.captures_len() - 1
                )));
            }
        }
        self.ignore_pattern()?;
        Ok(())
    }

    /// Compile the confinement pattern, if configured.
    pub fn confinement(&self) -> Result<Option<Regex>, ConfigError> {
        compile("path", self.path.as_deref())
    }

    /// Compile the ignore pattern, if configured.
    pub fn ignore_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        compile("ignore", self.ignore.as_deref())
    }
}

/// Empty strings count as unset, the same as an absent key.
fn compile(key: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    match pattern.filter(|p| !p.is_empty()) {
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|source| ConfigError::Regex { key, source }),
        None => Ok(None),
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Load config from a TOML file and validate it.
///
/// The file is sparse: absent keys take their defaults through
/// `#[serde(default)]`. A missing file yields the defaults.
pub fn load_config(file: &Path) -> Result<CroppaConfig, ConfigError> {
    let config: CroppaConfig = if file.exists() {
        toml::from_str(&fs::read_to_string(file)?)?
    } else {
        CroppaConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `croppa.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# croppa-url configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Path handling
# ---------------------------------------------------------------------------

# Confinement pattern: only paths matching it are handled. It must contain
# exactly one capture group, whose match is the path relative to the crops
# root (the key the storage backend uses).
# path = "uploads/(.*)$"

# Paths matching this pattern are passed through unencoded.
# ignore = "^https?://"

# Prefix for every produced URL, e.g. a CDN host.
# url_prefix = "https://cdn.example.com/uploads"

# ---------------------------------------------------------------------------
# Encoder defaults (overridden per request by quality(..) / interlace(..))
# ---------------------------------------------------------------------------

# JPEG quality (0 = worst, 100 = best).
jpeg_quality = 95

# Write progressive / interlaced images.
interlace = true
"##
}
