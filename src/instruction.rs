//! Generating and parsing encoded paths.
//!
//! [`UrlCodec`] is the entry point. It composes [`PathCodec`] and the option
//! grammar:
//!
//! ```text
//! generate("/photos/dog.jpg", 300, _, quality(80))
//!     → "/photos/dog-300x_-quality(80).jpg"
//!
//! parse("photos/dog-300x_-quality(80).jpg")
//!     → Instruction { source_path: "photos/dog.jpg", width: 300, height: _, options: {quality: [80]} }
//! ```
//!
//! Three outcomes are kept apart:
//!
//! - **not applicable**: empty path, no dimensions, ignored path, or a request
//!   that isn't an encoded path. These come back as `None` or as the plain
//!   URL, never as errors.
//! - **misconfiguration**: a prefix and confinement are set but the path lies
//!   outside the confinement. This comes back as [`PathError`].
//! - **unknown decorations** in a parsed path are reduced to their leading
//!   token, or dropped when they have none.

use crate::config::{ConfigError, CroppaConfig};
use crate::options::OptionSet;
use crate::path::{PathCodec, PathError, to_relative_path};
use crate::pattern::{RoutePredicate, scheme};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// A target width or height. Serialized as a number, or `null` when
/// unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// Encoded as `_`. The executor derives it from the other dimension.
    #[default]
    Unspecified,
    /// Always at least 1.
    Pixels(u32),
}

impl Dimension {
    /// Round a caller-requested size to whole pixels.
    ///
    /// Missing, non-finite, and sizes that round below one pixel or above
    /// `u32::MAX` are all unspecified.
    pub fn from_requested(value: Option<f64>) -> Self {
        match value.map(f64::round) {
            Some(v) if (1.0..=f64::from(u32::MAX)).contains(&v) => Dimension::Pixels(v as u32),
            _ => Dimension::Unspecified,
        }
    }

    /// Decode one dimension of an encoded path. Zero and values that
    /// overflow `u32` are not valid dimensions.
    fn decode(raw: &str) -> Option<Self> {
        if raw == "_" {
            return Some(Dimension::Unspecified);
        }
        match raw.parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(px) => Some(Dimension::Pixels(px)),
        }
    }

    pub fn pixels(self) -> Option<u32> {
        match self {
            Dimension::Unspecified => None,
            Dimension::Pixels(px) => Some(px),
        }
    }

    pub fn is_specified(self) -> bool {
        matches!(self, Dimension::Pixels(_))
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        if px == 0 {
            Dimension::Unspecified
        } else {
            Dimension::Pixels(px)
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Unspecified => f.write_str("_"),
            Dimension::Pixels(px) => write!(f, "{px}"),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pixels().serialize(serializer)
    }
}

/// A decoded transform request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Path of the source image, relative to the crops root. Never starts
    /// with `/` and never carries the dimension suffix.
    pub source_path: String,
    pub width: Dimension,
    pub height: Dimension,
    pub options: OptionSet,
}

/// Encoded-path generator and parser for one configuration.
///
/// Built once from a [`CroppaConfig`]; every method takes `&self` and the
/// codec can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct UrlCodec {
    paths: PathCodec,
    ignore: Option<Regex>,
    route: RoutePredicate,
}

impl UrlCodec {
    /// Validate the config and compile its patterns.
    pub fn new(config: &CroppaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let confinement = config.confinement()?;
        let route = RoutePredicate::new(confinement.as_ref());
        Ok(Self {
            paths: PathCodec::new(config.url_prefix.as_deref(), confinement),
            ignore: config.ignore_pattern()?,
            route,
        })
    }

    pub fn paths(&self) -> &PathCodec {
        &self.paths
    }

    /// Encode a size and options into the URL of a source image.
    ///
    /// Returns `Ok(None)` when the URL has no path. Ignored paths and
    /// requests without any dimension come back as the plain public URL.
    #[tracing::instrument(level = "debug", skip(self, options))]
    pub fn generate(
        &self,
        url: &str,
        width: Option<f64>,
        height: Option<f64>,
        options: &OptionSet,
    ) -> Result<Option<String>, PathError> {
        let path = to_relative_path(url);
        if path.is_empty() {
            tracing::debug!("empty path, nothing to generate");
            return Ok(None);
        }
        if self.ignore.as_ref().is_some_and(|re| re.is_match(path)) {
            tracing::debug!(path, "path matches ignore pattern, passing through");
            return self.paths.to_public_url(path).map(Some);
        }

        let width = Dimension::from_requested(width);
        let height = Dimension::from_requested(height);
        if !width.is_specified() && !height.is_specified() {
            tracing::debug!(path, "no dimensions requested, passing through");
            return self.paths.to_public_url(path).map(Some);
        }

        let suffix = format!("-{width}x{height}{}", options.encode());
        let encoded = insert_suffix(path, &suffix);
        self.paths.to_public_url(&encoded).map(Some)
    }

    /// Decode an encoded request path.
    ///
    /// Returns `None` when the path is not an encoded path or lies outside
    /// the confinement pattern, so callers can fall through to ordinary
    /// static file handling. Full URLs are accepted; only their path is used.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, request_path: &str) -> Option<Instruction> {
        let request = to_relative_path(request_path);
        let Some(caps) = scheme().captures(request) else {
            tracing::debug!("not an encoded path");
            return None;
        };

        let (Some(width), Some(height)) = (Dimension::decode(&caps[2]), Dimension::decode(&caps[3]))
        else {
            tracing::debug!(width = &caps[2], height = &caps[3], "invalid dimension");
            return None;
        };

        let source = format!("{}.{}", &caps[1], &caps[5]);
        let Some(source_path) = self.paths.relative_path(&source) else {
            tracing::debug!(source = %source, "source outside confinement");
            return None;
        };

        Some(Instruction {
            source_path: source_path.trim_start_matches('/').to_string(),
            width,
            height,
            options: OptionSet::decode(&caps[4]),
        })
    }

    /// Route expression for an external router. See [`RoutePredicate`].
    pub fn route_pattern(&self) -> &str {
        self.route.pattern()
    }

    /// Whether a router using [`route_pattern`](Self::route_pattern) would
    /// accept this path.
    pub fn route_matches(&self, path: &str) -> bool {
        self.route.matches(path)
    }
}

/// Insert `suffix` between the file stem and its extension:
/// `photos/dog.jpg` + `-300x_` → `photos/dog-300x_.jpg`.
///
/// The extension is whatever follows the last `.` of the file name; a path
/// without one gets the suffix appended.
fn insert_suffix(path: &str, suffix: &str) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (dir.trim_matches('/'), file),
        None => ("", path),
    };
    let (stem, ext) = match file.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file, None),
    };

    let mut out = String::with_capacity(path.len() + suffix.len() + 1);
    if !dir.is_empty() {
        out.push_str(dir);
        out.push('/');
    }
    out.push_str(stem);
    out.push_str(suffix);
    if let Some(ext) = ext {
        out.push('.');
        out.push_str(ext);
    }
    out
}
