//! Shared test utilities for the codec test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let codec = codec_with(|c| c.path = Some("uploads/(.*)$".into()));
//! assert!(codec.parse("uploads/dog-300x200.jpg").is_some());
//! ```

use crate::config::CroppaConfig;
use crate::instruction::UrlCodec;

/// Codec built from the stock defaults: no prefix, no confinement, nothing
/// ignored.
pub fn default_codec() -> UrlCodec {
    UrlCodec::new(&CroppaConfig::default()).unwrap()
}

/// Codec built from the stock defaults after `edit` has adjusted them.
/// Panics if the edited config is invalid.
pub fn codec_with(edit: impl FnOnce(&mut CroppaConfig)) -> UrlCodec {
    let mut config = CroppaConfig::default();
    edit(&mut config);
    UrlCodec::new(&config).unwrap_or_else(|e| panic!("invalid test config {config:?}: {e}"))
}
