//! Encoder settings handed to the transform executor.
//!
//! A request's `quality(..)` and `interlace(..)` options win over the
//! configured defaults. Anything missing or unreadable falls back to the
//! config, so mapping never fails.
//!
//! | Option | Config fallback | Accepted arguments |
//! |---|---|---|
//! | `quality(N)` | `jpeg_quality` | number, rounded and clamped to 0–100 |
//! | `interlace(B)` | `interlace` | `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` |

use crate::config::CroppaConfig;
use crate::options::OptionSet;
use serde::Serialize;

/// JPEG encoding quality (0-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    /// Read a quality argument. Fractions are rounded.
    fn parse(raw: &str) -> Option<Self> {
        let value: f64 = raw.parse().ok()?;
        value
            .is_finite()
            .then(|| Self::new(value.round().clamp(0.0, 100.0) as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Encoder settings in the shape the transform executor expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub jpeg_quality: Quality,
    pub interlace: bool,
}

/// Project request options over the configured encoder defaults.
pub fn to_engine_config(options: &OptionSet, config: &CroppaConfig) -> EngineConfig {
    EngineConfig {
        jpeg_quality: options
            .first_arg("quality")
            .and_then(Quality::parse)
            .unwrap_or_else(|| Quality::new(config.jpeg_quality)),
        interlace: options
            .first_arg("interlace")
            .and_then(parse_flag)
            .unwrap_or(config.interlace),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_95() {
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn defaults_when_no_options() {
        let config = CroppaConfig {
            jpeg_quality: 70,
            interlace: false,
            ..CroppaConfig::default()
        };
        let engine = to_engine_config(&OptionSet::new(), &config);
        assert_eq!(
            engine,
            EngineConfig {
                jpeg_quality: Quality::new(70),
                interlace: false,
            }
        );
    }

    #[test]
    fn options_override_config() {
        let options = OptionSet::decode("-quality(80)-interlace(0)");
        let engine = to_engine_config(&options, &CroppaConfig::default());
        assert_eq!(engine.jpeg_quality.value(), 80);
        assert!(!engine.interlace);
    }

    #[test]
    fn only_first_argument_counts() {
        let options = OptionSet::decode("-quality(40,90)");
        let engine = to_engine_config(&options, &CroppaConfig::default());
        assert_eq!(engine.jpeg_quality.value(), 40);
    }

    #[test]
    fn fractional_and_out_of_range_quality() {
        let config = CroppaConfig::default();
        let frac = to_engine_config(&OptionSet::decode("-quality(79.6)"), &config);
        assert_eq!(frac.jpeg_quality.value(), 80);
        let high = to_engine_config(&OptionSet::decode("-quality(250)"), &config);
        assert_eq!(high.jpeg_quality.value(), 100);
    }

    #[test]
    fn unreadable_arguments_fall_back() {
        let config = CroppaConfig {
            jpeg_quality: 60,
            interlace: true,
            ..CroppaConfig::default()
        };
        let options = OptionSet::decode("-quality(high)-interlace(maybe)");
        let engine = to_engine_config(&options, &config);
        assert_eq!(engine.jpeg_quality.value(), 60);
        assert!(engine.interlace);
    }

    #[test]
    fn flag_without_arguments_falls_back() {
        let options = OptionSet::decode("-quality-interlace");
        let engine = to_engine_config(&options, &CroppaConfig::default());
        assert_eq!(engine.jpeg_quality, Quality::default());
        assert!(engine.interlace);
    }

    #[test]
    fn parse_flag_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("2"), None);
    }

    #[test]
    fn serializes_for_cli_output() {
        let engine = EngineConfig {
            jpeg_quality: Quality::new(80),
            interlace: true,
        };
        assert_eq!(
            serde_json::to_string(&engine).unwrap(),
            r#"{"jpeg_quality":80,"interlace":true}"#
        );
    }
}
