//! # Croppa URL
//!
//! Encode image transform instructions into ordinary-looking file paths, and
//! decode them again.
//!
//! ```text
//! photos/dog.jpg  +  300 x _  +  quality(80)   →   photos/dog-300x_-quality(80).jpg
//! ```
//!
//! The encoded path both names the source image and says how to derive the
//! asset from it. A view helper generates these URLs, a router recognizes
//! them, and an image handler parses them back into an [`Instruction`].
//! Nothing is stored in between: the path is the whole state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `croppa.toml` loading, merging, validation |
//! | [`path`] | URL ↔ root-relative path ↔ public URL, with prefix and confinement |
//! | [`options`] | The `-name(arg,arg)` option sub-language |
//! | [`pattern`] | The encoded-path pattern and the router expression built from it |
//! | [`instruction`] | [`UrlCodec`]: generate and parse encoded paths |
//! | [`engine`] | Map decoded options + config defaults to encoder settings |
//! | [`output`] | CLI output formatting |
//!
//! # Grammar
//!
//! ```text
//! <dir>/<base>-<W>x<H>(-<option>)*.<ext>
//!
//! W, H     digits, or _ for "derive from the other side"
//! option   name | name(arg,arg,...)      name and args: [A-Za-z0-9_], args also , .
//! ext      jpg jpeg png gif JPG JPEG PNG GIF   (exact spellings only)
//! ```
//!
//! The grammar has no escaping. Option arguments containing `,`, `(`, `)` or
//! `-` cannot be encoded.
//!
//! # Design Decisions
//!
//! ## No Global State
//!
//! A [`CroppaConfig`] is loaded once and compiled into a [`UrlCodec`]. Every
//! operation takes `&self`, does a bounded amount of string and regex work,
//! and allocates its own output, so a codec can be shared across threads
//! without locking.
//!
//! ## "Not Applicable" Is Not an Error
//!
//! An empty path, a request without dimensions, an ignored path, or a request
//! path that isn't encoded are all ordinary outcomes. They come back as
//! `None` or as the plain URL. Only a path outside the confinement when a URL
//! prefix is configured is an error ([`PathError`]), because that signals a
//! misconfiguration.

pub mod config;
pub mod engine;
pub mod instruction;
pub mod options;
pub mod output;
pub mod path;
pub mod pattern;

pub use config::{ConfigError, CroppaConfig};
pub use engine::{EngineConfig, Quality, to_engine_config};
pub use instruction::{Dimension, Instruction, UrlCodec};
pub use options::{OptionEntry, OptionSet, OptionValue};
pub use path::{PathCodec, PathError, to_relative_path};
pub use pattern::{RoutePredicate, SCHEME_PATTERN};

#[cfg(test)]
pub(crate) mod test_helpers;
