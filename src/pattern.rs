//! The encoded-path pattern and the route expression built from it.
//!
//! [`SCHEME_PATTERN`] is a wire format. Generation, parsing and any external
//! router must agree on it byte for byte, so changing it is a breaking change.
//!
//! ## Capture groups
//!
//! | Group | Content | `a/b-100x_-resize.png` |
//! |---|---|---|
//! | 1 | everything before the dimension suffix | `a/b` |
//! | 2 | width, digits or `_` | `100` |
//! | 3 | height, digits or `_` | `_` |
//! | 4 | all decoration tokens, possibly empty | `-resize` |
//! | 5 | extension, one of eight exact spellings | `png` |
//!
//! The extension list is case-sensitive on purpose: `JPG` matches, `Jpg` does
//! not.

use regex::Regex;
use std::sync::LazyLock;

/// The encoded-path grammar: `(prefix)-(W|_)x(H|_)(-decoration)*.(ext)`.
pub const SCHEME_PATTERN: &str = r"(.+)-([0-9]+|_)x([0-9]+|_)((?:-[0-9a-zA-Z(),\-._]+)*)\.(jpg|jpeg|png|gif|JPG|JPEG|PNG|GIF)$";

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCHEME_PATTERN).expect("scheme pattern regex"));

/// The compiled [`SCHEME_PATTERN`], built once per process.
pub fn scheme() -> &'static Regex {
    &SCHEME
}

/// Decides from a raw request path alone whether a router should hand it to
/// the codec.
///
/// The exported expression wraps the confinement pattern and the scheme
/// pattern in lookaheads so they combine as an AND, then consumes the path
/// with `.+`:
///
/// ```text
/// (?=uploads/(.*)$)(?=(.+)-([0-9]+|_)x ... $).+
/// ```
///
/// The trailing `.+` matters. Routers wrap the expression in `^...$`, and two
/// zero-width lookaheads alone would only ever match the empty path.
///
/// The `regex` crate has no lookaround, so [`RoutePredicate::matches`]
/// evaluates the same three conditions directly.
#[derive(Debug, Clone)]
pub struct RoutePredicate {
    confinement: Option<Regex>,
    expression: String,
}

impl RoutePredicate {
    pub fn new(confinement: Option<&Regex>) -> Self {
        let expression = match confinement {
            Some(re) => format!("(?={})(?={}).+", re.as_str(), SCHEME_PATTERN),
            None => format!("(?={}).+", SCHEME_PATTERN),
        };
        Self {
            confinement: confinement.cloned(),
            expression,
        }
    }

    /// The ready-to-embed route expression.
    pub fn pattern(&self) -> &str {
        &self.expression
    }

    /// Evaluate the route expression against a whole request path.
    pub fn matches(&self, path: &str) -> bool {
        // `.+` anchored on both ends: at least one character, no line breaks
        if path.is_empty() || path.contains('\n') {
            return false;
        }
        // A lookahead at position 0 is a match anchored at the start. The
        // leftmost match starts at 0 whenever any match does.
        let confined = self
            .confinement
            .as_ref()
            .is_none_or(|re| re.find(path).is_some_and(|m| m.start() == 0));
        confined && scheme().is_match(path)
    }
}
