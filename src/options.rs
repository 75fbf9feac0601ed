//! The option sub-language of an encoded path.
//!
//! Options follow the dimension suffix as `-`-separated tokens. A token is
//! either a bare name or a name with a parenthesized, comma-separated argument
//! list:
//!
//! ```text
//! dog-300x200-quadrant(T)-resize-trim(10,20,30,40).jpg
//!            └─────────┬──────────────────────────┘
//!             -quadrant(T)  -resize  -trim(10,20,30,40)
//! ```
//!
//! There is no escaping. An argument containing `,`, `(`, `)` or `-` cannot be
//! represented, and names are limited to `[A-Za-z0-9_]`.
//!
//! On decode, each segment yields its first well-formed token: `quality(80`
//! decodes as the flag `quality`, `x(y)z` as `x(y)`. Segments with no token at
//! all are skipped rather than rejected, so a new option syntax can roll out
//! without breaking older decoders.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::LazyLock;

// Unanchored: the leftmost token inside a segment wins.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_]+)(?:\(([A-Za-z0-9_,.]+)\))?").expect("option token regex")
});

/// Arguments of a named option.
///
/// `Flag` (no parentheses) and `Args(vec![])` are distinct values, though
/// both encode as a bare name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag,
    Args(Vec<String>),
}

impl OptionValue {
    pub fn args(&self) -> &[String] {
        match self {
            OptionValue::Flag => &[],
            OptionValue::Args(args) => args,
        }
    }

    /// First argument, if any.
    pub fn first(&self) -> Option<&str> {
        self.args().first().map(String::as_str)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Flag => serializer.serialize_none(),
            OptionValue::Args(args) => args.serialize(serializer),
        }
    }
}

/// One entry of an [`OptionSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    Named { name: String, value: OptionValue },
    /// A raw token supplied without a name, emitted verbatim (e.g. `resize`
    /// or `quadrant(T)`). Decoding turns it into a named entry.
    Positional(String),
}

/// Formats the entry as it appears in an encoded path, without the leading `-`.
impl fmt::Display for OptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionEntry::Positional(token) => f.write_str(token),
            OptionEntry::Named {
                name,
                value: OptionValue::Args(args),
            } if !args.is_empty() => write!(f, "{name}({})", args.join(",")),
            OptionEntry::Named { name, .. } => f.write_str(name),
        }
    }
}

/// Ordered option mapping. Insertion order is the serialized token order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<OptionEntry>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare `name` option.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.insert(name, OptionValue::Flag);
        self
    }

    /// Add `name(v1,v2,..)`.
    pub fn with_args<I, S>(mut self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.insert(name, OptionValue::Args(args));
        self
    }

    /// Add `name(value)`.
    pub fn with_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_args(name, [value])
    }

    /// Add a raw token, emitted as-is.
    pub fn with_positional(mut self, token: impl Into<String>) -> Self {
        self.entries.push(OptionEntry::Positional(token.into()));
        self
    }

    /// Insert or replace a named option. A replaced option keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        let name = name.into();
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            OptionEntry::Named { name: n, value: v } if *n == name => Some(v),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.entries.push(OptionEntry::Named { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.iter().find_map(|entry| match entry {
            OptionEntry::Named { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First argument of a named option, if it has one.
    pub fn first_arg(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::first)
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as the option part of a suffix: one `-token` per entry.
    ///
    /// An empty set encodes as the empty string.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("-{entry}"))
            .collect()
    }

    /// Decode the decoration part of an encoded path, e.g.
    /// `-quadrant(T)-resize`.
    ///
    /// Each segment contributes its leftmost well-formed token; trailing junk
    /// in the segment is ignored. Segments without any token are skipped. A
    /// repeated name overwrites the earlier value in place.
    pub fn decode(tail: &str) -> Self {
        let mut options = OptionSet::new();
        for segment in tail.split('-').filter(|s| !s.is_empty()) {
            let Some(caps) = TOKEN.captures(segment) else {
                tracing::debug!(segment, "skipping option segment without a token");
                continue;
            };
            let value = match caps.get(2) {
                Some(args) => {
                    OptionValue::Args(args.as_str().split(',').map(str::to_string).collect())
                }
                None => OptionValue::Flag,
            };
            options.insert(&caps[1], value);
        }
        options
    }

    /// The set as a decoder would see it after a round trip: positional
    /// tokens become named entries and `name()` style empty argument lists
    /// become flags.
    pub fn normalized(&self) -> Self {
        Self::decode(&self.encode())
    }
}

impl Serialize for OptionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            match entry {
                OptionEntry::Named { name, value } => map.serialize_entry(name, value)?,
                OptionEntry::Positional(token) => map.serialize_entry(token, &OptionValue::Flag)?,
            }
        }
        map.end()
    }
}
