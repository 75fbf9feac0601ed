//! Conversion between request URLs, root-relative paths and public URLs.
//!
//! Three shapes of the same location flow through the codec:
//!
//! - a **URL** as callers hold it: `https://host/uploads/dog.jpg?v=2`, `/uploads/dog.jpg`
//! - a **path**: the URL's path component without leading slashes, `uploads/dog.jpg`
//! - a **public URL**: the path behind the configured `url_prefix`
//!
//! When a confinement pattern is configured, only its capture group survives
//! into the public URL. This lets the scheme apply to a subtree such as
//! `uploads/**` while the public URL lives under a different prefix such as a
//! CDN host.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A prefix and a confinement pattern are configured but the path lies
    /// outside the confined subtree. This is a misconfiguration or a caller
    /// bug, never a normal request shape.
    #[error("path '{path}' does not match the confinement pattern '{pattern}'")]
    ConfinementMismatch { path: String, pattern: String },
}

/// Extract the path component of a URL and strip its leading slashes.
///
/// Bare paths pass through. Query strings and fragments are dropped. The
/// remaining characters are returned as-is, with no percent-decoding.
///
/// - `"https://cdn.x/img/a.jpg?v=1"` → `"img/a.jpg"`
/// - `"//cdn.x/img/a.jpg"` → `"img/a.jpg"`
/// - `"/img/a.jpg"` → `"img/a.jpg"`
/// - `"img/a.jpg"` → `"img/a.jpg"`
pub fn to_relative_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let url = &url[..end];

    let after_authority = match scheme_end(url) {
        Some(idx) => skip_authority(&url[idx + 3..]),
        None if url.starts_with("//") => skip_authority(&url[2..]),
        None => url,
    };
    after_authority.trim_start_matches('/')
}

/// Byte index of `://` when `url` starts with a syntactically valid scheme.
fn scheme_end(url: &str) -> Option<usize> {
    let idx = url.find("://")?;
    let scheme = &url[..idx];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(idx)
}

fn skip_authority(rest: &str) -> &str {
    match rest.find('/') {
        Some(slash) => &rest[slash..],
        None => "",
    }
}

/// Maps paths to public URLs under an optional prefix and confinement.
#[derive(Debug, Clone)]
pub struct PathCodec {
    url_prefix: Option<String>,
    confinement: Option<Regex>,
}

impl PathCodec {
    /// An empty prefix counts as unset.
    pub fn new(url_prefix: Option<&str>, confinement: Option<Regex>) -> Self {
        Self {
            url_prefix: url_prefix
                .filter(|p| !p.is_empty())
                .map(|p| p.trim_end_matches('/').to_string()),
            confinement,
        }
    }

    pub fn confinement(&self) -> Option<&Regex> {
        self.confinement.as_ref()
    }

    /// Project a path onto the confinement pattern's capture group.
    ///
    /// Without a confinement pattern the path is returned unchanged. Returns
    /// `None` when the pattern is configured and does not match, which means
    /// the path is outside the scheme's authority.
    pub fn relative_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        match &self.confinement {
            None => Some(path),
            Some(re) => re
                .captures(path)
                .map(|caps| caps.get(1).map_or("", |m| m.as_str())),
        }
    }

    /// Build the public URL for a root-relative path.
    ///
    /// | prefix | confinement | result |
    /// |---|---|---|
    /// | unset | any | `/` + path |
    /// | set | unset | prefix + `/` + path |
    /// | set | set | prefix + `/` + confined part of path |
    pub fn to_public_url(&self, path: &str) -> Result<String, PathError> {
        let Some(prefix) = &self.url_prefix else {
            return Ok(format!("/{path}"));
        };
        let relative = self
            .relative_path(path)
            .ok_or_else(|| PathError::ConfinementMismatch {
                path: path.to_string(),
                pattern: self
                    .confinement
                    .as_ref()
                    .map(|re| re.as_str().to_string())
                    .unwrap_or_default(),
            })?;
        Ok(format!("{prefix}/{relative}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confined(pattern: &str) -> Option<Regex> {
        Some(Regex::new(pattern).unwrap())
    }

    #[test]
    fn relative_path_from_absolute_url() {
        assert_eq!(to_relative_path("https://cdn.x/img/a.jpg"), "img/a.jpg");
        assert_eq!(to_relative_path("http://host:8080/a/b.png"), "a/b.png");
    }

    #[test]
    fn relative_path_drops_query_and_fragment() {
        assert_eq!(to_relative_path("/img/a.jpg?v=2"), "img/a.jpg");
        assert_eq!(to_relative_path("img/a.jpg#top"), "img/a.jpg");
        assert_eq!(to_relative_path("https://h/x.jpg?a=b#c"), "x.jpg");
    }

    #[test]
    fn relative_path_protocol_relative() {
        assert_eq!(to_relative_path("//cdn.x/img/a.jpg"), "img/a.jpg");
    }

    #[test]
    fn relative_path_strips_leading_slashes() {
        assert_eq!(to_relative_path("/img/a.jpg"), "img/a.jpg");
        assert_eq!(to_relative_path("img/a.jpg"), "img/a.jpg");
    }

    #[test]
    fn relative_path_does_not_decode() {
        assert_eq!(to_relative_path("/img/my%20dog.jpg"), "img/my%20dog.jpg");
        assert_eq!(to_relative_path("img/my dog.jpg"), "img/my dog.jpg");
    }

    #[test]
    fn relative_path_host_only_is_empty() {
        assert_eq!(to_relative_path("https://cdn.x"), "");
        assert_eq!(to_relative_path("/"), "");
        assert_eq!(to_relative_path(""), "");
    }

    #[test]
    fn relative_path_colon_in_path_is_not_a_scheme() {
        assert_eq!(to_relative_path("img/a:b://c.jpg"), "img/a:b://c.jpg");
    }

    #[test]
    fn public_url_without_prefix() {
        let codec = PathCodec::new(None, None);
        assert_eq!(codec.to_public_url("img/a.jpg").unwrap(), "/img/a.jpg");
    }

    #[test]
    fn public_url_with_prefix() {
        let codec = PathCodec::new(Some("https://cdn.x"), None);
        assert_eq!(
            codec.to_public_url("img/a.jpg").unwrap(),
            "https://cdn.x/img/a.jpg"
        );
    }

    #[test]
    fn public_url_trims_prefix_slashes() {
        let codec = PathCodec::new(Some("https://cdn.x//"), None);
        assert_eq!(
            codec.to_public_url("img/a.jpg").unwrap(),
            "https://cdn.x/img/a.jpg"
        );
    }

    #[test]
    fn empty_prefix_is_unset() {
        let codec = PathCodec::new(Some(""), confined("uploads/(.*)$"));
        assert_eq!(codec.to_public_url("other/a.jpg").unwrap(), "/other/a.jpg");
    }

    #[test]
    fn public_url_with_prefix_and_confinement() {
        let codec = PathCodec::new(Some("https://cdn.x/"), confined("uploads/(.*)$"));
        assert_eq!(
            codec.to_public_url("uploads/img/a.jpg").unwrap(),
            "https://cdn.x/img/a.jpg"
        );
    }

    #[test]
    fn confinement_mismatch_is_an_error() {
        let codec = PathCodec::new(Some("https://cdn.x"), confined("uploads/(.*)$"));
        let err = codec.to_public_url("static/a.jpg").unwrap_err();
        assert_eq!(
            err,
            PathError::ConfinementMismatch {
                path: "static/a.jpg".into(),
                pattern: "uploads/(.*)$".into(),
            }
        );
    }

    #[test]
    fn confinement_without_prefix_is_ignored_for_urls() {
        let codec = PathCodec::new(None, confined("uploads/(.*)$"));
        assert_eq!(codec.to_public_url("static/a.jpg").unwrap(), "/static/a.jpg");
    }

    #[test]
    fn relative_path_projection() {
        let codec = PathCodec::new(None, confined("uploads/(.*)$"));
        assert_eq!(codec.relative_path("uploads/a/b.jpg"), Some("a/b.jpg"));
        assert_eq!(codec.relative_path("static/b.jpg"), None);

        let open = PathCodec::new(None, None);
        assert_eq!(open.relative_path("static/b.jpg"), Some("static/b.jpg"));
    }

    #[test]
    fn relative_path_optional_group_that_did_not_participate() {
        let codec = PathCodec::new(None, confined("^uploads(/.+)?$"));
        assert_eq!(codec.relative_path("uploads"), Some(""));
    }
}
