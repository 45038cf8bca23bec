//! Hosted-prefix normalization and matching.

use std::fmt;

/// Normalized URL prefix assets are hosted under.
///
/// Raw values are normalized on construction: trailing slashes are
/// dropped and exactly one leading slash is kept, so `assets/`,
/// `/assets` and `//assets//` all mean `/assets`. Matching is segment
/// aware: `/assets` covers `/assets` and `/assets/app.js` but not
/// `/assetsmore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedAt(String);

impl HostedAt {
    /// Normalizes `raw` into a hosted prefix.
    pub fn new(raw: &str) -> Self {
        let core = raw.trim_matches('/');
        Self(format!("/{core}"))
    }

    /// The normalized prefix, always starting with `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Removes the prefix from `path`. Returns `path` unchanged when it
    /// does not fall under the prefix.
    pub fn strip_from<'a>(&self, path: &'a str) -> &'a str {
        if self.0 == "/" {
            return path;
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

impl fmt::Display for HostedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
