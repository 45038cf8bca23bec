//! Compiled asset representation.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// A compiled asset produced by an [`AssetSource`](crate::AssetSource).
///
/// Holds the complete compiled contents together with the metadata the
/// HTTP layer needs to build validation and freshness headers. Using
/// `Bytes` for the contents makes cloning cheap via reference counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    content: Bytes,
    content_type: String,
    digest: String,
    modified: DateTime<Utc>,
}

impl Asset {
    /// Creates an asset from compiled content and metadata.
    pub fn new(
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
        digest: impl Into<String>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
            digest: digest.into(),
            modified,
        }
    }

    /// Compiled contents of the asset.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Consumes the asset and returns its contents.
    pub fn into_content(self) -> Bytes {
        self.content
    }

    /// Media type reported by the engine, e.g. `application/javascript`.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Content digest in lowercase hex.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Strong entity tag for this asset: the digest wrapped in double quotes.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.digest)
    }

    /// Modification time of the newest source file involved in the build.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the compiled content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Lookup options passed to [`AssetSource::find_asset`](crate::AssetSource::find_asset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    bundle: bool,
}

impl FindOptions {
    /// Request the bundled form: the asset with all of its required
    /// dependencies concatenated in.
    pub fn bundled() -> Self {
        Self { bundle: true }
    }

    /// Request the raw form: the asset body alone, without dependencies.
    pub fn raw() -> Self {
        Self { bundle: false }
    }

    /// `true` when the bundled form was requested.
    pub fn bundle(&self) -> bool {
        self.bundle
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Lowercase hex SHA-256 digest of `content`.
///
/// Engines that do not track digests themselves can use this to fill
/// [`Asset::digest`].
pub fn hex_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
