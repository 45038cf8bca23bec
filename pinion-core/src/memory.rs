//! In-memory asset source for tests and examples.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::{Asset, AssetSource, FindOptions, SourceError, hex_digest};

/// An [`AssetSource`] backed by a `HashMap`.
///
/// Intended for tests and examples: entries are registered up front and
/// served on lookup. Digests are computed with SHA-256 at insertion
/// time. Clones share the same map, so a handle kept outside the
/// middleware can keep registering entries while requests are served.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

#[derive(Debug, Clone)]
enum Entry {
    Found { bundled: Asset, raw: Option<Asset> },
    Failed { kind: String, message: String },
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bundled form of an asset and returns its digest.
    pub fn insert(
        &self,
        logical_path: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> String {
        let content = content.into();
        let digest = hex_digest(&content);
        let asset = Asset::new(content, content_type, digest.clone(), Utc::now());
        self.entries.write().expect("memory source lock poisoned").insert(
            logical_path.into(),
            Entry::Found {
                bundled: asset,
                raw: None,
            },
        );
        digest
    }

    /// Registers the raw (unbundled) form of an already registered asset.
    ///
    /// Served when the lookup asks for [`FindOptions::raw`]. Without a raw
    /// form the bundled content answers both lookups.
    pub fn insert_raw(&self, logical_path: &str, content: impl Into<Bytes>) {
        let content = content.into();
        let mut entries = self.entries.write().expect("memory source lock poisoned");
        if let Some(Entry::Found { bundled, raw }) = entries.get_mut(logical_path) {
            let digest = hex_digest(&content);
            *raw = Some(Asset::new(content, bundled.content_type(), digest, Utc::now()));
        }
    }

    /// Registers a path that fails to compile.
    pub fn insert_error(
        &self,
        logical_path: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.entries.write().expect("memory source lock poisoned").insert(
            logical_path.into(),
            Entry::Failed {
                kind: kind.into(),
                message: message.into(),
            },
        );
    }
}

#[async_trait]
impl AssetSource for MemorySource {
    async fn find_asset(
        &self,
        logical_path: &str,
        options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        let entries = self.entries.read().expect("memory source lock poisoned");
        match entries.get(logical_path) {
            Some(Entry::Found { bundled, raw }) => {
                let asset = match (options.bundle(), raw) {
                    (false, Some(raw)) => raw.clone(),
                    _ => bundled.clone(),
                };
                Ok(Some(asset))
            }
            Some(Entry::Failed { kind, message }) => {
                Err(SourceError::compile(kind.clone(), message.clone()))
            }
            None => Ok(None),
        }
    }
}
