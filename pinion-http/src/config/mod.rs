//! Middleware configuration.
//!
//! [`Settings`] is the deserializable user-facing shape: every field is
//! optional and falls back to a default. [`Settings::build`] validates
//! the combination and produces the resolved [`Config`] the middleware
//! runs with.

pub mod cache;
pub mod hosted_at;
pub mod media_types;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use pinion_core::SharedStore;
use pinion_fs::FileStore;
use serde::Deserialize;
use thiserror::Error;

pub use cache::CacheDirective;
pub use hosted_at::HostedAt;
pub use media_types::MediaTypes;

/// Unvalidated middleware settings.
///
/// Every field is optional; see the field docs for defaults. Typically
/// deserialized from an application configuration file and turned into a
/// [`Config`] with [`Settings::build`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory the application lives in. Relative paths elsewhere in
    /// the settings resolve against it. Default: `.`.
    pub root: Option<PathBuf>,
    /// URL prefix assets are hosted under. Default: `/`.
    pub hosted_at: Option<String>,
    /// Write-through caching of served bodies. Default: disabled.
    pub cache: CacheDirective,
    /// Media type table as `(media type, extension)` pairs. Default:
    /// JavaScript and CSS.
    pub mime_types: Option<Vec<(String, String)>>,
    /// Directory under `root` the front web server serves static files
    /// from. Default: `public`.
    pub public_dir: Option<String>,
    /// Directories the compilation engine searches for sources and their
    /// dependencies. Relative paths resolve against `root`. At least one
    /// is required.
    pub search_paths: Vec<PathBuf>,
    /// Digest algorithm name handed through to the engine.
    pub digest_algorithm: Option<String>,
    /// Version string the engine mixes into content fingerprints.
    pub version: Option<String>,
    /// JavaScript compressor name handed through to the engine.
    pub js_compressor: Option<String>,
    /// CSS compressor name handed through to the engine.
    pub css_compressor: Option<String>,
}

impl Settings {
    /// Validates the settings and resolves them into a [`Config`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RootNotFound`] when `root` is not a directory on
    ///   disk.
    /// - [`ConfigError::EmptySearchPath`] when no search path is given.
    pub fn build(self) -> Result<Config, ConfigError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        if !root.is_dir() {
            return Err(ConfigError::RootNotFound { path: root });
        }
        if self.search_paths.is_empty() {
            return Err(ConfigError::EmptySearchPath);
        }
        let search_paths = self
            .search_paths
            .into_iter()
            .map(|path| resolve_against(&root, path))
            .collect();
        let media_types = match self.mime_types {
            Some(pairs) => MediaTypes::new(pairs),
            None => MediaTypes::default(),
        };
        Ok(Config {
            hosted_at: HostedAt::new(self.hosted_at.as_deref().unwrap_or("/")),
            media_types,
            public_dir: self.public_dir.unwrap_or_else(|| String::from("public")),
            cache: self.cache,
            engine: EngineOptions {
                search_paths,
                digest_algorithm: self.digest_algorithm,
                version: self.version,
                js_compressor: self.js_compressor,
                css_compressor: self.css_compressor,
            },
            root,
            store: OnceLock::new(),
        })
    }
}

fn resolve_against(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { root.join(path) }
}

/// Resolved middleware configuration.
///
/// Built by [`Settings::build`] and shared behind an `Arc` by the
/// service. The cache store is resolved lazily on first use and
/// memoized, so repeated lookups return the same handle.
pub struct Config {
    root: PathBuf,
    hosted_at: HostedAt,
    media_types: MediaTypes,
    public_dir: String,
    cache: CacheDirective,
    engine: EngineOptions,
    store: OnceLock<Option<SharedStore>>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("root", &self.root)
            .field("hosted_at", &self.hosted_at)
            .field("media_types", &self.media_types)
            .field("public_dir", &self.public_dir)
            .field("cache", &self.cache)
            .field("engine", &self.engine)
            .finish()
    }
}

impl Config {
    /// Directory the application lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalized URL prefix assets are hosted under.
    pub fn hosted_at(&self) -> &HostedAt {
        &self.hosted_at
    }

    /// Media types the middleware serves.
    pub fn media_types(&self) -> &MediaTypes {
        &self.media_types
    }

    /// Directory under root the front web server serves static files
    /// from.
    pub fn public_dir(&self) -> &str {
        &self.public_dir
    }

    /// Options handed through to the compilation engine.
    pub fn engine_options(&self) -> &EngineOptions {
        &self.engine
    }

    /// Absolute directories the engine searches for sources.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.engine.search_paths
    }

    /// The write-through store, or `None` with caching disabled.
    ///
    /// Resolved on first call and memoized: every later call returns the
    /// same handle. [`CacheDirective::DefaultLocation`] materializes a
    /// [`FileStore`] under `<root>/<public_dir>/<hosted_at>`, so the
    /// front web server picks written files up without extra mapping. A
    /// path directive materializes one at that path, resolved against
    /// `root` when relative.
    pub fn store(&self) -> Option<&SharedStore> {
        self.store.get_or_init(|| self.resolve_store()).as_ref()
    }

    fn resolve_store(&self) -> Option<SharedStore> {
        match &self.cache {
            CacheDirective::Disabled => None,
            CacheDirective::DefaultLocation => {
                let hosted = self.hosted_at.as_str().trim_start_matches('/');
                let path = self.root.join(&self.public_dir).join(hosted);
                Some(Arc::new(FileStore::new(path)))
            }
            CacheDirective::Path(path) => {
                let path = resolve_against(&self.root, PathBuf::from(path));
                Some(Arc::new(FileStore::new(path)))
            }
            CacheDirective::Store(store) => Some(Arc::clone(store)),
        }
    }
}

/// Options the middleware does not interpret itself but hands through to
/// the compilation engine.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Absolute directories the engine searches for sources.
    pub search_paths: Vec<PathBuf>,
    /// Digest algorithm name, e.g. `sha256`.
    pub digest_algorithm: Option<String>,
    /// Version string mixed into content fingerprints.
    pub version: Option<String>,
    /// JavaScript compressor name.
    pub js_compressor: Option<String>,
    /// CSS compressor name.
    pub css_compressor: Option<String>,
}

/// Error raised when [`Settings::build`] rejects a combination.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured root directory does not exist.
    #[error("asset root {path:?} does not exist")]
    RootNotFound {
        /// The configured root.
        path: PathBuf,
    },
    /// No search path was configured for the engine.
    #[error("at least one search path is required")]
    EmptySearchPath,
}
