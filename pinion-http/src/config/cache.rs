//! Write-through cache directive.

use std::fmt;
use std::sync::Arc;

use pinion_core::{AssetStore, SharedStore};
use serde::de::{self, Deserialize, Deserializer, Visitor};

/// Whether and where served asset bodies are written through.
///
/// In configuration files the directive is spelled as a boolean or a
/// path string:
///
/// | value         | meaning                                        |
/// |---------------|------------------------------------------------|
/// | `false`       | no write-through                               |
/// | `true`        | store under `<root>/<public_dir>/<hosted_at>`  |
/// | `"tmp/cache"` | store at the given path, resolved against root |
///
/// Programmatic configuration can also hand over a ready store with
/// [`CacheDirective::Store`].
#[derive(Clone, Default)]
pub enum CacheDirective {
    /// Serve without writing bodies anywhere.
    #[default]
    Disabled,
    /// Write under the directory the front web server already serves.
    DefaultLocation,
    /// Write under the given directory, resolved against root when
    /// relative.
    Path(String),
    /// Write through the given store.
    Store(SharedStore),
}

impl CacheDirective {
    /// Wraps a concrete store into a directive.
    pub fn store(store: impl AssetStore + Send + Sync + 'static) -> Self {
        Self::Store(Arc::new(store))
    }
}

impl fmt::Debug for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::DefaultLocation => f.write_str("DefaultLocation"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Store(_) => f.debug_tuple("Store").field(&"...").finish(),
        }
    }
}

impl<'de> Deserialize<'de> for CacheDirective {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectiveVisitor;

        impl Visitor<'_> for DirectiveVisitor {
            type Value = CacheDirective;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a boolean or a directory path")
            }

            fn visit_bool<E>(self, enabled: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if enabled {
                    CacheDirective::DefaultLocation
                } else {
                    CacheDirective::Disabled
                })
            }

            fn visit_str<E>(self, path: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CacheDirective::Path(path.to_string()))
            }
        }

        deserializer.deserialize_any(DirectiveVisitor)
    }
}
