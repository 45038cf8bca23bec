//! Write-through cache store trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::StoreError;

/// Shared handle to a cache store.
pub type SharedStore = Arc<dyn AssetStore + Send + Sync>;

/// Trait for persisting served asset bodies.
///
/// With caching enabled, every successfully served asset body is written
/// through a store so the next request can be answered without
/// recompiling, typically by the web server itself straight from disk.
///
/// Stores receive the logical path (`nested/app.js`), not the request
/// path: fingerprints and the hosted prefix are already stripped.
#[async_trait]
pub trait AssetStore {
    /// Persist `contents` under `logical_path`, replacing any previous copy.
    async fn write(&self, logical_path: &str, contents: &[u8]) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> AssetStore for Box<T>
where
    T: AssetStore + ?Sized + Sync,
{
    async fn write(&self, logical_path: &str, contents: &[u8]) -> Result<(), StoreError> {
        self.as_ref().write(logical_path, contents).await
    }
}

#[async_trait]
impl<T> AssetStore for &T
where
    T: AssetStore + ?Sized + Sync,
{
    async fn write(&self, logical_path: &str, contents: &[u8]) -> Result<(), StoreError> {
        (*self).write(logical_path, contents).await
    }
}

#[async_trait]
impl<T> AssetStore for Arc<T>
where
    T: AssetStore + Send + Sync + ?Sized,
{
    async fn write(&self, logical_path: &str, contents: &[u8]) -> Result<(), StoreError> {
        self.as_ref().write(logical_path, contents).await
    }
}
