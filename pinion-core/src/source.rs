//! Compilation engine trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Asset, FindOptions, SourceError};

/// Trait for resolving logical asset paths to compiled assets.
///
/// This is the seam between the middleware and the compilation engine.
/// Implementations compile the named source (and its dependencies, when
/// the bundled form is requested) and report the metadata HTTP headers
/// are built from.
///
/// # Return contract
///
/// - `Ok(Some(asset))` - the path resolved and compiled.
/// - `Ok(None)` - the engine does not know the path; the request is not
///   for an asset and must be forwarded untouched.
/// - `Err(_)` - the path resolved but compilation or I/O failed.
///
/// # Examples
///
/// ```rust,ignore
/// use pinion_core::{Asset, AssetSource, FindOptions, SourceError};
///
/// struct Engine;
///
/// #[async_trait::async_trait]
/// impl AssetSource for Engine {
///     async fn find_asset(
///         &self,
///         logical_path: &str,
///         options: FindOptions,
///     ) -> Result<Option<Asset>, SourceError> {
///         // compile `logical_path` and return the result
///         # unimplemented!()
///     }
/// }
/// ```
#[async_trait]
pub trait AssetSource {
    /// Resolve `logical_path` (e.g. `nested/app.js`) to a compiled asset.
    async fn find_asset(
        &self,
        logical_path: &str,
        options: FindOptions,
    ) -> Result<Option<Asset>, SourceError>;
}

#[async_trait]
impl<T> AssetSource for Box<T>
where
    T: AssetSource + ?Sized + Sync,
{
    async fn find_asset(
        &self,
        logical_path: &str,
        options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        self.as_ref().find_asset(logical_path, options).await
    }
}

#[async_trait]
impl<T> AssetSource for &T
where
    T: AssetSource + ?Sized + Sync,
{
    async fn find_asset(
        &self,
        logical_path: &str,
        options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        (*self).find_asset(logical_path, options).await
    }
}

#[async_trait]
impl<T> AssetSource for Arc<T>
where
    T: AssetSource + Send + Sync + ?Sized,
{
    async fn find_asset(
        &self,
        logical_path: &str,
        options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        self.as_ref().find_asset(logical_path, options).await
    }
}
