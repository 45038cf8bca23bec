use std::sync::Arc;

use pinion_core::AssetSource;
use pinion_http::{Config, ConfigError, Settings};
use tower::Layer;

use crate::service::AssetService;

/// Tower [`Layer`] that serves compiled assets from an [`AssetSource`].
///
/// Construct one with [`AssetLayer::builder`], or with [`AssetLayer::new`]
/// when a [`Config`] has already been resolved elsewhere.
pub struct AssetLayer<E> {
    engine: Arc<E>,
    config: Arc<Config>,
}

impl AssetLayer<NotSet> {
    /// Starts building a layer. The asset source is required; settings
    /// default to serving every configured media type under `/`.
    pub fn builder() -> AssetLayerBuilder<NotSet> {
        AssetLayerBuilder::default()
    }
}

impl<E> AssetLayer<E> {
    /// Creates a layer from an already resolved configuration.
    pub fn new(engine: E, config: Config) -> Self {
        AssetLayer {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}

impl<E> Clone for AssetLayer<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, E> Layer<S> for AssetLayer<E> {
    type Service = AssetService<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        AssetService::new(inner, Arc::clone(&self.engine), Arc::clone(&self.config))
    }
}

/// Marker for a builder slot that has not been filled yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSet;

/// Builder for [`AssetLayer`].
pub struct AssetLayerBuilder<E> {
    engine: E,
    settings: Settings,
}

impl Default for AssetLayerBuilder<NotSet> {
    fn default() -> Self {
        Self {
            engine: NotSet,
            settings: Settings::default(),
        }
    }
}

impl<E> AssetLayerBuilder<E> {
    /// Sets the asset source that resolves logical paths into content.
    pub fn source<NE: AssetSource>(self, engine: NE) -> AssetLayerBuilder<NE> {
        AssetLayerBuilder {
            engine,
            settings: self.settings,
        }
    }

    /// Sets the declarative configuration to resolve at build time.
    pub fn settings(self, settings: Settings) -> Self {
        AssetLayerBuilder { settings, ..self }
    }
}

impl<E> AssetLayerBuilder<E>
where
    E: AssetSource,
{
    /// Validates the settings and produces the layer.
    pub fn build(self) -> Result<AssetLayer<E>, ConfigError> {
        let config = self.settings.build()?;
        Ok(AssetLayer {
            engine: Arc::new(self.engine),
            config: Arc::new(config),
        })
    }
}
