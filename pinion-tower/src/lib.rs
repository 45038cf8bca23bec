//! Tower middleware integration for the Pinion asset pipeline.
//!
//! This crate provides [`AssetLayer`], a Tower [`Layer`] that intercepts requests
//! for hosted front-end assets and answers them straight from an [`AssetSource`].
//! Requests the pipeline does not recognize, and lookups the source cannot
//! satisfy, continue to the wrapped service unchanged.
//!
//! # When to Use This Crate
//!
//! Use `pinion-tower` when you have a Tower-based HTTP service and want compiled
//! scripts and stylesheets served from the same process:
//!
//! - **Axum / Hyper servers**: Mount the layer in front of your router so asset
//!   URLs never reach application handlers.
//! - **Plain Tower stacks**: Wrap any `Service<Request<B>>` in a
//!   `ServiceBuilder` chain.
//!
//! # Core Concepts
//!
//! - **[`AssetLayer`]**: A Tower [`Layer`] that wraps services with asset
//!   serving. Use [`AssetLayer::builder()`] to configure and construct it.
//!
//! - **[`AssetSource`]**: The compilation pipeline that resolves logical paths
//!   like `app.js` into finished content. See [`pinion_core::AssetSource`].
//!
//! - **[`Settings`]**: Declarative configuration covering the hosted URL
//!   prefix, the served media types, and the write-through cache location.
//!
//! [`Layer`]: tower::Layer
//! [`AssetSource`]: pinion_core::AssetSource
//!
//! # Quick Start
//!
//! ```ignore
//! use pinion_http::Settings;
//! use pinion_tower::AssetLayer;
//! use tower::{ServiceBuilder, service_fn};
//!
//! // 1. Configure where assets live and where they are hosted
//! let layer = AssetLayer::builder()
//!     .source(pipeline)
//!     .settings(Settings {
//!         root: "./app".into(),
//!         hosted_at: "/assets".into(),
//!         ..Settings::default()
//!     })
//!     .build()?;
//!
//! // 2. Apply to a Tower service
//! let service = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(service_fn(|_req| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new("Hello"))
//!     }));
//! ```
//!
//! # Request Handling
//!
//! Every request is classified before the inner service sees it:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | Served | The path named a known asset; the response carries full cache headers |
//! | Not modified | The client's `If-None-Match` matched the asset digest; `304` with an empty body |
//! | Forwarded | Wrong method, prefix, or media type, or the source had no such asset |
//!
//! Compile failures in development are served as diagnostic bodies (a `throw`
//! statement for scripts, an overlay stylesheet for CSS) so they surface in the
//! browser instead of crashing the server.
//!
//! # Main Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AssetLayer`] | Tower `Layer` and the main entry point |
//! | [`AssetLayerBuilder`] | Builder for source and settings |
//! | [`service::AssetService`] | The Tower `Service` that resolves assets |
//! | [`AssetBody`] | Response body joining served bytes with the inner body type |

#![warn(missing_docs)]

/// Response body type unifying served assets and inner responses.
pub mod body;
/// Future types for the asset service.
pub mod future;
/// Tower layer and builder for asset serving.
pub mod layer;
/// The Tower service implementation that resolves assets.
pub mod service;

pub use body::AssetBody;
pub use future::AssetServiceFuture;
pub use layer::{AssetLayer, AssetLayerBuilder, NotSet};
pub use pinion_http::{CacheDirective, Config, ConfigError, Settings};
pub use service::AssetService;
