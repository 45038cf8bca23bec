#![warn(missing_docs)]
//! # pinion-core
//!
//! Core traits and types for the Pinion asset pipeline middleware.
//!
//! This crate provides the foundational abstractions that make Pinion
//! **engine-agnostic**. It defines the seams between the HTTP layer and
//! the collaborators it drives:
//!
//! - [`AssetSource`] - the compilation engine that resolves logical paths
//!   to compiled assets
//! - [`AssetStore`] - the write-through cache that persists served bodies
//! - [`Asset`] - the compiled content plus the metadata HTTP headers are
//!   built from
//!
//! Engine adapters implement [`AssetSource`]; store implementations (like
//! `pinion-fs`) implement [`AssetStore`]. The HTTP layer in `pinion-http`
//! only ever talks to these traits.

pub mod asset;
pub mod error;
pub mod memory;
pub mod source;
pub mod store;

pub use asset::{Asset, FindOptions, hex_digest};
pub use error::{SourceError, StoreError};
pub use memory::MemorySource;
pub use source::AssetSource;
pub use store::{AssetStore, SharedStore};
