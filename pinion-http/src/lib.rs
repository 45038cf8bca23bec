#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod query;
pub mod response;

pub use classify::{AssetRequest, Classification, classify};
pub use config::{
    CacheDirective, Config, ConfigError, EngineOptions, HostedAt, MediaTypes, Settings,
};
pub use response::{BuildError, build_response};
