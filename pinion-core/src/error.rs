//! Error types shared across the asset pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised by an [`AssetSource`](crate::AssetSource) lookup.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A source file was found but failed to compile.
    #[error("{kind}: {message}")]
    Compile {
        /// Engine-reported error class, e.g. `SyntaxError`.
        kind: String,
        /// Human-readable description of the failure.
        message: String,
        /// Topmost frame of the engine backtrace, when available.
        backtrace: Option<String>,
    },
    /// Reading source files failed below the compilation layer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// A compile failure without backtrace information.
    pub fn compile(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            kind: kind.into(),
            message: message.into(),
            backtrace: None,
        }
    }

    /// A compile failure carrying the topmost backtrace frame.
    pub fn compile_with_backtrace(
        kind: impl Into<String>,
        message: impl Into<String>,
        frame: impl Into<String>,
    ) -> Self {
        Self::Compile {
            kind: kind.into(),
            message: message.into(),
            backtrace: Some(frame.into()),
        }
    }

    /// `true` for [`SourceError::Compile`].
    pub fn is_compile(&self) -> bool {
        matches!(self, Self::Compile { .. })
    }
}

/// Error raised by an [`AssetStore`](crate::AssetStore) write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying filesystem write failed.
    #[error("failed to store asset at {path:?}")]
    Io {
        /// Destination the store attempted to write.
        path: PathBuf,
        /// The originating I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The logical path would escape the store root.
    #[error("refusing to store asset at {path:?}")]
    InvalidPath {
        /// The offending logical path.
        path: String,
    },
}
