//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file does not exist and no boundary was given on the
    /// command line.
    #[error("config not found at {path}. Create it or pass --boundary-arn")]
    ConfigNotFound { path: PathBuf },

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred building the construct tree.
    #[error(transparent)]
    Construct(#[from] construct::Error),

    /// An error occurred applying the boundary aspect.
    #[error(transparent)]
    Aspect(#[from] aspect::Error),

    /// An error occurred loading a manifest or substituting tokens.
    #[error(transparent)]
    Manifest(#[from] manifest::Error),

    /// Failed to serialize the synthesized template.
    #[error("failed to write template: {0}")]
    Template(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
