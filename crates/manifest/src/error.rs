//! Manifest loader error types.

use thiserror::Error;

/// Manifest loader errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A template token was left unreplaced after substitution.
    ///
    /// A manifest shipped with a literal `{{...}}` in it would fail at
    /// deploy time, so the loader rejects it up front.
    #[error("unreplaced token '{0}' in template")]
    UnreplacedToken(String),

    /// Failed to parse a YAML document.
    #[error("failed to parse manifest: {0}")]
    Parse(String),

    /// An I/O error occurred while reading a manifest.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
