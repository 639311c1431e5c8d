//! Error types for edgescan-core operations.

use std::io;
use thiserror::Error;

/// Result type alias used throughout the core and scanner crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced across configuration, parsing, and output boundaries.
///
/// Transient network failures during probing/measurement are NOT
/// represented here -- they are absorbed by the scanners themselves
/// (a failed probe just contributes to loss rate, a failed fetch just
/// falls through to the next candidate URL).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors, with automatic conversion from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CIDR block or IP literal could not be parsed.
    #[error("invalid CIDR block '{0}'")]
    InvalidCidr(String),

    /// Configuration value out of bounds or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing the results file failed.
    #[error("failed to write output file {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The scan was cancelled before any usable results existed.
    #[error("scan cancelled")]
    Cancelled,
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(format!("TOML serialization error: {err}"))
    }
}
