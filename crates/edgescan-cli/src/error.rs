//! CLI-specific error types with user-friendly messages and Unix exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line argument.
    #[error("invalid argument '--{arg}': {reason}")]
    InvalidArgument {
        arg: String,
        reason: String,
        suggestion: Option<String>,
    },

    /// Output file could not be written.
    #[error("failed to write results to {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No CIDR blocks were given, either on the command line or in the config file.
    #[error("no CIDR blocks specified")]
    NoCidrBlocks { suggestion: String },

    /// Config file failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] edgescan_core::Error),
}

impl CliError {
    /// Returns the exit code for this error (Unix-compatible).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => exit_codes::INVALID_ARGS,
            Self::OutputWriteError { .. } => exit_codes::IO_ERROR,
            Self::NoCidrBlocks { .. } => exit_codes::GENERAL_ERROR,
            Self::Config(_) => exit_codes::CONFIG_ERROR,
        }
    }

    /// Returns a user-facing suggestion for this error, if any.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { suggestion, .. } => suggestion.as_deref(),
            Self::NoCidrBlocks { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    pub fn invalid_argument(arg: &str, reason: &str, suggestion: Option<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.to_string(),
            reason: reason.to_string(),
            suggestion,
        }
    }

    pub fn no_cidr_blocks() -> Self {
        Self::NoCidrBlocks {
            suggestion: "Specify one or more CIDR blocks on the command line or via --config"
                .to_string(),
        }
    }
}

/// Exit codes for the CLI (Unix-compatible).
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// General error (unspecified).
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid command line arguments.
    pub const INVALID_ARGS: i32 = 2;
    /// Configuration error (invalid config file).
    pub const CONFIG_ERROR: i32 = 6;
    /// I/O error (file read/write failed).
    pub const IO_ERROR: i32 = 7;
    /// Cancelled by user (SIGINT/Ctrl+C).
    pub const CANCELLED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn invalid_argument_exit_code() {
        let err = CliError::invalid_argument("top-k", "must be between 10 and 1000", None);
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[test]
    fn output_write_error_exit_code() {
        let err = CliError::OutputWriteError {
            path: PathBuf::from("/nonexistent/clean_ips.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.exit_code(), exit_codes::IO_ERROR);
    }

    #[test]
    fn no_cidr_blocks_exit_code_and_suggestion() {
        let err = CliError::no_cidr_blocks();
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn config_error_wraps_core_error() {
        let core_err = edgescan_core::Error::Config("bad top_k".to_string());
        let err = CliError::from(core_err);
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn cancelled_exit_code_is_standard_sigint() {
        assert_eq!(exit_codes::CANCELLED, 130);
    }
}
