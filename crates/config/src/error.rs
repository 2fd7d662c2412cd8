//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every kind here is a configuration mistake the user can fix, as opposed
//! to a failed lookup.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Two mutually exclusive flags were both set.
    #[display("--{flag} and --{other} options can not be specified both")]
    ConflictingOptions { flag: &'static str, other: &'static str },
    /// The repository locator given to a flag could not be parsed.
    #[display("invalid repository for --{_0}")]
    InvalidRepository(#[error(not(source))] &'static str),
    /// A flag that no longer exists was used.
    #[display("flag --{flag} has been removed. {message}")]
    RemovedFlag { flag: &'static str, message: &'static str },
    /// A configuration value has the wrong type.
    #[display("invalid value for {_0}")]
    InvalidValue(#[error(not(source))] String),
    /// The configuration file or environment could not be read.
    #[display("unable to load configuration")]
    Source,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::ConflictingOptions { flag: "skip-db-update", other: "download-db-only" }.to_string(),
            "--skip-db-update and --download-db-only options can not be specified both"
        );
        assert_eq!(
            ErrorKind::RemovedFlag { flag: "reset", message: "Use \"jarcoord clean --all\" instead." }.to_string(),
            "flag --reset has been removed. Use \"jarcoord clean --all\" instead."
        );
        assert_eq!(ErrorKind::InvalidRepository("db-repository").to_string(), "invalid repository for --db-repository");
    }
}
