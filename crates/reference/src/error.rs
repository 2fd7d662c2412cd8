//! Reference Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A reference error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reference operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing to parse.
    #[display("empty reference")]
    Empty,
    /// The registry host is not a valid hostname (with optional port).
    #[display("invalid registry: {_0}")]
    InvalidRegistry(#[error(not(source))] String),
    /// The repository path contains characters outside the allowed grammar.
    #[display("invalid repository name: {_0}")]
    InvalidName(#[error(not(source))] String),
    /// The repository name (including registry) exceeds 255 characters.
    #[display("repository name too long: {_0} characters")]
    NameTooLong(#[error(not(source))] usize),
    #[display("invalid tag: {_0}")]
    InvalidTag(#[error(not(source))] String),
    #[display("invalid digest: {_0}")]
    InvalidDigest(#[error(not(source))] String),
    /// Raised by the normalizer on top of any of the parse errors above.
    #[display("invalid repository: {_0}")]
    InvalidRepository(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A reference string is either valid or it isn't.
        false
    }
}
