//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The lookup an error happened during, and the key it was searching for.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Lookup {
    #[display("digest {_0}")]
    Digest(String),
    #[display("artifactID {artifact_id} version {version}")]
    ArtifactVersion { artifact_id: String, version: String },
    #[display("groupID {group_id} artifactID {artifact_id}")]
    Coordinates { group_id: String, artifact_id: String },
}

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The index could not be opened (missing file, permissions, corruption).
    /// Re-downloading the index is the usual remedy.
    #[display("Java DB open error")]
    DbOpen,
    /// Creating the index schema failed.
    #[display("database migration error")]
    Migration,
    /// Raw failure from the underlying store.
    #[display("database error")]
    Database,
    /// A lookup failed for reasons other than a miss.
    #[display("select error: {_0}")]
    Query(#[error(not(source))] Lookup),
    /// Nothing in the index matches. Not fatal: there is simply no data for
    /// this artifact.
    #[display("{_0}: artifact not found")]
    ArtifactNotFound(#[error(not(source))] Lookup),
    /// The client has already been closed.
    #[display("index client is closed")]
    Closed,
    /// A row could not be decoded.
    #[display("invalid index data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database | Self::Query(_))
    }

    /// Returns `true` for a semantic miss, as opposed to a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArtifactNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let lookup = Lookup::Digest("2bf96b7aa8b611c177d329452af1dc933e14501c".to_string());
        assert_eq!(
            ErrorKind::ArtifactNotFound(lookup.clone()).to_string(),
            "digest 2bf96b7aa8b611c177d329452af1dc933e14501c: artifact not found"
        );
        assert_eq!(
            ErrorKind::Query(lookup).to_string(),
            "select error: digest 2bf96b7aa8b611c177d329452af1dc933e14501c"
        );
        let lookup = Lookup::ArtifactVersion { artifact_id: "jstl".to_string(), version: "1.2".to_string() };
        assert_eq!(lookup.to_string(), "artifactID jstl version 1.2");
    }

    #[test]
    fn error_kind_classification() {
        let lookup = Lookup::Coordinates { group_id: "jstl".to_string(), artifact_id: "jstl".to_string() };
        assert!(ErrorKind::ArtifactNotFound(lookup.clone()).is_not_found());
        assert!(!ErrorKind::ArtifactNotFound(lookup.clone()).is_retryable());
        assert!(ErrorKind::Query(lookup).is_retryable());
        assert!(!ErrorKind::DbOpen.is_not_found());
        assert!(!ErrorKind::Closed.is_retryable());
    }
}
