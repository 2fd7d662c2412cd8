//! Schema-version normalization of repository locators.

use crate::error::{ErrorKind, Result};
use crate::reference::{RepositoryReference, parse};
use exn::ResultExt;

/// A reference that has been through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub reference: RepositoryReference,
    /// `true` if the locator had no tag and the schema version was added.
    pub retagged: bool,
}

impl From<Normalized> for RepositoryReference {
    fn from(normalized: Normalized) -> Self {
        normalized.reference
    }
}

/// Parse a user-supplied repository locator, tagging it with the schema
/// version if it carries no tag of its own.
///
/// Locators written before repositories were tagged by schema version name
/// only the repository, so the schema version is added for them. Explicit
/// tags and digests are never touched.
///
/// Returns `Ok(None)` for an empty (or blank) locator, meaning "use the
/// default repository". Any other locator is parsed exactly as given, so
/// surrounding whitespace makes it invalid.
///
/// # Examples
///
/// ```
/// use jarcoord_reference::normalize;
///
/// let normalized = normalize("myrepo/trivy-db", 2).unwrap().unwrap();
/// assert_eq!(normalized.reference.tag(), Some("2"));
/// assert!(normalized.retagged);
///
/// let normalized = normalize("myrepo/trivy-db:1", 2).unwrap().unwrap();
/// assert_eq!(normalized.reference.tag(), Some("1"));
/// assert!(!normalized.retagged);
///
/// assert!(normalize("", 2).unwrap().is_none());
/// ```
pub fn normalize(input: &str, schema_version: u32) -> Result<Option<Normalized>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let reference = parse(input).or_raise(|| ErrorKind::InvalidRepository(input.to_string()))?;
    if !reference.is_untagged() {
        return Ok(Some(Normalized { reference, retagged: false }));
    }
    let reference = reference
        .with_tag(schema_version.to_string())
        .or_raise(|| ErrorKind::InvalidRepository(input.to_string()))?;
    tracing::info!(
        repository = %reference,
        "Adding schema version to the repository for backward compatibility"
    );
    Ok(Some(Normalized { reference, retagged: true }))
}
