//! In-memory index store for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{FileType, IndexEntry};
use crate::store::IndexStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory [`IndexStore`] for testing.
///
/// Queries scan a plain `Vec` of entries, so the store can contain things the
/// SQLite schema would never produce (such as entries with an empty artifact
/// ID). A [`broken`](Self::broken) store fails every query.
///
/// # Examples
///
/// ```ignore
/// use jarcoord_index::{Client, FileType, IndexEntry, MockStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MockStore::with_entries([
///     IndexEntry::new("javax.servlet", "jstl", "1.2", "74aca283cd4f4b4f3e425f5820cda58f44409547", FileType::Jar),
/// ]);
/// let client = Client::new(store);
/// assert!(client.exists("javax.servlet", "jstl").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    entries: Vec<IndexEntry>,
    broken: bool,
    closed: AtomicBool,
}

impl MockStore {
    pub fn with_entries(entries: impl IntoIterator<Item = IndexEntry>) -> Self {
        Self { entries: entries.into_iter().collect(), ..Self::default() }
    }

    /// A store whose every query fails with [`Database`](ErrorKind::Database).
    pub fn broken() -> Self {
        Self { broken: true, ..Self::default() }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.broken || self.is_closed() {
            exn::bail!(ErrorKind::Database);
        }
        Ok(())
    }
}

#[async_trait]
impl IndexStore for MockStore {
    async fn select_by_digest(&self, sha1: &str) -> Result<Option<IndexEntry>> {
        self.check()?;
        Ok(self.entries.iter().find(|entry| entry.sha1 == sha1).cloned())
    }

    async fn select_by_artifact_id_and_group_id(
        &self,
        artifact_id: &str,
        group_id: &str,
    ) -> Result<Option<IndexEntry>> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.artifact_id == artifact_id && entry.group_id == group_id)
            .cloned())
    }

    async fn select_all_by_artifact_id_version_and_file_type(
        &self,
        artifact_id: &str,
        version: &str,
        file_type: FileType,
    ) -> Result<Vec<IndexEntry>> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.artifact_id == artifact_id && entry.version == version && entry.file_type == file_type)
            .cloned()
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
