//! Index store trait and the SQLite implementation.

use crate::Database;
use crate::config::DbConfig;
use crate::error::{ErrorKind, Result};
use crate::models::{FileType, IndexEntry, IndexRow};
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// Read-only query interface over an artifact index.
///
/// Misses are reported as `Ok(None)` / an empty `Vec`, never as errors.
/// Opening a store is left to each implementation's constructor.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Any one entry whose file has the given SHA-1.
    async fn select_by_digest(&self, sha1: &str) -> Result<Option<IndexEntry>>;

    /// Any one entry for the given artifact ID and group ID.
    async fn select_by_artifact_id_and_group_id(
        &self,
        artifact_id: &str,
        group_id: &str,
    ) -> Result<Option<IndexEntry>>;

    /// Every entry of the given file type for an artifact ID and version,
    /// across all group IDs.
    async fn select_all_by_artifact_id_version_and_file_type(
        &self,
        artifact_id: &str,
        version: &str,
        file_type: FileType,
    ) -> Result<Vec<IndexEntry>>;

    /// Release the underlying handle.
    async fn close(&self) -> Result<()>;
}

/// [`IndexStore`] backed by the SQLite index database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}
impl From<Database> for SqliteStore {
    fn from(db: Database) -> Self {
        Self { db }
    }
}
impl SqliteStore {
    /// Open the index database described by `config`.
    pub async fn open(config: &DbConfig) -> Result<Self> {
        Ok(Self { db: Database::open(config).await? })
    }
}

#[async_trait]
impl IndexStore for SqliteStore {
    #[instrument(skip(self))]
    async fn select_by_digest(&self, sha1: &str) -> Result<Option<IndexEntry>> {
        let row: Option<IndexRow> = sqlx::query_as(include_str!("../queries/select_by_digest.sql"))
            .bind(sha1)
            .fetch_optional(self.db.pool())
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(IndexEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn select_by_artifact_id_and_group_id(
        &self,
        artifact_id: &str,
        group_id: &str,
    ) -> Result<Option<IndexEntry>> {
        let row: Option<IndexRow> = sqlx::query_as(include_str!("../queries/select_by_artifact_id_and_group_id.sql"))
            .bind(artifact_id)
            .bind(group_id)
            .fetch_optional(self.db.pool())
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(IndexEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn select_all_by_artifact_id_version_and_file_type(
        &self,
        artifact_id: &str,
        version: &str,
        file_type: FileType,
    ) -> Result<Vec<IndexEntry>> {
        let rows: Vec<IndexRow> =
            sqlx::query_as(include_str!("../queries/select_all_by_artifact_id_version_and_file_type.sql"))
                .bind(artifact_id)
                .bind(version)
                .bind(file_type.as_str())
                .fetch_all(self.db.pool())
                .await
                .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(IndexEntry::try_from).collect()
    }

    async fn close(&self) -> Result<()> {
        self.db.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{JSTL_FIXTURE, seeded};

    #[tokio::test]
    async fn test_select_by_digest() {
        let store = SqliteStore::from(seeded(JSTL_FIXTURE).await);
        let entry = store.select_by_digest("74aca283cd4f4b4f3e425f5820cda58f44409547").await.unwrap().unwrap();
        assert_eq!(entry.group_id, "javax.servlet");
        assert_eq!(entry.artifact_id, "jstl");
        assert_eq!(entry.version, "1.2");
        assert_eq!(entry.file_type, FileType::Jar);
        assert_eq!(store.select_by_digest("0000000000000000000000000000000000000000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_select_by_artifact_id_and_group_id() {
        let store = SqliteStore::from(seeded(JSTL_FIXTURE).await);
        assert!(store.select_by_artifact_id_and_group_id("jstl", "jstl").await.unwrap().is_some());
        assert!(store.select_by_artifact_id_and_group_id("jstl", "javax.servlet").await.unwrap().is_some());
        // Identifiers must match exactly.
        assert!(store.select_by_artifact_id_and_group_id("jstl", "javax").await.unwrap().is_none());
        assert!(store.select_by_artifact_id_and_group_id("JSTL", "jstl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_all_filters_file_type() {
        let store = SqliteStore::from(seeded(JSTL_FIXTURE).await);
        let jars = store.select_all_by_artifact_id_version_and_file_type("jstl", "1.2", FileType::Jar).await.unwrap();
        assert_eq!(jars.len(), 3);
        assert!(jars.iter().all(|entry| entry.file_type == FileType::Jar));
        // Ordered by group ID.
        assert_eq!(jars[0].group_id, "javax.servlet");
        assert_eq!(jars[2].group_id, "jstl");

        let sources =
            store.select_all_by_artifact_id_version_and_file_type("jstl", "1.2", FileType::Sources).await.unwrap();
        assert_eq!(sources.len(), 1);
        let other_version =
            store.select_all_by_artifact_id_version_and_file_type("jstl", "1.1", FileType::Jar).await.unwrap();
        assert!(other_version.is_empty());
    }

    #[tokio::test]
    async fn test_query_after_close_fails() {
        let store = SqliteStore::from(seeded(JSTL_FIXTURE).await);
        store.close().await.unwrap();
        let err = store.select_by_digest("74aca283cd4f4b4f3e425f5820cda58f44409547").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Database);
    }
}
