//! Database connection and pool management.

use exn::ResultExt;
use sqlx::SqliteConnection;
use sqlx::pool::PoolConnectionMetadata;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::config::DbConfig;
use crate::error::{ErrorKind, Result};

/// Embedded schema, only applied to databases created by this crate.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// Lookups are issued one at a time; a couple of spare connections is plenty.
const MAX_CONNECTIONS: u32 = 2;

/// Connection pool over the index database.
///
/// Index files are downloaded, never written by this crate, so
/// [`open`](Self::open) connects read-only and leaves the schema alone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions, max: Option<u32>) -> sqlx::Result<Self> {
        let pool = SqlitePoolOptions::new()
            // Apply the query-based PRAGMAs to EVERY connection, not only the
            // first one handed out by the pool.
            .after_connect(|conn, meta| Box::pin(async move { Self::apply_pragmas(conn, meta).await }))
            .max_connections(max.unwrap_or(MAX_CONNECTIONS))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Open an existing index database.
    ///
    /// Uses the configured auth URL as the connection URL if one is set,
    /// otherwise the database file in the cache directory. A missing file, an
    /// unreadable file, or a file without the index tables all fail with
    /// [`DbOpen`](ErrorKind::DbOpen).
    #[instrument("opening Java index", skip(config), fields(auth_url = config.auth_url().is_some()))]
    pub async fn open(config: &DbConfig) -> Result<Self> {
        let options = match config.auth_url() {
            Some(url) => {
                let options = SqliteConnectOptions::from_str(url).or_raise(|| ErrorKind::DbOpen)?;
                Self::apply_base_options(options)
            },
            None => Self::base_options().filename(config.db_path()),
        };
        let options = options.read_only(true).create_if_missing(false);
        let db = Self::new(options, None).await.or_raise(|| ErrorKind::DbOpen)?;
        if let Err(err) = db.probe().await {
            db.pool.close().await;
            return Err(err);
        }
        Ok(db)
    }

    /// Create (or open read-write) an index database at the given path and
    /// apply the schema.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        // Rollback journal rather than WAL: the file is later opened
        // read-only, which WAL mode would need write access to the directory for.
        let options = Self::base_options()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete);
        let db = Self::new(options, None).await.or_raise(|| ErrorKind::DbOpen)?;
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to an in-memory database with the schema applied.
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Do NOT apply `#[cfg(test)]` so that other crates can also use this in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        // Parallel connections to ":memory:" each see their own database.
        let db = Self::new(options, Some(1)).await.or_raise(|| ErrorKind::DbOpen)?;
        db.migrate().await?;
        Ok(db)
    }

    /// Base connection options shared between file and in-memory databases.
    fn base_options() -> SqliteConnectOptions {
        Self::apply_base_options(SqliteConnectOptions::new())
    }

    fn apply_base_options(options: SqliteConnectOptions) -> SqliteConnectOptions {
        options
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            // A scan may hold the index open while an update swaps the file.
            .busy_timeout(std::time::Duration::from_millis(1500))
    }

    /// Apply additional PRAGMA settings that aren't exposed via SqliteConnectOptions.
    async fn apply_pragmas(conn: &mut SqliteConnection, _meta: PoolConnectionMetadata) -> sqlx::Result<()> {
        sqlx::query(
            r#"
                PRAGMA cache_size = -8192;
                PRAGMA temp_store = MEMORY;
                PRAGMA mmap_size = 33554432;
            "#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    #[instrument("performing database migrations", skip(self))]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    /// Check the index tables are present and readable.
    async fn probe(&self) -> Result<()> {
        let _: (i64,) = sqlx::query_as(include_str!("../queries/probe.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::DbOpen)?;
        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool, waiting for checked-out connections to be
    /// returned first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(!db.pool().is_closed());
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.probe().await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_pragmas_are_applied() {
        let db = Database::connect_in_memory().await.unwrap();
        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1, "foreign_keys should be ON");
        let row: (i64,) = sqlx::query_as("PRAGMA cache_size").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, -8192);
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Database::open(&DbConfig::new(dir.path())).await.unwrap_err();
        assert_eq!(*err, ErrorKind::DbOpen);
    }

    #[tokio::test]
    async fn test_open_file_without_index_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path());
        std::fs::create_dir_all(config.db_path().parent().unwrap()).unwrap();
        let options = SqliteConnectOptions::new().filename(config.db_path()).create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        sqlx::query("CREATE TABLE unrelated (id INTEGER)").execute(&pool).await.unwrap();
        pool.close().await;

        let err = Database::open(&config).await.unwrap_err();
        assert_eq!(*err, ErrorKind::DbOpen);
    }

    #[tokio::test]
    async fn test_create_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path());
        std::fs::create_dir_all(config.db_path().parent().unwrap()).unwrap();
        Database::create(config.db_path()).await.unwrap().close().await;

        let db = Database::open(&config).await.unwrap();
        // Opened read-only: writes are rejected.
        let insert = sqlx::query("INSERT INTO artifacts (group_id, artifact_id) VALUES ('a', 'b')")
            .execute(db.pool())
            .await;
        assert!(insert.is_err());
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_with_auth_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elsewhere.db");
        Database::create(&path).await.unwrap().close().await;

        let url = format!("sqlite://{}", path.display());
        // The cache directory is ignored when an auth URL is configured.
        let config = DbConfig::new(dir.path().join("missing")).with_auth_url(url);
        Database::open(&config).await.unwrap().close().await;
    }

    #[tokio::test]
    async fn test_open_with_auth_url_keeps_connection_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elsewhere.db");
        Database::create(&path).await.unwrap().close().await;

        let config = DbConfig::new(dir.path()).with_auth_url(format!("sqlite://{}", path.display()));
        let db = Database::open(&config).await.unwrap();
        let row: (i64,) = sqlx::query_as("PRAGMA busy_timeout").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1500);
        // NORMAL
        let row: (i64,) = sqlx::query_as("PRAGMA synchronous").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1);
        db.close().await;
    }
}
