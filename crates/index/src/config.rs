//! Index store configuration.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Subdirectory of the cache directory holding the Java index.
pub const DB_DIR: &str = "java-db";
/// File name of the Java index database.
pub const DB_FILE_NAME: &str = "trivy-java.db";

/// Everything needed to open the index store.
///
/// Built once (usually by [`init`]) before any [`Client`](crate::Client) is
/// opened, then passed to every [`Client::open`](crate::Client::open) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    cache_dir: PathBuf,
    auth_url: Option<String>,
}

impl DbConfig {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into(), auth_url: None }
    }

    /// Set the endpoint the index backend is reached through.
    ///
    /// For the SQLite store this is a connection URL
    /// (`sqlite:///var/cache/java.db?mode=ro`) that takes precedence over the
    /// database file in the cache directory. An empty string unsets it.
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        let auth_url = auth_url.into();
        self.auth_url = (!auth_url.is_empty()).then_some(auth_url);
        self
    }

    pub fn auth_url(&self) -> Option<&str> {
        self.auth_url.as_deref()
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location of the index database file inside the cache directory.
    pub fn db_path(&self) -> PathBuf {
        self.cache_dir.join(DB_DIR).join(DB_FILE_NAME)
    }

    /// The platform cache directory for this application, falling back to the
    /// system temporary directory when no home directory can be determined.
    pub fn default_cache_dir() -> PathBuf {
        match ProjectDirs::from("", "", "jarcoord") {
            Some(dirs) => dirs.cache_dir().to_path_buf(),
            None => std::env::temp_dir().join("jarcoord"),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(Self::default_cache_dir())
    }
}

/// Build the configuration every subsequent [`Client`](crate::Client) is
/// opened with, using the default cache directory.
///
/// An empty `auth_url` means "use the database file in the cache directory".
pub fn init(auth_url: impl Into<String>) -> DbConfig {
    DbConfig::default().with_auth_url(auth_url)
}
