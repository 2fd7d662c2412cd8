//! Coordinate resolution on top of an [`IndexStore`].

use crate::config::DbConfig;
use crate::disambiguate::Tally;
use crate::error::{ErrorKind, Lookup, Result};
use crate::models::{Coordinate, FileType};
use crate::store::{IndexStore, SqliteStore};
use exn::{OptionExt, ResultExt};
use tracing::instrument;

/// Resolves Java package coordinates from the artifact index.
///
/// Owns one store handle, released by [`close`](Self::close). A
/// [`Default`] client has never been opened; closing it is a no-op, and any
/// lookup on it (or on a closed client) fails with
/// [`Closed`](ErrorKind::Closed).
#[derive(Debug)]
pub struct Client<S = SqliteStore> {
    store: Option<S>,
}

impl<S> Default for Client<S> {
    fn default() -> Self {
        Self { store: None }
    }
}

impl Client<SqliteStore> {
    /// Open the SQLite index described by `config`.
    ///
    /// Fails with [`DbOpen`](ErrorKind::DbOpen) if the index can't be opened.
    pub async fn open(config: &DbConfig) -> Result<Self> {
        Ok(Self::new(SqliteStore::open(config).await?))
    }
}

impl<S: IndexStore> Client<S> {
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&S> {
        self.store.as_ref().ok_or_raise(|| ErrorKind::Closed)
    }

    /// Whether the index knows the given group ID and artifact ID (exact
    /// match on both).
    #[instrument(skip(self))]
    pub async fn exists(&self, group_id: &str, artifact_id: &str) -> Result<bool> {
        let entry = self
            .store()?
            .select_by_artifact_id_and_group_id(artifact_id, group_id)
            .await
            .or_raise(|| {
                ErrorKind::Query(Lookup::Coordinates {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                })
            })?;
        Ok(entry.is_some_and(|entry| !entry.artifact_id.is_empty()))
    }

    /// Find the coordinate of the file with the given SHA-1.
    ///
    /// Fails with [`ArtifactNotFound`](ErrorKind::ArtifactNotFound), carrying
    /// `sha1` as given, when nothing matches.
    #[instrument(skip(self))]
    pub async fn search_by_digest(&self, sha1: &str) -> Result<Coordinate> {
        let lookup = || Lookup::Digest(sha1.to_string());
        let entry = self
            .store()?
            .select_by_digest(&sha1.to_ascii_lowercase())
            .await
            .or_raise(|| ErrorKind::Query(lookup()))?;
        match entry {
            // Stores may hand back a blank entry instead of nothing.
            Some(entry) if !entry.artifact_id.is_empty() => Ok(entry.into()),
            _ => exn::bail!(ErrorKind::ArtifactNotFound(lookup())),
        }
    }

    /// Find the group ID publishing the packaged archive of `artifact_id` at
    /// `version`.
    ///
    /// When several group IDs publish the same artifact ID and version, the
    /// one with the most indexed archives wins; see
    /// [`disambiguate`](crate::disambiguate) for the caveats of that heuristic.
    #[instrument(skip(self))]
    pub async fn search_by_artifact_id(&self, artifact_id: &str, version: &str) -> Result<String> {
        let lookup = || Lookup::ArtifactVersion { artifact_id: artifact_id.to_string(), version: version.to_string() };
        let entries = self
            .store()?
            .select_all_by_artifact_id_version_and_file_type(artifact_id, version, FileType::Jar)
            .await
            .or_raise(|| ErrorKind::Query(lookup()))?;
        let tally = Tally::from_entries(&entries);
        let Some(group_id) = tally.winner() else {
            exn::bail!(ErrorKind::ArtifactNotFound(lookup()));
        };
        if tally.is_contested() {
            tracing::warn!(
                artifact_id,
                version,
                candidates = ?tally.candidates(),
                group_id,
                "Several group IDs publish this artifact equally often; picked the first alphabetically"
            );
        }
        Ok(group_id.to_string())
    }

    /// Release the store handle. Safe to call more than once, and on a client
    /// that was never opened.
    pub async fn close(&mut self) -> Result<()> {
        match self.store.take() {
            Some(store) => store.close().await,
            None => Ok(()),
        }
    }
}
