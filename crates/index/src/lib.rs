//! Java artifact index and coordinate resolution.
//!
//! Vulnerability matching for Java works on Maven coordinates
//! (`group:artifact:version`), but a scanner usually only has a `.jar` file:
//! its SHA-1, and perhaps an artifact ID and version guessed from the file
//! name. This crate looks those up in the Java artifact index.
//!
//! # Architecture
//! - [`IndexStore`] is the read-only query interface over an index, with
//!   [`SqliteStore`] as the implementation over the downloaded SQLite file.
//! - [`Client`] resolves coordinates on top of a store: exact lookups by
//!   digest, and lookups by artifact ID and version that settle on a single
//!   group ID using [`disambiguate`].
//! - [`DbConfig`] (built by [`init`]) says where the index lives, and is
//!   passed to every [`Client::open`].

mod client;
mod config;
mod db;
pub mod disambiguate;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;
mod store;
#[cfg(test)]
mod testing;

pub use crate::client::Client;
pub use crate::config::{DB_DIR, DB_FILE_NAME, DbConfig, init};
pub use crate::db::Database;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockStore;
pub use crate::models::{Coordinate, FileType, IndexEntry};
pub use crate::store::{IndexStore, SqliteStore};
