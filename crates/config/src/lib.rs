//! Flags, configuration loading and validation for jarcoord.
//!
//! Every option is a [`Flag`]: a command-line name, a configuration key, a
//! default and a lifecycle ([`FlagState`]). Values are resolved from
//! [`Sources`] (command line over configuration file and environment over
//! defaults), then validated and normalized into option bundles such as
//! [`DbOptions`].

mod db;
pub mod error;
mod flag;
mod source;

pub use crate::db::{
    DB_SCHEMA_VERSION, DEFAULT_DB_REPOSITORY, DEFAULT_JAVA_DB_REPOSITORY, DbFlagGroup, DbOptions,
    JAVA_DB_SCHEMA_VERSION, validate_modes,
};
pub use crate::flag::{Alias, Diagnostic, Flag, FlagState, FlagValue};
pub use crate::source::{CONFIG_FILE_NAME, ENV_PREFIX, Sources, default_config_file};
