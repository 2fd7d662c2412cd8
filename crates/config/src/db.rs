//! Flags of the vulnerability and Java index databases.

use crate::error::{ErrorKind, Result};
use crate::flag::{Alias, Diagnostic, Flag, FlagState};
use crate::source::Sources;
use clap::Arg;
use exn::ResultExt;
use jarcoord_reference::{RepositoryReference, normalize};

/// Schema version of the vulnerability database this build understands.
pub const DB_SCHEMA_VERSION: u32 = 2;
/// Schema version of the Java index database this build understands.
pub const JAVA_DB_SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_DB_REPOSITORY: &str = "ghcr.io/aquasecurity/trivy-db";
pub const DEFAULT_JAVA_DB_REPOSITORY: &str = "ghcr.io/aquasecurity/trivy-java-db";

pub const RESET_FLAG: Flag<bool> = Flag {
    name: "reset",
    config_name: "reset",
    usage: "remove all caches and database",
    default: false,
    aliases: &[],
    state: FlagState::Removed("Use \"jarcoord clean --all\" instead."),
};

pub const DOWNLOAD_DB_ONLY_FLAG: Flag<bool> = Flag {
    name: "download-db-only",
    config_name: "db.download-only",
    usage: "download/update vulnerability database but don't run a scan",
    default: false,
    aliases: &[],
    state: FlagState::Active,
};

pub const SKIP_DB_UPDATE_FLAG: Flag<bool> = Flag {
    name: "skip-db-update",
    config_name: "db.skip-update",
    usage: "skip updating vulnerability database",
    default: false,
    aliases: &[Alias { name: "skip-update", deprecated: true }],
    state: FlagState::Active,
};

pub const DOWNLOAD_JAVA_DB_ONLY_FLAG: Flag<bool> = Flag {
    name: "download-java-db-only",
    config_name: "db.download-java-only",
    usage: "download/update Java index database but don't run a scan",
    default: false,
    aliases: &[],
    state: FlagState::Active,
};

pub const SKIP_JAVA_DB_UPDATE_FLAG: Flag<bool> = Flag {
    name: "skip-java-db-update",
    config_name: "db.java-skip-update",
    usage: "skip updating Java index database",
    default: false,
    aliases: &[],
    state: FlagState::Active,
};

pub const NO_PROGRESS_FLAG: Flag<bool> = Flag {
    name: "no-progress",
    config_name: "db.no-progress",
    usage: "suppress progress bar",
    default: false,
    aliases: &[],
    state: FlagState::Active,
};

pub const DB_REPOSITORY_FLAG: Flag<&'static str> = Flag {
    name: "db-repository",
    config_name: "db.repository",
    usage: "OCI repository to retrieve the vulnerability database from",
    default: DEFAULT_DB_REPOSITORY,
    aliases: &[],
    state: FlagState::Active,
};

pub const JAVA_DB_REPOSITORY_FLAG: Flag<&'static str> = Flag {
    name: "java-db-repository",
    config_name: "db.java-repository",
    usage: "OCI repository to retrieve the Java index database from",
    default: DEFAULT_JAVA_DB_REPOSITORY,
    aliases: &[],
    state: FlagState::Active,
};

pub const JAVA_DB_AUTH_URL_FLAG: Flag<&'static str> = Flag {
    name: "java-db-auth-url",
    config_name: "db.java-db-auth-url",
    usage: "connection URL of the Java index database, overriding the cached file",
    default: "",
    aliases: &[],
    state: FlagState::Active,
};

pub const LIGHT_FLAG: Flag<bool> = Flag {
    name: "light",
    config_name: "db.light",
    usage: "deprecated",
    default: false,
    aliases: &[],
    state: FlagState::Deprecated("This flag is ignored."),
};

/// Validated, normalized database options.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DbOptions {
    /// Always `false`: `--reset` has been removed and setting it is an error.
    pub reset: bool,
    pub download_db_only: bool,
    pub skip_db_update: bool,
    pub download_java_db_only: bool,
    pub skip_java_db_update: bool,
    pub no_progress: bool,
    /// `None` only when the repository was configured as an empty string.
    pub db_repository: Option<RepositoryReference>,
    pub java_db_repository: Option<RepositoryReference>,
    /// Empty when unset.
    pub java_db_auth_url: String,
}

/// The database flags, as one group.
#[derive(Clone, Copy, Debug)]
pub struct DbFlagGroup {
    pub reset: Flag<bool>,
    pub download_db_only: Flag<bool>,
    pub skip_db_update: Flag<bool>,
    pub download_java_db_only: Flag<bool>,
    pub skip_java_db_update: Flag<bool>,
    pub no_progress: Flag<bool>,
    pub db_repository: Flag<&'static str>,
    pub java_db_repository: Flag<&'static str>,
    pub java_db_auth_url: Flag<&'static str>,
    pub light: Flag<bool>,
}

impl Default for DbFlagGroup {
    fn default() -> Self {
        Self {
            reset: RESET_FLAG,
            download_db_only: DOWNLOAD_DB_ONLY_FLAG,
            skip_db_update: SKIP_DB_UPDATE_FLAG,
            download_java_db_only: DOWNLOAD_JAVA_DB_ONLY_FLAG,
            skip_java_db_update: SKIP_JAVA_DB_UPDATE_FLAG,
            no_progress: NO_PROGRESS_FLAG,
            db_repository: DB_REPOSITORY_FLAG,
            java_db_repository: JAVA_DB_REPOSITORY_FLAG,
            java_db_auth_url: JAVA_DB_AUTH_URL_FLAG,
            light: LIGHT_FLAG,
        }
    }
}

impl DbFlagGroup {
    pub fn name(&self) -> &'static str {
        "DB"
    }

    /// The `clap` arguments of every flag in the group.
    pub fn args(&self) -> Vec<Arg> {
        let mut args = Vec::new();
        args.extend(self.reset.args());
        args.extend(self.download_db_only.args());
        args.extend(self.skip_db_update.args());
        args.extend(self.download_java_db_only.args());
        args.extend(self.skip_java_db_update.args());
        args.extend(self.no_progress.args());
        args.extend(self.db_repository.args());
        args.extend(self.java_db_repository.args());
        args.extend(self.java_db_auth_url.args());
        args.extend(self.light.args());
        args.into_iter().map(|arg| arg.help_heading(self.name())).collect()
    }

    /// Resolve, validate and normalize the group.
    ///
    /// Mode conflicts are rejected before any repository is parsed. Returns
    /// the options together with everything worth warning the user about.
    pub fn to_options(&self, sources: &Sources) -> Result<(DbOptions, Vec<Diagnostic>)> {
        let mut diagnostics = Vec::new();
        let reset = self.reset.resolve(sources, &mut diagnostics)?;
        let download_db_only = self.download_db_only.resolve(sources, &mut diagnostics)?;
        let skip_db_update = self.skip_db_update.resolve(sources, &mut diagnostics)?;
        let download_java_db_only = self.download_java_db_only.resolve(sources, &mut diagnostics)?;
        let skip_java_db_update = self.skip_java_db_update.resolve(sources, &mut diagnostics)?;
        let no_progress = self.no_progress.resolve(sources, &mut diagnostics)?;
        let db_repository = self.db_repository.resolve(sources, &mut diagnostics)?;
        let java_db_repository = self.java_db_repository.resolve(sources, &mut diagnostics)?;
        let java_db_auth_url = self.java_db_auth_url.resolve(sources, &mut diagnostics)?;
        self.light.resolve(sources, &mut diagnostics)?;

        validate_modes(download_db_only, skip_db_update, download_java_db_only, skip_java_db_update)?;

        let db_repository =
            normalize_repository(&self.db_repository, &db_repository, DB_SCHEMA_VERSION, &mut diagnostics)?;
        let java_db_repository = normalize_repository(
            &self.java_db_repository,
            &java_db_repository,
            JAVA_DB_SCHEMA_VERSION,
            &mut diagnostics,
        )?;

        let options = DbOptions {
            reset,
            download_db_only,
            skip_db_update,
            download_java_db_only,
            skip_java_db_update,
            no_progress,
            db_repository,
            java_db_repository,
            java_db_auth_url,
        };
        Ok((options, diagnostics))
    }
}

/// Reject contradictory download/update modes.
///
/// Downloading a database and skipping its update can't both be asked for;
/// the vulnerability and Java databases are checked independently.
///
/// # Examples
///
/// ```
/// use jarcoord_config::validate_modes;
///
/// assert!(validate_modes(true, false, false, true).is_ok());
/// assert!(validate_modes(true, true, false, false).is_err());
/// ```
pub fn validate_modes(
    download_db_only: bool,
    skip_db_update: bool,
    download_java_db_only: bool,
    skip_java_db_update: bool,
) -> Result<()> {
    if download_db_only && skip_db_update {
        exn::bail!(ErrorKind::ConflictingOptions {
            flag: SKIP_DB_UPDATE_FLAG.name,
            other: DOWNLOAD_DB_ONLY_FLAG.name,
        });
    }
    if download_java_db_only && skip_java_db_update {
        exn::bail!(ErrorKind::ConflictingOptions {
            flag: SKIP_JAVA_DB_UPDATE_FLAG.name,
            other: DOWNLOAD_JAVA_DB_ONLY_FLAG.name,
        });
    }
    Ok(())
}

fn normalize_repository(
    flag: &Flag<&'static str>,
    input: &str,
    schema_version: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<RepositoryReference>> {
    let Some(normalized) = normalize(input, schema_version).or_raise(|| ErrorKind::InvalidRepository(flag.name))?
    else {
        return Ok(None);
    };
    if normalized.retagged {
        diagnostics.push(Diagnostic::Retagged { flag: flag.name, repository: normalized.reference.to_string() });
    }
    Ok(Some(normalized.reference))
}
