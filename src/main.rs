//! # jarcoord
//!
//! Resolve the Maven coordinates of Java archives from the Java index
//! database, either by the SHA-1 of the archive or by its artifact ID and
//! version.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use jarcoord_config::{DbFlagGroup, DbOptions, Sources, default_config_file};
use jarcoord_index::{Client, DbConfig, IndexStore, init};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: u8 = 0;
/// Exit code for invalid flags or configuration.
const EXIT_CONFIGURATION: u8 = 2;
/// Exit code for failed lookups.
const EXIT_FAILURE: u8 = 1;

/// A single question for the index.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    Digest { sha1: String },
    Artifact { artifact_id: String, version: String },
    Exists { group_id: String, artifact_id: String },
}

impl Lookup {
    fn from_matches(matches: &ArgMatches) -> Option<Self> {
        let value = |m: &ArgMatches, id: &str| m.get_one::<String>(id).cloned().unwrap_or_default();
        match matches.subcommand()? {
            ("digest", m) => Some(Self::Digest { sha1: value(m, "sha1") }),
            ("artifact", m) => Some(Self::Artifact { artifact_id: value(m, "artifact-id"), version: value(m, "version") }),
            ("exists", m) => Some(Self::Exists { group_id: value(m, "group-id"), artifact_id: value(m, "artifact-id") }),
            _ => None,
        }
    }

    /// Ask the index, returning the line to print.
    async fn run<S: IndexStore>(&self, client: &Client<S>) -> jarcoord_index::error::Result<String> {
        match self {
            Self::Digest { sha1 } => Ok(client.search_by_digest(sha1).await?.to_string()),
            Self::Artifact { artifact_id, version } => {
                let group_id = client.search_by_artifact_id(artifact_id, version).await?;
                Ok(format!("{group_id}:{artifact_id}:{version}"))
            },
            Self::Exists { group_id, artifact_id } => Ok(client.exists(group_id, artifact_id).await?.to_string()),
        }
    }
}

fn command() -> Command {
    let required = |id: &'static str, help: &'static str| Arg::new(id).required(true).help(help);
    Command::new("jarcoord")
        .about("Resolve Maven coordinates of Java archives")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv)."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Cache directory holding the Java index database"),
        )
        .args(DbFlagGroup::default().args().into_iter().map(|arg| arg.global(true)))
        .subcommand(
            Command::new("digest")
                .about("Find the coordinate of the archive with the given SHA-1")
                .arg(required("sha1", "SHA-1 of the archive, in hex")),
        )
        .subcommand(
            Command::new("artifact")
                .about("Find the coordinate publishing an artifact ID at a version")
                .arg(required("artifact-id", "Artifact ID"))
                .arg(required("version", "Version")),
        )
        .subcommand(
            Command::new("exists")
                .about("Check whether the index knows a group ID and artifact ID")
                .arg(required("group-id", "Group ID"))
                .arg(required("artifact-id", "Artifact ID")),
        )
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

/// Configuration file, then environment, then the command line.
fn sources(matches: &ArgMatches) -> Sources {
    let config_file = matches.get_one::<PathBuf>("config").cloned().or_else(default_config_file);
    let mut sources = Sources::new();
    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        sources = sources.with_config_file(path);
    }
    sources.with_env().with_matches(matches.clone())
}

fn db_config(matches: &ArgMatches, options: &DbOptions) -> DbConfig {
    match matches.get_one::<PathBuf>("cache-dir") {
        Some(cache_dir) => DbConfig::new(cache_dir).with_auth_url(options.java_db_auth_url.as_str()),
        None => init(options.java_db_auth_url.as_str()),
    }
}

/// Resolve and validate the DB options, mapping failures to an exit code.
fn configure(sources: &Sources) -> Result<DbOptions, u8> {
    match DbFlagGroup::default().to_options(sources) {
        Ok((options, diagnostics)) => {
            tracing::debug!(?options, diagnostics = diagnostics.len(), "Resolved DB options");
            Ok(options)
        },
        Err(err) => {
            tracing::error!("{err:?}");
            Err(EXIT_CONFIGURATION)
        },
    }
}

/// Run one lookup and release the index, mapping the outcome to an exit code.
async fn resolve<S: IndexStore>(mut client: Client<S>, lookup: &Lookup) -> u8 {
    let result = lookup.run(&client).await;
    if let Err(err) = client.close().await {
        tracing::warn!("Failed to close the Java index: {err:?}");
    }
    match result {
        Ok(line) => {
            println!("{line}");
            EXIT_SUCCESS
        },
        Err(err) if err.is_not_found() => {
            tracing::warn!("{err}");
            EXIT_SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            EXIT_FAILURE
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let matches = command().get_matches();
    init_tracing(matches.get_count("verbose"));

    let Some(lookup) = Lookup::from_matches(&matches) else {
        return ExitCode::from(EXIT_CONFIGURATION);
    };

    let options = match configure(&sources(&matches)) {
        Ok(options) => options,
        Err(code) => return ExitCode::from(code),
    };

    let config = db_config(&matches, &options);
    let client = match Client::open(&config).await {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(path = %config.db_path().display(), "{err:?}");
            return ExitCode::from(EXIT_FAILURE);
        },
    };
    ExitCode::from(resolve(client, &lookup).await)
}
