//! Registry reference parsing.
//!
//! Accepts the `[registry/]repository[:tag][@digest]` grammar used by OCI
//! registries. This is a deliberately small subset of what a full OCI client
//! accepts: IPv6 registry hosts are not supported.

use crate::consts::{
    DEFAULT_REGISTRY, DIGEST_REGEX, DOCKER_HUB_ALIAS, MAX_NAME_LENGTH, OFFICIAL_NAMESPACE, REGISTRY_REGEX,
    REPOSITORY_REGEX, TAG_REGEX,
};
use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// What a reference points at within its repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// No tag or digest was given.
    Untagged,
    /// A mutable tag, e.g. `2` in `ghcr.io/aquasecurity/trivy-db:2`.
    Tag(String),
    /// An immutable content digest, e.g. `sha256:...`.
    Digest(String),
}

/// A parsed repository locator.
///
/// # Examples
///
/// ```
/// use jarcoord_reference::RepositoryReference;
///
/// let reference: RepositoryReference = "ghcr.io/aquasecurity/trivy-db:2".parse().unwrap();
/// assert_eq!(reference.registry(), "ghcr.io");
/// assert_eq!(reference.repository(), "aquasecurity/trivy-db");
/// assert_eq!(reference.tag(), Some("2"));
///
/// // Docker Hub is implied when no registry is named.
/// let reference: RepositoryReference = "alpine".parse().unwrap();
/// assert_eq!(reference.to_string(), "index.docker.io/library/alpine");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    registry: String,
    repository: String,
    target: Target,
}

impl RepositoryReference {
    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The explicit tag, if the reference has one.
    pub fn tag(&self) -> Option<&str> {
        match &self.target {
            Target::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn digest(&self) -> Option<&str> {
        match &self.target {
            Target::Digest(digest) => Some(digest),
            _ => None,
        }
    }

    pub fn is_untagged(&self) -> bool {
        self.target == Target::Untagged
    }

    /// `registry/repository`, without tag or digest.
    pub fn name(&self) -> String {
        format!("{}/{}", self.registry, self.repository)
    }

    /// Replace the target of this reference with the given tag.
    ///
    /// Fails with [`InvalidTag`](ErrorKind::InvalidTag) if the tag does not
    /// follow the tag grammar.
    pub fn with_tag(self, tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        if !TAG_REGEX.is_match(&tag) {
            exn::bail!(ErrorKind::InvalidTag(tag));
        }
        Ok(Self { target: Target::Tag(tag), ..self })
    }
}

impl Display for RepositoryReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.target {
            Target::Untagged => write!(f, "{}/{}", self.registry, self.repository),
            Target::Tag(tag) => write!(f, "{}/{}:{}", self.registry, self.repository, tag),
            Target::Digest(digest) => write!(f, "{}/{}@{}", self.registry, self.repository, digest),
        }
    }
}

impl FromStr for RepositoryReference {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<&str> for RepositoryReference {
    type Error = Error;
    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        parse(value)
    }
}

/// Split a trailing `:tag` off a name, ignoring colons that belong to a
/// registry port (any colon followed by a `/`).
fn split_tag(name: &str) -> (&str, Option<&str>) {
    match name.rfind(':') {
        Some(colon) if !name[colon..].contains('/') => (&name[..colon], Some(&name[colon + 1..])),
        _ => (name, None),
    }
}

/// Split the registry host off the repository path. The first component is
/// only a registry if it looks like a host: contains a dot or a port, or is
/// literally `localhost`.
fn split_registry(name: &str) -> Result<(String, String)> {
    let (registry, repository) = match name.split_once('/') {
        Some((first, rest)) if first.contains(['.', ':']) || first == "localhost" => (first, rest),
        _ => (DEFAULT_REGISTRY, name),
    };
    let registry = match registry {
        DOCKER_HUB_ALIAS => DEFAULT_REGISTRY,
        other => other,
    };
    if !REGISTRY_REGEX.is_match(registry) {
        exn::bail!(ErrorKind::InvalidRegistry(registry.to_string()));
    }
    if !REPOSITORY_REGEX.is_match(repository) {
        exn::bail!(ErrorKind::InvalidName(repository.to_string()));
    }
    let repository = match registry == DEFAULT_REGISTRY && !repository.contains('/') {
        true => format!("{OFFICIAL_NAMESPACE}/{repository}"),
        false => repository.to_string(),
    };
    if repository.len() > MAX_NAME_LENGTH {
        exn::bail!(ErrorKind::NameTooLong(repository.len()));
    }
    Ok((registry.to_string(), repository))
}

/// Parse a repository locator.
///
/// A locator carrying both a tag and a digest keeps only the digest.
pub fn parse(input: &str) -> Result<RepositoryReference> {
    if input.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }
    let (name, target) = match input.split_once('@') {
        Some((name, digest)) => {
            if !DIGEST_REGEX.is_match(digest) {
                exn::bail!(ErrorKind::InvalidDigest(digest.to_string()));
            }
            (split_tag(name).0, Target::Digest(digest.to_string()))
        },
        None => match split_tag(input) {
            (name, Some(tag)) if TAG_REGEX.is_match(tag) => (name, Target::Tag(tag.to_string())),
            (_, Some(tag)) => exn::bail!(ErrorKind::InvalidTag(tag.to_string())),
            (name, None) => (name, Target::Untagged),
        },
    };
    let (registry, repository) = split_registry(name)?;
    Ok(RepositoryReference { registry, repository, target })
}
