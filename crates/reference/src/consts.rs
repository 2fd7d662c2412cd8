use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Registry used when the locator doesn't name one.
pub const DEFAULT_REGISTRY: &str = "index.docker.io";
/// Docker Hub's user-facing alias of [`DEFAULT_REGISTRY`].
pub(crate) const DOCKER_HUB_ALIAS: &str = "docker.io";
/// Namespace prepended to single-component Docker Hub repositories.
pub(crate) const OFFICIAL_NAMESPACE: &str = "library";
pub(crate) const MAX_NAME_LENGTH: usize = 255;

const PATH_COMPONENT: &str = r"[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*";
const HOST_LABEL: &str = r"[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?";

regex!(
    REPOSITORY_REGEX,
    format!(r"^{PATH_COMPONENT}(?:/{PATH_COMPONENT})*$").as_str()
);
regex!(
    REGISTRY_REGEX,
    format!(r"^{HOST_LABEL}(?:\.{HOST_LABEL})*(?::[0-9]+)?$").as_str()
);
regex!(TAG_REGEX, r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$");
regex!(DIGEST_REGEX, r"^[a-z0-9]+(?:[+._-][a-z0-9]+)*:[a-fA-F0-9]{32,}$");
