//! Flag definitions and their lifecycle.

use crate::error::{ErrorKind, Result};
use crate::source::Sources;
use clap::{Arg, ArgAction, ArgMatches};
use derive_more::Display;
use figment::value::Value;

/// Where a flag is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlagState {
    Active,
    /// Still accepted, but its value is ignored. Carries the message shown
    /// to users who set it.
    Deprecated(&'static str),
    /// Setting it is an error. Carries the replacement advice.
    Removed(&'static str),
}

/// An alternative command-line name for a flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Alias {
    pub name: &'static str,
    /// Using a deprecated alias still works, but warns.
    pub deprecated: bool,
}

/// Something worth telling the user about that didn't stop resolution.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Diagnostic {
    #[display("\"--{alias}\" is deprecated. Use \"--{flag}\" instead.")]
    DeprecatedAlias { alias: &'static str, flag: &'static str },
    #[display("\"--{flag}\" is deprecated. {message}")]
    DeprecatedFlag { flag: &'static str, message: &'static str },
    #[display("Adding schema version to --{flag}: {repository}")]
    Retagged { flag: &'static str, repository: String },
}

/// The kinds of value a flag can hold.
pub trait FlagValue: Copy {
    /// The resolved value.
    type Value: PartialEq;

    fn to_value(self) -> Self::Value;
    fn from_config(value: Value) -> Option<Self::Value>;
    fn from_matches(matches: &ArgMatches, id: &str) -> Option<Self::Value>;
    fn arg(id: &'static str) -> Arg;
}

impl FlagValue for bool {
    type Value = bool;

    fn to_value(self) -> bool {
        self
    }

    fn from_config(value: Value) -> Option<bool> {
        match value {
            Value::Bool(_, b) => Some(b),
            // Environment values that didn't parse as booleans.
            Value::String(_, s) => s.parse().ok(),
            _ => None,
        }
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Option<bool> {
        matches.try_get_one::<bool>(id).ok().flatten().copied()
    }

    fn arg(id: &'static str) -> Arg {
        Arg::new(id).long(id).action(ArgAction::SetTrue)
    }
}

impl FlagValue for &'static str {
    type Value = String;

    fn to_value(self) -> String {
        self.to_string()
    }

    fn from_config(value: Value) -> Option<String> {
        match value {
            Value::String(_, s) => Some(s),
            // Other scalars are taken as written.
            Value::Char(_, c) => Some(c.to_string()),
            Value::Bool(_, b) => Some(b.to_string()),
            Value::Num(_, n) => n.to_i128().map(|n| n.to_string()),
            _ => None,
        }
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Option<String> {
        matches.try_get_one::<String>(id).ok().flatten().cloned()
    }

    fn arg(id: &'static str) -> Arg {
        Arg::new(id).long(id).action(ArgAction::Set).value_name("VALUE")
    }
}

/// A single flag, usable from the command line and from configuration.
#[derive(Clone, Copy, Debug)]
pub struct Flag<T> {
    /// Command-line name, without the leading dashes.
    pub name: &'static str,
    /// Dotted configuration key.
    pub config_name: &'static str,
    pub usage: &'static str,
    pub default: T,
    pub aliases: &'static [Alias],
    pub state: FlagState,
}

impl<T: FlagValue> Flag<T> {
    /// The `clap` arguments for this flag. Flags that aren't active, and
    /// deprecated aliases, are accepted but hidden from help.
    pub fn args(&self) -> Vec<Arg> {
        let mut arg = T::arg(self.name).help(self.usage);
        if self.state != FlagState::Active {
            arg = arg.hide(true);
        }
        for alias in self.aliases.iter().filter(|alias| !alias.deprecated) {
            arg = arg.visible_alias(alias.name);
        }
        let deprecated = self
            .aliases
            .iter()
            .filter(|alias| alias.deprecated)
            .map(|alias| T::arg(alias.name).help(self.usage).hide(true));
        std::iter::once(arg).chain(deprecated).collect()
    }

    /// Resolve this flag's value: command line, then deprecated aliases, then
    /// configuration, then the default. Giving both the name and a deprecated
    /// alias is accepted, and the name wins.
    ///
    /// Deprecated flags always resolve to their default. Setting a removed
    /// flag to anything but its default fails with
    /// [`RemovedFlag`](ErrorKind::RemovedFlag).
    pub fn resolve(&self, sources: &Sources, diagnostics: &mut Vec<Diagnostic>) -> Result<T::Value> {
        let default = self.default.to_value();
        let Some(value) = self.lookup(sources, diagnostics)? else {
            return Ok(default);
        };
        match self.state {
            FlagState::Active => Ok(value),
            FlagState::Deprecated(message) => {
                tracing::warn!(flag = self.name, "\"--{}\" is deprecated. {message}", self.name);
                diagnostics.push(Diagnostic::DeprecatedFlag { flag: self.name, message });
                Ok(default)
            },
            FlagState::Removed(_) if value == default => Ok(default),
            FlagState::Removed(message) => exn::bail!(ErrorKind::RemovedFlag { flag: self.name, message }),
        }
    }

    fn lookup(&self, sources: &Sources, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<T::Value>> {
        if let Some(matches) = sources.on_command_line(self.name) {
            return Ok(T::from_matches(matches, self.name));
        }
        for alias in self.aliases.iter().filter(|alias| alias.deprecated) {
            if let Some(matches) = sources.on_command_line(alias.name) {
                tracing::warn!(
                    alias = alias.name,
                    flag = self.name,
                    "\"--{}\" is deprecated. Use \"--{}\" instead.",
                    alias.name,
                    self.name
                );
                diagnostics.push(Diagnostic::DeprecatedAlias { alias: alias.name, flag: self.name });
                return Ok(T::from_matches(matches, alias.name));
            }
        }
        match sources.config_value(self.config_name)? {
            Some(value) => match T::from_config(value) {
                Some(value) => Ok(Some(value)),
                None => exn::bail!(ErrorKind::InvalidValue(self.config_name.to_string())),
            },
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;
    use figment::Figment;
    use figment::providers::Serialized;
    use rstest::rstest;

    const VERBOSE: Flag<bool> = Flag {
        name: "verbose",
        config_name: "output.verbose",
        usage: "be verbose",
        default: false,
        aliases: &[Alias { name: "loud", deprecated: true }, Alias { name: "chatty", deprecated: false }],
        state: FlagState::Active,
    };

    const FORMAT: Flag<&'static str> = Flag {
        name: "format",
        config_name: "output.format",
        usage: "output format",
        default: "table",
        aliases: &[],
        state: FlagState::Active,
    };

    fn sources(args: &[&str], config: Figment) -> Sources {
        let matches = Command::new("test")
            .args(VERBOSE.args())
            .args(FORMAT.args())
            .try_get_matches_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap();
        Sources::new().with_figment(config).with_matches(matches)
    }

    #[rstest]
    #[case(&[], false, 0)]
    #[case(&["--verbose"], true, 0)]
    #[case(&["--chatty"], true, 0)]
    #[case(&["--loud"], true, 1)]
    fn test_bool_resolution(#[case] args: &[&str], #[case] expected: bool, #[case] warnings: usize) {
        let mut diagnostics = Vec::new();
        let value = VERBOSE.resolve(&sources(args, Figment::new()), &mut diagnostics).unwrap();
        assert_eq!(value, expected);
        assert_eq!(diagnostics.len(), warnings);
    }

    #[test]
    fn test_canonical_name_wins_over_deprecated_alias() {
        let mut diagnostics = Vec::new();
        assert!(VERBOSE.resolve(&sources(&["--verbose", "--loud"], Figment::new()), &mut diagnostics).unwrap());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_deprecated_alias_diagnostic() {
        let mut diagnostics = Vec::new();
        VERBOSE.resolve(&sources(&["--loud"], Figment::new()), &mut diagnostics).unwrap();
        assert_eq!(diagnostics, vec![Diagnostic::DeprecatedAlias { alias: "loud", flag: "verbose" }]);
        assert_eq!(diagnostics[0].to_string(), "\"--loud\" is deprecated. Use \"--verbose\" instead.");
    }

    #[test]
    fn test_command_line_beats_config() {
        let config = Figment::from(Serialized::default("output.format", "json"));
        let mut diagnostics = Vec::new();
        let value = FORMAT.resolve(&sources(&["--format", "yaml"], config.clone()), &mut diagnostics).unwrap();
        assert_eq!(value, "yaml");
        let value = FORMAT.resolve(&sources(&[], config), &mut diagnostics).unwrap();
        assert_eq!(value, "json");
        let value = FORMAT.resolve(&sources(&[], Figment::new()), &mut diagnostics).unwrap();
        assert_eq!(value, "table");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_config_value() {
        let config = Figment::from(Serialized::default("output.verbose", vec![1, 2]));
        let err = VERBOSE.resolve(&sources(&[], config), &mut Vec::new()).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidValue("output.verbose".to_string()));
    }

    #[test]
    fn test_bool_from_string_config() {
        let config = Figment::from(Serialized::default("output.verbose", "true"));
        assert!(VERBOSE.resolve(&sources(&[], config), &mut Vec::new()).unwrap());
    }

    #[test]
    fn test_deprecated_flag_is_ignored() {
        let flag = Flag { state: FlagState::Deprecated("This flag is ignored."), ..VERBOSE };
        let mut diagnostics = Vec::new();
        assert!(!flag.resolve(&sources(&["--verbose"], Figment::new()), &mut diagnostics).unwrap());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::DeprecatedFlag { flag: "verbose", message: "This flag is ignored." }]
        );
    }

    #[test]
    fn test_removed_flag() {
        let flag = Flag { state: FlagState::Removed("Use \"--format\" instead."), ..VERBOSE };
        let err = flag.resolve(&sources(&["--verbose"], Figment::new()), &mut Vec::new()).unwrap_err();
        assert_eq!(*err, ErrorKind::RemovedFlag { flag: "verbose", message: "Use \"--format\" instead." });

        // Explicitly setting the default is harmless.
        let config = Figment::from(Serialized::default("output.verbose", false));
        assert!(!flag.resolve(&sources(&[], config), &mut Vec::new()).unwrap());
    }

    #[test]
    fn test_hidden_args() {
        let args = VERBOSE.args();
        assert_eq!(args.len(), 2);
        assert!(!args[0].is_hide_set());
        assert!(args[1].is_hide_set());
        let flag = Flag { state: FlagState::Deprecated("gone"), ..FORMAT };
        assert!(flag.args()[0].is_hide_set());
    }
}
