use crate::error::PreambleError;
use crate::rules::ShellIdentity;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Separator used when a config does not set one.
pub const DEFAULT_SEPARATOR: &str = ";";

/// Top-level configuration from a `.preamble.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.preamble.toml.
	#[serde(default)]
	pub root: bool,

	/// Whether rewriting is active. Unset means "inherit", which ends up true.
	#[serde(default)]
	pub enabled: Option<bool>,

	/// String appended to every setup command.
	#[serde(default)]
	pub separator: Option<String>,

	/// Environment variable name that, if truthy, skips ~/.preamble.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Shell whose `<path> <switch> <command>` invocations get rewritten.
	#[serde(default)]
	pub shell: Option<ShellIdentity>,

	/// Directory pattern rules, applied cumulatively in declared order.
	#[serde(default)]
	pub rules: Vec<PatternRule>,
}

/// A directory pattern and the setup commands it contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
	/// Regex matched anywhere within the directory string.
	pub pattern: String,

	/// Shell statements prepended, in order, when `pattern` matches.
	#[serde(default)]
	pub commands: Vec<String>,
}

impl PatternRule {
	pub fn new<P, I, C>(pattern: P, commands: I) -> Self
	where
		P: Into<String>,
		I: IntoIterator<Item = C>,
		C: Into<String>,
	{
		PatternRule {
			pattern: pattern.into(),
			commands: commands.into_iter().map(Into::into).collect(),
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules from all configs, most general file first.
	pub rules: Vec<RuleWithSource>,

	/// Most specific `enabled` value found.
	pub enabled: Option<bool>,

	/// Most specific `separator` value found.
	pub separator: Option<String>,

	/// Most specific `[shell]` table found.
	pub shell: Option<ShellIdentity>,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: PatternRule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl Config {
	/// Reject values that would make every rewrite meaningless.
	pub fn validate(&self, path: &Path) -> Result<(), PreambleError> {
		let invalid = |reason: &str| PreambleError::InvalidConfig {
			path: path.to_path_buf(),
			reason: reason.to_string(),
		};

		if self.separator.as_deref() == Some("") {
			return Err(invalid("separator must not be empty"));
		}

		if let Some(ref shell) = self.shell {
			if shell.path.is_empty() {
				return Err(invalid("shell.path must not be empty"));
			}
			if shell.switch.is_empty() {
				return Err(invalid("shell.switch must not be empty"));
			}
		}

		Ok(())
	}
}
