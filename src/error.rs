use std::path::PathBuf;

/// Library-level structured errors for preamble.
///
/// The CLI binary wraps these with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum PreambleError {
	#[error("Invalid regex pattern in rule: {pattern}")]
	PatternError {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config file {path}: {reason}")]
	InvalidConfig { path: PathBuf, reason: String },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl PreambleError {
	/// The offending pattern, if this error came from a broken rule.
	pub fn pattern(&self) -> Option<&str> {
		match self {
			PreambleError::PatternError { pattern, .. } => Some(pattern),
			_ => None,
		}
	}
}

/// Result type alias using PreambleError.
pub type Result<T> = std::result::Result<T, PreambleError>;
