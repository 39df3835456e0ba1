use crate::config::types::Config;
use crate::error::{PreambleError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content =
		std::fs::read_to_string(path).map_err(|source| PreambleError::ConfigReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| PreambleError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate(path)?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::PatternRule;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(config.enabled.is_none());
		assert!(config.separator.is_none());
		assert!(config.shell.is_none());
		assert!(config.root_config_lookup_disable_env_var.is_none());
		assert!(config.rules.is_empty());
	}

	#[test]
	fn test_parse_basic_config() {
		let content = r#"
root = true
enabled = false
separator = " && "
root-config-lookup-disable-env-var = "CI"

[shell]
path = "/bin/bash"
switch = "-lc"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(config.enabled, Some(false));
		assert_eq!(config.separator.as_deref(), Some(" && "));
		assert_eq!(
			config.root_config_lookup_disable_env_var,
			Some("CI".to_string())
		);
		let shell = config.shell.unwrap();
		assert_eq!(shell.path, "/bin/bash");
		assert_eq!(shell.switch, "-lc");
	}

	#[test]
	fn test_parse_rules_keep_declared_order() {
		let content = r#"
[[rules]]
pattern = "^/home/user/project1"
commands = ["alias foo=/some/contrived/example.sh"]

[[rules]]
pattern = "^/home/user/project1"
commands = ["source env.sh"]

[[rules]]
pattern = "^/home/user/project1/subdir"
commands = ["alias bar=x"]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(
			config.rules,
			vec![
				PatternRule::new(
					"^/home/user/project1",
					["alias foo=/some/contrived/example.sh"]
				),
				PatternRule::new("^/home/user/project1", ["source env.sh"]),
				PatternRule::new("^/home/user/project1/subdir", ["alias bar=x"]),
			]
		);
	}

	#[test]
	fn test_parse_rules_inline_tables() {
		let content = r#"
rules = [
    { pattern = "/work/", commands = ["nvm use", "export FOO=1"] },
    { pattern = "/ssh:build:/srv/" },
]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rules.len(), 2);
		assert_eq!(config.rules[0].commands, vec!["nvm use", "export FOO=1"]);
		assert!(config.rules[1].commands.is_empty());
	}

	#[test]
	fn test_broken_pattern_is_not_rejected_at_parse_time() {
		let content = r#"
[[rules]]
pattern = "[invalid"
commands = ["true"]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();
		assert_eq!(config.rules[0].pattern, "[invalid");
	}

	#[test]
	fn test_empty_separator_rejected() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(r#"separator = """#, &path);

		match result.unwrap_err() {
			PreambleError::InvalidConfig { path, reason } => {
				assert_eq!(path, PathBuf::from("test.toml"));
				assert!(reason.contains("separator"));
			}
			other => panic!("Expected InvalidConfig error, got {other:?}"),
		}
	}

	#[test]
	fn test_empty_shell_switch_rejected() {
		let content = r#"
[shell]
path = "/bin/sh"
switch = ""
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);
		assert!(matches!(
			result,
			Err(PreambleError::InvalidConfig { ref reason, .. }) if reason.contains("switch")
		));
	}

	#[test]
	fn test_invalid_toml() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("invalid toml [[[", &path);
		assert!(matches!(result, Err(PreambleError::ConfigParseError { .. })));
	}

	#[test]
	fn test_missing_file() {
		let result = parse_config_file(Path::new("/nonexistent/.preamble.toml"));
		assert!(matches!(result, Err(PreambleError::ConfigReadError { .. })));
	}
}
