//! Configuration loading and parsing for preamble.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Config merging
//! - Immutable, versioned settings snapshots

pub mod cascade;
pub mod parser;
pub mod settings;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use settings::{Settings, SettingsStore};
pub use types::{
	Config, DEFAULT_SEPARATOR, LoadedConfig, MergedConfig, PatternRule, RuleWithSource,
};
