//! Immutable settings snapshots.
//!
//! A [`Settings`] value is never mutated after construction. Every `with_*`
//! method returns a new value with a bumped version, and [`SettingsStore`]
//! swaps whole `Arc<Settings>` snapshots so readers never see a half-applied
//! update.

use crate::config::types::{DEFAULT_SEPARATOR, MergedConfig, PatternRule};
use crate::rules::ShellIdentity;
use std::sync::{Arc, PoisonError, RwLock};

/// Effective configuration used by the preamble filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	version: u64,
	enabled: bool,
	separator: String,
	shell: ShellIdentity,
	rules: Arc<[PatternRule]>,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			version: 0,
			enabled: true,
			separator: DEFAULT_SEPARATOR.to_string(),
			shell: ShellIdentity::default(),
			rules: Arc::from(Vec::new()),
		}
	}
}

impl Settings {
	/// Default settings carrying the given rules.
	pub fn new(rules: Vec<PatternRule>) -> Self {
		Settings {
			rules: Arc::from(rules),
			..Default::default()
		}
	}

	/// Build settings from a merged cascade. `fallback_shell` is used when no
	/// config file has a `[shell]` table.
	pub fn from_merged(merged: &MergedConfig, fallback_shell: ShellIdentity) -> Self {
		let rules: Vec<PatternRule> = merged.rules.iter().map(|r| r.rule.clone()).collect();

		Settings {
			version: 0,
			enabled: merged.enabled.unwrap_or(true),
			separator: merged
				.separator
				.clone()
				.unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
			shell: merged.shell.clone().unwrap_or(fallback_shell),
			rules: Arc::from(rules),
		}
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn enabled(&self) -> bool {
		self.enabled
	}

	pub fn separator(&self) -> &str {
		&self.separator
	}

	pub fn shell(&self) -> &ShellIdentity {
		&self.shell
	}

	pub fn rules(&self) -> &[PatternRule] {
		&self.rules
	}

	pub fn with_rules(&self, rules: Vec<PatternRule>) -> Self {
		Settings {
			rules: Arc::from(rules),
			..self.next()
		}
	}

	pub fn with_enabled(&self, enabled: bool) -> Self {
		Settings {
			enabled,
			..self.next()
		}
	}

	pub fn with_separator(&self, separator: impl Into<String>) -> Self {
		Settings {
			separator: separator.into(),
			..self.next()
		}
	}

	pub fn with_shell(&self, shell: ShellIdentity) -> Self {
		Settings {
			shell,
			..self.next()
		}
	}

	fn next(&self) -> Self {
		Settings {
			version: self.version + 1,
			..self.clone()
		}
	}
}

/// Shared holder for the current settings snapshot.
///
/// Readers take an `Arc` and keep using it for the whole launch; updates
/// install a new snapshot instead of touching the old one.
#[derive(Debug, Default)]
pub struct SettingsStore {
	current: RwLock<Arc<Settings>>,
}

impl SettingsStore {
	pub fn new(settings: Settings) -> Self {
		SettingsStore {
			current: RwLock::new(Arc::new(settings)),
		}
	}

	/// The snapshot active right now.
	pub fn snapshot(&self) -> Arc<Settings> {
		self.current
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Derive a new snapshot from the current one and install it.
	pub fn update<F>(&self, f: F) -> Arc<Settings>
	where
		F: FnOnce(&Settings) -> Settings,
	{
		let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
		let mut next = f(&**current);
		if next.version <= current.version {
			next.version = current.version + 1;
		}
		let next = Arc::new(next);
		*current = Arc::clone(&next);
		next
	}

	/// Replace the current snapshot wholesale, e.g. after reloading files.
	pub fn install(&self, settings: Settings) -> Arc<Settings> {
		self.update(move |_| settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::RuleWithSource;
	use std::path::PathBuf;

	#[test]
	fn test_defaults() {
		let settings = Settings::default();
		assert_eq!(settings.version(), 0);
		assert!(settings.enabled());
		assert_eq!(settings.separator(), ";");
		assert_eq!(settings.shell(), &ShellIdentity::new("/bin/sh", "-c"));
		assert!(settings.rules().is_empty());
	}

	#[test]
	fn test_with_methods_leave_original_untouched() {
		let original = Settings::new(vec![PatternRule::new("^/a", ["one"])]);
		let updated = original
			.with_rules(vec![PatternRule::new("^/b", ["two"])])
			.with_separator(" && ");

		assert_eq!(original.version(), 0);
		assert_eq!(original.rules()[0].pattern, "^/a");
		assert_eq!(original.separator(), ";");

		assert_eq!(updated.version(), 2);
		assert_eq!(updated.rules()[0].pattern, "^/b");
		assert_eq!(updated.separator(), " && ");
	}

	#[test]
	fn test_from_merged() {
		let merged = MergedConfig {
			rules: vec![RuleWithSource {
				rule: PatternRule::new("^/srv", ["source /srv/env"]),
				source: PathBuf::from("/srv/.preamble.toml"),
			}],
			enabled: None,
			separator: Some("\n".to_string()),
			shell: None,
		};

		let settings = Settings::from_merged(&merged, ShellIdentity::new("/bin/zsh", "-c"));
		assert!(settings.enabled());
		assert_eq!(settings.separator(), "\n");
		assert_eq!(settings.shell(), &ShellIdentity::new("/bin/zsh", "-c"));
		assert_eq!(settings.rules().len(), 1);
	}

	#[test]
	fn test_store_snapshots_survive_updates() {
		let store = SettingsStore::new(Settings::default());
		let before = store.snapshot();

		let after = store.update(|s| s.with_enabled(false));

		assert!(before.enabled());
		assert!(!after.enabled());
		assert!(!store.snapshot().enabled());
		assert!(after.version() > before.version());
	}

	#[test]
	fn test_store_install_bumps_version() {
		let store = SettingsStore::new(Settings::default().with_separator(";"));
		assert_eq!(store.snapshot().version(), 1);

		let installed = store.install(Settings::default());
		assert_eq!(installed.version(), 2);
		assert_eq!(store.snapshot().version(), 2);
	}
}
