use crate::config::types::PatternRule;
use crate::error::{PreambleError, Result};
use regex::Regex;
use tracing::{debug, trace};

/// A rule whose pattern has been compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: PatternRule,

	/// Compiled directory pattern.
	pub regex: Regex,
}

impl CompiledRule {
	pub fn compile(rule: &PatternRule) -> Result<Self> {
		Ok(Self::try_compile(rule)?)
	}

	fn try_compile(rule: &PatternRule) -> std::result::Result<Self, BrokenPattern> {
		Ok(CompiledRule {
			rule: rule.clone(),
			regex: compile_regex(&rule.pattern)?,
		})
	}

	/// Unanchored match: the pattern may hit anywhere in `directory`.
	pub fn matches(&self, directory: &str) -> bool {
		self.regex.is_match(directory)
	}
}

/// A pattern that failed to compile.
///
/// Unlike [`PreambleError`] this is `Clone`, so a cached compile result can
/// report the same failure on every launch.
#[derive(Debug, Clone)]
pub struct BrokenPattern {
	pub pattern: String,
	pub source: regex::Error,
}

impl From<BrokenPattern> for PreambleError {
	fn from(broken: BrokenPattern) -> Self {
		PreambleError::PatternError {
			pattern: broken.pattern,
			source: broken.source,
		}
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> std::result::Result<Regex, BrokenPattern> {
	Regex::new(pattern).map_err(|source| BrokenPattern {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile every rule, failing on the first broken pattern.
pub fn compile_rules(rules: &[PatternRule]) -> Result<Vec<CompiledRule>> {
	Ok(try_compile_rules(rules)?)
}

pub(crate) fn try_compile_rules(
	rules: &[PatternRule],
) -> std::result::Result<Vec<CompiledRule>, BrokenPattern> {
	rules.iter().map(CompiledRule::try_compile).collect()
}

/// Collect the setup commands that apply to `directory`.
///
/// Every rule whose pattern matches contributes all of its commands, in rule
/// order. Matches are cumulative: nothing is overridden or deduplicated. A
/// rule with a broken pattern fails the whole resolution, even if an earlier
/// rule already matched.
pub fn resolve(rules: &[PatternRule], directory: &str) -> Result<Vec<String>> {
	let compiled = compile_rules(rules)?;
	Ok(resolve_compiled(&compiled, directory))
}

/// [`resolve`] over rules that were compiled ahead of time.
pub fn resolve_compiled(rules: &[CompiledRule], directory: &str) -> Vec<String> {
	let mut commands = Vec::new();

	for compiled in rules {
		let rule = &compiled.rule;
		if compiled.matches(directory) {
			debug!(pattern = %rule.pattern, directory, count = rule.commands.len(), "rule matched");
			commands.extend(rule.commands.iter().cloned());
		} else {
			trace!(pattern = %rule.pattern, directory, "rule did not match");
		}
	}

	commands
}
