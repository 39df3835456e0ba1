//! Launch filter pipeline.
//!
//! Hosts own a [`Pipeline`] and run every launch request through it before
//! spawning. Filters are named stages with `(request) -> request` semantics;
//! installing and removing them are explicit calls on the pipeline.

pub mod directory;

pub use directory::expand_directory;

use crate::config::Settings;
use crate::error::Result;
use crate::rules::matcher::try_compile_rules;
use crate::rules::{BrokenPattern, CompiledRule, LaunchRequest, process, resolve_compiled};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Name the preamble filter registers under.
pub const PREAMBLE_FILTER_NAME: &str = "preamble";

/// Ambient state at the moment of launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
	/// Absolute, expanded working directory (may carry a remote prefix).
	pub directory: String,
}

impl LaunchContext {
	pub fn new(directory: impl Into<String>) -> Self {
		LaunchContext {
			directory: directory.into(),
		}
	}
}

/// A pre-launch stage that may transform a request.
pub trait LaunchFilter: Send + Sync {
	fn name(&self) -> &str;

	/// Return the (possibly unchanged) request for the next stage.
	fn apply(&self, request: LaunchRequest, ctx: &LaunchContext) -> Result<LaunchRequest>;
}

/// Ordered collection of launch filters.
#[derive(Default)]
pub struct Pipeline {
	filters: Vec<Box<dyn LaunchFilter>>,
}

impl std::fmt::Debug for Pipeline {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Pipeline")
			.field("filters", &self.names())
			.finish()
	}
}

impl Pipeline {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a filter. A filter with the same name is replaced in place.
	pub fn install(&mut self, filter: Box<dyn LaunchFilter>) {
		if let Some(slot) = self.filters.iter_mut().find(|f| f.name() == filter.name()) {
			debug!(filter = filter.name(), "replacing installed filter");
			*slot = filter;
		} else {
			debug!(filter = filter.name(), "installing filter");
			self.filters.push(filter);
		}
	}

	/// Remove the filter called `name`. Returns whether one was installed.
	pub fn uninstall(&mut self, name: &str) -> bool {
		let before = self.filters.len();
		self.filters.retain(|f| f.name() != name);
		let removed = self.filters.len() != before;
		if removed {
			debug!(filter = name, "uninstalled filter");
		}
		removed
	}

	pub fn is_installed(&self, name: &str) -> bool {
		self.filters.iter().any(|f| f.name() == name)
	}

	pub fn names(&self) -> Vec<&str> {
		self.filters.iter().map(|f| f.name()).collect()
	}

	/// Thread `request` through every filter in order.
	pub fn run(&self, request: LaunchRequest, ctx: &LaunchContext) -> Result<LaunchRequest> {
		self.filters.iter().try_fold(request, |request, filter| {
			filter.apply(request, ctx).inspect_err(|e| {
				warn!(filter = filter.name(), error = %e, "launch filter failed");
			})
		})
	}
}

/// Prepends directory-specific setup commands to shell commands.
///
/// Patterns are compiled on the first launch and reused for the lifetime of
/// the filter, which is tied to one settings snapshot. A broken pattern is
/// reported on every launch, not only the first.
#[derive(Debug, Clone)]
pub struct PreambleFilter {
	settings: Arc<Settings>,
	compiled: OnceLock<std::result::Result<Vec<CompiledRule>, BrokenPattern>>,
}

impl PreambleFilter {
	pub fn new(settings: Arc<Settings>) -> Self {
		PreambleFilter {
			settings,
			compiled: OnceLock::new(),
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	fn compiled_rules(&self) -> Result<&[CompiledRule]> {
		let compiled = self.compiled.get_or_init(|| {
			debug!(
				settings_version = self.settings.version(),
				rules = self.settings.rules().len(),
				"compiling rule patterns"
			);
			try_compile_rules(self.settings.rules())
		});

		match compiled {
			Ok(rules) => Ok(rules.as_slice()),
			Err(broken) => Err(broken.clone().into()),
		}
	}
}

impl LaunchFilter for PreambleFilter {
	fn name(&self) -> &str {
		PREAMBLE_FILTER_NAME
	}

	fn apply(&self, request: LaunchRequest, ctx: &LaunchContext) -> Result<LaunchRequest> {
		if !self.settings.enabled() {
			return Ok(request);
		}

		let setup = resolve_compiled(self.compiled_rules()?, &ctx.directory);
		let rewritten = process(
			&request,
			&setup,
			self.settings.separator(),
			self.settings.shell(),
		);

		if rewritten != request {
			info!(
				directory = %ctx.directory,
				setup_commands = setup.len(),
				settings_version = self.settings.version(),
				"prepended setup commands"
			);
		}

		Ok(rewritten)
	}
}

/// Install the preamble filter when `settings` is enabled, remove it otherwise.
///
/// Returns whether the filter is installed afterwards.
pub fn install_preamble(pipeline: &mut Pipeline, settings: Arc<Settings>) -> bool {
	if settings.enabled() {
		pipeline.install(Box::new(PreambleFilter::new(settings)));
		true
	} else {
		pipeline.uninstall(PREAMBLE_FILTER_NAME);
		false
	}
}
