//! Directory pattern resolution and shell command rewriting.
//!
//! This module handles:
//! - Matching a directory against ordered pattern rules to collect setup commands
//! - Classifying launch requests and prepending setup commands to shell commands

pub mod matcher;
pub mod rewriter;

pub use matcher::{BrokenPattern, CompiledRule, compile_rules, resolve, resolve_compiled};
pub use rewriter::{
	Invocation, LaunchRequest, ShellIdentity, build_command, classify, process,
};
