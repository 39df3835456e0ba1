//! Preamble - prepend directory-specific setup commands to shell invocations.
//!
//! Version managers and project toolchains often need aliases or shell
//! functions defined in the same shell that runs a command. This library
//! rewrites `<shell> -c <command>` launches so that setup commands chosen by
//! the working directory run first, in the same invocation.
//!
//! - Configuration file parsing, cascade discovery and settings snapshots
//! - Directory pattern resolution and shell command rewriting
//! - A launch filter pipeline hosts register the rewriter into
//! - Command execution with proper stdio handling
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use preamble_cli::config::{PatternRule, Settings};
//! use preamble_cli::filter::{LaunchContext, Pipeline, install_preamble};
//! use preamble_cli::rules::LaunchRequest;
//!
//! let settings = Settings::new(vec![
//!     PatternRule::new("^/home/user/project1", ["source env.sh"]),
//!     PatternRule::new("^/home/user/project1/subdir", ["alias bar=x"]),
//! ]);
//!
//! let mut pipeline = Pipeline::new();
//! install_preamble(&mut pipeline, Arc::new(settings));
//!
//! let request = LaunchRequest::new("/bin/sh", ["/bin/sh", "-c", "bar"]);
//! let ctx = LaunchContext::new("/home/user/project1/subdir");
//! let rewritten = pipeline.run(request, &ctx).unwrap();
//!
//! assert_eq!(rewritten.args[2], "source env.sh;alias bar=x;bar");
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod filter;
pub mod rules;

pub use error::{PreambleError, Result};
