//! Command execution for preamble.
//!
//! This module handles:
//! - Spawning a launch request with inherited stdio
//! - Exit status propagation

use crate::error::{PreambleError, Result};
use crate::rules::LaunchRequest;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Spawn `request` in `cwd` and wait for it.
///
/// `args[0]` is passed as argv[0] on Unix; the remaining arguments follow.
pub fn execute_request(request: &LaunchRequest, cwd: &Path) -> Result<ExitStatus> {
	let mut cmd = Command::new(&request.program);
	cmd.args(request.args.iter().skip(1))
		.current_dir(cwd)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	#[cfg(unix)]
	{
		use std::os::unix::process::CommandExt;
		if let Some(arg0) = request.args.first() {
			cmd.arg0(arg0);
		}
	}

	debug!(program = %request.program, args = ?request.args, "spawning");

	let status = cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			PreambleError::CommandNotFound {
				command: request.program.clone(),
			}
		} else {
			PreambleError::CommandFailed {
				command: request.program.clone(),
				source,
			}
		}
	})?;

	Ok(status)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[cfg(unix)]
	#[test]
	fn test_execute_request_exit_status() {
		let request = LaunchRequest::new("/bin/sh", ["/bin/sh", "-c", "exit 3"]);
		let status = execute_request(&request, Path::new("/")).unwrap();
		assert_eq!(status.code(), Some(3));
	}

	#[cfg(unix)]
	#[test]
	fn test_execute_request_runs_in_cwd() {
		let temp_dir = tempfile::tempdir().unwrap();
		let request = LaunchRequest::new("/bin/sh", ["/bin/sh", "-c", "touch marker"]);
		let status = execute_request(&request, temp_dir.path()).unwrap();
		assert!(status.success());
		assert!(temp_dir.path().join("marker").exists());
	}

	#[test]
	fn test_execute_request_missing_program() {
		let request = LaunchRequest::new("/nonexistent/program", ["/nonexistent/program"]);
		let err = execute_request(&request, Path::new(".")).unwrap_err();
		assert!(matches!(err, PreambleError::CommandNotFound { ref command } if command == "/nonexistent/program"));
	}
}
