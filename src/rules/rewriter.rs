use serde::Deserialize;
use tracing::debug;

/// A process launch: the program to spawn and its full argument vector,
/// argv[0] included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
	pub program: String,
	pub args: Vec<String>,
}

impl LaunchRequest {
	pub fn new<P, I, A>(program: P, args: I) -> Self
	where
		P: Into<String>,
		I: IntoIterator<Item = A>,
		A: Into<String>,
	{
		LaunchRequest {
			program: program.into(),
			args: args.into_iter().map(Into::into).collect(),
		}
	}

	/// `<shell> <switch> <command>`, the shape hosts use to run a command string.
	pub fn shell_command(shell: &ShellIdentity, command: impl Into<String>) -> Self {
		LaunchRequest {
			program: shell.path.clone(),
			args: vec![shell.path.clone(), shell.switch.clone(), command.into()],
		}
	}
}

/// The shell executable and the switch that makes it run a command string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShellIdentity {
	pub path: String,
	pub switch: String,
}

impl ShellIdentity {
	pub fn new(path: impl Into<String>, switch: impl Into<String>) -> Self {
		ShellIdentity {
			path: path.into(),
			switch: switch.into(),
		}
	}

	/// `$SHELL` with `-c`, or `/bin/sh -c` when it is unset or empty.
	pub fn from_env() -> Self {
		match std::env::var("SHELL") {
			Ok(shell) if !shell.is_empty() => ShellIdentity::new(shell, "-c"),
			_ => ShellIdentity::default(),
		}
	}
}

impl Default for ShellIdentity {
	fn default() -> Self {
		ShellIdentity::new("/bin/sh", "-c")
	}
}

/// How a launch request looks from the rewriter's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation<'a> {
	/// `[path, switch, command]` for the configured shell.
	ShellCommand {
		path: &'a str,
		switch: &'a str,
		command: &'a str,
	},
	/// Anything else: editors, compilers, other shells, other arities.
	Other(&'a [String]),
}

/// Classify a request against the configured shell.
///
/// Only an exact three-element `[path, switch, command]` vector with string
/// equal path and switch counts as a shell command.
pub fn classify<'a>(request: &'a LaunchRequest, shell: &ShellIdentity) -> Invocation<'a> {
	match request.args.as_slice() {
		[path, switch, command] if *path == shell.path && *switch == shell.switch => {
			Invocation::ShellCommand {
				path: path.as_str(),
				switch: switch.as_str(),
				command: command.as_str(),
			}
		}
		args => Invocation::Other(args),
	}
}

/// Suffix every setup command with `separator` and append the user command.
pub fn build_command(setup_commands: &[String], separator: &str, user_command: &str) -> String {
	let mut command = String::new();
	for setup in setup_commands {
		command.push_str(setup);
		command.push_str(separator);
	}
	command.push_str(user_command);
	command
}

/// Prepend `setup_commands` to an eligible shell command.
///
/// Returns a copy of `request` unchanged when there is nothing to prepend or
/// the request is not a command for the configured shell.
pub fn process(
	request: &LaunchRequest,
	setup_commands: &[String],
	separator: &str,
	shell: &ShellIdentity,
) -> LaunchRequest {
	if setup_commands.is_empty() {
		return request.clone();
	}

	match classify(request, shell) {
		Invocation::ShellCommand {
			path,
			switch,
			command,
		} => {
			let rewritten = build_command(setup_commands, separator, command);
			debug!(original = command, rewritten = %rewritten, "rewrote shell command");
			LaunchRequest {
				program: request.program.clone(),
				args: vec![path.to_string(), switch.to_string(), rewritten],
			}
		}
		Invocation::Other(args) => {
			debug!(program = %request.program, argc = args.len(), "not a shell command, passing through");
			request.clone()
		}
	}
}
