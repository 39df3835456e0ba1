use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use preamble_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, Settings, discover_configs, load_merged_config,
	merge_configs, user_config_path,
};
use preamble_cli::exec::execute_request;
use preamble_cli::filter::{LaunchContext, Pipeline, expand_directory, install_preamble};
use preamble_cli::rules::{LaunchRequest, ShellIdentity, compile_rules, resolve};

const INIT_TEMPLATE: &str = r#"# preamble configuration
#
# Rules are applied cumulatively, in the order written. Every rule whose
# pattern matches the working directory (anywhere in the path, unless you
# anchor it with ^ or $) prepends its commands to shell commands run there.

root = true

# Appended to every setup command.
# separator = ";"

# Only `<path> <switch> <command>` launches of this shell are rewritten.
# [shell]
# path = "/bin/sh"
# switch = "-c"

[[rules]]
pattern = "^/home/user/project1"
commands = ["source env.sh"]

# [[rules]]
# pattern = "^/home/user/project1/subdir"
# commands = ["alias bar=x"]
"#;

#[derive(Parser)]
#[command(name = "preamble")]
#[command(
	author,
	version,
	about = "Prepend directory-specific setup commands to shell commands"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Directory used for rule matching instead of the current directory
	#[arg(long, value_name = "DIR")]
	dir: Option<String>,

	/// Print the rewritten argument vector instead of running it
	#[arg(long)]
	print: bool,

	/// Create a template .preamble.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .preamble.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Shell command to run, words are joined with spaces
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Print the setup commands that apply to a directory
	Resolve {
		/// Directory to resolve (defaults to the current directory)
		dir: Option<String>,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display configuration files in cascade order with their rules
	Show,
	/// Check all config files and rule patterns without running anything
	Validate,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env("PREAMBLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
			Commands::Resolve { dir } => handle_resolve(dir.as_deref()),
		};
	}

	if !cli.args.is_empty() {
		return handle_command(&cli.args, cli.dir.as_deref(), cli.print);
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		print_loaded_config(loaded);
	}

	let settings = Settings::from_merged(&merge_configs(&configs), ShellIdentity::from_env());
	println!("Effective settings:");
	println!("  enabled: {}", settings.enabled());
	println!("  separator: {:?}", settings.separator());
	println!(
		"  shell: {} {}",
		settings.shell().path,
		settings.shell().switch
	);
	println!("  rules: {}", settings.rules().len());
	println!();

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_loaded_config(loaded: &LoadedConfig) {
	let config = &loaded.config;

	println!("# Source: {}", loaded.path.display());
	println!("# root: {}", config.root);
	if let Some(enabled) = config.enabled {
		println!("# enabled: {}", enabled);
	}
	if let Some(ref separator) = config.separator {
		println!("# separator: {:?}", separator);
	}
	if let Some(ref shell) = config.shell {
		println!("# shell: {} {}", shell.path, shell.switch);
	}
	if let Some(ref env_var) = config.root_config_lookup_disable_env_var {
		println!("# root-config-lookup-disable-env-var: {}", env_var);
	}
	println!("# rules: {}", config.rules.len());
	println!();

	for (i, rule) in config.rules.iter().enumerate() {
		println!("  Rule {}:", i + 1);
		println!("    pattern: {}", rule.pattern);
		for command in &rule.commands {
			println!("    command: {}", command);
		}
		println!();
	}
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			return Ok(ExitCode::FAILURE);
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	for loaded in &configs {
		if let Err(e) = compile_rules(&loaded.config.rules) {
			eprintln!("Configuration error in {}: {}", loaded.path.display(), e);
			return Ok(ExitCode::FAILURE);
		}
	}

	println!("All configuration files are valid:");
	for loaded in &configs {
		println!(
			"  {} ({} rules)",
			loaded.path.display(),
			loaded.config.rules.len()
		);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_resolve(dir: Option<&str>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_settings(&cwd)?;
	let directory = launch_directory(dir, &cwd);

	if !settings.enabled() {
		eprintln!("(disabled) preamble is turned off; no setup commands would be prepended");
		return Ok(ExitCode::SUCCESS);
	}

	let commands = resolve(settings.rules(), &directory)
		.with_context(|| format!("Failed to resolve setup commands for {directory}"))?;

	for command in commands {
		println!("{command}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_command(args: &[String], dir: Option<&str>, print: bool) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_settings(&cwd)?;

	let mut pipeline = Pipeline::new();
	install_preamble(&mut pipeline, Arc::clone(&settings));

	let request = LaunchRequest::shell_command(settings.shell(), args.join(" "));
	let ctx = LaunchContext::new(launch_directory(dir, &cwd));

	let request = pipeline
		.run(request, &ctx)
		.with_context(|| format!("Failed to prepare command for {}", ctx.directory))?;

	if print {
		for arg in &request.args {
			println!("{arg}");
		}
		return Ok(ExitCode::SUCCESS);
	}

	let status = execute_request(&request, &cwd)
		.with_context(|| format!("Failed to execute: {}", request.program))?;

	let exit_code = status.code().unwrap_or(1);
	Ok(ExitCode::from(exit_code as u8))
}

fn load_settings(cwd: &Path) -> Result<Arc<Settings>> {
	let merged = load_merged_config(cwd).context("Failed to load configuration")?;
	Ok(Arc::new(Settings::from_merged(
		&merged,
		ShellIdentity::from_env(),
	)))
}

fn launch_directory(dir: Option<&str>, cwd: &Path) -> String {
	match dir {
		Some(dir) => expand_directory(dir, cwd),
		None => expand_directory(&cwd.to_string_lossy(), cwd),
	}
}
