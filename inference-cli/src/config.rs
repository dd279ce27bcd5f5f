use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::{Command, Log};

#[derive(clap::Args, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Load settings from a TOML file; command-line flags still take precedence.
	#[arg(long = "config", id = "config")]
	#[serde(skip)]
	pub file: Option<PathBuf>,

	/// The inference API connection.
	#[command(flatten)]
	pub client: inference::ClientConfig,

	/// The log configuration.
	#[command(flatten)]
	pub log: Log,

	/// Console behaviour, only configurable via TOML.
	#[arg(skip)]
	pub console: inference::ConsoleConfig,
}

#[derive(Parser, Clone, Debug)]
#[command(name = "inference")]
#[command(about = "Browse, upload and replay video inference jobs", long_about = None)]
pub struct Cli {
	#[command(flatten)]
	pub config: Config,

	/// The command to execute.
	#[command(subcommand)]
	pub command: Command,
}

impl Cli {
	pub fn load() -> anyhow::Result<Self> {
		Self::load_from(std::env::args_os())
	}

	pub fn load_from<I, T>(args: I) -> anyhow::Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
		let mut cli = Cli::try_parse_from(&args)?;

		// Load the TOML file, then re-apply the command line on top of it.
		if let Some(file) = cli.config.file.clone() {
			let contents =
				std::fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
			cli.config = toml::from_str(&contents).with_context(|| format!("failed to parse {}", file.display()))?;
			cli.try_update_from(&args)?;
		}

		Ok(cli)
	}
}
