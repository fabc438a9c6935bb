// SPDX-License-Identifier: Apache-2.0

//! Data structures for the command line interface.

use clap::ValueEnum;
use std::path::PathBuf;

/// Health, activity, and growth insights for GitHub repositories.
#[derive(Debug, clap::Parser)]
#[command(name = "ri", about, version, long_about = None)]
pub struct CliConfig {
	#[command(subcommand)]
	pub command: Commands,

	/// Raise log verbosity; repeat for more detail.
	#[arg(
		short = 'v',
		long = "verbose",
		global = true,
		action = clap::ArgAction::Count,
		help_heading = "Output Flags",
		long_help = "Raise log verbosity; repeat for more detail. The `RI_LOG` environment variable takes precedence"
	)]
	pub verbose: u8,
}

impl CliConfig {
	/// The log filter to use when `RI_LOG` is not set.
	pub fn default_log_filter(&self) -> &'static str {
		match self.verbose {
			0 => "warn",
			1 => "info",
			2 => "debug",
			_ => "trace",
		}
	}
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Commands {
	/// Analyze a GitHub repository.
	Analyze(AnalyzeArgs),
	/// Print the JSON schema of the `analyze` report.
	Schema,
}

#[derive(Debug, Clone, clap::Args)]
pub struct AnalyzeArgs {
	/// Repository to analyze, as `owner/repo` or a GitHub URL
	#[arg(value_name = "REPO")]
	pub repo: String,

	/// Known total commit count; skips commit count resolution
	#[arg(long = "commit-total", value_name = "N")]
	pub commit_total: Option<u64>,

	/// What format to use.
	#[arg(short = 'f', long = "format", default_value_t, value_enum)]
	pub format: Format,

	/// Path to the configuration folder.
	#[arg(
		short = 'c',
		long = "config",
		long_help = "Path to the configuration folder. Defaults to the platform configuration directory"
	)]
	pub config: Option<PathBuf>,

	/// Skip the simulated growth history.
	#[arg(long = "no-growth")]
	pub no_growth: bool,
}

/// How to print the report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
	/// Aligned text for a terminal.
	#[default]
	Human,
	/// Pretty-printed JSON.
	Json,
}
