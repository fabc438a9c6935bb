// SPDX-License-Identifier: Apache-2.0

mod cli;
mod config;
mod github;
mod http;
mod report;
mod util;

use crate::{
	cli::{AnalyzeArgs, CliConfig, Commands},
	config::Config,
	github::GitHubGateway,
	report::{print_error, print_report},
};
use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Parser as _;
use env_logger::{Builder, Env};
use insight_engine::{analyze_repository, AnalysisOptions, RepoId, RepositoryAnalysis};
use schemars::schema_for;
use std::process::exit;

/// The environment variable for configuring logging output.
static LOG_NAME: &str = "RI_LOG";

/// The environment variable for configuring logging style.
static LOG_STYLE: &str = "RI_LOG_STYLE";

/// Entry point for the `ri` binary.
fn main() {
	// A missing `.env` file is fine.
	let _ = dotenv::dotenv();

	let cli = CliConfig::parse();
	init_log(cli.default_log_filter());

	let outcome = match cli.command {
		Commands::Analyze(args) => cmd_analyze(args),
		Commands::Schema => cmd_schema(),
	};

	let outcome = match outcome {
		Ok(()) => Outcome::Ok,
		Err(e) => {
			print_error(&e);
			Outcome::Err
		}
	};

	exit(outcome.exit_code())
}

fn init_log(default_filter: &str) {
	let env = Env::new()
		.filter_or(LOG_NAME, default_filter)
		.write_style(LOG_STYLE);
	Builder::from_env(env).init();
}

fn cmd_analyze(args: AnalyzeArgs) -> Result<()> {
	let mut config = Config::load(args.config.as_deref())?;
	config.apply_env(|name| dotenv::var(name).ok());

	if args.no_growth {
		config.growth.enabled = false;
	}

	let repo = RepoId::parse(&args.repo).context("invalid repository")?;
	let token = config.api.token(|name| dotenv::var(name).ok());
	let gateway = GitHubGateway::new(&config.api, token);

	let options = AnalysisOptions {
		resolver: config.resolver,
		commit_total: args.commit_total,
		growth: config.growth,
	};

	let analysis = analyze_repository(&gateway, &repo, &options, Utc::now())
		.with_context(|| format!("failed to analyze '{}'", repo))?;

	print_report(&analysis, args.format)
}

/// Print the JSON schema of the analysis report.
fn cmd_schema() -> Result<()> {
	let schema = schema_for!(RepositoryAnalysis);
	let text = serde_json::to_string_pretty(&schema)?;
	println!("{}", text);
	Ok(())
}

/// How the process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
	Ok,
	Err,
}

impl Outcome {
	fn exit_code(self) -> i32 {
		match self {
			Outcome::Ok => 0,
			Outcome::Err => 1,
		}
	}
}
