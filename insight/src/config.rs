// SPDX-License-Identifier: Apache-2.0

//! Defines the configuration file format.
//!
//! Configuration is layered: built-in defaults, then `Insight.toml`, then
//! environment variables, then CLI flags.

use crate::util::{fs::read_toml_if_exists, redacted::Redacted};
use anyhow::{Context as _, Result};
use insight_engine::{GrowthOptions, ResolverConfig};
use pathbuf::pathbuf;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE: &str = "Insight.toml";

/// Prefix shared by every environment variable the tool reads.
const ENV_PREFIX: &str = "RI_";

/// Represents the configuration of an analysis run.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
	/// How to reach the GitHub API.
	pub api: ApiConfig,

	/// Tuning for commit count resolution.
	pub resolver: ResolverConfig,

	/// Controls for the simulated growth history.
	pub growth: GrowthOptions,
}

#[derive(Debug, Deserialize, Serialize, SmartDefault, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
	/// Root of the REST API.
	#[default = "https://api.github.com"]
	pub base_url: String,

	/// Name of the environment variable holding the API token.
	#[default = "GITHUB_TOKEN"]
	pub token_var: String,

	#[default(_code = "concat!(\"repo-insight/\", env!(\"CARGO_PKG_VERSION\")).to_string()")]
	pub user_agent: String,

	/// Per-request timeout.
	#[default = 30]
	pub timeout_secs: u64,

	/// Upper bound on pages fetched for any paginated collection.
	#[default = 10]
	pub max_pages: u64,
}

impl ApiConfig {
	/// Look up the API token, if the configured variable is set.
	///
	/// An unset or empty variable means requests go out unauthenticated.
	pub fn token(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<Redacted<String>> {
		let token = lookup(&self.token_var).filter(|token| !token.trim().is_empty());

		if token.is_none() {
			log::warn!(
				"no token found in '{}'; using unauthenticated requests with a lower rate limit",
				self.token_var
			);
		}

		token.map(Redacted::new)
	}
}

impl Config {
	/// Load configuration from the given directory.
	///
	/// A directory without a configuration file yields the defaults.
	pub fn load_from(config_dir: &Path) -> Result<Config> {
		if config_dir.is_file() {
			anyhow::bail!(
				"config path must be a directory, not a file: '{}'",
				config_dir.display()
			);
		}

		let path = pathbuf![config_dir, CONFIG_FILE];

		let config = read_toml_if_exists(&path)
			.context("can't parse config file")?
			.unwrap_or_else(|| {
				log::debug!("no config file at '{}', using defaults", path.display());
				Config::default()
			});

		Ok(config)
	}

	/// Load from an explicit directory, or the platform configuration
	/// directory when none is given.
	pub fn load(config_dir: Option<&Path>) -> Result<Config> {
		match config_dir.map(Path::to_path_buf).or_else(platform_dir) {
			Some(dir) => Config::load_from(&dir),
			None => Ok(Config::default()),
		}
	}

	/// Apply overrides from `RI_*` environment variables.
	pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
		let var = |name: &str| lookup(&format!("{ENV_PREFIX}{}", name.to_uppercase()));

		if let Some(token_var) = var("token_var") {
			self.api.token_var = token_var;
		}

		if let Some(base_url) = var("api_url") {
			self.api.base_url = base_url;
		}
	}
}

/// The platform configuration directory, e.g. `~/.config/repo-insight`.
fn platform_dir() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| pathbuf![&dir, "repo-insight"])
}
