// SPDX-License-Identifier: Apache-2.0

//! Identifies the repository an analysis runs against.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use url::{Host, Url};

/// The only host the engine knows how to talk to.
const GITHUB_HOST: &str = "github.com";

/// An `owner/name` pair for a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RepoId {
	pub owner: String,
	pub name: String,
}

impl RepoId {
	pub fn new(owner: impl Into<String>, name: impl Into<String>) -> RepoId {
		RepoId {
			owner: owner.into(),
			name: name.into(),
		}
	}

	/// Parse a repository reference.
	///
	/// Accepts `owner/repo`, `github.com/owner/repo`, an HTTPS URL such as
	/// `https://github.com/owner/repo.git`, or an SCP-style SSH remote such
	/// as `git@github.com:owner/repo.git`.
	pub fn parse(input: &str) -> Result<RepoId> {
		let trimmed = input.trim();

		if trimmed.is_empty() {
			return Err(Error::invalid_repository(input, "reference is empty"));
		}

		if let Some(remote) = trimmed.strip_prefix("git@") {
			let (host, path) = remote
				.split_once(':')
				.ok_or_else(|| Error::invalid_repository(input, "SSH remote is missing a path"))?;

			if host != GITHUB_HOST {
				return Err(Error::invalid_repository(
					input,
					"only GitHub repositories are supported",
				));
			}

			return from_segments(input, path.split('/'));
		}

		if trimmed.contains("://") {
			let url = Url::parse(trimmed)
				.map_err(|_| Error::invalid_repository(input, "not a valid URL"))?;

			match url.host() {
				Some(Host::Domain(GITHUB_HOST)) | Some(Host::Domain("www.github.com")) => {}
				Some(_) => {
					return Err(Error::invalid_repository(
						input,
						"only GitHub repositories are supported",
					))
				}
				None => return Err(Error::invalid_repository(input, "URL is missing a host")),
			}

			let segments = url
				.path_segments()
				.ok_or_else(|| Error::invalid_repository(input, "URL is missing a path"))?;

			return from_segments(input, segments);
		}

		let path = trimmed
			.strip_prefix("github.com/")
			.or_else(|| trimmed.strip_prefix("www.github.com/"))
			.unwrap_or(trimmed);

		let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
		if segments.len() != 2 {
			return Err(Error::invalid_repository(
				input,
				"expected a reference of the form 'owner/repo'",
			));
		}

		from_segments(input, segments.into_iter())
	}

	/// The `owner/name` form used in API paths and logs.
	pub fn full_name(&self) -> String {
		format!("{}/{}", self.owner, self.name)
	}
}

impl Display for RepoId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// Take the owner and name from the first two non-empty path segments.
fn from_segments<'a>(input: &str, segments: impl Iterator<Item = &'a str>) -> Result<RepoId> {
	let mut segments = segments.filter(|segment| !segment.is_empty());

	let owner = segments
		.next()
		.ok_or_else(|| Error::invalid_repository(input, "missing repository owner"))?;

	let name = segments
		.next()
		.map(|name| name.trim_end_matches(".git"))
		.ok_or_else(|| Error::invalid_repository(input, "missing repository name"))?;

	if !is_valid_name(owner) {
		return Err(Error::invalid_repository(
			input,
			"owner contains unsupported characters",
		));
	}

	if !is_valid_name(name) {
		return Err(Error::invalid_repository(
			input,
			"repository name contains unsupported characters",
		));
	}

	Ok(RepoId::new(owner, name))
}

fn is_valid_name(value: &str) -> bool {
	!value.is_empty()
		&& value
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
