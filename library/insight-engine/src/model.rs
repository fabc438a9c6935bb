// SPDX-License-Identifier: Apache-2.0

//! Raw records supplied by a [`Gateway`](crate::gateway::Gateway).
//!
//! Everything here is a transient snapshot taken at fetch time. Nothing is
//! mutated after construction; a new analysis fetches new records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bytes of source per language, as reported by the upstream host.
pub type LanguageBytes = BTreeMap<String, u64>;

/// Metadata for one repository at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepositorySnapshot {
	pub owner: String,
	pub name: String,
	pub description: Option<String>,
	pub stars: u64,
	pub forks: u64,
	pub watchers: u64,
	pub open_issues: u64,
	pub has_wiki: bool,
	pub has_pages: bool,
	pub has_discussions: bool,
	pub has_projects: bool,
	pub allow_forking: bool,
	pub private: bool,
	pub archived: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub pushed_at: Option<DateTime<Utc>>,
	pub license: Option<String>,
	pub homepage: Option<String>,
	pub topics: Vec<String>,
	/// Repository size in kilobytes.
	pub size_kb: u64,
	pub language: Option<String>,
	pub default_branch: String,
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommitRecord {
	pub sha: String,
	pub author_name: Option<String>,
	pub author_email: Option<String>,
	pub committer_email: Option<String>,
	pub authored_at: Option<DateTime<Utc>>,
	pub committed_at: Option<DateTime<Utc>>,
	pub message: String,
}

impl CommitRecord {
	/// The author date, or the committer date when no author date exists.
	pub fn timestamp(&self) -> Option<DateTime<Utc>> {
		self.authored_at.or(self.committed_at)
	}

	/// The author email, or the committer email when no author email exists.
	pub fn email(&self) -> Option<&str> {
		self.author_email
			.as_deref()
			.or(self.committer_email.as_deref())
			.filter(|email| !email.is_empty())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contributor {
	pub login: String,
	pub avatar_url: Option<String>,
	pub html_url: Option<String>,
	pub contributions: u64,
}

/// A per-contributor commit total from the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContributorTotal {
	pub login: String,
	pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
	Open,
	Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
	pub number: u64,
	pub state: IssueState,
	pub created_at: DateTime<Utc>,
	pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
	Open,
	/// Closed without being merged.
	Closed,
	Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PullRequest {
	pub number: u64,
	pub state: PullRequestState,
	pub created_at: DateTime<Utc>,
	pub closed_at: Option<DateTime<Utc>>,
	pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Release {
	pub tag_name: String,
	pub name: Option<String>,
	pub published_at: Option<DateTime<Utc>>,
	pub prerelease: bool,
	pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Branch {
	pub name: String,
	pub protected: bool,
}

/// One page of the commit list, with the last page number read from the
/// pagination metadata when the upstream supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitPage {
	pub items: Vec<CommitRecord>,
	pub last_page: Option<u64>,
}
