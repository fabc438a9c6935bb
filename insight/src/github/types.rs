// SPDX-License-Identifier: Apache-2.0

//! GitHub REST payloads, and their conversion into engine records.
//!
//! Only the fields the analysis reads are declared; everything else in the
//! response is ignored.

use chrono::{DateTime, Utc};
use insight_engine::model::{
	Branch, CommitRecord, Contributor, ContributorTotal, Issue, IssueState, PullRequest,
	PullRequestState, Release, RepositorySnapshot,
};
use serde::Deserialize;

/// GitHub's placeholder when it can't identify a license.
const NO_ASSERTION: &str = "NOASSERTION";

#[derive(Debug, Deserialize)]
pub struct Owner {
	pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct License {
	pub spdx_id: Option<String>,
	pub name: Option<String>,
}

impl License {
	fn identifier(self) -> Option<String> {
		self.spdx_id
			.filter(|id| id != NO_ASSERTION)
			.or(self.name)
			.filter(|name| !name.is_empty())
	}
}

#[derive(Debug, Deserialize)]
pub struct Repository {
	pub name: String,
	pub owner: Owner,
	pub description: Option<String>,
	pub stargazers_count: u64,
	pub forks_count: u64,
	/// Only present on the single-repository endpoint.
	pub subscribers_count: Option<u64>,
	pub watchers_count: u64,
	pub open_issues_count: u64,
	#[serde(default)]
	pub has_wiki: bool,
	#[serde(default)]
	pub has_pages: bool,
	#[serde(default)]
	pub has_discussions: bool,
	#[serde(default)]
	pub has_projects: bool,
	#[serde(default = "default_true")]
	pub allow_forking: bool,
	pub private: bool,
	#[serde(default)]
	pub archived: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub pushed_at: Option<DateTime<Utc>>,
	pub license: Option<License>,
	pub homepage: Option<String>,
	#[serde(default)]
	pub topics: Vec<String>,
	pub size: u64,
	pub language: Option<String>,
	pub default_branch: String,
}

fn default_true() -> bool {
	true
}

impl From<Repository> for RepositorySnapshot {
	fn from(raw: Repository) -> RepositorySnapshot {
		RepositorySnapshot {
			owner: raw.owner.login,
			name: raw.name,
			description: raw.description,
			stars: raw.stargazers_count,
			forks: raw.forks_count,
			// `watchers_count` mirrors stars; subscribers are the real watchers.
			watchers: raw.subscribers_count.unwrap_or(raw.watchers_count),
			open_issues: raw.open_issues_count,
			has_wiki: raw.has_wiki,
			has_pages: raw.has_pages,
			has_discussions: raw.has_discussions,
			has_projects: raw.has_projects,
			allow_forking: raw.allow_forking,
			private: raw.private,
			archived: raw.archived,
			created_at: raw.created_at,
			updated_at: raw.updated_at,
			pushed_at: raw.pushed_at,
			license: raw.license.and_then(License::identifier),
			homepage: raw.homepage.filter(|url| !url.is_empty()),
			topics: raw.topics,
			size_kb: raw.size,
			language: raw.language,
			default_branch: raw.default_branch,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ContributorEntry {
	pub login: String,
	pub avatar_url: Option<String>,
	pub html_url: Option<String>,
	pub contributions: u64,
}

impl From<ContributorEntry> for Contributor {
	fn from(raw: ContributorEntry) -> Contributor {
		Contributor {
			login: raw.login,
			avatar_url: raw.avatar_url,
			html_url: raw.html_url,
			contributions: raw.contributions,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct GitActor {
	pub name: Option<String>,
	pub email: Option<String>,
	pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
	pub author: Option<GitActor>,
	pub committer: Option<GitActor>,
	pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitEntry {
	pub sha: String,
	pub commit: CommitDetail,
}

impl From<CommitEntry> for CommitRecord {
	fn from(raw: CommitEntry) -> CommitRecord {
		let CommitDetail {
			author,
			committer,
			message,
		} = raw.commit;

		let (author_name, author_email, authored_at) = match author {
			Some(actor) => (actor.name, actor.email, actor.date),
			None => (None, None, None),
		};
		let (committer_email, committed_at) = match committer {
			Some(actor) => (actor.email, actor.date),
			None => (None, None),
		};

		CommitRecord {
			sha: raw.sha,
			author_name,
			author_email,
			committer_email,
			authored_at,
			committed_at,
			message,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct IssueEntry {
	pub number: u64,
	pub state: String,
	pub created_at: DateTime<Utc>,
	pub closed_at: Option<DateTime<Utc>>,
	/// Present when the "issue" is really a pull request.
	pub pull_request: Option<serde_json::Value>,
}

impl IssueEntry {
	pub fn is_pull_request(&self) -> bool {
		self.pull_request.is_some()
	}
}

impl From<IssueEntry> for Issue {
	fn from(raw: IssueEntry) -> Issue {
		Issue {
			number: raw.number,
			state: if raw.state == "open" {
				IssueState::Open
			} else {
				IssueState::Closed
			},
			created_at: raw.created_at,
			closed_at: raw.closed_at,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct PullRequestEntry {
	pub number: u64,
	pub state: String,
	pub created_at: DateTime<Utc>,
	pub closed_at: Option<DateTime<Utc>>,
	pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequestEntry> for PullRequest {
	fn from(raw: PullRequestEntry) -> PullRequest {
		let state = match (raw.merged_at, raw.state.as_str()) {
			(Some(_), _) => PullRequestState::Merged,
			(None, "open") => PullRequestState::Open,
			(None, _) => PullRequestState::Closed,
		};

		PullRequest {
			number: raw.number,
			state,
			created_at: raw.created_at,
			closed_at: raw.closed_at,
			merged_at: raw.merged_at,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ReleaseEntry {
	pub tag_name: String,
	pub name: Option<String>,
	pub published_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub prerelease: bool,
	#[serde(default)]
	pub draft: bool,
}

impl From<ReleaseEntry> for Release {
	fn from(raw: ReleaseEntry) -> Release {
		Release {
			tag_name: raw.tag_name,
			name: raw.name.filter(|name| !name.is_empty()),
			published_at: raw.published_at,
			prerelease: raw.prerelease,
			draft: raw.draft,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct BranchEntry {
	pub name: String,
	#[serde(default)]
	pub protected: bool,
}

impl From<BranchEntry> for Branch {
	fn from(raw: BranchEntry) -> Branch {
		Branch {
			name: raw.name,
			protected: raw.protected,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ContributorStats {
	/// Missing for deleted accounts.
	pub author: Option<Owner>,
	pub total: u64,
}

impl From<ContributorStats> for ContributorTotal {
	fn from(raw: ContributorStats) -> ContributorTotal {
		ContributorTotal {
			login: raw
				.author
				.map(|author| author.login)
				.unwrap_or_else(|| "ghost".to_string()),
			total: raw.total,
		}
	}
}
