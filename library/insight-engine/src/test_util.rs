// SPDX-License-Identifier: Apache-2.0

//! Utilities for unit testing.

use crate::{
	gateway::{CommitQuery, Gateway, StateFilter},
	model::*,
	repo_id::RepoId,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::{collections::HashMap, sync::Mutex};

/// A fixed "now" used throughout the tests: Tuesday 2024-06-18 12:00 UTC.
pub fn now() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2024, 6, 18, 12, 0, 0).unwrap()
}

pub fn repo_id() -> RepoId {
	RepoId::new("expressjs", "express")
}

pub fn snapshot() -> RepositorySnapshot {
	RepositorySnapshot {
		owner: "expressjs".to_string(),
		name: "express".to_string(),
		description: None,
		stars: 0,
		forks: 0,
		watchers: 0,
		open_issues: 0,
		has_wiki: false,
		has_pages: false,
		has_discussions: false,
		has_projects: false,
		allow_forking: true,
		private: false,
		archived: false,
		created_at: now() - Duration::days(3 * 365),
		updated_at: now() - Duration::days(2),
		pushed_at: None,
		license: None,
		homepage: None,
		topics: Vec::new(),
		size_kb: 0,
		language: None,
		default_branch: "main".to_string(),
	}
}

pub fn commit_at(sha: &str, email: &str, when: DateTime<Utc>) -> CommitRecord {
	CommitRecord {
		sha: sha.to_string(),
		author_name: Some(email.split('@').next().unwrap_or(email).to_string()),
		author_email: Some(email.to_string()),
		committer_email: None,
		authored_at: Some(when),
		committed_at: None,
		message: format!("commit {sha}"),
	}
}

/// `count` commits from one author, one hour apart, newest first.
pub fn commits(count: usize) -> Vec<CommitRecord> {
	(0..count)
		.map(|i| {
			commit_at(
				&format!("{i:040x}"),
				"dev@example.com",
				now() - Duration::hours(i as i64),
			)
		})
		.collect()
}

pub fn contributor(login: &str, contributions: u64) -> Contributor {
	Contributor {
		login: login.to_string(),
		avatar_url: None,
		html_url: Some(format!("https://github.com/{login}")),
		contributions,
	}
}

/// A gateway answering from canned data.
///
/// Any collection left as `None` fails as if the upstream rejected the
/// request. Every call is recorded by name.
#[derive(Default)]
pub struct MockGateway {
	pub repository: Option<RepositorySnapshot>,
	pub languages: Option<LanguageBytes>,
	pub contributors: Option<Vec<Contributor>>,
	pub commits: Option<Vec<CommitRecord>>,
	pub issues: Option<Vec<Issue>>,
	pub pull_requests: Option<Vec<PullRequest>>,
	pub releases: Option<Vec<Release>>,
	pub branches: Option<Vec<Branch>>,
	pub stats: Option<Option<Vec<ContributorTotal>>>,
	pub pages: HashMap<(u64, usize), CommitPage>,
	calls: Mutex<Vec<&'static str>>,
	queries: Mutex<Vec<CommitQuery>>,
}

impl MockGateway {
	pub fn new() -> MockGateway {
		MockGateway::default()
	}

	/// Names of the calls made so far, in order.
	pub fn calls(&self) -> Vec<&'static str> {
		self.calls.lock().unwrap().clone()
	}

	/// Every commit query received, in order.
	pub fn queries(&self) -> Vec<CommitQuery> {
		self.queries.lock().unwrap().clone()
	}

	fn record(&self, name: &'static str) {
		self.calls.lock().unwrap().push(name);
	}
}

fn canned<T: Clone>(value: &Option<T>, what: &str) -> Result<T> {
	value
		.clone()
		.ok_or_else(|| anyhow!("request for {what} returned HTTP 403 Forbidden"))
}

impl Gateway for MockGateway {
	fn repository(&self, _repo: &RepoId) -> Result<RepositorySnapshot> {
		self.record("repository");
		canned(&self.repository, "repository")
	}

	fn languages(&self, _repo: &RepoId) -> Result<LanguageBytes> {
		self.record("languages");
		canned(&self.languages, "languages")
	}

	fn contributors(&self, _repo: &RepoId) -> Result<Vec<Contributor>> {
		self.record("contributors");
		canned(&self.contributors, "contributors")
	}

	fn commits(&self, _repo: &RepoId, query: CommitQuery) -> Result<Vec<CommitRecord>> {
		self.record("commits");
		self.queries.lock().unwrap().push(query);
		let all = canned(&self.commits, "commits")?;
		let skip = (query.page.saturating_sub(1) as usize) * query.limit;
		Ok(all.into_iter().skip(skip).take(query.limit).collect())
	}

	fn issues(&self, _repo: &RepoId, _state: StateFilter) -> Result<Vec<Issue>> {
		self.record("issues");
		canned(&self.issues, "issues")
	}

	fn pull_requests(&self, _repo: &RepoId, _state: StateFilter) -> Result<Vec<PullRequest>> {
		self.record("pull_requests");
		canned(&self.pull_requests, "pull requests")
	}

	fn releases(&self, _repo: &RepoId) -> Result<Vec<Release>> {
		self.record("releases");
		canned(&self.releases, "releases")
	}

	fn branches(&self, _repo: &RepoId) -> Result<Vec<Branch>> {
		self.record("branches");
		canned(&self.branches, "branches")
	}

	fn contributor_stats_totals(&self, _repo: &RepoId) -> Result<Option<Vec<ContributorTotal>>> {
		self.record("contributor_stats_totals");
		canned(&self.stats, "contributor statistics")
	}

	fn commits_page_meta(&self, _repo: &RepoId, page: u64, page_size: usize) -> Result<CommitPage> {
		self.record("commits_page_meta");
		self.pages
			.get(&(page, page_size))
			.cloned()
			.ok_or_else(|| anyhow!("request for commit page {page} returned HTTP 403 Forbidden"))
	}
}
