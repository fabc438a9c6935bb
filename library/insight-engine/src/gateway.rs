// SPDX-License-Identifier: Apache-2.0

//! The contract for fetching raw repository data.
//!
//! Implementations own their transport and credentials. The engine only
//! ever sees the records in [`crate::model`] and an [`anyhow::Error`] when
//! a request fails.

use crate::{
	model::{
		Branch, CommitPage, CommitRecord, Contributor, ContributorTotal, Issue, LanguageBytes,
		PullRequest, Release, RepositorySnapshot,
	},
	repo_id::RepoId,
};
use anyhow::Result;

/// Which issues or pull requests to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
	Open,
	Closed,
	All,
}

impl StateFilter {
	pub fn as_str(self) -> &'static str {
		match self {
			StateFilter::Open => "open",
			StateFilter::Closed => "closed",
			StateFilter::All => "all",
		}
	}
}

/// A window into the (newest-first) commit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitQuery {
	pub limit: usize,
	pub page: u64,
}

/// Source of raw repository data.
///
/// Calls within one analysis are issued concurrently, so implementations
/// must be shareable across threads.
pub trait Gateway: Sync {
	fn repository(&self, repo: &RepoId) -> Result<RepositorySnapshot>;

	fn languages(&self, repo: &RepoId) -> Result<LanguageBytes>;

	/// Every contributor; the implementation exhausts pagination.
	fn contributors(&self, repo: &RepoId) -> Result<Vec<Contributor>>;

	fn commits(&self, repo: &RepoId, query: CommitQuery) -> Result<Vec<CommitRecord>>;

	/// Issues only; pull requests are excluded.
	fn issues(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<Issue>>;

	fn pull_requests(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<PullRequest>>;

	/// Releases, newest first.
	fn releases(&self, repo: &RepoId) -> Result<Vec<Release>>;

	fn branches(&self, repo: &RepoId) -> Result<Vec<Branch>>;

	/// Per-contributor commit totals, or `None` while the upstream has not
	/// computed them yet.
	fn contributor_stats_totals(&self, repo: &RepoId) -> Result<Option<Vec<ContributorTotal>>>;

	fn commits_page_meta(&self, repo: &RepoId, page: u64, page_size: usize) -> Result<CommitPage>;
}
