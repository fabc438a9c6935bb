// SPDX-License-Identifier: Apache-2.0

//! A [`Gateway`] over the GitHub REST API.

mod link;
mod types;

use crate::{
	config::ApiConfig,
	http::{authenticated_agent::AuthenticatedAgent, tls},
	util::redacted::Redacted,
};
use anyhow::{anyhow, Context as _, Result};
use insight_engine::{
	model::{
		Branch, CommitPage, CommitRecord, Contributor, ContributorTotal, Issue, LanguageBytes,
		PullRequest, Release, RepositorySnapshot,
	},
	CommitQuery, Gateway, RepoId, StateFilter,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use types::{
	BranchEntry, CommitEntry, ContributorEntry, ContributorStats, IssueEntry, PullRequestEntry,
	ReleaseEntry, Repository,
};
use ureq::Response;

/// The most items GitHub returns on one page.
const PER_PAGE: usize = 100;

/// Statistics are being computed in the background; ask again later.
const STATUS_ACCEPTED: u16 = 202;

const STATUS_NO_CONTENT: u16 = 204;

/// Commit listings of a repository with no commits ("Git Repository is empty").
const STATUS_CONFLICT: u16 = 409;

pub struct GitHubGateway {
	agent: AuthenticatedAgent,
	base_url: String,
	max_pages: u64,
}

impl GitHubGateway {
	/// Build a gateway holding its own agent and credential.
	pub fn new(config: &ApiConfig, token: Option<Redacted<String>>) -> GitHubGateway {
		let agent = tls::new_agent(Duration::from_secs(config.timeout_secs), &config.user_agent);

		GitHubGateway {
			agent: AuthenticatedAgent::new(agent, token),
			base_url: config.base_url.trim_end_matches('/').to_string(),
			max_pages: config.max_pages.max(1),
		}
	}

	fn endpoint(&self, repo: &RepoId, path: &str) -> String {
		format!("{}/repos/{}/{}{}", self.base_url, repo.owner, repo.name, path)
	}

	fn request(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, ureq::Error> {
		log::debug!(
			"requesting '{}' [query={:?}, authenticated={}]",
			url,
			query,
			self.agent.is_authenticated()
		);

		self.agent
			.get(url)
			.query_pairs(query.iter().copied())
			.call()
	}

	fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
		self.request(url, query).map_err(|e| request_error(url, e))
	}

	/// Fetch a commit listing; `None` when the repository has no commits.
	fn get_commits(&self, url: &str, query: &[(&str, &str)]) -> Result<Option<Response>> {
		empty_on_conflict(url, self.request(url, query))
	}

	fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
		self.get(url, query)?
			.into_json()
			.with_context(|| format!("unexpected response body from '{}'", url))
	}

	/// Fetch pages until one comes back short, up to the configured limit.
	fn paginate<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
		let per_page = PER_PAGE.to_string();
		let mut items = Vec::new();

		for page in 1..=self.max_pages {
			let page_number = page.to_string();
			let mut pairs = query.to_vec();
			pairs.push(("per_page", per_page.as_str()));
			pairs.push(("page", page_number.as_str()));

			let response = self.get(url, &pairs)?;

			// Empty repositories answer some list endpoints with no body.
			if response.status() == STATUS_NO_CONTENT {
				break;
			}

			let batch: Vec<T> = response
				.into_json()
				.with_context(|| format!("unexpected response body from '{}'", url))?;
			let len = batch.len();
			items.extend(batch);

			if len < PER_PAGE {
				return Ok(items);
			}
		}

		if items.len() >= PER_PAGE * self.max_pages as usize {
			log::warn!(
				"stopped paginating '{}' after {} pages; results are truncated",
				url,
				self.max_pages
			);
		}

		Ok(items)
	}
}

impl Gateway for GitHubGateway {
	fn repository(&self, repo: &RepoId) -> Result<RepositorySnapshot> {
		let raw: Repository = self.get_json(&self.endpoint(repo, ""), &[])?;
		Ok(raw.into())
	}

	fn languages(&self, repo: &RepoId) -> Result<LanguageBytes> {
		self.get_json(&self.endpoint(repo, "/languages"), &[])
	}

	fn contributors(&self, repo: &RepoId) -> Result<Vec<Contributor>> {
		let raw: Vec<ContributorEntry> = self.paginate(&self.endpoint(repo, "/contributors"), &[])?;
		Ok(raw.into_iter().map(Into::into).collect())
	}

	fn commits(&self, repo: &RepoId, query: CommitQuery) -> Result<Vec<CommitRecord>> {
		let per_page = query.limit.to_string();
		let page = query.page.to_string();

		let url = self.endpoint(repo, "/commits");

		let Some(response) = self.get_commits(
			&url,
			&[("per_page", per_page.as_str()), ("page", page.as_str())],
		)?
		else {
			return Ok(Vec::new());
		};

		let raw: Vec<CommitEntry> = response
			.into_json()
			.with_context(|| format!("unexpected response body from '{}'", url))?;

		Ok(raw.into_iter().map(Into::into).collect())
	}

	fn issues(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<Issue>> {
		let raw: Vec<IssueEntry> = self.paginate(
			&self.endpoint(repo, "/issues"),
			&[("state", state.as_str())],
		)?;

		Ok(raw
			.into_iter()
			.filter(|issue| !issue.is_pull_request())
			.map(Into::into)
			.collect())
	}

	fn pull_requests(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<PullRequest>> {
		let raw: Vec<PullRequestEntry> = self.paginate(
			&self.endpoint(repo, "/pulls"),
			&[("state", state.as_str())],
		)?;

		Ok(raw.into_iter().map(Into::into).collect())
	}

	fn releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
		let raw: Vec<ReleaseEntry> = self.paginate(&self.endpoint(repo, "/releases"), &[])?;
		Ok(raw.into_iter().map(Into::into).collect())
	}

	fn branches(&self, repo: &RepoId) -> Result<Vec<Branch>> {
		let raw: Vec<BranchEntry> = self.paginate(&self.endpoint(repo, "/branches"), &[])?;
		Ok(raw.into_iter().map(Into::into).collect())
	}

	fn contributor_stats_totals(&self, repo: &RepoId) -> Result<Option<Vec<ContributorTotal>>> {
		let url = self.endpoint(repo, "/stats/contributors");
		let response = self.get(&url, &[])?;

		match response.status() {
			STATUS_ACCEPTED | STATUS_NO_CONTENT => {
				log::debug!("contributor statistics not ready for '{}'", repo);
				Ok(None)
			}
			_ => {
				let raw: Vec<ContributorStats> = response
					.into_json()
					.with_context(|| format!("unexpected response body from '{}'", url))?;
				Ok(Some(raw.into_iter().map(Into::into).collect()))
			}
		}
	}

	fn commits_page_meta(&self, repo: &RepoId, page: u64, page_size: usize) -> Result<CommitPage> {
		let url = self.endpoint(repo, "/commits");
		let per_page = page_size.to_string();
		let page_number = page.to_string();

		let Some(response) = self.get_commits(
			&url,
			&[("per_page", per_page.as_str()), ("page", page_number.as_str())],
		)?
		else {
			return Ok(CommitPage {
				items: Vec::new(),
				last_page: Some(page),
			});
		};

		// Without a `Link` header, everything fit on the requested page.
		let last_page = match response.header("Link") {
			Some(header) => link::last_page(header),
			None => Some(page),
		};

		let raw: Vec<CommitEntry> = response
			.into_json()
			.with_context(|| format!("unexpected response body from '{}'", url))?;

		log::trace!(
			"got commit page [page={}, items={}, last_page={:?}]",
			page,
			raw.len(),
			last_page
		);

		Ok(CommitPage {
			items: raw.into_iter().map(Into::into).collect(),
			last_page,
		})
	}
}

fn request_error(url: &str, error: ureq::Error) -> anyhow::Error {
	match error {
		ureq::Error::Status(code, response) => anyhow!(
			"request to '{}' returned HTTP {} {}",
			url,
			code,
			response.status_text()
		),
		other => anyhow::Error::new(other).context(format!("request to '{}' failed", url)),
	}
}

/// GitHub refuses to list commits of an empty repository with a 409.
fn empty_on_conflict(
	url: &str,
	result: Result<Response, ureq::Error>,
) -> Result<Option<Response>> {
	match result {
		Ok(response) => Ok(Some(response)),
		Err(ureq::Error::Status(STATUS_CONFLICT, _)) => {
			log::debug!("'{}' reports an empty repository", url);
			Ok(None)
		}
		Err(e) => Err(request_error(url, e)),
	}
}
