// SPDX-License-Identifier: Apache-2.0

//! Resolving the total number of commits in a repository.
//!
//! The upstream commit list is paginated, so a first page holding exactly
//! `page_size` commits says nothing about how many more exist. The resolver
//! walks an ordered chain of [`CountStrategy`] values, accepts the first one
//! that produces a count, and otherwise reports the sample length as an
//! approximate lower bound. It never fails.

mod strategy;

pub use strategy::{
	Attempt, CountStrategy, EstimateStrategy, PaginationStrategy, StatsStrategy, StrategyFailure,
};

use crate::{gateway::Gateway, model::CommitRecord, repo_id::RepoId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How a commit total was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CountMethod {
	Graphql,
	AllBranches,
	EnhancedStats,
	SmartPagination,
	Stats,
	Pagination,
	Estimated,
	Sampled,
	Provided,
	Fallback,
	Error,
}

impl CountMethod {
	/// Only exhaustive methods earn high confidence.
	pub fn confidence(self) -> Confidence {
		match self {
			CountMethod::Graphql | CountMethod::AllBranches => Confidence::High,
			_ => Confidence::Medium,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			CountMethod::Graphql => "graphql",
			CountMethod::AllBranches => "all-branches",
			CountMethod::EnhancedStats => "enhanced-stats",
			CountMethod::SmartPagination => "smart-pagination",
			CountMethod::Stats => "stats",
			CountMethod::Pagination => "pagination",
			CountMethod::Estimated => "estimated",
			CountMethod::Sampled => "sampled",
			CountMethod::Provided => "provided",
			CountMethod::Fallback => "fallback",
			CountMethod::Error => "error",
		}
	}
}

impl Display for CountMethod {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
	High,
	Medium,
}

/// The outcome of commit-count resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedCommitCount {
	pub total: u64,
	pub is_approximate: bool,
	/// Set when more commits are known to exist than `total` reports.
	pub has_more: bool,
	pub method: CountMethod,
	pub confidence: Confidence,
}

impl ResolvedCommitCount {
	/// An exact count the caller or the sample already established.
	pub fn provided(total: u64) -> ResolvedCommitCount {
		ResolvedCommitCount {
			total,
			is_approximate: false,
			has_more: false,
			method: CountMethod::Provided,
			confidence: CountMethod::Provided.confidence(),
		}
	}

	fn resolved(total: u64, method: CountMethod) -> ResolvedCommitCount {
		ResolvedCommitCount {
			total,
			is_approximate: method != CountMethod::Provided,
			has_more: false,
			method,
			confidence: method.confidence(),
		}
	}

	fn fallback(sample_len: u64) -> ResolvedCommitCount {
		ResolvedCommitCount {
			total: sample_len,
			is_approximate: true,
			has_more: true,
			method: CountMethod::Fallback,
			confidence: CountMethod::Fallback.confidence(),
		}
	}
}

/// The most commits the upstream returns on one page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Tuning for the resolver and its estimation heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ResolverConfig {
	/// Commits requested per page. Clamped to `1..=MAX_PAGE_SIZE` when used.
	pub page_size: usize,
	/// Repositories updated within this many days count as recently active.
	pub recent_update_days: i64,
	/// Repositories must be at least this many days old to be estimated.
	pub min_age_days: i64,
	/// The smallest total the estimate will report.
	pub estimate_floor: u64,
	/// Multiplier applied to the sample length when estimating.
	pub estimate_multiplier: f64,
}

impl Default for ResolverConfig {
	fn default() -> ResolverConfig {
		ResolverConfig {
			page_size: 100,
			recent_update_days: 30,
			min_age_days: 182,
			estimate_floor: 150,
			estimate_multiplier: 1.5,
		}
	}
}

impl ResolverConfig {
	/// The configured page size, clamped to what the upstream will honor.
	///
	/// A larger page would make every full upstream page look complete.
	pub fn effective_page_size(&self) -> usize {
		let clamped = self.page_size.clamp(1, MAX_PAGE_SIZE);

		if clamped != self.page_size {
			log::warn!(
				"page size {} is out of range, using {}",
				self.page_size,
				clamped
			);
		}

		clamped
	}
}

/// Walks an ordered chain of count strategies against one gateway.
pub struct Resolver<'g> {
	gateway: &'g dyn Gateway,
	page_size: usize,
	now: DateTime<Utc>,
	strategies: Vec<Box<dyn CountStrategy + 'g>>,
}

impl<'g> Resolver<'g> {
	/// A resolver using the standard chain: contributor statistics, then
	/// pagination metadata, then activity-based estimation.
	pub fn new(gateway: &'g dyn Gateway, config: &ResolverConfig, now: DateTime<Utc>) -> Self {
		let strategies: Vec<Box<dyn CountStrategy + 'g>> = vec![
			Box::new(StatsStrategy),
			Box::new(PaginationStrategy),
			Box::new(EstimateStrategy::from_config(config)),
		];

		Resolver::with_strategies(gateway, config.effective_page_size(), now, strategies)
	}

	/// A resolver using a caller-supplied chain, tried in order.
	pub fn with_strategies(
		gateway: &'g dyn Gateway,
		page_size: usize,
		now: DateTime<Utc>,
		strategies: Vec<Box<dyn CountStrategy + 'g>>,
	) -> Self {
		Resolver {
			gateway,
			page_size,
			now,
			strategies,
		}
	}

	/// Determine the total commit count for `repo`.
	///
	/// A `provided` total is returned untouched without any request. A
	/// sample shorter than a full page is complete by definition.
	pub fn resolve(
		&self,
		repo: &RepoId,
		sample: &[CommitRecord],
		provided: Option<u64>,
	) -> ResolvedCommitCount {
		if let Some(total) = provided {
			log::debug!("using provided commit total [repo='{}', total={}]", repo, total);
			return ResolvedCommitCount::provided(total);
		}

		let sample_len = sample.len();

		if sample_len < self.page_size {
			log::debug!(
				"commit sample is complete [repo='{}', commits={}]",
				repo,
				sample_len
			);
			return ResolvedCommitCount::provided(sample_len as u64);
		}

		log::debug!(
			"commit sample filled a page, resolving total [repo='{}', page_size={}]",
			repo,
			self.page_size
		);

		let attempt = Attempt {
			gateway: self.gateway,
			repo,
			sample_len,
			page_size: self.page_size,
			now: self.now,
		};

		for strategy in &self.strategies {
			let method = strategy.method();

			match strategy.attempt(&attempt) {
				Ok(total) => {
					log::info!(
						"resolved commit total [repo='{}', method={}, total={}]",
						repo,
						method,
						total
					);
					return ResolvedCommitCount::resolved(total, method);
				}
				Err(failure) => {
					log::warn!(
						"commit count strategy failed [repo='{}', method={}]: {}",
						repo,
						method,
						failure
					);
				}
			}
		}

		log::warn!(
			"no commit count strategy succeeded, reporting sample length [repo='{}', commits={}]",
			repo,
			sample_len
		);

		ResolvedCommitCount::fallback(sample_len as u64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		model::{CommitPage, ContributorTotal},
		test_util::*,
	};
	use chrono::Duration;
	use test_log::test;

	fn resolve(gateway: &MockGateway, sample: usize, provided: Option<u64>) -> ResolvedCommitCount {
		Resolver::new(gateway, &ResolverConfig::default(), now()).resolve(
			&repo_id(),
			&commits(sample),
			provided,
		)
	}

	fn totals(values: &[u64]) -> Vec<ContributorTotal> {
		values
			.iter()
			.enumerate()
			.map(|(i, total)| ContributorTotal {
				login: format!("user{i}"),
				total: *total,
			})
			.collect()
	}

	fn page(items: usize, last_page: Option<u64>) -> CommitPage {
		CommitPage {
			items: commits(items),
			last_page,
		}
	}

	#[test]
	fn provided_total_skips_the_network() {
		let gateway = MockGateway::new();
		let result = resolve(&gateway, 100, Some(4321));

		assert_eq!(result, ResolvedCommitCount::provided(4321));
		assert!(!result.is_approximate);
		assert!(gateway.calls().is_empty());
	}

	#[test]
	fn short_sample_is_complete() {
		let gateway = MockGateway::new();

		for len in [0, 1, 42, 99] {
			let result = resolve(&gateway, len, None);
			assert_eq!(result.total, len as u64);
			assert_eq!(result.method, CountMethod::Provided);
			assert!(!result.is_approximate);
		}

		assert!(gateway.calls().is_empty());
	}

	#[test]
	fn stats_win_when_available() {
		let mut gateway = MockGateway::new();
		gateway.stats = Some(Some(totals(&[400, 120, 3])));
		gateway.pages.insert((1, 100), page(100, Some(9)));
		gateway.pages.insert((9, 100), page(1, None));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 523);
		assert_eq!(result.method, CountMethod::Stats);
		assert_eq!(result.confidence, Confidence::Medium);
		assert!(result.is_approximate);
		assert_eq!(gateway.calls(), vec!["contributor_stats_totals"]);
	}

	#[test]
	fn pagination_after_stats_unavailable() {
		let mut gateway = MockGateway::new();
		gateway.pages.insert((1, 100), page(100, Some(4)));
		gateway.pages.insert((4, 100), page(37, Some(4)));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 337);
		assert_eq!(result.method, CountMethod::Pagination);
		assert!(result.is_approximate);
		assert!(!result.has_more);
	}

	#[test]
	fn stats_matching_the_sample_fall_through() {
		let mut gateway = MockGateway::new();
		gateway.stats = Some(Some(totals(&[100])));
		gateway.pages.insert((1, 100), page(100, Some(4)));
		gateway.pages.insert((4, 100), page(37, Some(4)));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 337);
		assert_eq!(result.method, CountMethod::Pagination);
		assert_eq!(
			gateway.calls(),
			vec![
				"contributor_stats_totals",
				"commits_page_meta",
				"commits_page_meta"
			]
		);
	}

	#[test]
	fn single_page_link_falls_back() {
		let mut gateway = MockGateway::new();
		gateway.pages.insert((1, 100), page(100, Some(1)));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 100);
		assert_eq!(result.method, CountMethod::Fallback);
		assert!(result.has_more);
	}

	#[test]
	fn page_size_is_clamped() {
		let config = |page_size| ResolverConfig {
			page_size,
			..ResolverConfig::default()
		};

		assert_eq!(config(150).effective_page_size(), MAX_PAGE_SIZE);
		assert_eq!(config(0).effective_page_size(), 1);
		assert_eq!(config(30).effective_page_size(), 30);
	}

	#[test]
	fn oversized_page_still_resolves() {
		let mut gateway = MockGateway::new();
		gateway.pages.insert((1, 100), page(100, Some(4)));
		gateway.pages.insert((4, 100), page(37, Some(4)));

		let config = ResolverConfig {
			page_size: 150,
			..ResolverConfig::default()
		};
		let result =
			Resolver::new(&gateway, &config, now()).resolve(&repo_id(), &commits(100), None);

		assert_eq!(result.total, 337);
		assert_eq!(result.method, CountMethod::Pagination);
	}

	#[test]
	fn empty_stats_fall_through() {
		let mut gateway = MockGateway::new();
		gateway.stats = Some(Some(Vec::new()));
		gateway.pages.insert((1, 100), page(100, Some(2)));
		gateway.pages.insert((2, 100), page(5, None));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 105);
		assert_eq!(result.method, CountMethod::Pagination);
	}

	#[test]
	fn stats_still_computing_fall_through() {
		let mut gateway = MockGateway::new();
		gateway.stats = Some(None);
		gateway.pages.insert((1, 100), page(100, Some(3)));
		gateway.pages.insert((3, 100), page(100, None));

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 300);
		assert_eq!(result.method, CountMethod::Pagination);
	}

	#[test]
	fn estimate_for_active_mature_repository() {
		let mut gateway = MockGateway::new();
		let mut repo = snapshot();
		repo.created_at = now() - Duration::days(400);
		repo.updated_at = now() - Duration::days(3);
		gateway.repository = Some(repo);

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 150);
		assert_eq!(result.method, CountMethod::Estimated);
		assert!(result.is_approximate);
		assert_eq!(
			gateway.calls(),
			vec![
				"contributor_stats_totals",
				"commits_page_meta",
				"repository"
			]
		);
	}

	#[test]
	fn fallback_when_nothing_works() {
		let gateway = MockGateway::new();
		let result = resolve(&gateway, 100, None);

		assert_eq!(result.total, 100);
		assert_eq!(result.method, CountMethod::Fallback);
		assert!(result.is_approximate);
		assert!(result.has_more);
		assert_eq!(result.confidence, Confidence::Medium);
	}

	#[test]
	fn fallback_for_young_repository() {
		let mut gateway = MockGateway::new();
		let mut repo = snapshot();
		repo.created_at = now() - Duration::days(20);
		repo.updated_at = now() - Duration::days(1);
		gateway.repository = Some(repo);

		let result = resolve(&gateway, 100, None);

		assert_eq!(result.method, CountMethod::Fallback);
		assert_eq!(result.total, 100);
	}

	#[test]
	fn each_strategy_is_tried_once() {
		let gateway = MockGateway::new();
		let _ = resolve(&gateway, 100, None);

		assert_eq!(
			gateway.calls(),
			vec![
				"contributor_stats_totals",
				"commits_page_meta",
				"repository"
			]
		);
	}

	#[test]
	fn confidence_only_high_for_exhaustive_methods() {
		assert_eq!(CountMethod::Graphql.confidence(), Confidence::High);
		assert_eq!(CountMethod::AllBranches.confidence(), Confidence::High);

		for method in [
			CountMethod::EnhancedStats,
			CountMethod::SmartPagination,
			CountMethod::Stats,
			CountMethod::Pagination,
			CountMethod::Estimated,
			CountMethod::Sampled,
			CountMethod::Provided,
			CountMethod::Fallback,
			CountMethod::Error,
		] {
			assert_eq!(method.confidence(), Confidence::Medium);
		}
	}

	#[test]
	fn custom_chain_runs_in_order() {
		struct Fixed(u64);

		impl CountStrategy for Fixed {
			fn method(&self) -> CountMethod {
				CountMethod::Graphql
			}

			fn attempt(&self, _attempt: &Attempt<'_>) -> Result<u64, StrategyFailure> {
				Ok(self.0)
			}
		}

		let mut gateway = MockGateway::new();
		gateway.stats = Some(Some(totals(&[10])));

		let chain: Vec<Box<dyn CountStrategy>> = vec![Box::new(Fixed(2500)), Box::new(StatsStrategy)];
		let resolver = Resolver::with_strategies(&gateway, 100, now(), chain);
		let result = resolver.resolve(&repo_id(), &commits(100), None);

		assert_eq!(result.total, 2500);
		assert_eq!(result.confidence, Confidence::High);
		assert!(gateway.calls().is_empty());
	}
}
