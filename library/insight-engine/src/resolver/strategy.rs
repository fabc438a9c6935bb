// SPDX-License-Identifier: Apache-2.0

//! The individual ways of counting commits.

use super::{CountMethod, ResolverConfig};
use crate::{gateway::Gateway, repo_id::RepoId};
use chrono::{DateTime, Duration, Utc};

/// Why a strategy produced no count.
#[derive(Debug, thiserror::Error)]
pub enum StrategyFailure {
	/// The request failed outright: network, status, or rate limiting.
	#[error("request failed: {0:#}")]
	Transport(anyhow::Error),

	/// The upstream answered, but not with anything usable.
	#[error("unusable response: {0}")]
	Shape(String),

	/// The strategy does not apply to this repository.
	#[error("not applicable: {0}")]
	NotApplicable(&'static str),
}

impl From<anyhow::Error> for StrategyFailure {
	fn from(error: anyhow::Error) -> StrategyFailure {
		StrategyFailure::Transport(error)
	}
}

/// Everything a strategy may consult during one resolution.
pub struct Attempt<'a> {
	pub gateway: &'a dyn Gateway,
	pub repo: &'a RepoId,
	/// Length of the first commit page, which filled a whole page.
	pub sample_len: usize,
	pub page_size: usize,
	pub now: DateTime<Utc>,
}

impl Attempt<'_> {
	/// A full sample means more commits exist, so a count must exceed it.
	///
	/// A count below the sample is contradictory; one equal to it says
	/// nothing the sample didn't, and the chain should keep looking.
	fn beyond_sample(&self, total: u64) -> Result<u64, StrategyFailure> {
		let sample_len = self.sample_len as u64;

		if total < sample_len {
			return Err(StrategyFailure::Shape(format!(
				"count {} is below the {} commits already sampled",
				total, sample_len
			)));
		}

		if total == sample_len {
			return Err(StrategyFailure::Shape(format!(
				"count {} only repeats the sample length",
				total
			)));
		}

		Ok(total)
	}
}

/// One link in the resolver's chain.
///
/// A strategy is attempted at most once per resolution and never retried.
pub trait CountStrategy {
	fn method(&self) -> CountMethod;

	fn attempt(&self, attempt: &Attempt<'_>) -> Result<u64, StrategyFailure>;
}

/// Sum the per-contributor totals from the statistics endpoint.
pub struct StatsStrategy;

impl CountStrategy for StatsStrategy {
	fn method(&self) -> CountMethod {
		CountMethod::Stats
	}

	fn attempt(&self, attempt: &Attempt<'_>) -> Result<u64, StrategyFailure> {
		let totals = attempt
			.gateway
			.contributor_stats_totals(attempt.repo)?
			.ok_or_else(|| StrategyFailure::Shape("statistics are still being computed".into()))?;

		if totals.is_empty() {
			return Err(StrategyFailure::Shape("no contributor statistics".into()));
		}

		log::trace!("got contributor totals [totals='{:#?}']", totals);

		attempt.beyond_sample(totals.iter().map(|t| t.total).sum())
	}
}

/// Count full pages before the last one, plus whatever the last one holds.
pub struct PaginationStrategy;

impl CountStrategy for PaginationStrategy {
	fn method(&self) -> CountMethod {
		CountMethod::Pagination
	}

	fn attempt(&self, attempt: &Attempt<'_>) -> Result<u64, StrategyFailure> {
		let page_size = attempt.page_size;

		let first = attempt
			.gateway
			.commits_page_meta(attempt.repo, 1, page_size)?;

		let last_page = first
			.last_page
			.filter(|page| *page >= 1)
			.ok_or_else(|| StrategyFailure::Shape("no last page in pagination metadata".into()))?;

		let on_last_page = if last_page == 1 {
			first.items.len()
		} else {
			attempt
				.gateway
				.commits_page_meta(attempt.repo, last_page, page_size)?
				.items
				.len()
		};

		if on_last_page == 0 {
			return Err(StrategyFailure::Shape(format!(
				"last page {} came back empty",
				last_page
			)));
		}

		let total = (last_page - 1) * page_size as u64 + on_last_page as u64;

		attempt.beyond_sample(total)
	}
}

/// Guess a conservative total for repositories that are both mature and
/// still active.
pub struct EstimateStrategy {
	recent_update: Duration,
	min_age: Duration,
	floor: u64,
	multiplier: f64,
}

impl EstimateStrategy {
	pub fn from_config(config: &ResolverConfig) -> EstimateStrategy {
		EstimateStrategy {
			recent_update: Duration::days(config.recent_update_days),
			min_age: Duration::days(config.min_age_days),
			floor: config.estimate_floor,
			multiplier: config.estimate_multiplier,
		}
	}
}

impl CountStrategy for EstimateStrategy {
	fn method(&self) -> CountMethod {
		CountMethod::Estimated
	}

	fn attempt(&self, attempt: &Attempt<'_>) -> Result<u64, StrategyFailure> {
		let repo = attempt.gateway.repository(attempt.repo)?;

		if attempt.now - repo.updated_at >= self.recent_update {
			return Err(StrategyFailure::NotApplicable("repository is not recently updated"));
		}

		if attempt.now - repo.created_at <= self.min_age {
			return Err(StrategyFailure::NotApplicable("repository is too young to estimate"));
		}

		let scaled = (attempt.sample_len as f64 * self.multiplier).ceil() as u64;

		attempt.beyond_sample(scaled.max(self.floor))
	}
}
