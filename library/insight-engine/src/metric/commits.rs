// SPDX-License-Identifier: Apache-2.0

use crate::{model::CommitRecord, resolver::ResolvedCommitCount};
use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::HashSet;

/// Average number of weeks in a month.
const WEEKS_PER_MONTH: f64 = 4.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum CommitVelocity {
	High,
	Medium,
	Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CommitPatterns {
	/// The resolved total, never recounted from the sample.
	pub total: u64,
	pub total_is_approximate: bool,
	pub recent_7_days: usize,
	pub recent_30_days: usize,
	pub weekly_frequency: u64,
	pub unique_authors: usize,
	pub velocity: CommitVelocity,
}

/// Number of commits dated within the last `days` days.
///
/// Commits without any timestamp never count as recent.
pub(crate) fn commits_within(commits: &[CommitRecord], now: DateTime<Utc>, days: i64) -> usize {
	let window = Duration::days(days);

	commits
		.iter()
		.filter_map(CommitRecord::timestamp)
		.filter(|when| now - *when < window)
		.count()
}

pub fn commit_patterns(
	commits: &[CommitRecord],
	resolved: &ResolvedCommitCount,
	now: DateTime<Utc>,
) -> CommitPatterns {
	log::debug!("running commit patterns");

	let recent_7_days = commits_within(commits, now, 7);
	let recent_30_days = commits_within(commits, now, 30);

	let unique_authors = commits
		.iter()
		.filter_map(CommitRecord::email)
		.map(str::to_lowercase)
		.collect::<HashSet<_>>()
		.len();

	let velocity = if recent_7_days > 0 {
		CommitVelocity::High
	} else if recent_30_days > 5 {
		CommitVelocity::Medium
	} else {
		CommitVelocity::Low
	};

	log::info!("completed commit patterns");

	CommitPatterns {
		total: resolved.total,
		total_is_approximate: resolved.is_approximate,
		recent_7_days,
		recent_30_days,
		weekly_frequency: (recent_30_days as f64 / WEEKS_PER_MONTH).round() as u64,
		unique_authors,
		velocity,
	}
}
