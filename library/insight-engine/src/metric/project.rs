// SPDX-License-Identifier: Apache-2.0

use crate::{
	metric::math::percent,
	model::{Branch, Issue, IssueState, PullRequest, PullRequestState, Release},
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct IssueCounts {
	pub open: u64,
	pub closed: u64,
	pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PullRequestCounts {
	pub open: u64,
	/// Closed without merging.
	pub closed: u64,
	pub merged: u64,
	pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReleaseRef {
	pub tag_name: String,
	pub name: Option<String>,
	pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ProjectInsights {
	pub issues: IssueCounts,
	pub pull_requests: PullRequestCounts,
	/// Closed issues as a percentage of open and closed issues.
	pub resolution_rate: u8,
	/// Merged pull requests as a percentage of open and merged ones.
	pub merge_rate: u8,
	pub release_count: usize,
	pub latest_release: Option<ReleaseRef>,
	pub branch_count: usize,
}

/// Summarize issues, pull requests, releases and branches.
///
/// `releases` must be newest first.
pub fn project_insights(
	issues: &[Issue],
	pull_requests: &[PullRequest],
	releases: &[Release],
	branches: &[Branch],
) -> ProjectInsights {
	log::debug!("running project insights");

	let mut issue_counts = IssueCounts::default();
	for issue in issues {
		match issue.state {
			IssueState::Open => issue_counts.open += 1,
			IssueState::Closed => issue_counts.closed += 1,
		}
	}
	issue_counts.total = issue_counts.open + issue_counts.closed;

	let mut pr_counts = PullRequestCounts::default();
	for pr in pull_requests {
		match pr.state {
			PullRequestState::Open => pr_counts.open += 1,
			PullRequestState::Closed => pr_counts.closed += 1,
			PullRequestState::Merged => pr_counts.merged += 1,
		}
	}
	pr_counts.total = pr_counts.open + pr_counts.closed + pr_counts.merged;

	let latest_release = releases.first().map(|release| ReleaseRef {
		tag_name: release.tag_name.clone(),
		name: release.name.clone(),
		published_at: release.published_at,
	});

	log::info!("completed project insights");

	ProjectInsights {
		issues: issue_counts,
		pull_requests: pr_counts,
		resolution_rate: percent(issue_counts.closed, issue_counts.open + issue_counts.closed),
		merge_rate: percent(pr_counts.merged, pr_counts.open + pr_counts.merged),
		release_count: releases.len(),
		latest_release,
		branch_count: branches.len(),
	}
}
