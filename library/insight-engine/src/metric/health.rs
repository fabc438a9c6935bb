// SPDX-License-Identifier: Apache-2.0

use crate::{
	metric::math::{clamp_score, days_since},
	model::RepositorySnapshot,
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum HealthLevel {
	Exceptional,
	Excellent,
	Good,
	Fair,
	#[serde(rename = "Needs Attention")]
	NeedsAttention,
}

impl HealthLevel {
	pub fn from_score(score: u8) -> HealthLevel {
		match score {
			85.. => HealthLevel::Exceptional,
			70.. => HealthLevel::Excellent,
			55.. => HealthLevel::Good,
			40.. => HealthLevel::Fair,
			_ => HealthLevel::NeedsAttention,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			HealthLevel::Exceptional => "Exceptional",
			HealthLevel::Excellent => "Excellent",
			HealthLevel::Good => "Good",
			HealthLevel::Fair => "Fair",
			HealthLevel::NeedsAttention => "Needs Attention",
		}
	}
}

/// Points awarded by each signal, before clamping.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HealthBreakdown {
	pub stars: f64,
	pub forks: f64,
	pub contributors: f64,
	pub recency: f64,
	pub community: f64,
	pub documentation: f64,
	pub license: f64,
	pub description: f64,
	pub topics: f64,
	pub issue_load: f64,
}

impl HealthBreakdown {
	fn total(&self) -> f64 {
		self.stars
			+ self.forks
			+ self.contributors
			+ self.recency
			+ self.community
			+ self.documentation
			+ self.license
			+ self.description
			+ self.topics
			+ self.issue_load
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HealthScore {
	pub score: u8,
	pub level: HealthLevel,
	pub breakdown: HealthBreakdown,
}

/// Weighted sum of engagement, community, recency and documentation signals.
pub fn health_score(
	repo: &RepositorySnapshot,
	contributor_count: usize,
	now: DateTime<Utc>,
) -> HealthScore {
	log::debug!("running health score");

	let days_since_update = days_since(now, repo.updated_at);
	let open_issues = repo.open_issues as f64;

	let breakdown = HealthBreakdown {
		stars: if repo.stars > 10 {
			20.0
		} else {
			repo.stars as f64 * 2.0
		},
		forks: if repo.forks > 5 {
			15.0
		} else {
			repo.forks as f64 * 3.0
		},
		contributors: if contributor_count > 3 {
			20.0
		} else {
			contributor_count as f64 * 5.0
		},
		recency: if days_since_update < 30.0 { 15.0 } else { 0.0 },
		community: if contributor_count > 1 { 10.0 } else { 0.0 },
		documentation: if repo.has_wiki { 5.0 } else { 0.0 },
		license: if repo.license.is_some() { 5.0 } else { 0.0 },
		description: if has_text(repo.description.as_deref()) {
			5.0
		} else {
			0.0
		},
		topics: if repo.topics.is_empty() { 0.0 } else { 5.0 },
		issue_load: if open_issues < 20.0 {
			10.0
		} else {
			(10.0 - open_issues / 2.0).max(0.0)
		},
	};

	let score = clamp_score(breakdown.total());

	log::info!("completed health score");

	HealthScore {
		score,
		level: HealthLevel::from_score(score),
		breakdown,
	}
}

fn has_text(value: Option<&str>) -> bool {
	value.is_some_and(|text| !text.trim().is_empty())
}
