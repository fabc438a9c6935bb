// SPDX-License-Identifier: Apache-2.0

use crate::{
	metric::{commits::commits_within, math::days_since},
	model::{CommitRecord, RepositorySnapshot},
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum ActivityLevel {
	#[serde(rename = "Extremely Active")]
	ExtremelyActive,
	#[serde(rename = "Very Active")]
	VeryActive,
	Active,
	Moderate,
	Inactive,
}

impl ActivityLevel {
	pub fn label(self) -> &'static str {
		match self {
			ActivityLevel::ExtremelyActive => "Extremely Active",
			ActivityLevel::VeryActive => "Very Active",
			ActivityLevel::Active => "Active",
			ActivityLevel::Moderate => "Moderate",
			ActivityLevel::Inactive => "Inactive",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ActivityOutput {
	pub level: ActivityLevel,
	pub days_since_update: f64,
	pub commits_last_7_days: usize,
}

/// Classify how active a repository is from its last update and the
/// commits made in the past week.
pub fn activity_level(
	repo: &RepositorySnapshot,
	commits: &[CommitRecord],
	now: DateTime<Utc>,
) -> ActivityOutput {
	log::debug!("running activity level");

	let days = days_since(now, repo.updated_at);
	let recent = commits_within(commits, now, 7);

	let level = if days < 1.0 && recent > 5 {
		ActivityLevel::ExtremelyActive
	} else if days < 7.0 && recent > 2 {
		ActivityLevel::VeryActive
	} else if days < 30.0 {
		ActivityLevel::Active
	} else if days < 90.0 {
		ActivityLevel::Moderate
	} else {
		ActivityLevel::Inactive
	};

	log::info!("completed activity level");

	ActivityOutput {
		level,
		days_since_update: days,
		commits_last_7_days: recent,
	}
}
