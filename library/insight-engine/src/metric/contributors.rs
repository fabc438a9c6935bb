// SPDX-License-Identifier: Apache-2.0

use crate::{
	metric::math::{mean, round1},
	model::Contributor,
};
use schemars::JsonSchema;
use serde::Serialize;

/// How many contributors make the "top" list.
const TOP_CONTRIBUTORS: usize = 5;

/// Fixed scores for a repository with exactly one contributor.
const SOLO_DIVERSITY: u8 = 15;
const SOLO_COLLABORATION: u8 = 20;

/// A contributor and their share of all contributions.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ContributorShare {
	pub login: String,
	pub contributions: u64,
	/// Percentage of all contributions, to one decimal place.
	pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ContributorInsights {
	pub total_contributors: usize,
	pub total_contributions: u64,
	pub average_contributions: f64,
	pub top_contributors: Vec<ContributorShare>,
	/// Contributors above the mean contribution count.
	pub core_contributors: Vec<ContributorShare>,
	/// Every contributor, largest first.
	pub shares: Vec<ContributorShare>,
	pub diversity_score: u8,
	pub collaboration_score: u8,
}

pub fn contributor_insights(contributors: &[Contributor]) -> ContributorInsights {
	log::debug!("running contributor insights");

	let mut ranked: Vec<&Contributor> = contributors.iter().collect();
	ranked.sort_by(|a, b| b.contributions.cmp(&a.contributions));

	let total_contributors = ranked.len();
	let total_contributions: u64 = ranked.iter().map(|c| c.contributions).sum();

	let counts: Vec<f64> = ranked.iter().map(|c| c.contributions as f64).collect();
	let average = mean(&counts).unwrap_or(0.0);

	let shares: Vec<ContributorShare> = ranked
		.iter()
		.map(|c| ContributorShare {
			login: c.login.clone(),
			contributions: c.contributions,
			percentage: share_of(c.contributions, total_contributions),
		})
		.collect();

	let core_contributors = shares
		.iter()
		.filter(|share| share.contributions as f64 > average)
		.cloned()
		.collect();

	let top_contributors = shares.iter().take(TOP_CONTRIBUTORS).cloned().collect();

	let (diversity_score, collaboration_score) = match total_contributors {
		0 => (0, 0),
		1 => (SOLO_DIVERSITY, SOLO_COLLABORATION),
		count => (
			diversity_score(&ranked, total_contributions, count),
			collaboration_score(&ranked, average),
		),
	};

	log::info!("completed contributor insights");

	ContributorInsights {
		total_contributors,
		total_contributions,
		average_contributions: round1(average),
		top_contributors,
		core_contributors,
		shares,
		diversity_score,
		collaboration_score,
	}
}

/// High when no single contributor dominates and many people contribute.
///
/// `ranked` must be sorted largest first.
fn diversity_score(ranked: &[&Contributor], total: u64, count: usize) -> u8 {
	let top_share = match (ranked.first(), total) {
		(Some(top), total) if total > 0 => top.contributions as f64 / total as f64,
		_ => 0.0,
	};

	let spread = (50.0 - top_share * 100.0).max(0.0);
	let breadth = (count as f64 * 5.0).min(50.0);

	(spread + breadth).round() as u8
}

/// Contributors doing at least a tenth of the average count as "active".
fn collaboration_score(ranked: &[&Contributor], average: f64) -> u8 {
	let active = ranked
		.iter()
		.filter(|c| c.contributions as f64 >= 0.1 * average)
		.count();

	(active * 15).min(100) as u8
}

fn share_of(part: u64, total: u64) -> f64 {
	if total == 0 {
		return 0.0;
	}

	round1(part as f64 / total as f64 * 100.0)
}
