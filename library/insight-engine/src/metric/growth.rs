// SPDX-License-Identifier: Apache-2.0

//! An illustrative growth history.
//!
//! The upstream API exposes no historical star, fork, or watcher counts, so
//! this history is simulated: present-day totals are spread backwards along
//! fixed curve shapes with seeded random jitter. The output is always marked
//! `simulated` and must not be presented as recorded history. The same seed
//! and inputs always produce the same trajectory.

use crate::{
	metric::math::{days_since, mean, percent_change, round1},
	model::RepositorySnapshot,
	repo_id::RepoId,
};
use chrono::{DateTime, Months, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use schemars::JsonSchema;
use serde::Serialize;

const MIN_MONTHS: u64 = 6;
const MAX_MONTHS: u64 = 24;

/// Steepness of the exponential curve.
const EXPONENTIAL_RATE: f64 = 3.0;

/// Largest relative jitter applied to a simulated month.
const JITTER: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum GrowthPhase {
	Explosive,
	Rapid,
	Steady,
	Slow,
	Stagnant,
}

impl GrowthPhase {
	/// Classify from the average month-over-month percentage change.
	pub fn from_average_change(change: f64) -> GrowthPhase {
		if change > 20.0 {
			GrowthPhase::Explosive
		} else if change > 10.0 {
			GrowthPhase::Rapid
		} else if change > 5.0 {
			GrowthPhase::Steady
		} else if change > 0.0 {
			GrowthPhase::Slow
		} else {
			GrowthPhase::Stagnant
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GrowthPoint {
	/// `YYYY-MM`.
	pub month: String,
	pub stars: u64,
	pub forks: u64,
	pub watchers: u64,
	pub contributors: u64,
}

/// Percentage changes per series, to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct GrowthDeltas {
	pub stars: f64,
	pub forks: f64,
	pub watchers: f64,
	pub contributors: f64,
}

impl GrowthDeltas {
	fn between(from: &GrowthPoint, to: &GrowthPoint) -> GrowthDeltas {
		GrowthDeltas {
			stars: round1(percent_change(from.stars, to.stars)),
			forks: round1(percent_change(from.forks, to.forks)),
			watchers: round1(percent_change(from.watchers, to.watchers)),
			contributors: round1(percent_change(from.contributors, to.contributors)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct GrowthTrajectory {
	/// Always true: the history is generated, not recorded.
	pub simulated: bool,
	pub seed: u64,
	/// Oldest month first; the last point equals the live totals.
	pub months: Vec<GrowthPoint>,
	pub month_over_month: GrowthDeltas,
	pub quarter_over_quarter: GrowthDeltas,
	/// Mean month-over-month star change, in percent.
	pub average_monthly_change: f64,
	pub phase: GrowthPhase,
}

/// A stable seed for a repository, so repeated runs agree.
pub fn default_seed(repo: &RepoId) -> u64 {
	let hash = blake3::hash(repo.full_name().as_bytes());
	let mut bytes = [0u8; 8];
	bytes.copy_from_slice(&hash.as_bytes()[..8]);
	u64::from_le_bytes(bytes)
}

/// Number of monthly buckets for a repository of the given age.
fn month_count(age_days: f64) -> usize {
	((age_days / 30.0).ceil() as u64).clamp(MIN_MONTHS, MAX_MONTHS) as usize
}

fn exponential(progress: f64) -> f64 {
	(EXPONENTIAL_RATE * progress).exp_m1() / EXPONENTIAL_RATE.exp_m1()
}

fn linear(progress: f64) -> f64 {
	progress
}

fn logarithmic(progress: f64) -> f64 {
	(1.0 + 9.0 * progress).ln() / 10f64.ln()
}

pub fn growth_trajectory(
	repo: &RepositorySnapshot,
	contributor_count: usize,
	now: DateTime<Utc>,
	seed: u64,
) -> GrowthTrajectory {
	log::debug!("running growth trajectory [seed={}]", seed);

	let mut rng = StdRng::seed_from_u64(seed);
	let count = month_count(days_since(now, repo.created_at));
	let contributors = contributor_count as u64;

	let mut months = Vec::with_capacity(count);

	for index in 0..count {
		let months_back = (count - 1 - index) as u32;
		let month = now
			.checked_sub_months(Months::new(months_back))
			.unwrap_or(now)
			.format("%Y-%m")
			.to_string();

		if index == count - 1 {
			months.push(GrowthPoint {
				month,
				stars: repo.stars,
				forks: repo.forks,
				watchers: repo.watchers,
				contributors,
			});
			break;
		}

		let progress = (index + 1) as f64 / count as f64;
		let mut simulate = |current: u64, curve: fn(f64) -> f64| -> u64 {
			let jitter = 1.0 + rng.random_range(-JITTER..=JITTER);
			(current as f64 * curve(progress) * jitter).round().max(0.0) as u64
		};

		months.push(GrowthPoint {
			month,
			stars: simulate(repo.stars, exponential),
			forks: simulate(repo.forks, linear),
			watchers: simulate(repo.watchers, exponential),
			contributors: simulate(contributors, logarithmic),
		});
	}

	let last = &months[count - 1];
	let month_over_month = GrowthDeltas::between(&months[count - 2], last);
	let quarter_over_quarter = GrowthDeltas::between(&months[count - 4], last);

	let changes: Vec<f64> = months
		.windows(2)
		.filter(|pair| pair[0].stars > 0)
		.map(|pair| percent_change(pair[0].stars, pair[1].stars))
		.collect();
	let average_monthly_change = round1(mean(&changes).unwrap_or(0.0));

	log::info!("completed growth trajectory");

	GrowthTrajectory {
		simulated: true,
		seed,
		months,
		month_over_month,
		quarter_over_quarter,
		average_monthly_change,
		phase: GrowthPhase::from_average_change(average_monthly_change),
	}
}
