// SPDX-License-Identifier: Apache-2.0

//! When, during the week, commits are made.
//!
//! Commits are bucketed by UTC weekday (Sunday first) and hour of day.

use crate::{metric::math::percent, model::CommitRecord};
use chrono::{Datelike, Timelike};
use schemars::JsonSchema;
use serde::Serialize;

const DAYS: usize = 7;
const HOURS: usize = 24;

pub const DAY_NAMES: [&str; DAYS] = [
	"Sunday",
	"Monday",
	"Tuesday",
	"Wednesday",
	"Thursday",
	"Friday",
	"Saturday",
];

/// First and last hour (inclusive) of the business day.
const BUSINESS_HOURS: (usize, usize) = (9, 17);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum WorkPattern {
	#[serde(rename = "Standard Business Hours")]
	StandardBusinessHours,
	Evening,
	Night,
	#[serde(rename = "Early Morning")]
	EarlyMorning,
	#[serde(rename = "N/A")]
	NotAvailable,
}

impl WorkPattern {
	fn from_peak_hour(hour: usize) -> WorkPattern {
		match hour {
			9..=17 => WorkPattern::StandardBusinessHours,
			18..=23 => WorkPattern::Evening,
			0..=5 => WorkPattern::Night,
			_ => WorkPattern::EarlyMorning,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			WorkPattern::StandardBusinessHours => "Standard Business Hours",
			WorkPattern::Evening => "Evening",
			WorkPattern::Night => "Night",
			WorkPattern::EarlyMorning => "Early Morning",
			WorkPattern::NotAvailable => "N/A",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct HeatmapCell {
	/// 0 is Sunday.
	pub weekday: usize,
	pub day_name: String,
	pub hour: usize,
	pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CommitHeatmap {
	/// `grid[weekday][hour]`, Sunday first.
	pub grid: Vec<Vec<u64>>,
	/// Commits placed in the grid.
	pub total: u64,
	/// Commits with neither an author nor a committer date. These have no
	/// cell, so `total + undated` is the number of commits given.
	pub undated: u64,
	pub peak: Option<HeatmapCell>,
	pub day_totals: Vec<u64>,
	pub hour_totals: Vec<u64>,
	/// Percentage of commits made on Saturday or Sunday.
	pub weekend_share: u8,
	/// Percentage of commits made between 09:00 and 17:59.
	pub business_hours_share: u8,
	pub pattern: WorkPattern,
}

pub fn commit_heatmap(commits: &[CommitRecord]) -> CommitHeatmap {
	log::debug!("running commit heatmap");

	let mut grid = vec![vec![0u64; HOURS]; DAYS];
	let mut undated = 0u64;

	for commit in commits {
		let Some(when) = commit.timestamp() else {
			undated += 1;
			continue;
		};

		let day = when.weekday().num_days_from_sunday() as usize;
		let hour = when.hour() as usize;
		grid[day][hour] += 1;
	}

	if undated > 0 {
		log::debug!("left {} undated commits out of the heatmap", undated);
	}

	let day_totals: Vec<u64> = grid.iter().map(|hours| hours.iter().sum()).collect();
	let hour_totals: Vec<u64> = (0..HOURS)
		.map(|hour| grid.iter().map(|hours| hours[hour]).sum())
		.collect();
	let total: u64 = day_totals.iter().sum();

	let mut peak: Option<HeatmapCell> = None;
	for (day, hours) in grid.iter().enumerate() {
		for (hour, count) in hours.iter().enumerate() {
			if *count > 0 && peak.as_ref().map_or(true, |best| *count > best.count) {
				peak = Some(HeatmapCell {
					weekday: day,
					day_name: DAY_NAMES[day].to_string(),
					hour,
					count: *count,
				});
			}
		}
	}

	let weekend = day_totals[0] + day_totals[6];
	let business: u64 = hour_totals[BUSINESS_HOURS.0..=BUSINESS_HOURS.1].iter().sum();

	let pattern = peak
		.as_ref()
		.map_or(WorkPattern::NotAvailable, |cell| WorkPattern::from_peak_hour(cell.hour));

	log::info!("completed commit heatmap");

	CommitHeatmap {
		grid,
		total,
		undated,
		peak,
		day_totals,
		hour_totals,
		weekend_share: percent(weekend, total),
		business_hours_share: percent(business, total),
		pattern,
	}
}
