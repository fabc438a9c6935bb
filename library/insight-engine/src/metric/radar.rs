// SPDX-License-Identifier: Apache-2.0

//! Six independent views of repository health.
//!
//! Each dimension is a capped sum of flag bonuses and log-scaled counts over
//! its own subset of signals, clamped into `[0, 100]`. The overall score is
//! the unweighted mean of the six.

use crate::{
	metric::math::{clamp_score, days_since, log_scaled, mean},
	metric::project::ProjectInsights,
	model::{PullRequest, RepositorySnapshot},
};
use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::Serialize;

/// The signals the radar reads, gathered by the caller.
#[derive(Debug, Clone, Copy)]
pub struct RadarSignals<'a> {
	pub repo: &'a RepositorySnapshot,
	pub contributor_count: usize,
	pub commits_last_30_days: usize,
	pub pull_requests: &'a [PullRequest],
	pub project: &'a ProjectInsights,
	pub language_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct HealthRadar {
	pub activity: u8,
	pub community: u8,
	pub documentation: u8,
	pub quality: u8,
	pub maintenance: u8,
	pub innovation: u8,
	pub overall: u8,
}

impl HealthRadar {
	/// Dimensions paired with their display names, in radar order.
	pub fn dimensions(&self) -> [(&'static str, u8); 6] {
		[
			("Activity", self.activity),
			("Community", self.community),
			("Documentation", self.documentation),
			("Quality", self.quality),
			("Maintenance", self.maintenance),
			("Innovation", self.innovation),
		]
	}
}

pub fn health_radar(signals: &RadarSignals<'_>, now: DateTime<Utc>) -> HealthRadar {
	log::debug!("running health radar");

	let activity = activity(signals, now);
	let community = community(signals);
	let documentation = documentation(signals.repo);
	let quality = quality(signals);
	let maintenance = maintenance(signals, now);
	let innovation = innovation(signals, now);

	let scores = [
		activity,
		community,
		documentation,
		quality,
		maintenance,
		innovation,
	]
	.map(f64::from);
	let overall = clamp_score(mean(&scores).unwrap_or(0.0));

	log::info!("completed health radar");

	HealthRadar {
		activity,
		community,
		documentation,
		quality,
		maintenance,
		innovation,
		overall,
	}
}

fn bonus(flag: bool, points: f64) -> f64 {
	if flag {
		points
	} else {
		0.0
	}
}

fn activity(signals: &RadarSignals<'_>, now: DateTime<Utc>) -> u8 {
	let repo = signals.repo;
	let last_touch = repo.pushed_at.unwrap_or(repo.updated_at).max(repo.updated_at);
	let days = days_since(now, last_touch);

	let recency = match days {
		d if d < 7.0 => 40.0,
		d if d < 30.0 => 30.0,
		d if d < 90.0 => 15.0,
		d if d < 365.0 => 5.0,
		_ => 0.0,
	};

	let window = Duration::days(30);
	let recent_prs = signals
		.pull_requests
		.iter()
		.filter(|pr| now - pr.created_at < window)
		.count() as u64;

	clamp_score(
		recency
			+ log_scaled(signals.commits_last_30_days as u64, 20.0, 35.0)
			+ log_scaled(recent_prs, 20.0, 25.0),
	)
}

fn community(signals: &RadarSignals<'_>) -> u8 {
	let repo = signals.repo;

	clamp_score(
		log_scaled(repo.stars, 10.0, 35.0)
			+ log_scaled(repo.forks, 10.0, 25.0)
			+ log_scaled(repo.watchers, 10.0, 15.0)
			+ log_scaled(signals.contributor_count as u64, 15.0, 25.0),
	)
}

fn documentation(repo: &RepositorySnapshot) -> u8 {
	let described = repo
		.description
		.as_deref()
		.is_some_and(|text| !text.trim().is_empty());
	let homepage = repo
		.homepage
		.as_deref()
		.is_some_and(|text| !text.trim().is_empty());

	clamp_score(
		bonus(described, 20.0)
			+ bonus(homepage, 15.0)
			+ bonus(repo.has_wiki, 15.0)
			+ bonus(repo.has_pages, 15.0)
			+ bonus(repo.license.is_some(), 20.0)
			+ (repo.topics.len() as f64 * 3.0).min(15.0),
	)
}

fn quality(signals: &RadarSignals<'_>) -> u8 {
	let project = signals.project;
	let open = signals.repo.open_issues as f64;

	let issue_load = if open < 20.0 {
		20.0
	} else {
		(20.0 - open / 10.0).max(0.0)
	};

	clamp_score(
		0.4 * f64::from(project.resolution_rate) + 0.4 * f64::from(project.merge_rate) + issue_load,
	)
}

fn maintenance(signals: &RadarSignals<'_>, now: DateTime<Utc>) -> u8 {
	let repo = signals.repo;
	let project = signals.project;

	let latest = project
		.latest_release
		.as_ref()
		.and_then(|release| release.published_at)
		.map(|when| days_since(now, when));

	let freshness = match latest {
		Some(days) if days < 90.0 => 25.0,
		Some(days) if days < 365.0 => 15.0,
		_ => 0.0,
	};

	clamp_score(
		log_scaled(project.release_count as u64, 20.0, 30.0)
			+ freshness
			+ bonus(repo.has_projects, 10.0)
			+ bonus(repo.has_discussions, 10.0)
			+ log_scaled(project.branch_count as u64, 15.0, 15.0)
			+ bonus(!repo.archived, 10.0),
	)
}

fn innovation(signals: &RadarSignals<'_>, now: DateTime<Utc>) -> u8 {
	let repo = signals.repo;
	let age_years = days_since(now, repo.created_at) / 365.0;

	let youth = match age_years {
		y if y < 1.0 => 20.0,
		y if y < 3.0 => 15.0,
		y if y < 5.0 => 10.0,
		_ => 5.0,
	};

	clamp_score(
		(signals.language_count as f64 * 7.0).min(35.0)
			+ log_scaled(repo.size_kb, 12.0, 30.0)
			+ youth
			+ bonus(repo.allow_forking, 15.0),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		metric::project::project_insights,
		model::{Branch, PullRequestState, Release},
		test_util::*,
	};

	fn signals<'a>(
		repo: &'a RepositorySnapshot,
		project: &'a ProjectInsights,
		pull_requests: &'a [PullRequest],
	) -> RadarSignals<'a> {
		RadarSignals {
			repo,
			contributor_count: 0,
			commits_last_30_days: 0,
			pull_requests,
			project,
			language_count: 0,
		}
	}

	#[test]
	fn bare_repository() {
		let mut repo = snapshot();
		repo.updated_at = now() - Duration::days(400);
		repo.allow_forking = false;
		repo.archived = true;
		let project = project_insights(&[], &[], &[], &[]);

		let radar = health_radar(&signals(&repo, &project, &[]), now());

		assert_eq!(radar.activity, 0);
		assert_eq!(radar.community, 0);
		assert_eq!(radar.documentation, 0);
		// No open issues still earns the issue-load points.
		assert_eq!(radar.quality, 20);
		assert_eq!(radar.maintenance, 0);
		// Three years old.
		assert_eq!(radar.innovation, 10);
		assert_eq!(radar.overall, 5);
	}

	#[test]
	fn documentation_flags() {
		let mut repo = snapshot();
		repo.description = Some("Fast, minimalist web framework".into());
		repo.homepage = Some("https://expressjs.com".into());
		repo.has_wiki = true;
		repo.has_pages = true;
		repo.license = Some("MIT".into());
		repo.topics = vec!["a".into(), "b".into()];

		assert_eq!(documentation(&repo), 91);

		repo.topics = (0..10).map(|i| i.to_string()).collect();
		assert_eq!(documentation(&repo), 100);
	}

	#[test]
	fn busy_repository_scores_high() {
		let mut repo = snapshot();
		repo.updated_at = now() - Duration::hours(3);
		repo.pushed_at = Some(now() - Duration::hours(1));
		repo.stars = 60_000;
		repo.forks = 10_000;
		repo.watchers = 1_800;
		repo.size_kb = 9_000;
		repo.has_projects = true;
		repo.has_discussions = true;

		let prs: Vec<PullRequest> = (0..40)
			.map(|number| PullRequest {
				number,
				state: PullRequestState::Merged,
				created_at: now() - Duration::days(2),
				closed_at: None,
				merged_at: None,
			})
			.collect();
		let releases: Vec<Release> = (0..50)
			.map(|i| Release {
				tag_name: format!("v4.{i}.0"),
				name: None,
				published_at: Some(now() - Duration::days(10 + i)),
				prerelease: false,
				draft: false,
			})
			.collect();
		let branches = vec![
			Branch {
				name: "main".into(),
				protected: true,
			};
			12
		];
		let project = project_insights(&[], &prs, &releases, &branches);

		let mut input = signals(&repo, &project, &prs);
		input.contributor_count = 300;
		input.commits_last_30_days = 120;
		input.language_count = 4;

		let radar = health_radar(&input, now());

		assert_eq!(radar.activity, 100);
		assert_eq!(radar.community, 100);
		assert!(radar.maintenance >= 90);
		assert!(radar.overall > 60);
	}

	#[test]
	fn every_dimension_is_bounded() {
		let mut repo = snapshot();
		repo.stars = u64::MAX / 2;
		repo.forks = u64::MAX / 2;
		repo.watchers = u64::MAX / 2;
		repo.size_kb = u64::MAX / 2;
		repo.open_issues = 100_000;
		let project = project_insights(&[], &[], &[], &[]);

		let mut input = signals(&repo, &project, &[]);
		input.contributor_count = usize::MAX / 2;
		input.language_count = 500;

		let radar = health_radar(&input, now());

		for (_, score) in radar.dimensions() {
			assert!(score <= 100);
		}
		assert_eq!(radar.quality, 0);
	}

	#[test]
	fn overall_is_mean_of_dimensions() {
		let mut repo = snapshot();
		repo.stars = 250;
		repo.license = Some("Apache-2.0".into());
		let project = project_insights(&[], &[], &[], &[]);

		let radar = health_radar(&signals(&repo, &project, &[]), now());
		let sum: u32 = radar.dimensions().iter().map(|(_, s)| u32::from(*s)).sum();

		assert_eq!(radar.overall, (sum as f64 / 6.0).round() as u8);
	}
}
