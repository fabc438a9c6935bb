// SPDX-License-Identifier: Apache-2.0

//! Running a full analysis of one repository.

use crate::{
	error::{Error, Result},
	gateway::{CommitQuery, Gateway, StateFilter},
	metric::{
		activity_level, commit_heatmap, commit_patterns, contributor_insights, default_seed,
		growth_trajectory, health_radar, health_score, language_diversity, project_insights,
		ActivityOutput, CommitHeatmap, CommitPatterns, ContributorInsights, GrowthTrajectory,
		HealthRadar, HealthScore, LanguageDiversity, ProjectInsights, RadarSignals,
	},
	model::RepositorySnapshot,
	repo_id::RepoId,
	resolver::{ResolvedCommitCount, Resolver, ResolverConfig},
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Controls for the simulated growth history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GrowthOptions {
	pub enabled: bool,
	/// Fixed seed; derived from the repository name when unset.
	pub seed: Option<u64>,
}

impl Default for GrowthOptions {
	fn default() -> GrowthOptions {
		GrowthOptions {
			enabled: true,
			seed: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
	pub resolver: ResolverConfig,
	/// An authoritative commit total, when the caller already knows it.
	pub commit_total: Option<u64>,
	pub growth: GrowthOptions,
}

/// Everything derived from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RepositoryAnalysis {
	pub repository: RepoId,
	pub snapshot: RepositorySnapshot,
	pub analyzed_at: DateTime<Utc>,
	pub commit_count: ResolvedCommitCount,
	pub health: HealthScore,
	pub activity: ActivityOutput,
	pub contributors: ContributorInsights,
	pub languages: LanguageDiversity,
	pub commit_patterns: CommitPatterns,
	pub project: ProjectInsights,
	pub heatmap: CommitHeatmap,
	/// Simulated; absent when growth is disabled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub growth: Option<GrowthTrajectory>,
	pub radar: HealthRadar,
	/// Optional collections that could not be fetched and were treated as
	/// empty.
	pub warnings: Vec<String>,
}

/// Fetch every raw collection for `repo` and derive all metrics.
///
/// The repository record, contributors, and first commit page are required;
/// failing to get any of them fails the analysis. Every other collection
/// degrades to empty and adds an entry to `warnings`.
pub fn analyze_repository(
	gateway: &dyn Gateway,
	repo: &RepoId,
	options: &AnalysisOptions,
	now: DateTime<Utc>,
) -> Result<RepositoryAnalysis> {
	log::debug!("running analysis [repo='{}']", repo);

	let query = CommitQuery {
		limit: options.resolver.effective_page_size(),
		page: 1,
	};

	// All reads are independent; wait for every one before deriving anything.
	let (
		((snapshot, languages), (contributors, commits)),
		((issues, pull_requests), (releases, branches)),
	) = rayon::join(
		|| {
			rayon::join(
				|| rayon::join(|| gateway.repository(repo), || gateway.languages(repo)),
				|| rayon::join(|| gateway.contributors(repo), || gateway.commits(repo, query)),
			)
		},
		|| {
			rayon::join(
				|| {
					rayon::join(
						|| gateway.issues(repo, StateFilter::All),
						|| gateway.pull_requests(repo, StateFilter::All),
					)
				},
				|| rayon::join(|| gateway.releases(repo), || gateway.branches(repo)),
			)
		},
	);

	let snapshot = snapshot.map_err(|e| Error::missing("repository", e))?;
	let contributors = contributors.map_err(|e| Error::missing("contributors", e))?;
	let commits = commits.map_err(|e| Error::missing("commits", e))?;

	let mut warnings = Vec::new();
	let languages = or_empty(languages, "languages", &mut warnings);
	let issues = or_empty(issues, "issues", &mut warnings);
	let pull_requests = or_empty(pull_requests, "pull requests", &mut warnings);
	let releases = or_empty(releases, "releases", &mut warnings);
	let branches = or_empty(branches, "branches", &mut warnings);

	let resolver = Resolver::new(gateway, &options.resolver, now);
	let commit_count = resolver.resolve(repo, &commits, options.commit_total);

	let contributor_count = contributors.len();

	let health = health_score(&snapshot, contributor_count, now);
	let activity = activity_level(&snapshot, &commits, now);
	let contributors = contributor_insights(&contributors);
	let languages = language_diversity(&languages);
	let commit_patterns = commit_patterns(&commits, &commit_count, now);
	let project = project_insights(&issues, &pull_requests, &releases, &branches);
	let heatmap = commit_heatmap(&commits);

	let growth = options.growth.enabled.then(|| {
		let seed = options.growth.seed.unwrap_or_else(|| default_seed(repo));
		growth_trajectory(&snapshot, contributor_count, now, seed)
	});

	let radar = health_radar(
		&RadarSignals {
			repo: &snapshot,
			contributor_count,
			commits_last_30_days: commit_patterns.recent_30_days,
			pull_requests: &pull_requests,
			project: &project,
			language_count: languages.language_count,
		},
		now,
	);

	log::info!("completed analysis [repo='{}']", repo);

	Ok(RepositoryAnalysis {
		repository: repo.clone(),
		snapshot,
		analyzed_at: now,
		commit_count,
		health,
		activity,
		contributors,
		languages,
		commit_patterns,
		project,
		heatmap,
		growth,
		radar,
		warnings,
	})
}

/// Treat an unavailable optional collection as empty.
fn or_empty<T: Default>(
	result: anyhow::Result<T>,
	collection: &str,
	warnings: &mut Vec<String>,
) -> T {
	match result {
		Ok(value) => value,
		Err(error) => {
			log::warn!("treating {} as empty: {:#}", collection, error);
			warnings.push(format!("{collection} unavailable: {error}"));
			T::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		metric::WorkPattern,
		model::{Branch, ContributorTotal, LanguageBytes},
		resolver::CountMethod,
		test_util::*,
	};
	use test_log::test;

	fn healthy_gateway() -> MockGateway {
		let mut repo = snapshot();
		repo.stars = 120;
		repo.forks = 14;
		repo.license = Some("MIT".into());

		let mut gateway = MockGateway::new();
		gateway.repository = Some(repo);
		gateway.languages = Some([("JavaScript".to_string(), 9_000u64)].into_iter().collect());
		gateway.contributors = Some(vec![contributor("alice", 40), contributor("bob", 12)]);
		gateway.commits = Some(commits(30));
		gateway.issues = Some(Vec::new());
		gateway.pull_requests = Some(Vec::new());
		gateway.releases = Some(Vec::new());
		gateway.branches = Some(vec![Branch {
			name: "main".into(),
			protected: true,
		}]);
		gateway
	}

	#[test]
	fn complete_analysis() {
		let gateway = healthy_gateway();
		let analysis =
			analyze_repository(&gateway, &repo_id(), &AnalysisOptions::default(), now()).unwrap();

		assert_eq!(analysis.analyzed_at, now());
		assert_eq!(analysis.commit_count, ResolvedCommitCount::provided(30));
		assert_eq!(analysis.commit_patterns.total, 30);
		assert_eq!(analysis.contributors.total_contributors, 2);
		assert_eq!(analysis.languages.primary_language.as_deref(), Some("JavaScript"));
		assert_eq!(analysis.project.branch_count, 1);
		assert!(analysis.warnings.is_empty());
		assert!(analysis.growth.as_ref().unwrap().simulated);

		// A short sample never reaches the count strategies.
		assert!(!gateway.calls().contains(&"contributor_stats_totals"));
	}

	#[test]
	fn empty_repository_still_analyzes() {
		let mut gateway = healthy_gateway();
		gateway.commits = Some(Vec::new());
		gateway.contributors = Some(Vec::new());
		gateway.languages = Some(LanguageBytes::new());
		gateway.branches = Some(Vec::new());

		let analysis =
			analyze_repository(&gateway, &repo_id(), &AnalysisOptions::default(), now()).unwrap();

		assert_eq!(analysis.commit_count, ResolvedCommitCount::provided(0));
		assert_eq!(analysis.commit_patterns.total, 0);
		assert_eq!(analysis.commit_patterns.unique_authors, 0);
		assert_eq!(analysis.contributors.total_contributors, 0);
		assert_eq!(analysis.heatmap.total, 0);
		assert_eq!(analysis.heatmap.pattern, WorkPattern::NotAvailable);
		assert_eq!(analysis.project.resolution_rate, 0);
		assert!(analysis.warnings.is_empty());
		assert!(!gateway.calls().contains(&"commits_page_meta"));
	}

	#[test]
	fn oversized_page_size_is_clamped() {
		let gateway = healthy_gateway();
		let options = AnalysisOptions {
			resolver: ResolverConfig {
				page_size: 500,
				..ResolverConfig::default()
			},
			..AnalysisOptions::default()
		};

		analyze_repository(&gateway, &repo_id(), &options, now()).unwrap();

		assert_eq!(gateway.queries(), vec![CommitQuery { limit: 100, page: 1 }]);
	}

	#[test]
	fn missing_required_collection_fails() {
		let mut gateway = healthy_gateway();
		gateway.commits = None;

		let error =
			analyze_repository(&gateway, &repo_id(), &AnalysisOptions::default(), now()).unwrap_err();

		assert!(matches!(
			error,
			Error::MissingData {
				collection: "commits",
				..
			}
		));
	}

	#[test]
	fn optional_collections_degrade_with_warnings() {
		let mut gateway = healthy_gateway();
		gateway.languages = None;
		gateway.releases = None;

		let analysis =
			analyze_repository(&gateway, &repo_id(), &AnalysisOptions::default(), now()).unwrap();

		assert_eq!(analysis.warnings.len(), 2);
		assert!(analysis.warnings[0].starts_with("languages unavailable"));
		assert!(analysis.warnings[1].starts_with("releases unavailable"));
		assert_eq!(analysis.languages.language_count, 0);
		assert_eq!(analysis.project.release_count, 0);
	}

	#[test]
	fn full_page_is_resolved() {
		let mut gateway = healthy_gateway();
		gateway.commits = Some(commits(100));
		gateway.stats = Some(Some(vec![
			ContributorTotal {
				login: "alice".into(),
				total: 400,
			},
			ContributorTotal {
				login: "bob".into(),
				total: 52,
			},
		]));

		let analysis =
			analyze_repository(&gateway, &repo_id(), &AnalysisOptions::default(), now()).unwrap();

		assert_eq!(analysis.commit_count.total, 452);
		assert_eq!(analysis.commit_count.method, CountMethod::Stats);
		assert!(analysis.commit_count.is_approximate);
		assert_eq!(analysis.commit_patterns.total, 452);
	}

	#[test]
	fn provided_total_skips_resolution() {
		let mut gateway = healthy_gateway();
		gateway.commits = Some(commits(100));

		let options = AnalysisOptions {
			commit_total: Some(5_000),
			..AnalysisOptions::default()
		};
		let analysis = analyze_repository(&gateway, &repo_id(), &options, now()).unwrap();

		assert_eq!(analysis.commit_count, ResolvedCommitCount::provided(5_000));
		assert!(!gateway.calls().contains(&"contributor_stats_totals"));
		assert!(!gateway.calls().contains(&"commits_page_meta"));
	}

	#[test]
	fn growth_can_be_disabled_or_seeded() {
		let gateway = healthy_gateway();

		let disabled = AnalysisOptions {
			growth: GrowthOptions {
				enabled: false,
				seed: None,
			},
			..AnalysisOptions::default()
		};
		let analysis = analyze_repository(&gateway, &repo_id(), &disabled, now()).unwrap();
		assert_eq!(analysis.growth, None);

		let seeded = AnalysisOptions {
			growth: GrowthOptions {
				enabled: true,
				seed: Some(11),
			},
			..AnalysisOptions::default()
		};
		let first = analyze_repository(&gateway, &repo_id(), &seeded, now()).unwrap();
		let second = analyze_repository(&gateway, &repo_id(), &seeded, now()).unwrap();
		assert_eq!(first.growth.as_ref().unwrap().seed, 11);
		assert_eq!(first, second);
	}
}
