// SPDX-License-Identifier: Apache-2.0

//! Printing an analysis for people or for other programs.

use crate::cli::Format;
use anyhow::{Context as _, Result};
use console::{Style, Term};
use insight_engine::{
	metric::{
		heatmap::DAY_NAMES, ActivityLevel, CommitVelocity, GrowthPhase, GrowthTrajectory,
		HealthLevel,
	},
	Confidence, RepositoryAnalysis,
};
use std::{
	fmt::{self, Alignment, Display, Formatter},
	io::{self, Write},
};

/// The width of the left column when printing errors/reports/etc.
pub const LEFT_COL_WIDTH: usize = 20;

/// Empty static string used for drawing padding.
const EMPTY: &str = "";

/// How many contributors to name in the human report.
const NAMED_CONTRIBUTORS: usize = 3;

/// Print the report in the requested format to the standard output.
pub fn print_report(analysis: &RepositoryAnalysis, format: Format) -> Result<()> {
	let mut stdout = Term::stdout();

	match format {
		Format::Json => write_json(&mut stdout, analysis)?,
		Format::Human => write_human(&mut stdout, analysis).context("failed to print report")?,
	}

	stdout.flush()?;
	Ok(())
}

/// Print an error and its causes to standard error.
pub fn print_error(error: &anyhow::Error) {
	let mut stderr = Term::stderr();
	let _ = writeln!(stderr, "{:>LEFT_COL_WIDTH$} {}", Title::Error, error);

	for cause in error.chain().skip(1) {
		let _ = writeln!(stderr, "{EMPTY:LEFT_COL_WIDTH$} caused by: {}", cause);
	}
}

pub fn write_json<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> Result<()> {
	serde_json::to_writer_pretty(&mut *out, analysis)?;
	writeln!(out)?;
	Ok(())
}

pub fn write_human<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> io::Result<()> {
	//            Analyzed expressjs/express
	//                     at 2024-06-18 12:00 UTC
	//
	//              Health 72/100 Excellent
	//            Activity Very Active
	//                     updated 0.3 days ago, 5 commits in the last 7 days
	//             Commits 5800 (approximate, via pagination, medium confidence)
	//                     ...

	let snapshot = &analysis.snapshot;

	writeln!(out)?;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}",
		Title::Section("Analyzed"),
		analysis.repository
	)?;
	if let Some(description) = &snapshot.description {
		writeln!(out, "{EMPTY:LEFT_COL_WIDTH$} {}", description)?;
	}
	writeln!(
		out,
		"{EMPTY:LEFT_COL_WIDTH$} at {}",
		analysis.analyzed_at.format("%Y-%m-%d %H:%M UTC")
	)?;
	writeln!(out)?;

	/*===============================================================================
	 * Overall health
	 */

	let health = &analysis.health;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}/100 {}",
		Title::Section("Health"),
		health.score,
		level_style(health.level).apply_to(health.level.label())
	)?;

	let activity = &analysis.activity;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}",
		Title::Section("Activity"),
		activity_style(activity.level).apply_to(activity.level.label())
	)?;
	writeln!(
		out,
		"{EMPTY:LEFT_COL_WIDTH$} updated {:.1} days ago, {} commits in the last 7 days",
		activity.days_since_update, activity.commits_last_7_days
	)?;

	/*===============================================================================
	 * Commits
	 */

	let count = &analysis.commit_count;
	let patterns = &analysis.commit_patterns;
	let precision = if count.is_approximate {
		"approximate"
	} else {
		"exact"
	};
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}{} ({}, via {}, {} confidence)",
		Title::Section("Commits"),
		count.total,
		if count.has_more { "+" } else { "" },
		precision,
		count.method,
		confidence_label(count.confidence)
	)?;
	writeln!(
		out,
		"{EMPTY:LEFT_COL_WIDTH$} {} in the last 30 days, ~{} per week, {} authors, {} velocity",
		patterns.recent_30_days,
		patterns.weekly_frequency,
		patterns.unique_authors,
		velocity_label(patterns.velocity)
	)?;

	let heatmap = &analysis.heatmap;
	match &heatmap.peak {
		Some(peak) => {
			writeln!(
				out,
				"{:>LEFT_COL_WIDTH$} peak {} {:02}:00 ({} commits), {}",
				Title::Section("Schedule"),
				DAY_NAMES[peak.weekday],
				peak.hour,
				peak.count,
				heatmap.pattern.label()
			)?;
			writeln!(
				out,
				"{EMPTY:LEFT_COL_WIDTH$} {}% on weekends, {}% during business hours",
				heatmap.weekend_share, heatmap.business_hours_share
			)?;
			if heatmap.undated > 0 {
				writeln!(
					out,
					"{EMPTY:LEFT_COL_WIDTH$} {} commits without a date left out",
					heatmap.undated
				)?;
			}
		}
		None => writeln!(
			out,
			"{:>LEFT_COL_WIDTH$} no dated commits",
			Title::Section("Schedule")
		)?,
	}
	writeln!(out)?;

	/*===============================================================================
	 * People and code
	 */

	let contributors = &analysis.contributors;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {} total, {} core, diversity {}, collaboration {}",
		Title::Section("Contributors"),
		contributors.total_contributors,
		contributors.core_contributors.len(),
		contributors.diversity_score,
		contributors.collaboration_score
	)?;
	if !contributors.top_contributors.is_empty() {
		let named: Vec<String> = contributors
			.top_contributors
			.iter()
			.take(NAMED_CONTRIBUTORS)
			.map(|c| format!("{} ({:.1}%)", c.login, c.percentage))
			.collect();
		writeln!(out, "{EMPTY:LEFT_COL_WIDTH$} top: {}", named.join(", "))?;
	}

	let languages = &analysis.languages;
	if languages.breakdown.is_empty() {
		writeln!(out, "{:>LEFT_COL_WIDTH$} none detected", Title::Section("Languages"))?;
	} else {
		let shares: Vec<String> = languages
			.breakdown
			.iter()
			.map(|share| format!("{} {}%", share.language, share.percentage))
			.collect();
		writeln!(
			out,
			"{:>LEFT_COL_WIDTH$} {}",
			Title::Section("Languages"),
			shares.join(", ")
		)?;
		writeln!(
			out,
			"{EMPTY:LEFT_COL_WIDTH$} {} languages, complexity {}{}",
			languages.language_count,
			languages.complexity_score,
			if languages.is_diverse { ", diverse" } else { "" }
		)?;
	}
	writeln!(out)?;

	/*===============================================================================
	 * Project management
	 */

	let project = &analysis.project;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {} ({} open, {} closed), {}% resolved",
		Title::Section("Issues"),
		project.issues.total,
		project.issues.open,
		project.issues.closed,
		project.resolution_rate
	)?;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {} ({} open, {} merged, {} closed), {}% merged",
		Title::Section("Pull Requests"),
		project.pull_requests.total,
		project.pull_requests.open,
		project.pull_requests.merged,
		project.pull_requests.closed,
		project.merge_rate
	)?;
	match &project.latest_release {
		Some(latest) => writeln!(
			out,
			"{:>LEFT_COL_WIDTH$} {}, latest {}",
			Title::Section("Releases"),
			project.release_count,
			latest.tag_name
		)?,
		None => writeln!(out, "{:>LEFT_COL_WIDTH$} none", Title::Section("Releases"))?,
	}
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}",
		Title::Section("Branches"),
		project.branch_count
	)?;
	writeln!(out)?;

	/*===============================================================================
	 * Radar and growth
	 */

	let radar = &analysis.radar;
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {} overall",
		Title::Section("Radar"),
		radar.overall
	)?;
	let dimensions: Vec<String> = radar
		.dimensions()
		.iter()
		.map(|(name, score)| format!("{name} {score}"))
		.collect();
	writeln!(out, "{EMPTY:LEFT_COL_WIDTH$} {}", dimensions.join(", "))?;

	if let Some(growth) = &analysis.growth {
		write_growth(out, growth)?;
	}
	writeln!(out)?;

	/*===============================================================================
	 * Warnings
	 */

	for warning in &analysis.warnings {
		writeln!(out, "{:>LEFT_COL_WIDTH$} {}", Title::Warning, warning)?;
	}
	if !analysis.warnings.is_empty() {
		writeln!(out)?;
	}

	Ok(())
}

fn write_growth<W: Write>(out: &mut W, growth: &GrowthTrajectory) -> io::Result<()> {
	writeln!(
		out,
		"{:>LEFT_COL_WIDTH$} {}, {:+.1}% stars per month {}",
		Title::Section("Growth"),
		phase_label(growth.phase),
		growth.average_monthly_change,
		Style::new().dim().apply_to("(simulated)")
	)?;
	writeln!(
		out,
		"{EMPTY:LEFT_COL_WIDTH$} {:+.1}% month over month, {:+.1}% quarter over quarter",
		growth.month_over_month.stars, growth.quarter_over_quarter.stars
	)
}

fn confidence_label(confidence: Confidence) -> &'static str {
	match confidence {
		Confidence::High => "high",
		Confidence::Medium => "medium",
	}
}

fn velocity_label(velocity: CommitVelocity) -> &'static str {
	match velocity {
		CommitVelocity::High => "high",
		CommitVelocity::Medium => "medium",
		CommitVelocity::Low => "low",
	}
}

fn phase_label(phase: GrowthPhase) -> &'static str {
	match phase {
		GrowthPhase::Explosive => "Explosive",
		GrowthPhase::Rapid => "Rapid",
		GrowthPhase::Steady => "Steady",
		GrowthPhase::Slow => "Slow",
		GrowthPhase::Stagnant => "Stagnant",
	}
}

fn level_style(level: HealthLevel) -> Style {
	use console::Color::*;

	let color = match level {
		HealthLevel::Exceptional | HealthLevel::Excellent => Green,
		HealthLevel::Good => Cyan,
		HealthLevel::Fair => Yellow,
		HealthLevel::NeedsAttention => Red,
	};

	Style::new().fg(color).bold()
}

fn activity_style(level: ActivityLevel) -> Style {
	use console::Color::*;

	let color = match level {
		ActivityLevel::ExtremelyActive | ActivityLevel::VeryActive => Green,
		ActivityLevel::Active => Cyan,
		ActivityLevel::Moderate => Yellow,
		ActivityLevel::Inactive => Red,
	};

	Style::new().fg(color)
}

/// The "title" of a line in the left column.
#[derive(Debug)]
enum Title {
	/// The name of the section.
	Section(&'static str),
	/// "Warning"
	Warning,
	/// "Error"
	Error,
}

impl Title {
	const fn text(&self) -> &str {
		match self {
			Title::Section(s) => s,
			Title::Warning => "Warning",
			Title::Error => "Error",
		}
	}

	fn style(&self) -> Style {
		use console::Color::*;

		let color = match self {
			Title::Section(..) => Blue,
			Title::Warning => Yellow,
			Title::Error => Red,
		};

		Style::new().fg(color).bold()
	}
}

impl Display for Title {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match f.width() {
			// No width designation -- just write the styled string itself.
			None => write!(f, "{}", self.style().apply_to(self.text())),

			// Width/alignment/padding handled here.
			Some(width) => {
				let styled: String = self.style().apply_to(self.text()).to_string();

				let align = f
					.align()
					.map(convert_alignment)
					.unwrap_or(console::Alignment::Left);

				let padded = console::pad_str(&styled, width, align, None);
				f.write_str(&padded)
			}
		}
	}
}

const fn convert_alignment(align: Alignment) -> console::Alignment {
	match align {
		Alignment::Left => console::Alignment::Left,
		Alignment::Right => console::Alignment::Right,
		Alignment::Center => console::Alignment::Center,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;
	use chrono::{DateTime, Duration, TimeZone, Utc};
	use insight_engine::{
		analyze_repository,
		model::{
			Branch, CommitPage, CommitRecord, Contributor, ContributorTotal, Issue, LanguageBytes,
			PullRequest, Release, RepositorySnapshot,
		},
		AnalysisOptions, CommitQuery, Gateway, RepoId, StateFilter,
	};

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 6, 18, 12, 0, 0).unwrap()
	}

	/// A small repository where everything but branches is available.
	struct Tiny;

	impl Gateway for Tiny {
		fn repository(&self, _repo: &RepoId) -> anyhow::Result<RepositorySnapshot> {
			Ok(RepositorySnapshot {
				owner: "octo".into(),
				name: "tiny".into(),
				description: Some("A tiny test repository".into()),
				stars: 3,
				forks: 1,
				watchers: 2,
				open_issues: 0,
				has_wiki: false,
				has_pages: false,
				has_discussions: false,
				has_projects: false,
				allow_forking: true,
				private: false,
				archived: false,
				created_at: now() - Duration::days(400),
				updated_at: now() - Duration::days(1),
				pushed_at: None,
				license: None,
				homepage: None,
				topics: Vec::new(),
				size_kb: 12,
				language: Some("Rust".into()),
				default_branch: "main".into(),
			})
		}

		fn languages(&self, _repo: &RepoId) -> anyhow::Result<LanguageBytes> {
			Ok([("Rust".to_string(), 4_000)].into_iter().collect())
		}

		fn contributors(&self, _repo: &RepoId) -> anyhow::Result<Vec<Contributor>> {
			Ok(vec![Contributor {
				login: "octocat".into(),
				avatar_url: None,
				html_url: None,
				contributions: 5,
			}])
		}

		fn commits(&self, _repo: &RepoId, _query: CommitQuery) -> anyhow::Result<Vec<CommitRecord>> {
			Ok((0..5)
				.map(|i| CommitRecord {
					sha: format!("{i}"),
					author_name: Some("Octo".into()),
					author_email: Some("octo@example.com".into()),
					committer_email: None,
					authored_at: Some(Utc.with_ymd_and_hms(2024, 6, 11, 14, i, 0).unwrap()),
					committed_at: None,
					message: "work".into(),
				})
				.collect())
		}

		fn issues(&self, _repo: &RepoId, _state: StateFilter) -> anyhow::Result<Vec<Issue>> {
			Ok(Vec::new())
		}

		fn pull_requests(
			&self,
			_repo: &RepoId,
			_state: StateFilter,
		) -> anyhow::Result<Vec<PullRequest>> {
			Ok(Vec::new())
		}

		fn releases(&self, _repo: &RepoId) -> anyhow::Result<Vec<Release>> {
			Ok(Vec::new())
		}

		fn branches(&self, _repo: &RepoId) -> anyhow::Result<Vec<Branch>> {
			Err(anyhow!("HTTP 403 Forbidden"))
		}

		fn contributor_stats_totals(
			&self,
			_repo: &RepoId,
		) -> anyhow::Result<Option<Vec<ContributorTotal>>> {
			Ok(None)
		}

		fn commits_page_meta(
			&self,
			_repo: &RepoId,
			_page: u64,
			_page_size: usize,
		) -> anyhow::Result<CommitPage> {
			Ok(CommitPage::default())
		}
	}

	fn analysis() -> RepositoryAnalysis {
		let repo = RepoId::new("octo", "tiny");
		analyze_repository(&Tiny, &repo, &AnalysisOptions::default(), now()).unwrap()
	}

	#[test]
	fn human_report_lines() {
		let mut out = Vec::new();
		write_human(&mut out, &analysis()).unwrap();
		let text = console::strip_ansi_codes(std::str::from_utf8(&out).unwrap()).to_string();

		assert!(text.contains("Analyzed octo/tiny"));
		assert!(text.contains("at 2024-06-18 12:00 UTC"));
		assert!(text.contains("Commits 5 (exact, via provided, medium confidence)"));
		assert!(text.contains("peak Tuesday 14:00 (5 commits), Standard Business Hours"));
		assert!(text.contains("top: octocat (100.0%)"));
		assert!(text.contains("Languages Rust 100%"));
		assert!(text.contains("(simulated)"));
		assert!(text.contains("Warning branches unavailable"));
	}

	#[test]
	fn titles_are_right_aligned() {
		let mut out = Vec::new();
		write_human(&mut out, &analysis()).unwrap();
		let text = console::strip_ansi_codes(std::str::from_utf8(&out).unwrap()).to_string();

		let health = text
			.lines()
			.find(|line| line.trim_start().starts_with("Health"))
			.unwrap();
		assert_eq!(health.find("Health"), Some(LEFT_COL_WIDTH - "Health".len()));
	}

	#[test]
	fn json_report() {
		let mut out = Vec::new();
		write_json(&mut out, &analysis()).unwrap();
		let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

		assert_eq!(value["repository"]["name"], "tiny");
		assert_eq!(value["commit_count"]["method"], "provided");
		assert_eq!(value["heatmap"]["pattern"], "Standard Business Hours");
		assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
	}
}
