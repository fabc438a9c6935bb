// SPDX-License-Identifier: Apache-2.0

//! Derived metrics.
//!
//! Every function here is pure: it reads raw records plus an explicit `now`
//! and never fails. Empty collections and zero denominators resolve to
//! defined defaults.

pub mod activity;
pub mod commits;
pub mod contributors;
pub mod growth;
pub mod health;
pub mod heatmap;
pub mod languages;
mod math;
pub mod project;
pub mod radar;

pub use activity::{activity_level, ActivityLevel, ActivityOutput};
pub use commits::{commit_patterns, CommitPatterns, CommitVelocity};
pub use contributors::{contributor_insights, ContributorInsights, ContributorShare};
pub use growth::{default_seed, growth_trajectory, GrowthPhase, GrowthTrajectory};
pub use health::{health_score, HealthLevel, HealthScore};
pub use heatmap::{commit_heatmap, CommitHeatmap, WorkPattern};
pub use languages::{language_diversity, LanguageDiversity};
pub use project::{project_insights, ProjectInsights};
pub use radar::{health_radar, HealthRadar, RadarSignals};
