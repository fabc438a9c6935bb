// SPDX-License-Identifier: Apache-2.0

//! Derives health, activity, and growth insights for a repository.
//!
//! Raw data comes from a [`Gateway`]. Because the upstream commit list is
//! paginated, the [`Resolver`] establishes how many commits a repository
//! really has before any commit-dependent metric is computed.
//! [`analyze_repository`] runs the whole pipeline.

pub mod analysis;
pub mod error;
pub mod gateway;
pub mod metric;
pub mod model;
pub mod repo_id;
pub mod resolver;
#[cfg(test)]
mod test_util;

pub use analysis::{analyze_repository, AnalysisOptions, GrowthOptions, RepositoryAnalysis};
pub use error::{Error, Result};
pub use gateway::{CommitQuery, Gateway, StateFilter};
pub use repo_id::RepoId;
pub use resolver::{
	Confidence, CountMethod, CountStrategy, ResolvedCommitCount, Resolver, ResolverConfig,
};
