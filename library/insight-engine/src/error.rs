// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced to callers of the engine.
//!
//! Only input problems end an analysis. Upstream failures met while
//! resolving the commit count are absorbed by the resolver and never show
//! up here, and degenerate metric inputs resolve to defaults.

use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

/// A boxed, thread-safe source error.
type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The repository reference could not be understood.
	#[error("invalid repository reference '{input}': {reason}")]
	InvalidRepository { input: String, reason: &'static str },

	/// A collection the analysis cannot run without was unavailable.
	#[error("failed to get {collection} for analysis")]
	MissingData {
		collection: &'static str,
		#[source]
		source: BoxError,
	},
}

impl Error {
	pub(crate) fn invalid_repository(input: impl Into<String>, reason: &'static str) -> Error {
		Error::InvalidRepository {
			input: input.into(),
			reason,
		}
	}

	pub(crate) fn missing(collection: &'static str, source: anyhow::Error) -> Error {
		Error::MissingData {
			collection,
			source: source.into(),
		}
	}
}
