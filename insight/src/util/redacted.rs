// SPDX-License-Identifier: Apache-2.0

//! Keeps credentials out of debug output and logs.

use std::fmt::{self, Debug, Display, Formatter};

const REDACTED: &str = "<redacted>";

/// A value that never prints itself.
///
/// The wrapped value is only reachable through [`Redacted::expose`], which
/// makes every place that reads a secret easy to find.
#[derive(Clone, PartialEq, Eq)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
	pub fn new(val: T) -> Redacted<T> {
		Redacted(val)
	}

	pub fn expose(&self) -> &T {
		&self.0
	}
}

impl<T> Debug for Redacted<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> Display for Redacted<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}
