// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

/// Seconds in one day, for fractional day arithmetic.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Calculate the arithmetic mean for a set of floats. Returns an option to account
/// for the possibility of dividing by zero.
pub fn mean(data: &[f64]) -> Option<f64> {
	let sum = data.iter().sum::<f64>();
	let count = data.len();

	match count {
		positive if positive > 0 => Some(sum / count as f64),
		_ => None,
	}
}

/// `part` as a whole percentage of `whole`, or 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> u8 {
	if whole == 0 {
		return 0;
	}

	((part as f64 / whole as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Percentage change from `from` to `to`, or 0 when `from` is 0.
pub fn percent_change(from: u64, to: u64) -> f64 {
	if from == 0 {
		return 0.0;
	}

	(to as f64 - from as f64) / from as f64 * 100.0
}

/// Fractional days elapsed from `then` until `now`, never negative.
pub fn days_since(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
	((now - then).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0)
}

/// `per_decade` points for every factor of ten in `count`, capped.
pub fn log_scaled(count: u64, per_decade: f64, cap: f64) -> f64 {
	((count as f64 + 1.0).log10() * per_decade).min(cap)
}

/// Clamp a score into `[0, 100]` and round it.
pub fn clamp_score(value: f64) -> u8 {
	value.round().clamp(0.0, 100.0) as u8
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
	(value * 10.0).round() / 10.0
}
