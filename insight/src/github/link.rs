// SPDX-License-Identifier: Apache-2.0

//! Reading pagination out of a `Link` response header.
//!
//! GitHub sends headers like:
//!
//! ```text
//! <https://api.github.com/repositories/1/commits?per_page=100&page=2>; rel="next",
//! <https://api.github.com/repositories/1/commits?per_page=100&page=4>; rel="last"
//! ```

use url::Url;

/// The page number of the `rel="last"` link, if there is one.
pub fn last_page(header: &str) -> Option<u64> {
	header.split(',').find_map(|link| {
		let (target, params) = link.split_once(';')?;

		let is_last = params
			.split(';')
			.map(str::trim)
			.any(|param| param == r#"rel="last""#);

		if !is_last {
			return None;
		}

		let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;

		Url::parse(target)
			.ok()?
			.query_pairs()
			.find(|(key, _)| key == "page")
			.and_then(|(_, value)| value.parse().ok())
	})
}
