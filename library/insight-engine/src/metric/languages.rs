// SPDX-License-Identifier: Apache-2.0

use crate::{metric::math::percent, model::LanguageBytes};
use schemars::JsonSchema;
use serde::Serialize;

/// How many languages appear in the breakdown.
const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LanguageShare {
	pub language: String,
	pub bytes: u64,
	pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LanguageDiversity {
	pub language_count: usize,
	/// The largest languages by byte count, largest first.
	pub breakdown: Vec<LanguageShare>,
	pub primary_language: Option<String>,
	pub primary_percentage: u8,
	pub is_diverse: bool,
	pub complexity_score: u8,
}

pub fn language_diversity(languages: &LanguageBytes) -> LanguageDiversity {
	log::debug!("running language diversity");

	let total: u64 = languages.values().sum();

	let mut ranked: Vec<(&String, &u64)> = languages.iter().collect();
	// Ties keep the map's alphabetical order.
	ranked.sort_by(|a, b| b.1.cmp(a.1));

	let breakdown: Vec<LanguageShare> = ranked
		.iter()
		.take(TOP_LANGUAGES)
		.map(|(language, bytes)| LanguageShare {
			language: (*language).clone(),
			bytes: **bytes,
			percentage: percent(**bytes, total),
		})
		.collect();

	let language_count = languages.len();
	let primary_language = breakdown.first().map(|share| share.language.clone());
	let primary_percentage = breakdown.first().map_or(0, |share| share.percentage);

	let is_diverse = language_count > 3 && primary_percentage < 70;
	let bonus = if language_count > 5 { 25 } else { 0 };
	let complexity_score = (language_count * 15 + bonus).min(100) as u8;

	log::info!("completed language diversity");

	LanguageDiversity {
		language_count,
		breakdown,
		primary_language,
		primary_percentage,
		is_diverse,
		complexity_score,
	}
}
