// ---------------------------------------------------------------------------
// Similarity Engine — rank candidate items against a query vector
// ---------------------------------------------------------------------------
//
// Per candidate: cosine similarity between unit vectors, plus a keyword
// overlap boost, minus a bounded intensity-preference penalty; the clamped
// sum is rescaled from [-1,1] onto a user-facing percentage. Ordering is
// fully deterministic: score, then raw cosine, then item id. A malformed
// candidate vector is skipped and reported, never fatal to the pass.
// ---------------------------------------------------------------------------

use crate::cosine::{is_finite_vector, unit_cosine};
use crate::error::EngineError;
use crate::explain::{build_explanation, ExplainOptions};
use crate::intent::InterpretedQuery;
use crate::lexicon::EmotionLexicon;
use crate::types::{IntensityPreference, ItemProfile, RankedResult, RankingOutcome, SkippedItem};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the ranking pass.
#[derive(Debug, Clone)]
pub struct RankingOptions {
	/// Scale of the keyword-overlap boost added to the cosine.
	pub keyword_boost_weight: f64,
	/// Upper bound on the intensity-mismatch penalty.
	pub intensity_penalty_max: f64,
}

impl Default for RankingOptions {
	fn default() -> Self {
		Self {
			keyword_boost_weight: 0.15,
			intensity_penalty_max: 0.1,
		}
	}
}

/// Where each preference band sits on the [0,1] peak-intensity axis.
fn intensity_target(preference: IntensityPreference) -> f64 {
	match preference {
		IntensityPreference::Low => 0.3,
		IntensityPreference::Moderate => 0.6,
		IntensityPreference::High => 0.9,
	}
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

struct Scored<'a> {
	item: &'a ItemProfile,
	cosine: f64,
	score: u8,
}

/// Rank candidates against an interpreted query, truncating to `limit`.
///
/// The candidate set arrives already filtered by any external criteria;
/// this pass only scores and orders it.
pub fn rank(
	query: &InterpretedQuery,
	candidates: &[&ItemProfile],
	lexicon: &EmotionLexicon,
	options: &RankingOptions,
	explain: &ExplainOptions,
	limit: usize,
) -> Result<RankingOutcome, EngineError> {
	if limit == 0 {
		return Err(EngineError::InvalidLimit);
	}
	if !is_finite_vector(&query.vector) {
		return Err(EngineError::MalformedVector(
			"query vector has non-finite components".to_string(),
		));
	}

	let keywords: Vec<String> = query.keywords.iter().map(|k| k.to_lowercase()).collect();
	let target = intensity_target(query.intensity);

	let mut scored: Vec<Scored> = Vec::with_capacity(candidates.len());
	let mut skipped: Vec<SkippedItem> = Vec::new();

	for &item in candidates {
		if !is_finite_vector(&item.composite) {
			tracing::warn!("Skipping item '{}': non-finite composite vector", item.id);
			skipped.push(SkippedItem {
				item_id: item.id.clone(),
				reason: "non-finite composite vector".to_string(),
			});
			continue;
		}

		let cosine = unit_cosine(&query.vector, &item.composite);

		let keyword_boost = if keywords.is_empty() {
			0.0
		} else {
			let overlap = keywords
				.iter()
				.filter(|k| item.keywords.iter().any(|ik| ik.eq_ignore_ascii_case(k.as_str())))
				.count();
			(overlap as f64 / keywords.len() as f64) * options.keyword_boost_weight
		};

		let intensity_penalty = options.intensity_penalty_max * (item.peak_intensity - target).abs();

		let raw = (cosine + keyword_boost - intensity_penalty).clamp(-1.0, 1.0);
		let score = (((raw + 1.0) / 2.0) * 100.0).round() as u8;

		scored.push(Scored {
			item,
			cosine,
			score,
		});
	}

	scored.sort_by(|a, b| {
		b.score
			.cmp(&a.score)
			.then_with(|| {
				b.cosine
					.partial_cmp(&a.cosine)
					.unwrap_or(std::cmp::Ordering::Equal)
			})
			.then_with(|| a.item.id.cmp(&b.item.id))
	});
	scored.truncate(limit);

	let results = scored
		.into_iter()
		.map(|s| {
			let (matched, explanation) =
				build_explanation(lexicon, &query.vector, s.item, s.score, explain);
			RankedResult {
				item_id: s.item.id.clone(),
				score: s.score,
				cosine: s.cosine,
				matched,
				explanation,
			}
		})
		.collect();

	Ok(RankingOutcome { results, skipped })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
