// ---------------------------------------------------------------------------
// Explanation Builder — why an item matched a query
// ---------------------------------------------------------------------------
//
// Selects the dimensions where both the query and the item carry weight,
// ranked by the product of the two weights (co-importance), and renders a
// short templated justification. Pure function, no side effects.
// ---------------------------------------------------------------------------

use crate::lexicon::EmotionLexicon;
use crate::types::{ItemProfile, MatchedEmotion};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for explanation rendering.
#[derive(Debug, Clone)]
pub struct ExplainOptions {
	/// How many shared dimensions to surface.
	pub top_k: usize,
}

impl Default for ExplainOptions {
	fn default() -> Self {
		Self { top_k: 3 }
	}
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Derive the matched dimensions and a one-line justification for a result.
///
/// `score` is the final user-facing percentage the similarity engine
/// computed for this item.
pub fn build_explanation(
	lexicon: &EmotionLexicon,
	query: &[f32],
	item: &ItemProfile,
	score: u8,
	options: &ExplainOptions,
) -> (Vec<MatchedEmotion>, String) {
	let len = query.len().min(item.composite.len());
	let mut shared: Vec<(usize, f64)> = Vec::new();
	for i in 0..len {
		let qw = query[i] as f64;
		let iw = item.composite[i] as f64;
		if qw > 0.0 && iw > 0.0 {
			shared.push((i, qw * iw));
		}
	}

	// Co-importance descending; dimension index breaks ties for determinism.
	shared.sort_by(|a, b| {
		b.1.partial_cmp(&a.1)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.0.cmp(&b.0))
	});
	shared.truncate(options.top_k);

	let matched: Vec<MatchedEmotion> = shared
		.iter()
		.filter_map(|&(i, _)| {
			let emotion = lexicon.label_at(i)?.to_string();
			let item_weight = item.composite[i] as f64;
			// Arc-only dimensions have no recorded 0-10 intensity; fall back
			// to the composite weight scaled onto the same scale.
			let intensity = item
				.intensities
				.get(&emotion)
				.copied()
				.unwrap_or((item_weight * 10.0 * 10.0).round() / 10.0);
			Some(MatchedEmotion {
				emotion,
				intensity,
				query_weight: query[i] as f64,
				item_weight,
			})
		})
		.collect();

	let explanation = if matched.is_empty() {
		format!("No single shared emotion stands out; {}% overall alignment.", score)
	} else {
		let names: Vec<&str> = matched.iter().map(|m| m.emotion.as_str()).collect();
		format!(
			"Evokes the {} you're looking for, a {}% match.",
			names.join(", "),
			score
		)
	};

	(matched, explanation)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::aggregate::{build_item_profile, SourceWeights};
	use crate::encoder::EncoderOptions;
	use crate::lexicon::LexiconMode;
	use crate::types::{EmotionSignal, SourceKind, SourceProfile};

	fn item(lexicon: &mut EmotionLexicon, id: &str, signals: &[(&str, f64)]) -> ItemProfile {
		let source = SourceProfile {
			kind: SourceKind::Reviews,
			signals: signals
				.iter()
				.map(|&(e, i)| EmotionSignal {
					emotion: e.to_string(),
					intensity: i,
				})
				.collect(),
			arc: None,
			keywords: Vec::new(),
		};
		build_item_profile(
			lexicon,
			id.to_string(),
			vec![source],
			&SourceWeights::default(),
			&EncoderOptions::default(),
		)
		.unwrap()
	}

	fn unit_query(lexicon: &mut EmotionLexicon, labels: &[(&str, f32)]) -> Vec<f32> {
		let mut v = vec![0.0f32; lexicon.size()];
		for &(label, weight) in labels {
			v[lexicon.lookup(label).unwrap()] = weight;
		}
		crate::cosine::normalize_in_place(&mut v);
		v
	}

	#[test]
	fn matched_dimensions_are_ranked_by_co_importance() {
		let mut lexicon = EmotionLexicon::new(LexiconMode::Open);
		let item = item(
			&mut lexicon,
			"a",
			&[("joy", 9.0), ("wonder", 6.0), ("tension", 3.0)],
		);
		let query = unit_query(&mut lexicon, &[("joy", 0.8), ("wonder", 0.6), ("tension", 0.1)]);
		let (matched, _) =
			build_explanation(&lexicon, &query, &item, 80, &ExplainOptions::default());
		assert_eq!(matched.len(), 3);
		assert_eq!(matched[0].emotion, "joy");
		assert_eq!(matched[1].emotion, "wonder");
		assert_eq!(matched[2].emotion, "tension");
		assert!((matched[0].intensity - 9.0).abs() < 1e-10);
	}

	#[test]
	fn top_k_limits_the_matched_list() {
		let mut lexicon = EmotionLexicon::new(LexiconMode::Open);
		let item = item(
			&mut lexicon,
			"a",
			&[("joy", 9.0), ("wonder", 8.0), ("hope", 7.0), ("comfort", 6.0)],
		);
		let query = unit_query(
			&mut lexicon,
			&[("joy", 0.5), ("wonder", 0.5), ("hope", 0.5), ("comfort", 0.5)],
		);
		let options = ExplainOptions { top_k: 2 };
		let (matched, _) = build_explanation(&lexicon, &query, &item, 75, &options);
		assert_eq!(matched.len(), 2);
		assert_eq!(matched[0].emotion, "joy");
	}

	#[test]
	fn dimensions_missing_on_either_side_are_excluded() {
		let mut lexicon = EmotionLexicon::new(LexiconMode::Open);
		let item = item(&mut lexicon, "a", &[("joy", 9.0), ("tension", 8.0)]);
		lexicon.register("wonder");
		let query = unit_query(&mut lexicon, &[("joy", 0.7), ("wonder", 0.7)]);
		let (matched, _) =
			build_explanation(&lexicon, &query, &item, 60, &ExplainOptions::default());
		assert_eq!(matched.len(), 1);
		assert_eq!(matched[0].emotion, "joy");
	}

	#[test]
	fn explanation_mentions_emotions_and_score() {
		let mut lexicon = EmotionLexicon::new(LexiconMode::Open);
		let item = item(&mut lexicon, "a", &[("joy", 9.0)]);
		let query = unit_query(&mut lexicon, &[("joy", 1.0)]);
		let (_, text) = build_explanation(&lexicon, &query, &item, 92, &ExplainOptions::default());
		assert!(text.contains("joy"));
		assert!(text.contains("92%"));
	}

	#[test]
	fn no_overlap_yields_generic_sentence() {
		let mut lexicon = EmotionLexicon::new(LexiconMode::Open);
		let item = item(&mut lexicon, "a", &[("tension", 9.0)]);
		lexicon.register("joy");
		let query = unit_query(&mut lexicon, &[("joy", 1.0)]);
		let (matched, text) =
			build_explanation(&lexicon, &query, &item, 50, &ExplainOptions::default());
		assert!(matched.is_empty());
		assert!(text.contains("50%"));
	}
}
