// ---------------------------------------------------------------------------
// Profile Aggregator — per-source vectors into one composite item vector
// ---------------------------------------------------------------------------
//
// Combines the encoded vectors of an item's sources (description, reviews,
// genre) by weighted sum, then unit-normalizes. Because normalization is
// scale-invariant, absent sources simply contribute nothing and the weights
// of the present sources renormalize implicitly. Rebuilding from the same
// inputs is bit-for-bit idempotent.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cosine::normalize_in_place;
use crate::encoder::{encode_profile, EncoderOptions};
use crate::error::EngineError;
use crate::lexicon::EmotionLexicon;
use crate::types::{ItemProfile, SourceKind, SourceProfile};

/// Signal intensities live on a 0-10 scale.
const INTENSITY_SCALE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Source weights
// ---------------------------------------------------------------------------

/// How much each source kind contributes to the composite. Weights need not
/// sum to 1; the composite is unit-normalized regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceWeights {
	pub description: f64,
	pub reviews: f64,
	pub genre: f64,
}

impl SourceWeights {
	pub fn weight_for(&self, kind: SourceKind) -> f64 {
		match kind {
			SourceKind::Description => self.description,
			SourceKind::Reviews => self.reviews,
			SourceKind::Genre => self.genre,
		}
	}
}

impl Default for SourceWeights {
	fn default() -> Self {
		Self {
			description: 0.3,
			reviews: 0.5,
			genre: 0.2,
		}
	}
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Weighted-sum the encoded source vectors and unit-normalize the result.
/// Returns the composite and whether it carries any signal.
pub fn aggregate(
	encoded: &[(SourceKind, Vec<f32>)],
	weights: &SourceWeights,
) -> (Vec<f32>, bool) {
	let dim = encoded.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
	let mut sum = vec![0.0f64; dim];

	for (kind, vector) in encoded {
		let w = weights.weight_for(*kind);
		for (i, &x) in vector.iter().enumerate() {
			sum[i] += w * (x as f64);
		}
	}

	let mut composite: Vec<f32> = sum.iter().map(|&x| x as f32).collect();
	let scored = normalize_in_place(&mut composite);
	(composite, scored)
}

/// Build an item's full profile from its current set of source profiles.
///
/// Always a whole rebuild: the composite, keyword set, and intensity table
/// are derived from scratch so the profile stays consistent with its inputs.
pub fn build_item_profile(
	lexicon: &mut EmotionLexicon,
	id: String,
	sources: Vec<SourceProfile>,
	weights: &SourceWeights,
	encoder: &EncoderOptions,
) -> Result<ItemProfile, EngineError> {
	let mut encoded: Vec<(SourceKind, Vec<f32>)> = Vec::with_capacity(sources.len());
	let mut peak_intensity = 0.0f64;

	for source in &sources {
		let e = encode_profile(lexicon, source, encoder)?;
		peak_intensity = peak_intensity.max(e.peak_intensity);
		encoded.push((source.kind, e.vector));
	}

	let (composite, scored) = aggregate(&encoded, weights);

	// Per-label 0-10 maxima across all sources, kept for explanations.
	let mut intensities: HashMap<String, f64> = HashMap::new();
	for source in &sources {
		for signal in &source.signals {
			let name = signal.emotion.trim().to_lowercase();
			let clamped = signal.intensity.clamp(0.0, INTENSITY_SCALE);
			let entry = intensities.entry(name).or_insert(0.0);
			if clamped > *entry {
				*entry = clamped;
			}
		}
	}

	// Lowercased keyword union, first occurrence wins the position.
	let mut keywords: Vec<String> = Vec::new();
	for source in &sources {
		for keyword in &source.keywords {
			let k = keyword.trim().to_lowercase();
			if !k.is_empty() && !keywords.contains(&k) {
				keywords.push(k);
			}
		}
	}

	Ok(ItemProfile {
		id,
		composite,
		scored,
		peak_intensity,
		intensities,
		keywords,
		sources,
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
