// ---------------------------------------------------------------------------
// Query Interpreter — structured emotional intent to query vector
// ---------------------------------------------------------------------------
//
// Builds the query vector from two signal lists: the emotions the user asked
// for (full weight) and emotions mentioned in the free-text journey
// description (half weight, matched read-only against the lexicon). The
// user's current emotional state acts as a damping hint, not a positive
// signal: for low and moderate intensity preferences those dimensions are
// scaled down unless the user also asked for them explicitly.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use regex::Regex;

use crate::cosine::normalize_in_place;
use crate::encoder::{encode_profile, EncoderOptions};
use crate::error::EngineError;
use crate::lexicon::EmotionLexicon;
use crate::types::{EmotionSignal, IntensityPreference, QueryIntent, SourceKind, SourceProfile};

/// Full-weight signal intensity for desired emotions, on the 0-10 scale.
const DESIRED_INTENSITY: f64 = 10.0;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for query interpretation.
#[derive(Debug, Clone)]
pub struct QueryOptions {
	/// Journey-derived signals weigh this fraction of a desired emotion.
	pub journey_weight: f64,
	/// Factor applied to current-state dimensions for low/moderate
	/// intensity preferences.
	pub current_state_damping: f64,
}

impl Default for QueryOptions {
	fn default() -> Self {
		Self {
			journey_weight: 0.5,
			current_state_damping: 0.5,
		}
	}
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// The ranking-ready form of a query: vector, keyword filter, intensity ask.
#[derive(Debug, Clone)]
pub struct InterpretedQuery {
	pub vector: Vec<f32>,
	pub keywords: Vec<String>,
	pub intensity: IntensityPreference,
}

/// Extract lexicon labels mentioned in free text. Read-only against the
/// lexicon: journey prose never registers new dimensions, even in open mode.
fn journey_labels(lexicon: &EmotionLexicon, journey: &str) -> Vec<String> {
	let word = Regex::new(r"[a-zA-Z]+").expect("static pattern");
	let mut seen: HashSet<String> = HashSet::new();
	let mut labels = Vec::new();
	for token in word.find_iter(journey) {
		let candidate = token.as_str().to_lowercase();
		if lexicon.lookup(&candidate).is_some() && seen.insert(candidate.clone()) {
			labels.push(candidate);
		}
	}
	labels
}

/// Map a structured intent onto the lexicon's vector space.
pub fn interpret(
	lexicon: &mut EmotionLexicon,
	intent: &QueryIntent,
	options: &QueryOptions,
	encoder: &EncoderOptions,
) -> Result<InterpretedQuery, EngineError> {
	let mut signals: Vec<EmotionSignal> = intent
		.desired_experience
		.iter()
		.map(|emotion| EmotionSignal {
			emotion: emotion.clone(),
			intensity: DESIRED_INTENSITY,
		})
		.collect();

	if let Some(journey) = &intent.journey {
		for label in journey_labels(lexicon, journey) {
			signals.push(EmotionSignal {
				emotion: label,
				intensity: DESIRED_INTENSITY * options.journey_weight,
			});
		}
	}

	// The encoder's max-merge keeps the desired weight when the journey
	// mentions the same emotion again.
	let shaped = SourceProfile {
		kind: SourceKind::Description,
		signals,
		arc: None,
		keywords: Vec::new(),
	};
	let encoded = encode_profile(lexicon, &shaped, encoder)?;
	let mut vector = encoded.vector;

	// "I feel this now but don't necessarily want more of it": damp
	// current-state dimensions unless explicitly desired, and only when the
	// user is not chasing a high-intensity experience.
	if intent.intensity != IntensityPreference::High {
		let desired: HashSet<String> = intent
			.desired_experience
			.iter()
			.map(|e| e.trim().to_lowercase())
			.collect();
		for state in &intent.current_state {
			let name = state.trim().to_lowercase();
			if desired.contains(&name) {
				continue;
			}
			if let Some(idx) = lexicon.lookup(&name) {
				if idx < vector.len() {
					vector[idx] = ((vector[idx] as f64) * options.current_state_damping) as f32;
				}
			}
		}
		normalize_in_place(&mut vector);
	}

	let keywords = intent
		.keywords
		.iter()
		.map(|k| k.trim().to_lowercase())
		.filter(|k| !k.is_empty())
		.collect();

	Ok(InterpretedQuery {
		vector,
		keywords,
		intensity: intent.intensity,
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
