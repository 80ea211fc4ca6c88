use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which kind of source material an emotional profile was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
	Description,
	Reviews,
	Genre,
}

/// One (label, intensity) observation from the external analysis call.
/// Intensity is on a 0-10 scale; out-of-range values are clamped during
/// encoding, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionSignal {
	pub emotion: String,
	pub intensity: f64,
}

/// Ordered emotional progression across a narrative (beginning/middle/end).
/// Stages carry label lists only, no intensity scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalArc {
	#[serde(default)]
	pub beginning: Vec<String>,
	#[serde(default)]
	pub middle: Vec<String>,
	#[serde(default)]
	pub end: Vec<String>,
}

impl EmotionalArc {
	/// All labels mentioned in any stage, in stage order.
	pub fn labels(&self) -> impl Iterator<Item = &String> {
		self.beginning
			.iter()
			.chain(self.middle.iter())
			.chain(self.end.iter())
	}
}

/// The emotional signals extracted from one source of an item.
/// Immutable once created; re-analysis produces a new profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProfile {
	pub kind: SourceKind,
	#[serde(default)]
	pub signals: Vec<EmotionSignal>,
	#[serde(default)]
	pub arc: Option<EmotionalArc>,
	#[serde(default)]
	pub keywords: Vec<String>,
}

/// The composite emotional profile of one item, rebuilt whole from its full
/// set of source profiles on every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProfile {
	pub id: String,
	/// Unit-normalized composite vector, or the zero vector when no source
	/// carried any signal.
	pub composite: Vec<f32>,
	/// False when the composite is the zero vector (low-information item).
	pub scored: bool,
	/// Maximum pre-normalization scaled component across sources, in [0,1].
	/// Proxy for the item's dominant emotional intensity.
	#[serde(rename = "peakIntensity")]
	pub peak_intensity: f64,
	/// Original 0-10 intensity maxima per label, kept for explanations.
	pub intensities: HashMap<String, f64>,
	/// Lowercased emotional keywords gathered across sources.
	pub keywords: Vec<String>,
	pub sources: Vec<SourceProfile>,
}

/// How intense an emotional experience the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityPreference {
	Low,
	/// The upstream analysis sometimes says "medium" for this band.
	#[serde(alias = "medium")]
	Moderate,
	High,
}

impl Default for IntensityPreference {
	fn default() -> Self {
		Self::Moderate
	}
}

/// Structured representation of a user's emotional ask, already parsed from
/// free text by the external analysis call. Transient, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryIntent {
	#[serde(rename = "currentState", default)]
	pub current_state: Vec<String>,
	#[serde(rename = "desiredExperience", default)]
	pub desired_experience: Vec<String>,
	#[serde(default)]
	pub journey: Option<String>,
	#[serde(default)]
	pub intensity: IntensityPreference,
	#[serde(default)]
	pub keywords: Vec<String>,
}

/// One emotion dimension shared by the query and a matched item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedEmotion {
	pub emotion: String,
	/// The item's original 0-10 intensity for this emotion.
	pub intensity: f64,
	#[serde(rename = "queryWeight")]
	pub query_weight: f64,
	#[serde(rename = "itemWeight")]
	pub item_weight: f64,
}

/// One ranked recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
	#[serde(rename = "itemId")]
	pub item_id: String,
	/// User-facing match percentage in [0,100].
	pub score: u8,
	pub cosine: f64,
	pub matched: Vec<MatchedEmotion>,
	pub explanation: String,
}

/// Notice for a candidate that was dropped from a ranking pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
	#[serde(rename = "itemId")]
	pub item_id: String,
	pub reason: String,
}

/// The outcome of one ranking pass: ordered results plus one notice per
/// candidate that had to be skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingOutcome {
	pub results: Vec<RankedResult>,
	pub skipped: Vec<SkippedItem>,
}
