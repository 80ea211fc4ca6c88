// ---------------------------------------------------------------------------
// Vector Encoder — SourceProfile to unit-normalized emotion vector
// ---------------------------------------------------------------------------
//
// Turns a variable-length list of (emotion, intensity) signals into a
// fixed-dimension vector in the lexicon's space. Repeated labels keep their
// maximum intensity rather than summing, so an emotion phrased twice does
// not read as twice as strong. Arc stages contribute a smaller fixed weight
// to dimensions the explicit signals left empty.
// ---------------------------------------------------------------------------

use crate::cosine::normalize_in_place;
use crate::error::EngineError;
use crate::lexicon::EmotionLexicon;
use crate::types::SourceProfile;

/// Intensities arrive on this scale and are divided down to [0,1].
const INTENSITY_SCALE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for profile encoding.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
	/// Weight applied to arc-only labels, as a fraction of the profile's
	/// strongest scaled signal.
	pub arc_weight: f64,
	/// When set, a profile that encodes to the zero vector is an error
	/// instead of a valid low-information result.
	pub strict: bool,
}

impl Default for EncoderOptions {
	fn default() -> Self {
		Self {
			arc_weight: 0.3,
			strict: false,
		}
	}
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// The result of encoding one source profile.
#[derive(Debug, Clone)]
pub struct EncodedProfile {
	/// Unit vector, or the zero vector when the profile carried no signal.
	pub vector: Vec<f32>,
	/// False when the vector is all-zero.
	pub scored: bool,
	/// Largest pre-normalization component, in [0,1].
	pub peak_intensity: f64,
}

/// Encode a source profile into the lexicon's vector space.
///
/// In open mode unknown signal and arc labels register new dimensions; in
/// closed mode they fail with `UnknownLabel`. Intensities outside [0,10]
/// are clamped.
pub fn encode_profile(
	lexicon: &mut EmotionLexicon,
	profile: &SourceProfile,
	options: &EncoderOptions,
) -> Result<EncodedProfile, EngineError> {
	// Resolve labels first: in open mode this may grow the lexicon, and the
	// vector must span the final dimensionality.
	let mut signal_entries: Vec<(usize, f64)> = Vec::with_capacity(profile.signals.len());
	for signal in &profile.signals {
		let idx = lexicon.resolve(&signal.emotion)?;
		let scaled = (signal.intensity.clamp(0.0, INTENSITY_SCALE)) / INTENSITY_SCALE;
		signal_entries.push((idx, scaled));
	}

	let mut arc_entries: Vec<usize> = Vec::new();
	if let Some(arc) = &profile.arc {
		for label in arc.labels() {
			arc_entries.push(lexicon.resolve(label)?);
		}
	}

	let mut vector = vec![0.0f32; lexicon.size()];

	for &(idx, scaled) in &signal_entries {
		if scaled as f32 > vector[idx] {
			vector[idx] = scaled as f32;
		}
	}

	// Arc stages carry no intensities of their own; they borrow from the
	// profile's strongest signal (or full strength for arc-only profiles).
	if !arc_entries.is_empty() {
		let base = signal_entries
			.iter()
			.map(|&(_, s)| s)
			.fold(0.0f64, f64::max);
		let base = if base > 0.0 { base } else { 1.0 };
		let arc_value = (options.arc_weight * base) as f32;
		for &idx in &arc_entries {
			if vector[idx] == 0.0 {
				vector[idx] = arc_value;
			}
		}
	}

	let peak_intensity = vector.iter().fold(0.0f64, |acc, &x| acc.max(x as f64));
	let scored = normalize_in_place(&mut vector);

	if !scored && options.strict {
		return Err(EngineError::EmptySignal);
	}

	Ok(EncodedProfile {
		vector,
		scored,
		peak_intensity,
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
