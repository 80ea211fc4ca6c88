// ---------------------------------------------------------------------------
// Genre signal mapping — catalog genre tags to emotional signals
// ---------------------------------------------------------------------------
//
// Genres carry a coarse but reliable emotional prior (horror runs on fear
// and tension, romance on joy and comfort). This fixed table turns a list
// of catalog genre tags into a genre-kind SourceProfile so the aggregator
// has a producer for its lowest-weighted source.
// ---------------------------------------------------------------------------

use crate::types::{EmotionSignal, SourceKind, SourceProfile};

/// Genre to (emotion, 0-10 intensity) table.
const GENRE_SIGNALS: &[(&str, &[(&str, f64)])] = &[
	("horror", &[("fear", 8.0), ("tension", 7.0), ("dread", 6.0)]),
	("romance", &[("joy", 7.0), ("comfort", 6.0), ("hope", 5.0)]),
	("thriller", &[("tension", 8.0), ("curiosity", 7.0), ("excitement", 6.0)]),
	("mystery", &[("curiosity", 8.0), ("tension", 6.0), ("satisfaction", 5.0)]),
	("fantasy", &[("wonder", 8.0), ("curiosity", 6.0), ("inspiration", 5.0)]),
	("science fiction", &[("wonder", 7.0), ("curiosity", 7.0), ("tension", 4.0)]),
	("literary fiction", &[("reflection", 7.0), ("melancholy", 5.0), ("satisfaction", 6.0)]),
	("historical fiction", &[("reflection", 6.0), ("curiosity", 5.0), ("satisfaction", 5.0)]),
	("young adult", &[("excitement", 6.0), ("hope", 5.0), ("curiosity", 5.0)]),
	("biography", &[("reflection", 7.0), ("inspiration", 6.0), ("satisfaction", 5.0)]),
	("self-help", &[("hope", 8.0), ("inspiration", 7.0), ("comfort", 5.0)]),
	("comedy", &[("joy", 8.0), ("comfort", 6.0), ("satisfaction", 5.0)]),
	("drama", &[("tension", 7.0), ("reflection", 6.0), ("melancholy", 5.0)]),
	("adventure", &[("excitement", 8.0), ("curiosity", 6.0), ("wonder", 5.0)]),
	("poetry", &[("reflection", 7.0), ("melancholy", 5.0), ("wonder", 6.0)]),
	("classic", &[("reflection", 7.0), ("satisfaction", 6.0), ("melancholy", 5.0)]),
];

/// The emotional signals for one genre tag, or `None` when the genre is
/// unknown. Matching is case-insensitive on the trimmed tag.
pub fn genre_signals(genre: &str) -> Option<Vec<EmotionSignal>> {
	let normalized = genre.trim().to_lowercase();
	let entry = GENRE_SIGNALS.iter().find(|(name, _)| *name == normalized);
	match entry {
		Some((_, signals)) => Some(
			signals
				.iter()
				.map(|&(emotion, intensity)| EmotionSignal {
					emotion: emotion.to_string(),
					intensity,
				})
				.collect(),
		),
		None => {
			tracing::debug!("No emotional mapping for genre '{}'", genre);
			None
		}
	}
}

/// Build a genre-kind source profile from catalog genre tags.
///
/// Signals for the same emotion across genres keep the maximum intensity.
/// Returns `None` when no tag has a mapping, so callers can treat the genre
/// source as absent.
pub fn profile_from_genres(genres: &[String]) -> Option<SourceProfile> {
	let mut signals: Vec<EmotionSignal> = Vec::new();
	let mut matched: Vec<String> = Vec::new();

	for genre in genres {
		let Some(genre_signals) = genre_signals(genre) else {
			continue;
		};
		matched.push(genre.trim().to_lowercase());
		for signal in genre_signals {
			match signals.iter_mut().find(|s| s.emotion == signal.emotion) {
				Some(existing) => {
					if signal.intensity > existing.intensity {
						existing.intensity = signal.intensity;
					}
				}
				None => signals.push(signal),
			}
		}
	}

	if signals.is_empty() {
		return None;
	}

	Some(SourceProfile {
		kind: SourceKind::Genre,
		signals,
		arc: None,
		keywords: matched,
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
