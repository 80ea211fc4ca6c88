// ---------------------------------------------------------------------------
// ShelfStore — item profile registry and recommendation entry point
// ---------------------------------------------------------------------------
//
// Holds the current snapshot of ItemProfiles and the engine configuration,
// and wires the pure stages together: encode + aggregate on upsert,
// interpret + rank + explain on recommend. Upserts always rebuild the whole
// profile from the full source set; there is no partial mutation. The store
// owns no persistence; the surrounding catalog layer does.
// ---------------------------------------------------------------------------

use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{build_item_profile, SourceWeights};
use crate::encoder::{encode_profile, EncodedProfile, EncoderOptions};
use crate::error::EngineError;
use crate::explain::ExplainOptions;
use crate::intent::{interpret, InterpretedQuery, QueryOptions};
use crate::lexicon::{EmotionLexicon, LexiconMode};
use crate::ranking::{rank, RankingOptions};
use crate::types::{ItemProfile, QueryIntent, RankingOutcome, SourceProfile};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Full engine configuration. Every weight the scoring pipeline uses lives
/// here, so two engines configured identically rank identically.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
	pub lexicon_mode: LexiconMode,
	/// Seed labels for the lexicon; `None` seeds the standard set.
	pub seed_labels: Option<Vec<String>>,
	pub source_weights: SourceWeights,
	pub encoder: EncoderOptions,
	pub query: QueryOptions,
	pub ranking: RankingOptions,
	pub explain: ExplainOptions,
}

// ---------------------------------------------------------------------------
// Upsert inputs and outcomes
// ---------------------------------------------------------------------------

/// One item's full set of source profiles for an upsert.
pub struct UpsertEntry {
	/// Catalog id; a fresh UUID is assigned when absent.
	pub id: Option<String>,
	pub sources: Vec<SourceProfile>,
}

/// Per-item failure from a batch upsert.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertFailure {
	pub id: Option<String>,
	pub code: String,
	pub message: String,
}

/// Outcome of a batch upsert: ingested ids plus per-item failures.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
	pub ids: Vec<String>,
	pub failures: Vec<UpsertFailure>,
}

// ---------------------------------------------------------------------------
// ShelfStore
// ---------------------------------------------------------------------------

/// In-memory registry of item profiles plus the lexicon they share.
pub struct ShelfStore {
	lexicon: EmotionLexicon,
	items: Vec<ItemProfile>,
	config: EngineConfig,
}

impl ShelfStore {
	pub fn new(config: EngineConfig) -> Self {
		let lexicon = match &config.seed_labels {
			Some(labels) => EmotionLexicon::with_labels(labels, config.lexicon_mode),
			None => EmotionLexicon::standard(config.lexicon_mode),
		};
		Self {
			lexicon,
			items: Vec::new(),
			config,
		}
	}

	pub fn lexicon(&self) -> &EmotionLexicon {
		&self.lexicon
	}

	/// Register a label explicitly, regardless of lexicon mode.
	pub fn register_label(&mut self, label: &str) -> usize {
		self.lexicon.register(label)
	}

	/// Encode a standalone source profile against the store's lexicon.
	pub fn encode(&mut self, profile: &SourceProfile) -> Result<EncodedProfile, EngineError> {
		encode_profile(&mut self.lexicon, profile, &self.config.encoder)
	}

	// -- Items ---------------------------------------------------------------

	/// Rebuild and store an item's profile from its full source set.
	/// Returns the item id (assigned when the entry carried none).
	pub fn upsert(&mut self, entry: UpsertEntry) -> Result<String, EngineError> {
		let id = entry.id.unwrap_or_else(|| Uuid::new_v4().to_string());
		let profile = build_item_profile(
			&mut self.lexicon,
			id.clone(),
			entry.sources,
			&self.config.source_weights,
			&self.config.encoder,
		)?;

		match self.items.iter_mut().find(|item| item.id == id) {
			Some(existing) => *existing = profile,
			None => self.items.push(profile),
		}
		Ok(id)
	}

	/// Upsert a batch, isolating failures to the items that caused them.
	pub fn upsert_batch(&mut self, entries: Vec<UpsertEntry>) -> BatchOutcome {
		let mut ids = Vec::new();
		let mut failures = Vec::new();
		for entry in entries {
			let entry_id = entry.id.clone();
			match self.upsert(entry) {
				Ok(id) => ids.push(id),
				Err(e) => {
					tracing::warn!(
						"Skipping item {:?} during batch upsert: {}",
						entry_id,
						e
					);
					failures.push(UpsertFailure {
						id: entry_id,
						code: e.code().to_string(),
						message: e.to_string(),
					});
				}
			}
		}
		BatchOutcome { ids, failures }
	}

	pub fn delete(&mut self, id: &str) -> bool {
		let before = self.items.len();
		self.items.retain(|item| item.id != id);
		self.items.len() != before
	}

	pub fn get(&self, id: &str) -> Option<&ItemProfile> {
		self.items.iter().find(|item| item.id == id)
	}

	pub fn items(&self) -> &[ItemProfile] {
		&self.items
	}

	pub fn size(&self) -> usize {
		self.items.len()
	}

	// -- Recommendation ------------------------------------------------------

	/// Interpret an intent against the store's lexicon and configuration.
	pub fn interpret(&mut self, intent: &QueryIntent) -> Result<InterpretedQuery, EngineError> {
		interpret(
			&mut self.lexicon,
			intent,
			&self.config.query,
			&self.config.encoder,
		)
	}

	/// Rank the store's items (or the named subset) against an intent.
	///
	/// `candidate_ids` lets the catalog layer pre-filter the candidate set;
	/// ids it names that are not in the store are ignored.
	pub fn recommend(
		&mut self,
		intent: &QueryIntent,
		limit: usize,
		candidate_ids: Option<&[String]>,
	) -> Result<RankingOutcome, EngineError> {
		let query = self.interpret(intent)?;

		let candidates: Vec<&ItemProfile> = match candidate_ids {
			Some(ids) => self
				.items
				.iter()
				.filter(|item| ids.contains(&item.id))
				.collect(),
			None => self.items.iter().collect(),
		};

		rank(
			&query,
			&candidates,
			&self.lexicon,
			&self.config.ranking,
			&self.config.explain,
			limit,
		)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
