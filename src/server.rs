// ---------------------------------------------------------------------------
// EngineServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to ShelfStore
// operations: a main `run()` loop, a `dispatch()` match, `with_store` /
// `with_store_mut` helpers, and free-standing handler functions for each
// method. The shell owns no domain logic; everything behind a method name
// is a library call.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};

use serde::Deserialize;

use crate::aggregate::SourceWeights;
use crate::encoder::EncoderOptions;
use crate::error::EngineError;
use crate::explain::ExplainOptions;
use crate::genre::profile_from_genres;
use crate::intent::QueryOptions;
use crate::lexicon::LexiconMode;
use crate::protocol::*;
use crate::ranking::RankingOptions;
use crate::store::{EngineConfig, ShelfStore, UpsertEntry};
use crate::transport::NdjsonTransport;
use crate::types::{QueryIntent, SourceProfile};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// JSON-RPC server that dispatches requests to a [`ShelfStore`].
pub struct EngineServer {
	transport: NdjsonTransport,
	store: Option<ShelfStore>,
}

impl EngineServer {
	/// Create a new server with the given transport. The store is created
	/// lazily when `engine/initialize` is called.
	pub fn new(transport: NdjsonTransport) -> Self {
		Self {
			transport,
			store: None,
		}
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), EngineError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let result = match req.method.as_str() {
			// -- Lifecycle -----------------------------------------------
			"engine/initialize" => self.handle_initialize(req.params),

			// -- Lexicon -------------------------------------------------
			"lexicon/labels" => self.with_store(|s| {
				Ok(serde_json::json!({ "labels": s.lexicon().labels() }))
			}),
			"lexicon/size" => self.with_store(|s| {
				Ok(serde_json::json!({ "size": s.lexicon().size() }))
			}),
			"lexicon/register" => self.with_store_mut(|s| handle_register(s, req.params)),

			// -- Profiles ------------------------------------------------
			"profile/encode" => self.with_store_mut(|s| handle_encode(s, req.params)),
			"profile/fromGenres" => handle_from_genres(req.params),

			// -- Items ---------------------------------------------------
			"items/upsert" => self.with_store_mut(|s| handle_upsert(s, req.params)),
			"items/upsertBatch" => {
				self.with_store_mut(|s| handle_upsert_batch(s, req.params))
			}
			"items/delete" => self.with_store_mut(|s| handle_delete(s, req.params)),
			"items/get" => self.with_store(|s| handle_get(s, req.params)),
			"items/list" => self.with_store(|s| {
				Ok(serde_json::json!({ "items": s.items() }))
			}),
			"items/size" => self.with_store(|s| {
				Ok(serde_json::json!({ "count": s.size() }))
			}),

			// -- Query ---------------------------------------------------
			"query/interpret" => self.with_store_mut(|s| handle_interpret(s, req.params)),
			"query/recommend" => self.with_store_mut(|s| handle_recommend(s, req.params)),

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => self.transport.write_error(
				id,
				ENGINE_ERROR,
				e.to_string(),
				Some(e.to_json_rpc_error()),
			),
		}
	}

	// ── Store accessors ───────────────────────────────────────────────────

	fn with_store<F>(&self, f: F) -> Result<serde_json::Value, EngineError>
	where
		F: FnOnce(&ShelfStore) -> Result<serde_json::Value, EngineError>,
	{
		match &self.store {
			Some(s) => f(s),
			None => Err(EngineError::NotInitialized),
		}
	}

	fn with_store_mut<F>(&mut self, f: F) -> Result<serde_json::Value, EngineError>
	where
		F: FnOnce(&mut ShelfStore) -> Result<serde_json::Value, EngineError>,
	{
		match &mut self.store {
			Some(s) => f(s),
			None => Err(EngineError::NotInitialized),
		}
	}

	// ── Initialize ────────────────────────────────────────────────────────

	fn handle_initialize(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, EngineError> {
		let p: InitializeParams = parse_params(params)?;

		let lexicon_mode = match p.lexicon_mode.as_deref() {
			Some("closed") => LexiconMode::Closed,
			Some("open") | None => LexiconMode::Open,
			Some(other) => {
				return Err(EngineError::Serialization(format!(
					"Invalid lexicon mode: {}",
					other
				)))
			}
		};

		let defaults = SourceWeights::default();
		let source_weights = match p.source_weights {
			Some(w) => SourceWeights {
				description: w.description.unwrap_or(defaults.description),
				reviews: w.reviews.unwrap_or(defaults.reviews),
				genre: w.genre.unwrap_or(defaults.genre),
			},
			None => defaults,
		};

		let config = EngineConfig {
			lexicon_mode,
			seed_labels: p.seed_labels,
			source_weights,
			encoder: EncoderOptions {
				arc_weight: p.arc_weight.unwrap_or(0.3),
				strict: p.strict_encoding.unwrap_or(false),
			},
			query: QueryOptions {
				journey_weight: p.journey_weight.unwrap_or(0.5),
				current_state_damping: p.current_state_damping.unwrap_or(0.5),
			},
			ranking: RankingOptions {
				keyword_boost_weight: p.keyword_boost_weight.unwrap_or(0.15),
				intensity_penalty_max: p.intensity_penalty_max.unwrap_or(0.1),
			},
			explain: ExplainOptions {
				top_k: p.explain_count.unwrap_or(3),
			},
		};

		self.store = Some(ShelfStore::new(config));

		Ok(serde_json::json!({}))
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, EngineError> {
	serde_json::from_value(params)
		.map_err(|e| EngineError::Serialization(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
	lexicon_mode: Option<String>,
	seed_labels: Option<Vec<String>>,
	source_weights: Option<SourceWeightsParams>,
	arc_weight: Option<f64>,
	strict_encoding: Option<bool>,
	journey_weight: Option<f64>,
	current_state_damping: Option<f64>,
	keyword_boost_weight: Option<f64>,
	intensity_penalty_max: Option<f64>,
	explain_count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceWeightsParams {
	description: Option<f64>,
	reviews: Option<f64>,
	genre: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterParams {
	label: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodeParams {
	profile: SourceProfile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FromGenresParams {
	genres: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertParams {
	id: Option<String>,
	sources: Vec<SourceProfile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertBatchParams {
	items: Vec<UpsertParams>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
	id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterpretParams {
	intent: QueryIntent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
	intent: QueryIntent,
	limit: usize,
	candidate_ids: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Free-standing handler functions
// ---------------------------------------------------------------------------

fn handle_register(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: RegisterParams = parse_params(params)?;
	let index = store.register_label(&p.label);
	Ok(serde_json::json!({ "index": index }))
}

fn handle_encode(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: EncodeParams = parse_params(params)?;
	let encoded = store.encode(&p.profile)?;
	Ok(serde_json::json!({
		"vector": encoded.vector,
		"scored": encoded.scored,
		"peakIntensity": encoded.peak_intensity,
	}))
}

fn handle_from_genres(params: serde_json::Value) -> Result<serde_json::Value, EngineError> {
	let p: FromGenresParams = parse_params(params)?;
	let profile = profile_from_genres(&p.genres);
	Ok(serde_json::json!({ "profile": profile }))
}

fn handle_upsert(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: UpsertParams = parse_params(params)?;
	let id = store.upsert(UpsertEntry {
		id: p.id,
		sources: p.sources,
	})?;
	Ok(serde_json::json!({ "id": id }))
}

fn handle_upsert_batch(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: UpsertBatchParams = parse_params(params)?;
	let entries: Vec<UpsertEntry> = p
		.items
		.into_iter()
		.map(|e| UpsertEntry {
			id: e.id,
			sources: e.sources,
		})
		.collect();
	let outcome = store.upsert_batch(entries);
	serde_json::to_value(outcome).map_err(|e| EngineError::Serialization(e.to_string()))
}

fn handle_delete(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: IdParams = parse_params(params)?;
	let deleted = store.delete(&p.id);
	Ok(serde_json::json!({ "deleted": deleted }))
}

fn handle_get(
	store: &ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: IdParams = parse_params(params)?;
	let item = store.get(&p.id);
	Ok(serde_json::json!({ "item": item }))
}

fn handle_interpret(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: InterpretParams = parse_params(params)?;
	let query = store.interpret(&p.intent)?;
	Ok(serde_json::json!({
		"vector": query.vector,
		"keywords": query.keywords,
		"intensity": query.intensity,
	}))
}

fn handle_recommend(
	store: &mut ShelfStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, EngineError> {
	let p: RecommendParams = parse_params(params)?;
	let outcome = store.recommend(&p.intent, p.limit, p.candidate_ids.as_deref())?;
	Ok(serde_json::json!({
		"results": outcome.results,
		"skipped": outcome.skipped,
	}))
}
