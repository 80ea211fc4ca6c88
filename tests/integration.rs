// ---------------------------------------------------------------------------
// Integration tests for moodshelf-engine JSON-RPC 2.0 / NDJSON protocol
// ---------------------------------------------------------------------------
//
// Each test spawns a fresh moodshelf-engine binary and communicates via
// stdin/stdout using newline-delimited JSON-RPC 2.0 messages.
// ---------------------------------------------------------------------------

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

struct EngineProcess {
	child: Child,
	reader: BufReader<std::process::ChildStdout>,
	next_id: AtomicU64,
}

impl EngineProcess {
	fn spawn() -> Self {
		let bin = env!("CARGO_BIN_EXE_moodshelf-engine");
		let mut child = Command::new(bin)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.spawn()
			.expect("failed to spawn moodshelf-engine");

		let stdout = child.stdout.take().expect("no stdout");
		let reader = BufReader::new(stdout);

		Self {
			child,
			reader,
			next_id: AtomicU64::new(1),
		}
	}

	fn send(&mut self, method: &str, params: Value) -> RpcResponse {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		let request = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});

		let stdin = self.child.stdin.as_mut().expect("no stdin");
		let mut line = serde_json::to_string(&request).unwrap();
		line.push('\n');
		stdin.write_all(line.as_bytes()).unwrap();
		stdin.flush().unwrap();

		loop {
			let mut buf = String::new();
			let bytes_read = self
				.reader
				.read_line(&mut buf)
				.expect("failed to read from stdout");
			if bytes_read == 0 {
				panic!("unexpected EOF while waiting for response to id={}", id);
			}
			let buf = buf.trim();
			if buf.is_empty() {
				continue;
			}
			let parsed: Value = serde_json::from_str(buf)
				.unwrap_or_else(|e| panic!("invalid JSON from engine: {e}\nline: {buf}"));
			if parsed.get("id").is_none() {
				continue;
			}
			let resp_id = parsed["id"].as_u64().expect("response id is not u64");
			assert_eq!(resp_id, id, "response id mismatch");
			if let Some(error) = parsed.get("error") {
				return RpcResponse::Error(error.clone());
			}
			return RpcResponse::Ok(parsed.get("result").cloned().unwrap_or(Value::Null));
		}
	}

	fn call(&mut self, method: &str, params: Value) -> Value {
		match self.send(method, params) {
			RpcResponse::Ok(v) => v,
			RpcResponse::Error(e) => panic!("expected success, got error: {e}"),
		}
	}

	fn call_err(&mut self, method: &str, params: Value) -> Value {
		match self.send(method, params) {
			RpcResponse::Error(e) => e,
			RpcResponse::Ok(v) => panic!("expected error, got success: {v}"),
		}
	}

	/// Initialize the engine with defaults (open lexicon, standard seed).
	fn initialize(&mut self) -> Value {
		self.call("engine/initialize", json!({}))
	}
}

impl Drop for EngineProcess {
	fn drop(&mut self) {
		drop(self.child.stdin.take());
		let _ = self.child.wait();
	}
}

#[derive(Debug)]
enum RpcResponse {
	Ok(Value),
	Error(Value),
}

fn reviews_source(signals: Value) -> Value {
	json!({ "kind": "reviews", "signals": signals })
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn initialize_then_size_is_zero() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call("items/size", json!({}));
	assert_eq!(result["count"], 0);
}

#[test]
fn calls_before_initialize_are_rejected() {
	let mut engine = EngineProcess::spawn();
	let error = engine.call_err("items/size", json!({}));
	assert_eq!(error["data"]["engineCode"], "MOOD_NOT_INITIALIZED");
}

#[test]
fn unknown_method_returns_method_not_found() {
	let mut engine = EngineProcess::spawn();
	let error = engine.call_err("engine/doesNotExist", json!({}));
	assert_eq!(error["code"], -32601);
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

#[test]
fn standard_lexicon_seeds_thirty_labels() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call("lexicon/size", json!({}));
	assert_eq!(result["size"], 30);
	let labels = engine.call("lexicon/labels", json!({}));
	assert_eq!(labels["labels"][0], "joy");
}

#[test]
fn register_appends_a_dimension() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call("lexicon/register", json!({ "label": "Dread" }));
	assert_eq!(result["index"], 30);
	// Registering again keeps the same index
	let again = engine.call("lexicon/register", json!({ "label": "dread" }));
	assert_eq!(again["index"], 30);
}

#[test]
fn custom_seed_labels_replace_the_standard_set() {
	let mut engine = EngineProcess::spawn();
	engine.call(
		"engine/initialize",
		json!({ "seedLabels": ["joy", "tension", "wonder"], "lexiconMode": "closed" }),
	);
	let result = engine.call("lexicon/size", json!({}));
	assert_eq!(result["size"], 3);
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn encode_returns_a_unit_vector() {
	let mut engine = EngineProcess::spawn();
	engine.call(
		"engine/initialize",
		json!({ "seedLabels": ["joy", "wonder"], "lexiconMode": "closed" }),
	);
	let result = engine.call(
		"profile/encode",
		json!({ "profile": reviews_source(json!([
			{ "emotion": "joy", "intensity": 8.0 },
			{ "emotion": "wonder", "intensity": 6.0 },
		])) }),
	);
	assert_eq!(result["scored"], true);
	let vector: Vec<f64> = result["vector"]
		.as_array()
		.unwrap()
		.iter()
		.map(|v| v.as_f64().unwrap())
		.collect();
	let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
	assert!((norm - 1.0).abs() < 1e-6);
	assert!((result["peakIntensity"].as_f64().unwrap() - 0.8).abs() < 1e-6);
}

#[test]
fn closed_lexicon_rejects_unknown_signal_label() {
	let mut engine = EngineProcess::spawn();
	engine.call(
		"engine/initialize",
		json!({ "seedLabels": ["joy"], "lexiconMode": "closed" }),
	);
	let error = engine.call_err(
		"profile/encode",
		json!({ "profile": reviews_source(json!([
			{ "emotion": "dread", "intensity": 5.0 },
		])) }),
	);
	assert_eq!(error["data"]["engineCode"], "MOOD_UNKNOWN_LABEL");
}

#[test]
fn genre_tags_become_a_source_profile() {
	let mut engine = EngineProcess::spawn();
	let result = engine.call("profile/fromGenres", json!({ "genres": ["Horror"] }));
	let profile = &result["profile"];
	assert_eq!(profile["kind"], "genre");
	let signals = profile["signals"].as_array().unwrap();
	assert!(signals
		.iter()
		.any(|s| s["emotion"] == "fear" && s["intensity"] == 8.0));
}

#[test]
fn unknown_genres_yield_no_profile() {
	let mut engine = EngineProcess::spawn();
	let result = engine.call("profile/fromGenres", json!({ "genres": ["cookbook"] }));
	assert_eq!(result["profile"], Value::Null);
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[test]
fn upsert_assigns_an_id_and_stores_the_item() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call(
		"items/upsert",
		json!({ "sources": [reviews_source(json!([
			{ "emotion": "joy", "intensity": 8.0 },
		]))] }),
	);
	let id = result["id"].as_str().unwrap().to_string();
	assert!(!id.is_empty());

	let fetched = engine.call("items/get", json!({ "id": id }));
	assert_eq!(fetched["item"]["id"], id.as_str());
	assert_eq!(fetched["item"]["scored"], true);

	let size = engine.call("items/size", json!({}));
	assert_eq!(size["count"], 1);
}

#[test]
fn upsert_with_same_id_replaces_the_profile() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	engine.call(
		"items/upsert",
		json!({ "id": "book-1", "sources": [reviews_source(json!([
			{ "emotion": "joy", "intensity": 8.0 },
		]))] }),
	);
	engine.call(
		"items/upsert",
		json!({ "id": "book-1", "sources": [reviews_source(json!([
			{ "emotion": "tension", "intensity": 9.0 },
		]))] }),
	);
	let size = engine.call("items/size", json!({}));
	assert_eq!(size["count"], 1);
	let fetched = engine.call("items/get", json!({ "id": "book-1" }));
	assert!(fetched["item"]["intensities"].get("joy").is_none());
}

#[test]
fn delete_removes_an_item() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	engine.call(
		"items/upsert",
		json!({ "id": "book-1", "sources": [reviews_source(json!([
			{ "emotion": "joy", "intensity": 8.0 },
		]))] }),
	);
	let deleted = engine.call("items/delete", json!({ "id": "book-1" }));
	assert_eq!(deleted["deleted"], true);
	let again = engine.call("items/delete", json!({ "id": "book-1" }));
	assert_eq!(again["deleted"], false);
}

#[test]
fn batch_upsert_isolates_per_item_failures() {
	let mut engine = EngineProcess::spawn();
	engine.call(
		"engine/initialize",
		json!({ "seedLabels": ["joy"], "lexiconMode": "closed" }),
	);
	let result = engine.call(
		"items/upsertBatch",
		json!({ "items": [
			{ "id": "good", "sources": [reviews_source(json!([
				{ "emotion": "joy", "intensity": 8.0 },
			]))] },
			{ "id": "bad", "sources": [reviews_source(json!([
				{ "emotion": "dread", "intensity": 8.0 },
			]))] },
		] }),
	);
	assert_eq!(result["ids"], json!(["good"]));
	let failures = result["failures"].as_array().unwrap();
	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0]["id"], "bad");
	assert_eq!(failures[0]["code"], "MOOD_UNKNOWN_LABEL");

	let size = engine.call("items/size", json!({}));
	assert_eq!(size["count"], 1);
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn interpret_builds_a_unit_query_vector() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call(
		"query/interpret",
		json!({ "intent": {
			"desiredExperience": ["joy", "wonder"],
			"keywords": ["Heartwarming"],
			"intensity": "high",
		} }),
	);
	let vector: Vec<f64> = result["vector"]
		.as_array()
		.unwrap()
		.iter()
		.map(|v| v.as_f64().unwrap())
		.collect();
	let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
	assert!((norm - 1.0).abs() < 1e-6);
	assert_eq!(result["keywords"], json!(["heartwarming"]));
	assert_eq!(result["intensity"], "high");
}

#[test]
fn recommend_prefers_the_shared_emotion() {
	let mut engine = EngineProcess::spawn();
	engine.call(
		"engine/initialize",
		json!({ "seedLabels": ["joy", "tension", "wonder"], "lexiconMode": "closed" }),
	);
	engine.call(
		"items/upsert",
		json!({ "id": "a", "sources": [reviews_source(json!([
			{ "emotion": "joy", "intensity": 9.0 },
		]))] }),
	);
	engine.call(
		"items/upsert",
		json!({ "id": "b", "sources": [reviews_source(json!([
			{ "emotion": "tension", "intensity": 9.0 },
		]))] }),
	);
	let result = engine.call(
		"query/recommend",
		json!({ "intent": { "desiredExperience": ["joy", "wonder"] }, "limit": 5 }),
	);
	let results = result["results"].as_array().unwrap();
	assert_eq!(results.len(), 2);
	assert_eq!(results[0]["itemId"], "a");
	assert!(results[0]["score"].as_u64().unwrap() > 50);
	assert!(results[0]["score"].as_u64().unwrap() > results[1]["score"].as_u64().unwrap());
	assert!(results[0]["explanation"].as_str().unwrap().contains("joy"));
}

#[test]
fn recommend_on_empty_store_returns_empty_results() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let result = engine.call(
		"query/recommend",
		json!({ "intent": { "desiredExperience": ["joy"] }, "limit": 5 }),
	);
	assert_eq!(result["results"], json!([]));
	assert_eq!(result["skipped"], json!([]));
}

#[test]
fn recommend_with_zero_limit_is_an_error() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let error = engine.call_err(
		"query/recommend",
		json!({ "intent": { "desiredExperience": ["joy"] }, "limit": 0 }),
	);
	assert_eq!(error["data"]["engineCode"], "MOOD_INVALID_LIMIT");
}

#[test]
fn recommend_respects_candidate_restriction() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	for id in ["a", "b", "c"] {
		engine.call(
			"items/upsert",
			json!({ "id": id, "sources": [reviews_source(json!([
				{ "emotion": "joy", "intensity": 8.0 },
			]))] }),
		);
	}
	let result = engine.call(
		"query/recommend",
		json!({
			"intent": { "desiredExperience": ["joy"] },
			"limit": 5,
			"candidateIds": ["b"],
		}),
	);
	let results = result["results"].as_array().unwrap();
	assert_eq!(results.len(), 1);
	assert_eq!(results[0]["itemId"], "b");
}

#[test]
fn items_encoded_before_lexicon_growth_still_rank() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	engine.call(
		"items/upsert",
		json!({ "id": "old", "sources": [reviews_source(json!([
			{ "emotion": "joy", "intensity": 9.0 },
		]))] }),
	);
	// New item carries a label the standard lexicon does not have
	engine.call(
		"items/upsert",
		json!({ "id": "new", "sources": [reviews_source(json!([
			{ "emotion": "vertigo", "intensity": 9.0 },
		]))] }),
	);
	let size = engine.call("lexicon/size", json!({}));
	assert_eq!(size["size"], 31);

	let result = engine.call(
		"query/recommend",
		json!({ "intent": { "desiredExperience": ["joy"] }, "limit": 5 }),
	);
	let results = result["results"].as_array().unwrap();
	assert_eq!(results[0]["itemId"], "old");
	assert_eq!(result["skipped"], json!([]));
}

#[test]
fn genre_source_flows_through_to_recommendation() {
	let mut engine = EngineProcess::spawn();
	engine.initialize();
	let from_genres = engine.call("profile/fromGenres", json!({ "genres": ["fantasy"] }));
	engine.call(
		"items/upsert",
		json!({ "id": "epic", "sources": [from_genres["profile"]] }),
	);
	let result = engine.call(
		"query/recommend",
		json!({ "intent": { "desiredExperience": ["wonder", "curiosity"] }, "limit": 1 }),
	);
	let results = result["results"].as_array().unwrap();
	assert_eq!(results[0]["itemId"], "epic");
	assert!(results[0]["score"].as_u64().unwrap() > 50);
}
