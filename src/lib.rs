// ---------------------------------------------------------------------------
// moodshelf-engine — emotional profile matching for book recommendations
// ---------------------------------------------------------------------------
//
// The core pipeline: raw emotional signals (extracted upstream) are encoded
// into fixed-dimension unit vectors (encoder), combined per item across
// weighted sources (aggregate), and ranked against a query vector built
// from the user's structured emotional intent (intent, ranking), with a
// short human-readable justification per result (explain). The lexicon
// anchors every vector dimension; the store holds the current item
// snapshot; server/transport expose it all over NDJSON JSON-RPC.
// ---------------------------------------------------------------------------

pub mod aggregate;
pub mod cosine;
pub mod encoder;
pub mod error;
pub mod explain;
pub mod genre;
pub mod intent;
pub mod lexicon;
pub mod protocol;
pub mod ranking;
pub mod server;
pub mod store;
pub mod transport;
pub mod types;

pub use aggregate::{aggregate, build_item_profile, SourceWeights};
pub use encoder::{encode_profile, EncodedProfile, EncoderOptions};
pub use error::EngineError;
pub use explain::{build_explanation, ExplainOptions};
pub use intent::{interpret, InterpretedQuery, QueryOptions};
pub use lexicon::{EmotionLexicon, LexiconMode, STANDARD_EMOTIONS};
pub use ranking::{rank, RankingOptions};
pub use store::{BatchOutcome, EngineConfig, ShelfStore, UpsertEntry, UpsertFailure};
pub use types::{
	EmotionSignal, EmotionalArc, IntensityPreference, ItemProfile, MatchedEmotion, QueryIntent,
	RankedResult, RankingOutcome, SkippedItem, SourceKind, SourceProfile,
};
