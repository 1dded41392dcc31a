//! In-memory fuzzy prefix search over a q-gram index.
//!
//! Build a [`QGramIndex`] once from `(name, score)` records, then share it by
//! reference (or `Arc`) and call [`QGramIndex::search`] from any number of
//! threads. Queries tolerate roughly one typo per four characters.

pub mod candidates;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod ped;
pub mod rank;
pub mod search;
pub mod tokenizer;

use serde::Serialize;

pub use candidates::CandidateFilter;
pub use config::EngineConfig;
pub use corpus::{load_from_path, load_from_reader, LoadedCorpus, Record};
pub use error::{Error, MalformedReason, MalformedRecord, Result};
pub use index::{IndexBuilder, QGramIndex};
pub use search::{threshold_for, SearchHit, EDITS_PER_CHARS};

pub type EntityId = u32;
pub type Score = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub score: Score,
}

/// An entity that survived the prefix edit distance check for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub entity_id: EntityId,
    pub score: Score,
    pub ped: usize,
}
