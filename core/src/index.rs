use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::corpus::Record;
use crate::tokenizer::{normalize, qgrams};
use crate::{Entity, EntityId, Error, Result, Score};

/// Immutable q-gram index over a corpus of scored entities.
///
/// Nothing is mutated after [`IndexBuilder::finish`], so `&QGramIndex` can be
/// shared across threads without locking.
#[derive(Debug, Clone)]
pub struct QGramIndex {
    config: EngineConfig,
    /// q-gram -> ids containing it, one entry per occurrence, ascending.
    inverted_lists: HashMap<String, Vec<EntityId>>,
    entities: Vec<Entity>,
    /// `normalize(name)` per id, computed once at build time.
    normalized: Vec<String>,
}

pub struct IndexBuilder {
    config: EngineConfig,
    inverted_lists: HashMap<String, Vec<EntityId>>,
    entities: Vec<Entity>,
    normalized: Vec<String>,
}

impl IndexBuilder {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            inverted_lists: HashMap::new(),
            entities: Vec::new(),
            normalized: Vec::new(),
        })
    }

    /// Adds one entity under the next sequential id and returns that id.
    ///
    /// Ids are `u32`; pushing past `u32::MAX` entities fails with `TooManyEntities`.
    pub fn push(&mut self, name: impl Into<String>, score: Score) -> Result<EntityId> {
        let id = next_id(self.entities.len())?;
        let name = name.into();
        for gram in qgrams(&name, self.config.q) {
            self.inverted_lists.entry(gram).or_default().push(id);
        }
        self.normalized.push(normalize(&name));
        self.entities.push(Entity { id, name, score });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn finish(self) -> QGramIndex {
        tracing::info!(
            entities = self.entities.len(),
            qgrams = self.inverted_lists.len(),
            q = self.config.q,
            "q-gram index built"
        );
        QGramIndex {
            config: self.config,
            inverted_lists: self.inverted_lists,
            entities: self.entities,
            normalized: self.normalized,
        }
    }
}

fn next_id(len: usize) -> Result<EntityId> {
    EntityId::try_from(len).map_err(|_| Error::TooManyEntities { max: EntityId::MAX })
}

impl QGramIndex {
    /// Builds an index from records in order; the i-th record gets id `i`.
    pub fn build<I>(config: EngineConfig, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut builder = IndexBuilder::new(config)?;
        for record in records {
            builder.push(record.name, record.score)?;
        }
        Ok(builder.finish())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn q(&self) -> usize {
        self.config.q
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of distinct q-grams with a posting list.
    pub fn num_qgrams(&self) -> usize {
        self.inverted_lists.len()
    }

    pub fn posting_list(&self, qgram: &str) -> Option<&[EntityId]> {
        self.inverted_lists.get(qgram).map(Vec::as_slice)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(id as usize).ok_or(Error::UnknownId {
            id: i64::from(id),
            len: self.entities.len(),
        })
    }

    pub fn entity_name(&self, id: EntityId) -> Result<&str> {
        self.entity(id).map(|e| e.name.as_str())
    }

    pub fn entity_score(&self, id: EntityId) -> Result<Score> {
        self.entity(id).map(|e| e.score)
    }

    /// Checks a caller-supplied id (e.g. from a URL) against `[0, len)`.
    pub fn resolve_id(&self, raw: i64) -> Result<EntityId> {
        EntityId::try_from(raw)
            .ok()
            .filter(|&id| (id as usize) < self.entities.len())
            .ok_or(Error::UnknownId { id: raw, len: self.entities.len() })
    }

    /// Ids handed out by the candidate generator are always in range.
    pub(crate) fn entity_at(&self, id: EntityId) -> &Entity {
        &self.entities[id as usize]
    }

    pub(crate) fn normalized_name(&self, id: EntityId) -> &str {
        &self.normalized[id as usize]
    }
}
