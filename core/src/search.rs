use serde::Serialize;

use crate::index::QGramIndex;
use crate::ped::prefix_edit_distance;
use crate::rank::rank;
use crate::tokenizer::normalize;
use crate::{EntityId, Match, Score};

/// One tolerated edit per this many query characters.
pub const EDITS_PER_CHARS: usize = 4;

/// Maximum PED tolerated for a normalized query.
pub fn threshold_for(query: &str) -> usize {
    query.chars().count() / EDITS_PER_CHARS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<'a> {
    pub entity_id: EntityId,
    pub name: &'a str,
    pub score: Score,
    pub ped: usize,
}

impl QGramIndex {
    /// Fuzzy prefix search for a raw user query, best matches first.
    ///
    /// Never fails: a query that normalizes to nothing yields no hits.
    pub fn search(&self, raw_query: &str) -> Vec<SearchHit<'_>> {
        let query = normalize(raw_query);
        if query.is_empty() {
            return Vec::new();
        }
        let delta = threshold_for(&query);
        let ranked = rank(self.find_matches(&query, delta));
        tracing::debug!(query = %query, delta, hits = ranked.len(), "search");
        ranked
            .into_iter()
            .map(|m| SearchHit {
                entity_id: m.entity_id,
                name: &self.entity_at(m.entity_id).name,
                score: m.score,
                ped: m.ped,
            })
            .collect()
    }

    /// Candidates of a normalized `query` whose PED is at most `delta`, in id order.
    pub fn find_matches(&self, query: &str, delta: usize) -> Vec<Match> {
        self.candidates(query, delta)
            .into_iter()
            .filter_map(|id| {
                let ped = prefix_edit_distance(query, self.normalized_name(id), delta);
                (ped <= delta).then(|| Match {
                    entity_id: id,
                    score: self.entity_at(id).score,
                    ped,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, Record};

    #[test]
    fn threshold_grows_every_four_chars() {
        assert_eq!(threshold_for(""), 0);
        assert_eq!(threshold_for("foo"), 0);
        assert_eq!(threshold_for("foot"), 1);
        assert_eq!(threshold_for("tübingen"), 2);
    }

    #[test]
    fn find_matches_keeps_id_order() {
        let records = ["foot", "football", "foo"].into_iter().map(|n| Record::new(n, 1));
        let idx = QGramIndex::build(EngineConfig::default(), records).unwrap();
        let matches = idx.find_matches("foot", 1);
        assert_eq!(
            matches,
            vec![
                Match { entity_id: 0, score: 1, ped: 0 },
                Match { entity_id: 1, score: 1, ped: 0 },
                Match { entity_id: 2, score: 1, ped: 1 },
            ]
        );
    }
}
