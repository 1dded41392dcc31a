use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::index::QGramIndex;
use crate::tokenizer::qgrams;
use crate::EntityId;

/// How many q-grams an entity must share with the query to be scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateFilter {
    /// `common >= threshold`, the same delta that bounds the edit distance.
    #[default]
    Loose,
    /// `common >= |query q-grams| - threshold * q` (at least 1). Fewer false
    /// positives reach the scorer; the final matches are the same.
    Pigeonhole,
}

impl CandidateFilter {
    pub fn required(self, query_qgrams: usize, threshold: usize, q: usize) -> usize {
        match self {
            CandidateFilter::Loose => threshold,
            CandidateFilter::Pigeonhole => query_qgrams.saturating_sub(threshold * q).max(1),
        }
    }
}

impl FromStr for CandidateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(CandidateFilter::Loose),
            "pigeonhole" => Ok(CandidateFilter::Pigeonhole),
            other => Err(format!("unknown candidate filter {other:?} (expected loose or pigeonhole)")),
        }
    }
}

impl fmt::Display for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateFilter::Loose => f.write_str("loose"),
            CandidateFilter::Pigeonhole => f.write_str("pigeonhole"),
        }
    }
}

/// Multiset union of posting lists, counted per id instead of materialized.
pub fn common_qgram_counts<'a, I>(lists: I) -> HashMap<EntityId, usize>
where
    I: IntoIterator<Item = &'a [EntityId]>,
{
    let mut counts: HashMap<EntityId, usize> = HashMap::new();
    for list in lists {
        for &id in list {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts
}

impl QGramIndex {
    /// Ids sharing enough q-grams with the normalized `query`, ascending.
    ///
    /// Each distinct query q-gram contributes its whole posting list, so an
    /// entity containing a q-gram twice counts twice.
    pub fn candidates(&self, query: &str, threshold: usize) -> Vec<EntityId> {
        let grams = qgrams(query, self.q());
        let mut seen: HashSet<&str> = HashSet::with_capacity(grams.len());
        let lists = grams
            .iter()
            .filter(|g| seen.insert(g.as_str()))
            .filter_map(|g| self.posting_list(g));
        let counts = common_qgram_counts(lists);

        let required = self.config().filter.required(grams.len(), threshold, self.q());
        let mut ids: Vec<EntityId> = counts
            .into_iter()
            .filter(|&(_, common)| common >= required)
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        tracing::debug!(query, threshold, required, candidates = ids.len(), "generated candidates");
        ids
    }
}
