use serde::{Deserialize, Serialize};

use crate::candidates::CandidateFilter;
use crate::{Error, Result};

pub const DEFAULT_Q: usize = 3;

/// Knobs fixed at build time and carried by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of every q-gram.
    pub q: usize,
    pub filter: CandidateFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { q: DEFAULT_Q, filter: CandidateFilter::default() }
    }
}

impl EngineConfig {
    pub fn with_q(q: usize) -> Self {
        Self { q, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.q == 0 {
            return Err(Error::InvalidConfig("q must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_q_is_rejected() {
        assert!(matches!(EngineConfig::with_q(0).validate(), Err(Error::InvalidConfig(_))));
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"filter":"pigeonhole"}"#).unwrap();
        assert_eq!(cfg.q, DEFAULT_Q);
        assert_eq!(cfg.filter, CandidateFilter::Pigeonhole);
    }
}
