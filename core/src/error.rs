use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown entity id {id} (index holds {len} entities)")]
    UnknownId { id: i64, len: usize },

    #[error("{} malformed corpus record(s), first at line {}", .0.len(), first_line(.0))]
    Malformed(Vec<MalformedRecord>),

    #[error("index is full: entity ids stop at {max}")]
    TooManyEntities { max: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
}

fn first_line(records: &[MalformedRecord]) -> usize {
    records.first().map(|r| r.line).unwrap_or(0)
}

/// A corpus line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    /// 1-based line number in the corpus.
    pub line: usize,
    pub reason: MalformedReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("expected a tab-separated score field")]
    MissingScore,
    #[error("score {0:?} is not an integer")]
    InvalidScore(String),
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_summary_names_first_line() {
        let err = Error::Malformed(vec![
            MalformedRecord { line: 4, reason: MalformedReason::MissingScore },
            MalformedRecord { line: 9, reason: MalformedReason::InvalidScore("x".into()) },
        ]);
        assert_eq!(err.to_string(), "2 malformed corpus record(s), first at line 4");
    }

    #[test]
    fn record_display() {
        let rec = MalformedRecord { line: 2, reason: MalformedReason::InvalidScore("1.5".into()) };
        assert_eq!(rec.to_string(), "line 2: score \"1.5\" is not an integer");
    }
}
