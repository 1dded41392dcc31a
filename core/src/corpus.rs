//! Tab-separated corpus files: `name<TAB>score[<TAB>ignored...]`, one entity per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::EngineConfig;
use crate::index::{IndexBuilder, QGramIndex};
use crate::{Error, MalformedReason, MalformedRecord, Result, Score};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub score: Score,
}

impl Record {
    pub fn new(name: impl Into<String>, score: Score) -> Self {
        Self { name: name.into(), score }
    }
}

/// An index together with the lines that were skipped while building it.
#[derive(Debug)]
pub struct LoadedCorpus {
    pub index: QGramIndex,
    pub skipped: Vec<MalformedRecord>,
}

impl LoadedCorpus {
    /// The index, or an error listing every skipped line if there were any.
    pub fn strict(self) -> Result<QGramIndex> {
        if self.skipped.is_empty() {
            Ok(self.index)
        } else {
            Err(Error::Malformed(self.skipped))
        }
    }
}

/// Parses one corpus line. A line without a tab (blank lines included) has no score.
pub fn parse_line(line_no: usize, line: &str) -> std::result::Result<Record, MalformedRecord> {
    let mut fields = line.split('\t');
    let name = fields.next().unwrap_or_default();
    let score = fields
        .next()
        .ok_or(MalformedRecord { line: line_no, reason: MalformedReason::MissingScore })?;
    let score = score.trim();
    let score: Score = score.parse().map_err(|_| MalformedRecord {
        line: line_no,
        reason: MalformedReason::InvalidScore(score.to_string()),
    })?;
    Ok(Record::new(name, score))
}

/// Decodes one raw line (without its `\n`) and parses it.
fn decode_line(line_no: usize, mut raw: Vec<u8>) -> std::result::Result<Record, MalformedRecord> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    let line = String::from_utf8(raw)
        .map_err(|_| MalformedRecord { line: line_no, reason: MalformedReason::InvalidUtf8 })?;
    parse_line(line_no, &line)
}

/// Builds an index from every well-formed line. Bad lines are collected in
/// `skipped`; only read failures, an invalid config or running out of ids
/// abort the load.
pub fn load_from_reader<R: BufRead>(reader: R, config: EngineConfig) -> Result<LoadedCorpus> {
    let mut builder = IndexBuilder::new(config)?;
    let mut skipped = Vec::new();
    for (i, raw) in reader.split(b'\n').enumerate() {
        match decode_line(i + 1, raw?) {
            Ok(record) => {
                builder.push(record.name, record.score)?;
            }
            Err(bad) => {
                tracing::warn!(line = bad.line, reason = %bad.reason, "skipping malformed corpus record");
                skipped.push(bad);
            }
        }
    }
    Ok(LoadedCorpus { index: builder.finish(), skipped })
}

pub fn load_from_path<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<LoadedCorpus> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading corpus");
    let f = File::open(path)?;
    load_from_reader(BufReader::new(f), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extra_fields_are_ignored() {
        let rec = parse_line(1, "Freiburg im Breisgau\t230\tDE\t47.99").unwrap();
        assert_eq!(rec, Record::new("Freiburg im Breisgau", 230));
    }

    #[test]
    fn crlf_and_negative_scores_parse() {
        assert_eq!(parse_line(1, "Bern\t-4\r").unwrap(), Record::new("Bern", -4));
        let loaded = load_from_reader(&b"Bern\t-4\r\nBasel\t2\r\n"[..], EngineConfig::default()).unwrap();
        assert_eq!(loaded.index.entity_name(0).unwrap(), "Bern");
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn missing_or_bad_score_is_malformed() {
        assert_eq!(
            parse_line(7, "Basel"),
            Err(MalformedRecord { line: 7, reason: MalformedReason::MissingScore })
        );
        assert_eq!(
            parse_line(8, "Basel\tmany"),
            Err(MalformedRecord { line: 8, reason: MalformedReason::InvalidScore("many".into()) })
        );
    }

    #[test]
    fn blank_lines_have_no_score() {
        assert_eq!(parse_line(3, "   "), Err(MalformedRecord { line: 3, reason: MalformedReason::MissingScore }));
        assert_eq!(parse_line(4, ""), Err(MalformedRecord { line: 4, reason: MalformedReason::MissingScore }));
    }

    #[test]
    fn loader_skips_and_reports() {
        let text = "Foobar\t3\nbroken line\nFootbal\t1\n   \nTuborg\tx\n";
        let loaded = load_from_reader(text.as_bytes(), EngineConfig::default()).unwrap();
        assert_eq!(loaded.index.len(), 2);
        assert_eq!(loaded.index.entity_name(1).unwrap(), "Footbal");
        let lines: Vec<usize> = loaded.skipped.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
        match loaded.strict() {
            Err(Error::Malformed(bad)) => assert_eq!(bad.len(), 3),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_line_is_skipped_not_fatal() {
        let bytes: &[u8] = b"Foobar\t3\nBad\xff\xfename\t2\nFootbal\t1\n";
        let loaded = load_from_reader(bytes, EngineConfig::default()).unwrap();
        assert_eq!(loaded.index.len(), 2);
        assert_eq!(loaded.index.entity_name(1).unwrap(), "Footbal");
        assert_eq!(loaded.skipped, vec![MalformedRecord { line: 2, reason: MalformedReason::InvalidUtf8 }]);
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let loaded = load_from_reader(&b"Foobar\t3\nFootbal\t1"[..], EngineConfig::default()).unwrap();
        assert_eq!(loaded.index.len(), 2);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cities.tsv");
        fs::write(&path, "Tübingen\t1\tDE\nno score\nTuborg\t2\n").unwrap();

        let loaded = load_from_path(&path, EngineConfig::default()).unwrap();
        assert_eq!(loaded.index.len(), 2);
        assert_eq!(loaded.index.entity_score(1).unwrap(), 2);
        assert_eq!(loaded.skipped.len(), 1);

        let missing = load_from_path(dir.path().join("absent.tsv"), EngineConfig::default());
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
