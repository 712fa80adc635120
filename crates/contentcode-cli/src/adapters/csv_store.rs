//! CSV Corpus Store Implementation
//!
//! Reads and writes comma-separated files with a header row using the csv crate.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};

use contentcode::{CorpusStore, DomainError, Table};

/// File-backed CorpusStore
///
/// Rows may differ in length; arity is checked by whoever interprets them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCorpusStore;

impl CsvCorpusStore {
    pub fn new() -> Self {
        Self
    }
}

fn repository_error(path: &Path, e: csv::Error) -> DomainError {
    DomainError::Repository(format!("{}: {}", path.display(), e))
}

/// Decode a record's fields, replacing invalid UTF-8 rather than rejecting the row
fn fields(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

impl CorpusStore for CsvCorpusStore {
    fn load_records(&self, path: &Path) -> Result<Table, DomainError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| repository_error(path, e))?;

        let header = fields(reader.byte_headers().map_err(|e| repository_error(path, e))?);

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(|e| repository_error(path, e))?;
            if std::str::from_utf8(record.as_slice()).is_err() {
                let line = record.position().map_or(0, |p| p.line());
                tracing::warn!(
                    "{}: line {}: invalid UTF-8 replaced",
                    path.display(),
                    line
                );
            }
            rows.push(fields(&record));
        }

        tracing::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Table { header, rows })
    }

    fn write_records(&self, path: &Path, table: &Table) -> Result<(), DomainError> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| repository_error(path, e))?;

        writer
            .write_record(&table.header)
            .map_err(|e| repository_error(path, e))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| repository_error(path, e))?;
        }
        writer
            .flush()
            .map_err(|e| DomainError::Repository(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentcode::{read_scores, write_scores, EssayCorpus, EssayScore, EssayType};
    use std::fs;

    #[test]
    fn test_corpus_skips_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essays.csv");
        fs::write(
            &path,
            "pid,dream,dejavu,conflict,award\n\
             1,a dream,a dejavu,a conflict,an award\n\
             2,only,four,fields\n\
             3,\"multi\nline\",b,c,d\n",
        )
        .unwrap();

        let corpus = EssayCorpus::load(&CsvCorpusStore::new(), &path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.diagnostics().len(), 1);
        assert_eq!(corpus.diagnostics()[0].line(), 3);
        assert_eq!(corpus.by_id(3).unwrap().dream, "multi line");
    }

    #[test]
    fn test_invalid_utf8_row_does_not_abort_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essays.csv");
        let mut content = b"pid,dream,dejavu,conflict,award\n1,a,b,c,d\n2,caf".to_vec();
        content.push(0xE9);
        content.extend_from_slice(b",b,c,d\n3,a,b,c,d\n");
        fs::write(&path, content).unwrap();

        let corpus = EssayCorpus::load(&CsvCorpusStore::new(), &path).unwrap();
        assert_eq!(corpus.len(), 3);
        assert!(corpus.diagnostics().is_empty());
        assert_eq!(corpus.by_id(2).unwrap().dream, "caf\u{FFFD}");
        assert_eq!(corpus.by_id(3).unwrap().dream, "a");
    }

    #[test]
    fn test_scores_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let scores = vec![EssayScore {
            pid: 12,
            essay_type: EssayType::Angry,
            essay: "I argued, then listened.".to_string(),
            score: 0.75,
            comments: "0.75 Mostly consistent, with \"quotes\".".to_string(),
            millis: 830,
        }];

        let store = CsvCorpusStore::new();
        write_scores(&store, &path, &scores).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("pid,essay_type,essay,score,comments,millis\n"));
        assert!(content.contains(",0.75,"));

        assert_eq!(read_scores(&store, &path).unwrap(), scores);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvCorpusStore::new().load_records(Path::new("/nonexistent/essays.csv"));
        assert!(matches!(result, Err(DomainError::Repository(_))));
    }
}
