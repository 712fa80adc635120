//! Result Writer - Persists essay scores as a six-column table

use std::path::Path;

use crate::domain::entities::{EssayScore, ESSAY_SCORE_CSV_HEADER};
use crate::domain::errors::DomainError;
use crate::ports::{CorpusStore, Table};

/// Write `scores` to `path` in accumulation order, replacing any existing file
pub fn write_scores(
    store: &dyn CorpusStore,
    path: impl AsRef<Path>,
    scores: &[EssayScore],
) -> Result<(), DomainError> {
    let path = path.as_ref();
    let mut table = Table::new(&ESSAY_SCORE_CSV_HEADER);
    table.rows = scores.iter().map(EssayScore::csv_fields).collect();

    store.write_records(path, &table)?;
    tracing::info!("💾 Wrote {} scores to {}", scores.len(), path.display());
    Ok(())
}

/// Read a score file written by [`write_scores`]
pub fn read_scores(
    store: &dyn CorpusStore,
    path: impl AsRef<Path>,
) -> Result<Vec<EssayScore>, DomainError> {
    let table = store.load_records(path.as_ref())?;
    if table.header != ESSAY_SCORE_CSV_HEADER {
        return Err(DomainError::Validation(format!(
            "unexpected score file header: {}",
            table.header.join(",")
        )));
    }
    table
        .rows
        .iter()
        .map(|row| EssayScore::from_fields(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EssayType;
    use crate::services::testing::MemoryStore;

    fn score(pid: i64, value: f32) -> EssayScore {
        EssayScore {
            pid,
            essay_type: EssayType::Dejavu,
            essay: format!("essay, \"quoted\" {pid}"),
            score: value,
            comments: format!("{value} because\nreasons"),
            millis: 100 + pid as u64,
        }
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::default();
        let scores = vec![score(3, 0.5), score(1, -0.25), score(2, 1.0)];

        write_scores(&store, "scores.csv", &scores).unwrap();

        let table = store.table("scores.csv").unwrap();
        assert_eq!(table.header, ESSAY_SCORE_CSV_HEADER);
        assert_eq!(table.rows[0][3], "0.50");

        let read = read_scores(&store, "scores.csv").unwrap();
        assert_eq!(read, scores);
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let store = MemoryStore::with_table("essays.csv", &["pid", "dream"], Vec::new());
        assert!(matches!(
            read_scores(&store, "essays.csv"),
            Err(DomainError::Validation(_))
        ));
    }
}
