//! Essay Corpus - Best-effort loading and selection of essay records

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::EssayRecord;
use crate::domain::errors::DomainError;
use crate::ports::CorpusStore;

/// A row that was skipped while loading
#[derive(Debug)]
pub struct RowDiagnostic {
    /// Zero-based index among the data rows
    pub index: usize,
    pub error: DomainError,
}

impl RowDiagnostic {
    /// One-based file line, counting the header
    pub fn line(&self) -> usize {
        self.index + 2
    }
}

/// The successfully loaded essays of one corpus file
#[derive(Debug, Default)]
pub struct EssayCorpus {
    records: Vec<EssayRecord>,
    diagnostics: Vec<RowDiagnostic>,
}

impl EssayCorpus {
    /// Load essays from `path`, skipping (and logging) rows that fail validation
    ///
    /// Only an unreadable file is an error.
    pub fn load(store: &dyn CorpusStore, path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let table = store.load_records(path)?;
        let corpus = Self::from_rows(&table.rows);

        for diagnostic in &corpus.diagnostics {
            tracing::warn!(
                "{}: line {}: {}",
                path.display(),
                diagnostic.line(),
                diagnostic.error
            );
        }
        tracing::info!(
            "📚 Loaded {} essays from {} ({} rows skipped)",
            corpus.records.len(),
            path.display(),
            corpus.diagnostics.len()
        );

        Ok(corpus)
    }

    /// Validate data rows (header already removed)
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        rows.iter()
            .enumerate()
            .fold(Self::default(), |mut corpus, (index, row)| {
                match EssayRecord::from_fields(row) {
                    Ok(record) => corpus.records.push(record),
                    Err(error) => corpus.diagnostics.push(RowDiagnostic { index, error }),
                }
                corpus
            })
    }

    pub fn records(&self) -> &[EssayRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[RowDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Uniformly chosen record
    pub fn random(&self) -> Result<&EssayRecord, DomainError> {
        self.random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&EssayRecord, DomainError> {
        self.records.choose(rng).ok_or(DomainError::EmptyCorpus)
    }

    /// First record with the given participant ID
    pub fn by_id(&self, id: i64) -> Result<&EssayRecord, DomainError> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| DomainError::not_found("essay record", id))
    }
}
