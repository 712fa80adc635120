//! Corpus Store Port
//!
//! Abstract interface for reading and writing tabular files.

use std::path::Path;

use crate::domain::errors::DomainError;

/// A header row plus data rows
///
/// Rows are not required to match the header's arity; callers validate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Tabular file storage
pub trait CorpusStore: Send + Sync {
    /// Load the header and all data rows from `path`
    fn load_records(&self, path: &Path) -> Result<Table, DomainError>;

    /// Replace the contents of `path` with `table`
    fn write_records(&self, path: &Path, table: &Table) -> Result<(), DomainError>;
}
