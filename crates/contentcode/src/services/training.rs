//! Training Preparation - Human-coded score files to prompt/completion JSONL
//!
//! Two scored file layouts are recognised by their header:
//! - humility: `pid,response,hum1..hum6,standardized`
//! - spirituality: `pid,response,layDefinition,spir1..spir4,standardized`

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::corpus::RowDiagnostic;
use crate::domain::entities::normalize_whitespace;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::RubricFamily;
use crate::ports::CorpusStore;

/// Marks the end of a prompt in a training record
pub const PROMPT_SEPARATOR: &str = "\n\n###\n\n";

const COMPLETION_START: &str = " ";
const COMPLETION_STOP: &str = "\n";

pub const HUMILITY_CSV_HEADER: [&str; 9] = [
    "pid",
    "response",
    "hum1",
    "hum2",
    "hum3",
    "hum4",
    "hum5",
    "hum6",
    "standardized",
];

pub const SPIRITUAL_CSV_HEADER: [&str; 8] = [
    "pid",
    "response",
    "layDefinition",
    "spir1",
    "spir2",
    "spir3",
    "spir4",
    "standardized",
];

/// One line of a fine-tuning file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub prompt: String,
    pub completion: String,
}

/// A response with its human-assigned ratings
#[derive(Debug, Clone, PartialEq)]
pub struct CodedResponse {
    pub id: i64,
    pub family: RubricFamily,
    pub response: String,
    /// Integer ratings in column order
    pub ratings: Vec<i64>,
    pub standardized: f64,
}

impl CodedResponse {
    /// Column names for a family's scored file
    pub fn header(family: RubricFamily) -> &'static [&'static str] {
        match family {
            RubricFamily::Humility => &HUMILITY_CSV_HEADER,
            RubricFamily::Spirituality => &SPIRITUAL_CSV_HEADER,
        }
    }

    /// Identify the file family from its header row
    pub fn identify<S: AsRef<str>>(header: &[S]) -> Result<RubricFamily, DomainError> {
        let first = header.first().map(|s| s.as_ref().trim());
        match (header.len(), first) {
            (9, Some("pid")) => Ok(RubricFamily::Humility),
            (8, Some("pid")) => Ok(RubricFamily::Spirituality),
            _ => Err(DomainError::Validation(format!(
                "unrecognised scored file header: {}",
                header
                    .iter()
                    .map(|s| s.as_ref())
                    .collect::<Vec<_>>()
                    .join(",")
            ))),
        }
    }

    pub fn from_fields<S: AsRef<str>>(
        family: RubricFamily,
        fields: &[S],
    ) -> Result<Self, DomainError> {
        let header = Self::header(family);
        if fields.len() != header.len() {
            return Err(DomainError::InvalidRecord(format!(
                "invalid number of fields: expected {}, found {}",
                header.len(),
                fields.len()
            )));
        }

        let field = |index: usize| fields[index].as_ref().trim();
        let invalid = |index: usize, e: &dyn std::fmt::Display| {
            DomainError::InvalidRecord(format!("invalid {} {}: {}", header[index], field(index), e))
        };

        let id = field(0).parse::<i64>().map_err(|e| invalid(0, &e))?;

        let response = normalize_whitespace(fields[1].as_ref());
        if response.is_empty() {
            return Err(DomainError::InvalidRecord("empty response".to_string()));
        }

        let last = header.len() - 1;
        let ratings = (2..last)
            .map(|index| field(index).parse::<i64>().map_err(|e| invalid(index, &e)))
            .collect::<Result<Vec<_>, _>>()?;
        let standardized = field(last)
            .parse::<f64>()
            .map_err(|e| invalid(last, &e))?;

        Ok(Self {
            id,
            family,
            response,
            ratings,
            standardized,
        })
    }

    /// Ratings then the standardized score, space separated
    pub fn results(&self) -> String {
        let mut parts: Vec<String> = self.ratings.iter().map(i64::to_string).collect();
        parts.push(format!("{:.2}", self.standardized));
        parts.join(" ")
    }

    pub fn training_record(&self) -> TrainingRecord {
        TrainingRecord {
            prompt: format!("{}{}", self.response, PROMPT_SEPARATOR),
            completion: format!("{}{}{}", COMPLETION_START, self.results(), COMPLETION_STOP),
        }
    }
}

/// Training records from one scored file, plus the rows that were skipped
#[derive(Debug, Default)]
pub struct TrainingSet {
    pub records: Vec<TrainingRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Read a scored file and convert every valid row
pub fn prepare_training_records(
    store: &dyn CorpusStore,
    path: impl AsRef<Path>,
) -> Result<TrainingSet, DomainError> {
    let path = path.as_ref();
    let table = store.load_records(path)?;
    let family = CodedResponse::identify(&table.header)?;

    let set = table
        .rows
        .iter()
        .enumerate()
        .fold(TrainingSet::default(), |mut set, (index, row)| {
            match CodedResponse::from_fields(family, row) {
                Ok(coded) => set.records.push(coded.training_record()),
                Err(error) => set.diagnostics.push(RowDiagnostic { index, error }),
            }
            set
        });

    for diagnostic in &set.diagnostics {
        tracing::warn!(
            "{}: line {}: {}",
            path.display(),
            diagnostic.line(),
            diagnostic.error
        );
    }
    tracing::info!(
        "🧪 Prepared {} {:?} training records from {}",
        set.records.len(),
        family,
        path.display()
    );

    Ok(set)
}

/// Write records as JSON lines, appending to or replacing `path`
pub fn write_training_file(
    path: impl AsRef<Path>,
    append: bool,
    records: &[TrainingRecord],
) -> Result<(), DomainError> {
    let path = path.as_ref();
    let io_error =
        |e: &dyn std::fmt::Display| DomainError::Repository(format!("{}: {}", path.display(), e));

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| io_error(&e))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|e| io_error(&e))?;
        writer.write_all(b"\n").map_err(|e| io_error(&e))?;
    }
    writer.flush().map_err(|e| io_error(&e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MemoryStore;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identify() {
        assert_eq!(
            CodedResponse::identify(&HUMILITY_CSV_HEADER).unwrap(),
            RubricFamily::Humility
        );
        assert_eq!(
            CodedResponse::identify(&SPIRITUAL_CSV_HEADER).unwrap(),
            RubricFamily::Spirituality
        );
        assert!(matches!(
            CodedResponse::identify(&["pid", "dream", "dejavu", "conflict", "award"]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_humility_training_record() {
        let coded = CodedResponse::from_fields(
            RubricFamily::Humility,
            &["7", "  I  let\nthem win. ", "1", "2", "3", "4", "5", "6", "0.5"],
        )
        .unwrap();

        assert_eq!(coded.id, 7);
        assert_eq!(
            coded.training_record(),
            TrainingRecord {
                prompt: "I let them win.\n\n###\n\n".to_string(),
                completion: " 1 2 3 4 5 6 0.50\n".to_string(),
            }
        );
    }

    #[test]
    fn test_spiritual_training_record() {
        let coded = CodedResponse::from_fields(
            RubricFamily::Spirituality,
            &["3", "A dream.", "1", "0", "2", "1", "0", "-1.234"],
        )
        .unwrap();
        assert_eq!(coded.training_record().completion, " 1 0 2 1 0 -1.23\n");
    }

    #[test]
    fn test_invalid_rating_names_column() {
        let err = CodedResponse::from_fields(
            RubricFamily::Humility,
            &["7", "text", "1", "x", "3", "4", "5", "6", "0.5"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid hum2 x"));
    }

    #[test]
    fn test_prepare_skips_bad_rows() {
        let store = MemoryStore::with_table(
            "spiritual.csv",
            &SPIRITUAL_CSV_HEADER,
            vec![
                row(&["1", "first", "1", "1", "1", "1", "1", "1.0"]),
                row(&["2", "   ", "1", "1", "1", "1", "1", "1.0"]),
                row(&["3", "third", "1", "1", "1", "1", "1", "0.0"]),
            ],
        );

        let set = prepare_training_records(&store, "spiritual.csv").unwrap();
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.diagnostics.len(), 1);
        assert_eq!(set.diagnostics[0].line(), 3);
    }

    #[test]
    fn test_prepare_rejects_unknown_layout() {
        let store = MemoryStore::with_table("essays.csv", &["pid", "response"], vec![]);
        let result = prepare_training_records(&store, "essays.csv");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_write_training_file_truncates_or_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        let record = TrainingRecord {
            prompt: "p\n\n###\n\n".to_string(),
            completion: " 1 0.00\n".to_string(),
        };

        write_training_file(&path, false, &[record.clone()]).unwrap();
        write_training_file(&path, true, &[record.clone()]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        let parsed: TrainingRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(parsed, record);

        write_training_file(&path, false, &[record]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
