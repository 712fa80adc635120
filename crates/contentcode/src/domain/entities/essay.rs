//! EssayRecord - Responses that need to be content-coded

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::EssayType;

/// Column layout of the essay corpus
pub const ESSAY_CSV_HEADER: [&str; 5] = ["pid", "dream", "dejavu", "conflict", "award"];

/// One participant's four free-text responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayRecord {
    #[serde(rename = "pid")]
    pub id: i64,
    pub dream: String,
    pub dejavu: String,
    pub conflict: String,
    pub award: String,
}

impl EssayRecord {
    /// Build a record from one row of the corpus
    ///
    /// Text fields are whitespace-normalized and must be non-empty afterwards.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DomainError> {
        if fields.len() != ESSAY_CSV_HEADER.len() {
            return Err(DomainError::InvalidRecord(format!(
                "invalid number of fields: expected {}, found {}",
                ESSAY_CSV_HEADER.len(),
                fields.len()
            )));
        }

        let pid = fields[0].as_ref();
        let id = pid
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidRecord(format!("invalid pid {}: {}", pid, e)))?;

        let text = |index: usize| -> Result<String, DomainError> {
            let cleaned = normalize_whitespace(fields[index].as_ref());
            if cleaned.is_empty() {
                return Err(DomainError::InvalidRecord(format!(
                    "empty {}",
                    ESSAY_CSV_HEADER[index]
                )));
            }
            Ok(cleaned)
        };

        Ok(Self {
            id,
            dream: text(1)?,
            dejavu: text(2)?,
            conflict: text(3)?,
            award: text(4)?,
        })
    }

    /// The response written for the given essay type
    pub fn select(&self, essay_type: EssayType) -> &str {
        match essay_type.canonical() {
            EssayType::Dream => &self.dream,
            EssayType::Dejavu => &self.dejavu,
            EssayType::Award => &self.award,
            _ => &self.conflict,
        }
    }
}

/// Collapse whitespace runs to single spaces and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_normalizes_text() {
        let record =
            EssayRecord::from_fields(&["42", "  a\n dream ", "deja\tvu", "conflict", "award"])
                .unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.dream, "a dream");
        assert_eq!(record.dejavu, "deja vu");
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let err = EssayRecord::from_fields(&["1", "a", "b", "c"]).unwrap_err();
        assert!(err.to_string().contains("invalid number of fields"));
    }

    #[test]
    fn test_non_numeric_pid_rejected() {
        let err = EssayRecord::from_fields(&["p1", "a", "b", "c", "d"]).unwrap_err();
        assert!(err.to_string().contains("invalid pid p1"));
    }

    #[test]
    fn test_blank_text_rejected() {
        let err = EssayRecord::from_fields(&["1", "a", " \n ", "c", "d"]).unwrap_err();
        assert!(err.to_string().contains("empty dejavu"));
    }

    #[test]
    fn test_select_treats_angry_as_conflict() {
        let record = EssayRecord::from_fields(&["7", "dr", "dv", "cf", "aw"]).unwrap();
        assert_eq!(record.select(EssayType::Dream), "dr");
        assert_eq!(record.select(EssayType::Dejavu), "dv");
        assert_eq!(record.select(EssayType::Conflict), "cf");
        assert_eq!(record.select(EssayType::Angry), "cf");
        assert_eq!(record.select(EssayType::Award), "aw");
    }
}
