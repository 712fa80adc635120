//! EssayScore - The coded result for one essay

use serde::{Deserialize, Serialize};

use super::chat::{ChatRequest, ChatResponse};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::EssayType;

/// Column layout of the score file
pub const ESSAY_SCORE_CSV_HEADER: [&str; 6] =
    ["pid", "essay_type", "essay", "score", "comments", "millis"];

/// Content-coded score for a single essay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayScore {
    pub pid: i64,
    pub essay_type: EssayType,
    pub essay: String,
    pub score: f32,
    pub comments: String,
    pub millis: u64,
}

impl EssayScore {
    /// Fields of one score row; the score is written with two decimals
    pub fn csv_fields(&self) -> Vec<String> {
        vec![
            self.pid.to_string(),
            self.essay_type.to_string(),
            self.essay.clone(),
            format!("{:.2}", self.score),
            self.comments.clone(),
            self.millis.to_string(),
        ]
    }

    /// Parse a row previously produced by [`EssayScore::csv_fields`]
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DomainError> {
        if fields.len() != ESSAY_SCORE_CSV_HEADER.len() {
            return Err(DomainError::InvalidRecord(format!(
                "invalid number of fields: expected {}, found {}",
                ESSAY_SCORE_CSV_HEADER.len(),
                fields.len()
            )));
        }
        let field = |i: usize| fields[i].as_ref();
        let invalid = |name: &str, value: &str| {
            DomainError::InvalidRecord(format!("invalid {} {}", name, value))
        };

        Ok(Self {
            pid: field(0).parse().map_err(|_| invalid("pid", field(0)))?,
            essay_type: field(1).parse()?,
            essay: field(2).to_string(),
            score: field(3).parse().map_err(|_| invalid("score", field(3)))?,
            comments: field(4).to_string(),
            millis: field(5).parse().map_err(|_| invalid("millis", field(5)))?,
        })
    }
}

/// Request, response and score for a single essay
#[derive(Debug, Clone, Serialize)]
pub struct EssayCompletion {
    pub request: ChatRequest,
    pub response: ChatResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<EssayScore>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_fields_round_trip() {
        let score = EssayScore {
            pid: 101,
            essay_type: EssayType::Angry,
            essay: "They were upset, and I apologized.".to_string(),
            score: 0.756,
            comments: "0.75\nThe participant takes responsibility.".to_string(),
            millis: 1234,
        };
        let fields = score.csv_fields();
        assert_eq!(fields[3], "0.76");

        let parsed = EssayScore::from_fields(&fields).unwrap();
        assert_eq!(parsed.pid, 101);
        assert_eq!(parsed.essay_type, EssayType::Angry);
        assert_eq!(parsed.essay, score.essay);
        assert_eq!(parsed.score, 0.76);
        assert_eq!(parsed.comments, score.comments);
        assert_eq!(parsed.millis, 1234);
    }

    #[test]
    fn test_from_fields_rejects_bad_type() {
        let err = EssayScore::from_fields(&["1", "nightmare", "e", "0.10", "c", "5"]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidEssayType(_)));
    }
}
