//! Score Extractor - Recovers a numeric score from a model's free-text reply
//!
//! Lenient first-match policy: the first whitespace-delimited token that looks
//! like a number wins. Scores outside [-1.0, 1.0] are returned unchanged.

use crate::domain::entities::{ChatResponse, EssayRecord, EssayScore};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::EssayType;

/// Find the first score in `text`, scanning from the end when `reverse` is set
pub fn extract_score(text: &str, reverse: bool) -> Result<f32, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyResponse);
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if reverse {
        tokens.reverse();
    }

    tokens
        .into_iter()
        .find_map(parse_score)
        .ok_or(DomainError::NoScoreFound)
}

/// Parse one token as a score
///
/// The token must start with a digit or sign; trailing non-digits are
/// stripped before parsing.
pub fn parse_score(token: &str) -> Option<f32> {
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || first == '+' || first == '-') {
        return None;
    }

    let number = token.trim_end_matches(|c: char| !c.is_ascii_digit());
    number.parse::<f32>().ok().filter(|v| v.is_finite())
}

impl ChatResponse {
    /// Score from the first choice's content
    pub fn extract_score(&self, reverse: bool) -> Result<f32, DomainError> {
        extract_score(self.first_message_content()?, reverse)
    }
}

impl EssayScore {
    /// Score an essay from a successful response
    pub fn from_response(
        essay: &EssayRecord,
        essay_type: EssayType,
        response: &ChatResponse,
        reverse: bool,
        millis: u64,
    ) -> Result<Self, DomainError> {
        let score = response.extract_score(reverse)?;
        let comments = response.first_message_content()?;

        Ok(Self {
            pid: essay.id,
            essay_type,
            essay: essay.select(essay_type).to_string(),
            score,
            comments: comments.to_string(),
            millis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{essay_row, reply};

    #[test]
    fn test_forward_scan() {
        assert_eq!(extract_score("0.8 because ...", false).unwrap(), 0.8);
    }

    #[test]
    fn test_reverse_scan_strips_punctuation() {
        let score = extract_score("... because reasons. Score: -1.", true).unwrap();
        assert_eq!(score, -1.0);
    }

    #[test]
    fn test_reverse_finds_last_number() {
        let text = "Score 0.2 at first, but on reflection 0.6";
        assert_eq!(extract_score(text, false).unwrap(), 0.2);
        assert_eq!(extract_score(text, true).unwrap(), 0.6);
    }

    #[test]
    fn test_no_numbers() {
        assert!(matches!(
            extract_score("no numbers here", false),
            Err(DomainError::NoScoreFound)
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(
            extract_score("  \n ", false),
            Err(DomainError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_score_tokens() {
        assert_eq!(parse_score("+0.5,"), Some(0.5));
        assert_eq!(parse_score("0.75)."), Some(0.75));
        assert_eq!(parse_score("1"), Some(1.0));
        assert_eq!(parse_score("-"), None);
        assert_eq!(parse_score("(0.5)"), None);
        assert_eq!(parse_score("Score:"), None);
        assert_eq!(parse_score("3/10"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        assert_eq!(extract_score("7 out of ten", false).unwrap(), 7.0);
    }

    #[test]
    fn test_skips_tokens_beyond_f32_range() {
        assert_eq!(extract_score("1e39 then 0.5", false).unwrap(), 0.5);
        assert_eq!(parse_score("-1e39"), None);
    }

    #[test]
    fn test_skips_unparseable_eligible_tokens() {
        assert_eq!(extract_score("1/2 then 0.4", false).unwrap(), 0.4);
    }

    #[test]
    fn test_response_without_choices() {
        let response = ChatResponse::default();
        assert!(matches!(
            response.extract_score(false),
            Err(DomainError::EmptyResponse)
        ));
    }

    #[test]
    fn test_essay_score_from_response() {
        let essay = EssayRecord::from_fields(&essay_row(5)).unwrap();
        let response = reply("-0.25 The participant blames others.");
        let score =
            EssayScore::from_response(&essay, EssayType::Conflict, &response, false, 812).unwrap();

        assert_eq!(score.pid, 5);
        assert_eq!(score.score, -0.25);
        assert_eq!(score.essay, "conflict essay 5");
        assert_eq!(score.comments, "-0.25 The participant blames others.");
        assert_eq!(score.millis, 812);
    }
}
