//! EssayType - Which of the participant's responses is being coded

use serde::{Deserialize, Serialize};

use super::hallmarks::{HUMILITY_HALLMARKS, SPIRITUALITY_HALLMARKS};
use crate::domain::errors::DomainError;

/// Writing prompt shown to participants for the conflict (angry) essay
pub const CONFLICT_ESSAY_PROMPT: &str = "Imagine someone is angry with you. Why are they angry with you? What led them to be angry with you? How do you feel about the situation?";

/// Writing prompt shown to participants for the award essay
pub const AWARD_ESSAY_PROMPT: &str = "Imagine that you have just received an award. What did you receive the award in? How were you able to achieve what brought you the award? How do you feel about getting it?";

/// Writing prompt shown to participants for the dream essay
pub const DREAM_ESSAY_PROMPT: &str = "Imagine that you have a dream that your far-away loved one (e.g. grandmother, grandfather, parent, close friend, etc.) unexpectedly visits to say they love you and to impart life wisdom. You wake up to learn that they died the previous night. Please tell us how and why you think this happens.";

/// Writing prompt shown to participants for the deja vu essay
pub const DEJAVU_ESSAY_PROMPT: &str = "Imagine that you meet someone for the first time and share an uncanny sense that you've known each other for decades. Please tell us how and why you think this happened.";

/// Essay type classification
///
/// `Angry` is a synonym of `Conflict`: both select the same response column,
/// writing prompt and rubric. The variant is kept so the user's spelling
/// survives into the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EssayType {
    Dream,
    Dejavu,
    Conflict,
    Angry,
    Award,
}

/// Rubric family used to score an essay type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RubricFamily {
    Humility,
    Spirituality,
}

impl EssayType {
    pub const ALL: [EssayType; 5] = [
        EssayType::Dream,
        EssayType::Dejavu,
        EssayType::Conflict,
        EssayType::Angry,
        EssayType::Award,
    ];

    /// Resolve aliases to the type that owns the response column
    pub fn canonical(self) -> EssayType {
        match self {
            EssayType::Angry => EssayType::Conflict,
            other => other,
        }
    }

    pub fn family(self) -> RubricFamily {
        match self.canonical() {
            EssayType::Dream | EssayType::Dejavu => RubricFamily::Spirituality,
            _ => RubricFamily::Humility,
        }
    }

    /// The writing prompt the participant answered
    pub fn writing_prompt(self) -> &'static str {
        match self.canonical() {
            EssayType::Dream => DREAM_ESSAY_PROMPT,
            EssayType::Dejavu => DEJAVU_ESSAY_PROMPT,
            EssayType::Award => AWARD_ESSAY_PROMPT,
            _ => CONFLICT_ESSAY_PROMPT,
        }
    }

    pub fn hallmarks(self) -> &'static str {
        self.family().hallmarks()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EssayType::Dream => "dream",
            EssayType::Dejavu => "dejavu",
            EssayType::Conflict => "conflict",
            EssayType::Angry => "angry",
            EssayType::Award => "award",
        }
    }
}

impl RubricFamily {
    pub fn hallmarks(self) -> &'static str {
        match self {
            RubricFamily::Humility => HUMILITY_HALLMARKS,
            RubricFamily::Spirituality => SPIRITUALITY_HALLMARKS,
        }
    }
}

impl std::fmt::Display for EssayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EssayType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dream" => Ok(EssayType::Dream),
            "dejavu" => Ok(EssayType::Dejavu),
            "conflict" => Ok(EssayType::Conflict),
            "angry" => Ok(EssayType::Angry),
            "award" => Ok(EssayType::Award),
            _ => Err(DomainError::InvalidEssayType(s.to_string())),
        }
    }
}
