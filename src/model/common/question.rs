use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of a survey question.
///
/// Tags outside the supported set (such as free-text questions) are kept
/// verbatim so they survive a round trip through the database and API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Rating,
    Other(String),
}

impl QuestionType {
    /// Does this question offer a list of options?
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultipleChoice)
    }

    /// Can responses to this question be submitted and aggregated?
    pub fn is_answerable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::Rating => "RATING",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for QuestionType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SINGLE_CHOICE" => Self::SingleChoice,
            "MULTIPLE_CHOICE" => Self::MultipleChoice,
            "RATING" => Self::Rating,
            _ => Self::Other(tag),
        }
    }
}

impl From<QuestionType> for String {
    fn from(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating questions are answered on a scale from 1 to 5.
pub const RATING_VALUES: std::ops::RangeInclusive<i32> = 1..=5;
