use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// One respondent's reply to one question.
///
/// Serialises flat, e.g. `{"questionId": "q1", "ratingValue": 4}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: Id,
    #[serde(flatten)]
    pub value: AnswerValue,
}

/// The payload of an answer; exactly one per answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerValue {
    /// The chosen option of a single-choice question.
    OptionId(Id),
    /// Every selected option of a multiple-choice question.
    OptionIds(Vec<Id>),
    /// A rating on a 1 to 5 scale.
    RatingValue(i32),
}

impl Answer {
    pub fn option(question_id: Id, option_id: Id) -> Self {
        Self {
            question_id,
            value: AnswerValue::OptionId(option_id),
        }
    }

    pub fn options(question_id: Id, option_ids: Vec<Id>) -> Self {
        Self {
            question_id,
            value: AnswerValue::OptionIds(option_ids),
        }
    }

    pub fn rating(question_id: Id, rating: i32) -> Self {
        Self {
            question_id,
            value: AnswerValue::RatingValue(rating),
        }
    }
}

impl AnswerValue {
    /// Does this answer select the given option?
    pub fn selects(&self, option_id: &Id) -> bool {
        match self {
            Self::OptionId(id) => id == option_id,
            Self::OptionIds(ids) => ids.contains(option_id),
            Self::RatingValue(_) => false,
        }
    }

    pub fn rating(&self) -> Option<i32> {
        match self {
            Self::RatingValue(rating) => Some(*rating),
            _ => None,
        }
    }
}
