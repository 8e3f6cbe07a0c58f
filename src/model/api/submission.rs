use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    common::{Answer, QuestionType, RATING_VALUES},
    db::survey::{Question, Survey},
    mongodb::Id,
};

/// A completed survey, as submitted by a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub survey_id: Id,
    pub answers: Vec<AnswerSpec>,
}

/// One answer as submitted. Exactly one of the payload fields should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSpec {
    pub question_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_ids: Option<Vec<Id>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<i32>,
}

/// Reasons a submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Question '{0}' is not part of this survey")]
    UnknownQuestion(Id),
    #[error("Question '{0}' is answered more than once")]
    DuplicateAnswer(Id),
    #[error("Answer to question '{0}' has no value")]
    MissingValue(Id),
    #[error("Answer to question '{0}' has more than one value")]
    AmbiguousValue(Id),
    #[error("Answer to question '{question}' does not suit a {expected} question")]
    WrongValue { question: Id, expected: QuestionType },
    #[error("Rating {value} for question '{question}' is outside 1 to 5")]
    RatingOutOfRange { question: Id, value: i32 },
    #[error("Option '{option}' does not belong to question '{question}'")]
    UnknownOption { question: Id, option: Id },
    #[error("Question '{question}' of type {question_type} cannot be answered")]
    Unsupported { question: Id, question_type: QuestionType },
    #[error("Question '{0}' is required")]
    MissingRequired(Id),
}

impl SubmissionRequest {
    /// Check every answer against the survey and convert to stored answers.
    ///
    /// Multiple-choice selections are de-duplicated and an empty selection
    /// counts as no answer at all.
    pub fn validate(&self, survey: &Survey) -> Result<Vec<Answer>, SubmissionError> {
        let mut seen = HashSet::new();
        let mut answers = Vec::with_capacity(self.answers.len());

        for spec in &self.answers {
            let question = survey
                .question(&spec.question_id)
                .ok_or_else(|| SubmissionError::UnknownQuestion(spec.question_id.clone()))?;
            if !seen.insert(&question.id) {
                return Err(SubmissionError::DuplicateAnswer(question.id.clone()));
            }
            if let Some(answer) = spec.to_answer(question)? {
                answers.push(answer);
            }
        }

        let answered = answers
            .iter()
            .map(|answer| &answer.question_id)
            .collect::<HashSet<_>>();
        for question in survey.ordered_questions() {
            // Questions nobody can answer are never enforced.
            if question.required
                && question.question_type.is_answerable()
                && !answered.contains(&question.id)
            {
                return Err(SubmissionError::MissingRequired(question.id.clone()));
            }
        }

        Ok(answers)
    }
}

impl AnswerSpec {
    fn to_answer(&self, question: &Question) -> Result<Option<Answer>, SubmissionError> {
        let id = || question.id.clone();
        let given = [
            self.option_id.is_some(),
            self.option_ids.is_some(),
            self.rating_value.is_some(),
        ]
        .into_iter()
        .filter(|&set| set)
        .count();
        match given {
            0 => return Err(SubmissionError::MissingValue(id())),
            1 => {}
            _ => return Err(SubmissionError::AmbiguousValue(id())),
        }
        let wrong_value = || SubmissionError::WrongValue {
            question: id(),
            expected: question.question_type.clone(),
        };

        match &question.question_type {
            QuestionType::Rating => {
                let value = self.rating_value.ok_or_else(wrong_value)?;
                if !RATING_VALUES.contains(&value) {
                    return Err(SubmissionError::RatingOutOfRange {
                        question: id(),
                        value,
                    });
                }
                Ok(Some(Answer::rating(id(), value)))
            }
            QuestionType::SingleChoice => {
                let option = self.option_id.as_ref().ok_or_else(wrong_value)?;
                check_option(question, option)?;
                Ok(Some(Answer::option(id(), option.clone())))
            }
            QuestionType::MultipleChoice => {
                let selected = match (&self.option_id, &self.option_ids) {
                    (Some(option), _) => vec![option.clone()],
                    (None, Some(options)) => options.clone(),
                    (None, None) => return Err(wrong_value()),
                };
                let mut unique = Vec::with_capacity(selected.len());
                for option in selected {
                    check_option(question, &option)?;
                    if !unique.contains(&option) {
                        unique.push(option);
                    }
                }
                Ok((!unique.is_empty()).then(|| Answer::options(id(), unique)))
            }
            QuestionType::Other(_) => Err(SubmissionError::Unsupported {
                question: id(),
                question_type: question.question_type.clone(),
            }),
        }
    }
}

fn check_option(question: &Question, option: &Id) -> Result<(), SubmissionError> {
    match question.option(option) {
        Some(_) => Ok(()),
        None => Err(SubmissionError::UnknownOption {
            question: question.id.clone(),
            option: option.clone(),
        }),
    }
}

/// Returned once a response has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub success: bool,
    pub response_id: Id,
}

impl SubmissionReceipt {
    pub fn new(response_id: Id) -> Self {
        Self {
            success: true,
            response_id,
        }
    }
}
