use serde::{Deserialize, Serialize};

use crate::insight::InsightTemplate;
use crate::model::{
    common::{LocalizedText, QuestionType},
    mongodb::Id,
};

/// Aggregate results for a whole survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResults {
    pub survey_id: Id,
    pub survey_title: LocalizedText,
    pub survey_description: Option<LocalizedText>,
    /// Number of submitted responses.
    pub total_responses: u64,
    /// One entry per question, in display order.
    pub results: Vec<QuestionResult>,
}

/// Aggregate results for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub id: Id,
    pub text_i18n: LocalizedText,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub order: i32,
    /// Number of answers to this question across all responses.
    pub total_answers: u64,
    pub data: ResultData,
    /// Narrative template configured for the question, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<InsightTemplate>,
}

/// Type-specific statistics. Every field is absent for unsupported question types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    /// Rating questions: exactly five buckets, for values 1 to 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_counts: Option<Vec<RatingCount>>,
    /// Rating questions: mean rating, 0 when there are no answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Choice questions: one entry per option, in option order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_counts: Option<Vec<OptionCount>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCount {
    pub value: i32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCount {
    pub id: Id,
    pub text_i18n: LocalizedText,
    pub count: u64,
}
