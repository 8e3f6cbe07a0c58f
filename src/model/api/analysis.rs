use serde::{Deserialize, Serialize};

use crate::insight::Insight;
use crate::model::{
    api::{insights::RenderedInsight, results::ResultData},
    common::QuestionType,
};

/// One question's results, sent for a free-text analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub question_text: String,
    pub total_responses: u64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub data: ResultData,
}

/// The analysis text, with each paragraph also split into insight spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub text: String,
    pub insights: Vec<RenderedInsight>,
}

impl AnalysisResponse {
    pub fn new(text: String) -> Self {
        let insights = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| RenderedInsight::from(Insight::parse_markup(line)))
            .collect();
        Self { text, insights }
    }
}
