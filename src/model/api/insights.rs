use serde::{Deserialize, Serialize};

use crate::insight::{generate_insights, Insight};
use crate::model::{api::results::QuestionResult, mongodb::Id};

/// The narrative insights for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInsights {
    pub question_id: Id,
    pub insights: Vec<RenderedInsight>,
}

impl QuestionInsights {
    /// Generate and render the insights for a question result.
    pub fn generate(result: &QuestionResult, language: &str) -> Self {
        Self {
            question_id: result.id.clone(),
            insights: generate_insights(result, language)
                .into_iter()
                .map(RenderedInsight::from)
                .collect(),
        }
    }
}

/// An insight alongside its escaped HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedInsight {
    #[serde(flatten)]
    pub insight: Insight,
    pub html: String,
}

impl From<Insight> for RenderedInsight {
    fn from(insight: Insight) -> Self {
        Self {
            html: insight.to_html(),
            insight,
        }
    }
}
