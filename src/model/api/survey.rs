use serde::{Deserialize, Serialize};

use crate::model::{
    common::LocalizedText,
    db::survey::{Question, Survey},
    mongodb::Id,
};

/// A survey as presented to respondents, with questions and options in
/// display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDescription {
    /// Survey unique ID.
    pub id: Id,
    /// Survey title.
    pub title_i18n: LocalizedText,
    /// Optional introductory text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_i18n: Option<LocalizedText>,
    /// Survey questions, sorted by `order`.
    pub questions: Vec<Question>,
}

impl From<Survey> for SurveyDescription {
    fn from(survey: Survey) -> Self {
        let mut questions = survey.survey.questions;
        questions.sort_by_key(|q| q.order);
        for question in &mut questions {
            question.options.sort_by_key(|o| o.order);
        }
        Self {
            id: survey.id,
            title_i18n: survey.survey.title_i18n,
            description_i18n: survey.survey.description_i18n,
            questions,
        }
    }
}

/// A summary of a survey, shorter than the full `SurveyDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    /// Survey unique ID.
    pub id: Id,
    /// Survey title.
    pub title_i18n: LocalizedText,
    /// Optional introductory text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_i18n: Option<LocalizedText>,
}

impl From<Survey> for SurveySummary {
    fn from(survey: Survey) -> Self {
        Self {
            id: survey.id,
            title_i18n: survey.survey.title_i18n,
            description_i18n: survey.survey.description_i18n,
        }
    }
}

/// Whether the calling respondent has already answered a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    pub has_responded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_orders_questions() {
        let description = SurveyDescription::from(Survey::example());
        let ids = description
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["worry", "talk", "noticed", "solution"]);
    }

    #[test]
    fn summary_wire_format() {
        let summary = SurveySummary::from(Survey::example());
        let json = rocket::serde::json::serde_json::to_value(summary).unwrap();
        assert_eq!(json["id"], "climate");
        assert_eq!(json["titleI18n"]["tr"], "İklim Değişikliği Farkındalık Anketi");
        assert_eq!(json["descriptionI18n"]["en"], "Tell us what you think");
        assert!(json.get("questions").is_none());
    }
}
