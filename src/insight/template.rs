use serde::{Deserialize, Serialize};

use crate::model::common::QuestionType;

/// Which narrative to tell about a question's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTemplate {
    // Rating questions.
    Worry,
    Importance,
    Interest,
    Confidence,
    // Single-choice questions.
    TalkFrequency,
    Commute,
    NatureTime,
    LearningFeeling,
    // Multiple-choice questions.
    NoticedEffects,
    HomeActions,
    Topics,
    WorryingEffects,
    Solutions,
    Sources,
    /// Never produce a narrative, even if the question text looks familiar.
    Disabled,
}

/// The question type a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Rating,
    SingleChoice,
    MultipleChoice,
    None,
}

impl TemplateKind {
    /// Can a template of this kind describe the given question type?
    pub fn matches(self, question_type: &QuestionType) -> bool {
        matches!(
            (self, question_type),
            (Self::Rating, QuestionType::Rating)
                | (Self::SingleChoice, QuestionType::SingleChoice)
                | (Self::MultipleChoice, QuestionType::MultipleChoice)
        )
    }
}

/// Phrases recognised in question text, checked in order for each question type.
const RATING_PHRASES: &[(&str, InsightTemplate)] = &[
    ("worried", InsightTemplate::Worry),
    ("important", InsightTemplate::Importance),
    ("interested", InsightTemplate::Interest),
    ("confident", InsightTemplate::Confidence),
];

const SINGLE_CHOICE_PHRASES: &[(&str, InsightTemplate)] = &[
    ("talk about climate change", InsightTemplate::TalkFrequency),
    ("get to school", InsightTemplate::Commute),
    ("spend time in nature", InsightTemplate::NatureTime),
    ("feel when you learn", InsightTemplate::LearningFeeling),
];

const MULTIPLE_CHOICE_PHRASES: &[(&str, InsightTemplate)] = &[
    ("noticed in your area", InsightTemplate::NoticedEffects),
    ("do at home", InsightTemplate::HomeActions),
    ("environmental topics", InsightTemplate::Topics),
    ("climate change effects worry", InsightTemplate::WorryingEffects),
    ("good solutions for climate change", InsightTemplate::Solutions),
    (
        "learn about climate change from these sources",
        InsightTemplate::Sources,
    ),
];

impl InsightTemplate {
    pub fn kind(self) -> TemplateKind {
        match self {
            Self::Worry | Self::Importance | Self::Interest | Self::Confidence => {
                TemplateKind::Rating
            }
            Self::TalkFrequency | Self::Commute | Self::NatureTime | Self::LearningFeeling => {
                TemplateKind::SingleChoice
            }
            Self::NoticedEffects
            | Self::HomeActions
            | Self::Topics
            | Self::WorryingEffects
            | Self::Solutions
            | Self::Sources => TemplateKind::MultipleChoice,
            Self::Disabled => TemplateKind::None,
        }
    }

    /// Guess a template from the question text.
    ///
    /// Only questions from the climate survey are recognised; anything else
    /// gets `None`.
    pub fn detect(question_type: &QuestionType, text: &str) -> Option<Self> {
        let phrases = match question_type {
            QuestionType::Rating => RATING_PHRASES,
            QuestionType::SingleChoice => SINGLE_CHOICE_PHRASES,
            QuestionType::MultipleChoice => MULTIPLE_CHOICE_PHRASES,
            QuestionType::Other(_) => return None,
        };
        phrases
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|(_, template)| *template)
    }

    /// Pick the template for a question: the configured one if it suits the
    /// question type, otherwise a guess from the text.
    pub fn select(
        configured: Option<Self>,
        question_type: &QuestionType,
        text: &str,
    ) -> Option<Self> {
        match configured {
            Some(Self::Disabled) => None,
            Some(template) => Some(template).filter(|t| t.kind().matches(question_type)),
            None => Self::detect(question_type, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_keyed_by_question_type() {
        assert_eq!(
            InsightTemplate::detect(
                &QuestionType::Rating,
                "How worried are you about climate change?"
            ),
            Some(InsightTemplate::Worry)
        );
        // The same phrase means nothing for another type.
        assert_eq!(
            InsightTemplate::detect(
                &QuestionType::SingleChoice,
                "How worried are you about climate change?"
            ),
            None
        );
        assert_eq!(
            InsightTemplate::detect(
                &QuestionType::MultipleChoice,
                "Which of these climate change effects worry you the most?"
            ),
            Some(InsightTemplate::WorryingEffects)
        );
        assert_eq!(
            InsightTemplate::detect(&QuestionType::Other("TEXT".into()), "worried"),
            None
        );
    }

    #[test]
    fn earlier_phrases_win() {
        assert_eq!(
            InsightTemplate::detect(&QuestionType::Rating, "How worried and interested are you?"),
            Some(InsightTemplate::Worry)
        );
    }

    #[test]
    fn configuration_overrides_detection() {
        let text = "How important is recycling to you?";
        assert_eq!(
            InsightTemplate::select(None, &QuestionType::Rating, text),
            Some(InsightTemplate::Importance)
        );
        assert_eq!(
            InsightTemplate::select(Some(InsightTemplate::Disabled), &QuestionType::Rating, text),
            None
        );
        assert_eq!(
            InsightTemplate::select(Some(InsightTemplate::Worry), &QuestionType::Rating, "Anything"),
            Some(InsightTemplate::Worry)
        );
        // A template written for another question type is ignored.
        assert_eq!(
            InsightTemplate::select(
                Some(InsightTemplate::Commute),
                &QuestionType::Rating,
                "How worried are you?"
            ),
            None
        );
    }

    #[test]
    fn templates_serialise_in_snake_case() {
        let json = rocket::serde::json::serde_json::to_string(&InsightTemplate::TalkFrequency)
            .unwrap();
        assert_eq!(json, "\"talk_frequency\"");
    }
}
