use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::insight::InsightTemplate;
use crate::model::{
    common::{LocalizedText, QuestionType},
    mongodb::Id,
};

/// Core survey data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyCore {
    /// Survey title.
    pub title_i18n: LocalizedText,
    /// Optional introductory text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_i18n: Option<LocalizedText>,
    /// Survey questions, in no particular order; see [`Question::order`].
    pub questions: Vec<Question>,
}

/// A survey from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub survey: SurveyCore,
}

impl Survey {
    /// Create a survey with a fresh ID.
    pub fn new(survey: SurveyCore) -> Self {
        Self {
            id: Id::new(),
            survey,
        }
    }

    /// Look up one of this survey's questions.
    pub fn question(&self, question_id: &Id) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == question_id)
    }

    /// The questions in display order.
    ///
    /// Questions sharing an `order` keep their stored relative position.
    pub fn ordered_questions(&self) -> Vec<&Question> {
        let mut questions = self.questions.iter().collect::<Vec<_>>();
        questions.sort_by_key(|q| q.order);
        questions
    }
}

impl Deref for Survey {
    type Target = SurveyCore;

    fn deref(&self) -> &Self::Target {
        &self.survey
    }
}

impl DerefMut for Survey {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.survey
    }
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique ID within the survey.
    pub id: Id,
    /// Question text.
    pub text_i18n: LocalizedText,
    /// What kind of answer this question takes.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Must every response answer this question?
    #[serde(default)]
    pub required: bool,
    /// Display position, ascending.
    pub order: i32,
    /// Possible answers for choice questions; empty otherwise.
    #[serde(default)]
    pub options: Vec<SurveyOption>,
    /// Narrative template used when summarising this question's results.
    /// When absent, a template is guessed from the question text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<InsightTemplate>,
}

impl Question {
    /// Look up one of this question's options.
    pub fn option(&self, option_id: &Id) -> Option<&SurveyOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }

    /// The options in display order.
    ///
    /// Options sharing an `order` keep their stored relative position.
    pub fn ordered_options(&self) -> Vec<&SurveyOption> {
        let mut options = self.options.iter().collect::<Vec<_>>();
        options.sort_by_key(|o| o.order);
        options
    }
}

/// One selectable answer of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyOption {
    pub id: Id,
    pub text_i18n: LocalizedText,
    pub order: i32,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    fn english(text: &str) -> LocalizedText {
        LocalizedText::new().with("en", text)
    }

    impl Question {
        pub fn rating_example() -> Self {
            Self {
                id: Id::from("worry"),
                text_i18n: english("How worried are you about climate change?")
                    .with("tr", "İklim değişikliği konusunda ne kadar endişelisin?"),
                question_type: QuestionType::Rating,
                required: true,
                order: 1,
                options: vec![],
                insight: None,
            }
        }

        pub fn single_choice_example() -> Self {
            Self {
                id: Id::from("talk"),
                text_i18n: english("How often do you talk about climate change with your family?"),
                question_type: QuestionType::SingleChoice,
                required: true,
                order: 2,
                options: ["Very often", "Sometimes", "Never"]
                    .into_iter()
                    .zip(1..)
                    .map(|(text, order)| SurveyOption {
                        id: Id::from(text.to_lowercase().replace(' ', "-").as_str()),
                        text_i18n: english(text),
                        order,
                    })
                    .collect(),
                insight: None,
            }
        }

        pub fn multiple_choice_example() -> Self {
            Self {
                id: Id::from("noticed"),
                text_i18n: english("Which of these have you noticed in your area?"),
                question_type: QuestionType::MultipleChoice,
                required: false,
                order: 3,
                options: ["Hotter summers", "Floods", "Droughts", "Wildfires"]
                    .into_iter()
                    .zip(1..)
                    .map(|(text, order)| SurveyOption {
                        id: Id::from(text.to_lowercase().replace(' ', "-").as_str()),
                        text_i18n: english(text),
                        order,
                    })
                    .collect(),
                insight: None,
            }
        }

        pub fn text_example() -> Self {
            Self {
                id: Id::from("solution"),
                text_i18n: english("What is the most effective solution to climate change?"),
                question_type: QuestionType::Other("TEXT".to_string()),
                required: false,
                order: 4,
                options: vec![],
                insight: None,
            }
        }
    }

    impl Survey {
        pub fn example() -> Self {
            Self {
                id: Id::from("climate"),
                survey: SurveyCore {
                    title_i18n: english("Climate Change Awareness Survey")
                        .with("tr", "İklim Değişikliği Farkındalık Anketi"),
                    description_i18n: Some(english("Tell us what you think")),
                    // Stored out of order on purpose.
                    questions: vec![
                        Question::multiple_choice_example(),
                        Question::rating_example(),
                        Question::text_example(),
                        Question::single_choice_example(),
                    ],
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_are_ordered_for_display() {
        let survey = Survey::example();
        let orders = survey
            .ordered_questions()
            .iter()
            .map(|q| q.order)
            .collect::<Vec<_>>();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn lookups_find_questions_and_options() {
        let survey = Survey::example();
        let question = survey.question(&Id::from("talk")).unwrap();
        assert_eq!(question.question_type, QuestionType::SingleChoice);
        assert!(question.option(&Id::from("never")).is_some());
        assert!(question.option(&Id::from("floods")).is_none());
        assert!(survey.question(&Id::from("missing")).is_none());
    }
}
