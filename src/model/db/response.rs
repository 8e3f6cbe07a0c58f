use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime, Document};
use serde::{Deserialize, Serialize};

use crate::model::{common::Answer, mongodb::Id};

/// Core response data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCore {
    /// The survey being answered.
    pub survey_id: Id,
    /// Opaque key identifying the submitter; unique per survey.
    pub respondent: String,
    /// At most one answer per question.
    pub answers: Vec<Answer>,
    /// Submission time.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// A response from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub response: ResponseCore,
}

impl Response {
    /// Create a response submitted now, with a fresh ID.
    pub fn new(survey_id: Id, respondent: String, answers: Vec<Answer>) -> Self {
        Self {
            id: Id::new(),
            response: ResponseCore {
                survey_id,
                respondent,
                answers,
                created_at: Utc::now(),
            },
        }
    }

    /// Filter matching every response to the given survey.
    pub fn for_survey(survey_id: &Id) -> Document {
        doc! { "surveyId": survey_id }
    }

    /// Filter matching the given respondent's response to the given survey.
    pub fn by_respondent(survey_id: &Id, respondent: &str) -> Document {
        doc! { "surveyId": survey_id, "respondent": respondent }
    }
}

impl Deref for Response {
    type Target = ResponseCore;

    fn deref(&self) -> &Self::Target {
        &self.response
    }
}

impl DerefMut for Response {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.response
    }
}
