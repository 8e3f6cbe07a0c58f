use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::survey::{ResponseStatus, SurveyDescription, SurveySummary},
    db::{response::Response, survey::Survey},
    mongodb::{Coll, Id},
    respondent::Respondent,
};

pub fn routes() -> Vec<Route> {
    routes![surveys, survey, response_status]
}

#[get("/surveys")]
async fn surveys(surveys: Coll<Survey>) -> Result<Json<Vec<SurveySummary>>> {
    let oldest_first = FindOptions::builder().sort(doc! {"_id": 1}).build();
    let summaries = surveys
        .find(None, oldest_first)
        .await?
        .map_ok(SurveySummary::from)
        .try_collect()
        .await?;
    Ok(Json(summaries))
}

#[get("/surveys/<survey_id>")]
async fn survey(survey_id: Id, surveys: Coll<Survey>) -> Result<Json<SurveyDescription>> {
    let survey = survey_by_id(&survey_id, &surveys).await?;
    Ok(Json(survey.into()))
}

#[get("/surveys/<survey_id>/status")]
async fn response_status(
    survey_id: Id,
    respondent: Respondent,
    responses: Coll<Response>,
) -> Result<Json<ResponseStatus>> {
    let has_responded = responses
        .find_one(Response::by_respondent(&survey_id, respondent.key()), None)
        .await?
        .is_some();
    Ok(Json(ResponseStatus { has_responded }))
}

/// Retrieve a survey, failing with a 404 if it does not exist.
pub(super) async fn survey_by_id(survey_id: &Id, surveys: &Coll<Survey>) -> Result<Survey> {
    surveys
        .find_one(survey_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with ID '{survey_id}'")))
}
