use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::aggregation::aggregate_survey;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    api::{insights::QuestionInsights, results::SurveyResults},
    db::{response::Response, survey::Survey},
    mongodb::{Coll, Id},
};

use super::survey::survey_by_id;

pub fn routes() -> Vec<Route> {
    routes![results, insights]
}

/// Query parameters shared by the results endpoints.
#[derive(Debug, FromForm)]
struct SurveyQuery {
    #[field(name = "surveyId")]
    survey_id: Option<String>,
    lang: Option<String>,
}

impl SurveyQuery {
    /// The requested survey; a missing or blank ID is a bad request.
    fn survey_id(&self) -> Result<Id> {
        self.survey_id
            .as_deref()
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| Error::BadRequest("Survey ID is required".to_string()))
    }

    /// The requested language, or the configured default.
    fn language<'a>(&'a self, config: &'a Config) -> &'a str {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| config.default_language())
    }
}

#[get("/surveys/results?<query..>")]
async fn results(
    query: SurveyQuery,
    surveys: Coll<Survey>,
    responses: Coll<Response>,
) -> Result<Json<SurveyResults>> {
    let survey = survey_by_id(&query.survey_id()?, &surveys).await?;
    let results = results_for(&survey, &responses).await?;
    Ok(Json(results))
}

#[get("/surveys/insights?<query..>")]
async fn insights(
    query: SurveyQuery,
    config: &State<Config>,
    surveys: Coll<Survey>,
    responses: Coll<Response>,
) -> Result<Json<Vec<QuestionInsights>>> {
    let survey = survey_by_id(&query.survey_id()?, &surveys).await?;
    let language = query.language(config);
    let insights = results_for(&survey, &responses)
        .await?
        .results
        .iter()
        .map(|result| QuestionInsights::generate(result, language))
        .collect();
    Ok(Json(insights))
}

/// Aggregate every stored response to the survey.
async fn results_for(survey: &Survey, responses: &Coll<Response>) -> Result<SurveyResults> {
    let answers = responses
        .find(Response::for_survey(&survey.id), None)
        .await?
        .map_ok(|response| response.response.answers)
        .try_collect::<Vec<_>>()
        .await?;
    Ok(aggregate_survey(survey, answers.iter().map(Vec::as_slice)))
}
