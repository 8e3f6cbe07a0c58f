use log::{info, warn};
use rocket::{
    serde::json::{Error as JsonError, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::logging::RequestId;
use crate::model::{
    api::submission::{SubmissionReceipt, SubmissionRequest},
    db::{response::Response, survey::Survey},
    mongodb::{is_duplicate_key_error, Coll},
    respondent::Respondent,
};

use super::survey::survey_by_id;

pub fn routes() -> Vec<Route> {
    routes![submit]
}

#[post("/surveys/submit", data = "<submission>", format = "json")]
async fn submit(
    submission: std::result::Result<Json<SubmissionRequest>, JsonError<'_>>,
    respondent: Respondent,
    request_id: &RequestId,
    surveys: Coll<Survey>,
    responses: Coll<Response>,
) -> Result<Json<SubmissionReceipt>> {
    let submission = submission.map_err(|e| {
        warn!("req{request_id} malformed submission: {e}");
        Error::BadRequest("Invalid request data".to_string())
    })?;

    // Check the answers against the survey.
    let survey = survey_by_id(&submission.survey_id, &surveys).await?;
    let answers = submission.validate(&survey)?;

    // Store the response; the unique index rejects a second one from the same respondent.
    let response = Response::new(survey.id.clone(), respondent.key().to_string(), answers);
    if let Err(e) = responses.insert_one(&response, None).await {
        return Err(if is_duplicate_key_error(&e) {
            Error::Conflict("You have already responded to this survey".to_string())
        } else {
            e.into()
        });
    }
    info!(
        "req{request_id} stored response {} to survey {}",
        response.id, survey.id
    );

    Ok(Json(SubmissionReceipt::new(response.id.clone())))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{serde_json::json, Value},
    };

    use crate::model::{api::submission::AnswerSpec, common::Answer, mongodb::Id};

    use super::*;

    #[backend_test]
    async fn submit_valid(client: Client, surveys: Coll<Survey>, responses: Coll<Response>) {
        surveys.insert_one(Survey::example(), None).await.unwrap();

        let response = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(json!(SubmissionRequest::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let receipt: SubmissionReceipt = response.into_json().await.unwrap();
        assert!(receipt.success);

        let stored = responses
            .find_one(receipt.response_id.as_doc(), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.survey_id, Survey::example().id);
        assert_eq!(stored.answers.len(), 3);
        assert_eq!(stored.answers[0], Answer::rating(Id::from("worry"), 4));
    }

    #[backend_test]
    async fn submit_twice(client: Client, surveys: Coll<Survey>, responses: Coll<Response>) {
        surveys.insert_one(Survey::example(), None).await.unwrap();

        let first = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(json!(SubmissionRequest::example()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, first.status());

        // The same client carries the same respondent cookie.
        let second = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(json!(SubmissionRequest::example()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, second.status());

        let count = responses.count_documents(None, None).await.unwrap();
        assert_eq!(count, 1);
    }

    #[backend_test]
    async fn submit_invalid(client: Client, surveys: Coll<Survey>, responses: Coll<Response>) {
        surveys.insert_one(Survey::example(), None).await.unwrap();

        let mut request = SubmissionRequest::example();
        request.answers.push(AnswerSpec::rating("elsewhere", 3));
        let response = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(json!(request).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(
            body["error"],
            "Question 'elsewhere' is not part of this survey"
        );
        assert_eq!(responses.count_documents(None, None).await.unwrap(), 0);
    }

    #[backend_test]
    async fn submit_malformed(client: Client) {
        let response = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(r#"{"answers": "nope"}"#)
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Invalid request data");
    }

    #[backend_test]
    async fn submit_to_missing_survey(client: Client) {
        let response = client
            .post(uri!(submit))
            .header(ContentType::JSON)
            .body(json!(SubmissionRequest::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::NotFound, response.status());
    }
}
