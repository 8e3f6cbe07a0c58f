use log::info;
use rocket::{
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use crate::analysis::AnalysisClient;
use crate::error::{Error, Result};
use crate::logging::RequestId;
use crate::model::api::analysis::{AnalysisRequest, AnalysisResponse};

pub fn routes() -> Vec<Route> {
    routes![analyse]
}

#[post("/analysis", data = "<request>", format = "json")]
async fn analyse(
    request: std::result::Result<Json<AnalysisRequest>, JsonError<'_>>,
    request_id: &RequestId,
    client: &State<AnalysisClient>,
) -> Result<Json<AnalysisResponse>> {
    let request =
        request.map_err(|_| Error::BadRequest("Invalid request data".to_string()))?;
    info!(
        "req{request_id} analysing {} responses to \"{}\"",
        request.total_responses, request.question_text
    );
    let text = client.analyse(&request).await?;
    Ok(Json(AnalysisResponse::new(text)))
}

#[cfg(test)]
mod tests {
    use rocket::{
        figment::{providers::Serialized, Figment},
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{serde_json::json, Value},
    };

    use super::*;
    use crate::config::AnalysisFairing;

    async fn client_with(figment: Figment) -> Client {
        let rocket = rocket::custom(figment)
            .mount("/", routes())
            .attach(AnalysisFairing);
        Client::tracked(rocket).await.unwrap()
    }

    fn body() -> String {
        json!({
            "questionText": "How worried are you about climate change?",
            "totalResponses": 1,
            "type": "RATING",
            "data": {"ratingCounts": [{"value": 5, "count": 1}], "averageRating": 5.0},
        })
        .to_string()
    }

    #[rocket::async_test]
    async fn unavailable_without_api_key() {
        let client = client_with(Figment::from(rocket::Config::debug_default())).await;

        let response = client
            .post(uri!(analyse))
            .header(ContentType::JSON)
            .body(body())
            .dispatch()
            .await;

        assert_eq!(Status::ServiceUnavailable, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Analysis is not available");
    }

    #[rocket::async_test]
    async fn malformed_request() {
        let client = client_with(Figment::from(rocket::Config::debug_default())).await;

        let response = client
            .post(uri!(analyse))
            .header(ContentType::JSON)
            .body(r#"{"questionText": 7}"#)
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
    }

    #[rocket::async_test]
    async fn unreachable_service_is_a_bad_gateway() {
        // Nothing listens on port 9 of localhost, so the request fails fast.
        let figment = Figment::from(rocket::Config::debug_default())
            .merge(Serialized::default("analysis_api_key", "test-key"))
            .merge(Serialized::default("analysis_base_url", "http://127.0.0.1:9/v1"))
            .merge(Serialized::default("analysis_timeout", 5));
        let client = client_with(figment).await;

        let response = client
            .post(uri!(analyse))
            .header(ContentType::JSON)
            .body(body())
            .dispatch()
            .await;

        assert_eq!(Status::BadGateway, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Failed to generate analysis");
    }
}
