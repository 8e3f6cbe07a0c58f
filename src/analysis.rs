//! Free-text analysis of a question's results by a chat-completion model.

use std::fmt::Write;

use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregation::format_percentage;
use crate::config::AnalysisConfig;
use crate::model::{api::analysis::AnalysisRequest, common::QuestionType};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No analysis API key is configured")]
    Unavailable,
    #[error("Analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Analysis service returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("Analysis service returned no text")]
    EmptyReply,
}

/// Describe the results of one question as a prompt for the model.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let total = request.total_responses;
    let mut prompt = format!(
        "Analyze the following survey results about climate change and provide insights in a conversational tone:\n\n\
         Question: \"{}\"\n\
         Total Responses: {total}\n",
        request.question_text
    );

    // Writing to a `String` cannot fail.
    if request.question_type == QuestionType::Rating {
        let average = request.data.average_rating.unwrap_or_default();
        let _ = write!(
            prompt,
            "\nAverage Rating: {average} out of 5\nRating Distribution:\n"
        );
        for count in request.data.rating_counts.iter().flatten() {
            let _ = writeln!(
                prompt,
                "Rating {}: {} responses ({})",
                count.value,
                count.count,
                format_percentage(count.count, total)
            );
        }
    } else {
        prompt.push_str("\nResponse Distribution:\n");
        for option in request.data.option_counts.iter().flatten() {
            let _ = writeln!(
                prompt,
                "{}: {} responses ({})",
                option.text_i18n.english(),
                option.count,
                format_percentage(option.count, total)
            );
        }
    }

    prompt.push_str(
        "\nPlease provide a brief analysis of these results with same language as the question, \
         including any notable patterns, implications, and suggestions for action. \
         Keep the response under 150 words.",
    );
    prompt
}

/// Chat completions request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response; only the parts we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, AnalysisError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AnalysisError::EmptyReply)
    }
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct AnalysisClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url().trim_end_matches('/')
            ),
            model: config.model().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    /// Can requests be made at all?
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model to analyse a question's results.
    pub async fn analyse(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::Unavailable)?;
        let prompt = build_prompt(request);
        debug!("Requesting analysis from {} ({})", self.endpoint, self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Analysis service returned {status}");
            return Err(AnalysisError::Upstream { status, body });
        }

        response.json::<ChatResponse>().await?.into_text()
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json::{self, json};

    use super::*;
    use crate::aggregation::aggregate_question;
    use crate::model::{api::results::ResultData, common::Answer, db::survey::Question};

    fn request_for(question: &Question, answers: &[Answer]) -> AnalysisRequest {
        let result = aggregate_question(question, &answers.iter().collect::<Vec<_>>());
        AnalysisRequest {
            question_text: question.text_i18n.english().to_string(),
            total_responses: result.total_answers,
            question_type: result.question_type,
            data: result.data,
        }
    }

    #[test]
    fn rating_prompt() {
        let question = Question::rating_example();
        let answers = [5, 5, 4, 3, 5].map(|rating| Answer::rating(question.id.clone(), rating));
        let prompt = build_prompt(&request_for(&question, &answers));

        assert!(prompt.starts_with("Analyze the following survey results about climate change"));
        assert!(prompt.contains("Question: \"How worried are you about climate change?\"\n"));
        assert!(prompt.contains("Total Responses: 5\n"));
        assert!(prompt.contains("\nAverage Rating: 4.4 out of 5\nRating Distribution:\n"));
        assert!(prompt.contains("Rating 1: 0 responses (0%)\n"));
        assert!(prompt.contains("Rating 5: 3 responses (60%)\n"));
        assert!(prompt.ends_with("Keep the response under 150 words."));
    }

    #[test]
    fn choice_prompt_uses_english_option_text() {
        let question = Question::single_choice_example();
        let answers = [Answer::option(question.id.clone(), "never".into())];
        let prompt = build_prompt(&request_for(&question, &answers));

        assert!(prompt.contains("\nResponse Distribution:\n"));
        assert!(prompt.contains("Very often: 0 responses (0%)\n"));
        assert!(prompt.contains("Never: 1 responses (100%)\n"));
        assert!(!prompt.contains("Average Rating"));
    }

    #[test]
    fn prompt_without_data() {
        let request = AnalysisRequest {
            question_text: "Anything?".to_string(),
            total_responses: 0,
            question_type: QuestionType::Other("TEXT".to_string()),
            data: ResultData::default(),
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Total Responses: 0\n\nResponse Distribution:\n\nPlease"));
    }

    #[test]
    fn chat_request_shape() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "Hello",
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"model": "gpt-3.5-turbo", "messages": [{"role": "user", "content": "Hello"}]})
        );
    }

    #[test]
    fn chat_response_text() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Hi there.\n"}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hi there.");

        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(response.into_text(), Err(AnalysisError::EmptyReply)));
    }

    #[rocket::async_test]
    async fn unconfigured_client_refuses() {
        let client = AnalysisClient::new(&AnalysisConfig::default()).unwrap();
        assert!(!client.is_configured());
        let request = request_for(&Question::rating_example(), &[]);
        assert!(matches!(
            client.analyse(&request).await,
            Err(AnalysisError::Unavailable)
        ));
    }
}
