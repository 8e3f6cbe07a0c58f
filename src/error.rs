use log::error;
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{self, status, Responder},
    serde::json::{json, Json},
    Request,
};
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::model::api::submission::SubmissionError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] naming the missing thing.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::Analysis(AnalysisError::Unavailable) => Status::ServiceUnavailable,
            Self::Analysis(_) => Status::BadGateway,
            Self::BadRequest(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
        }
    }
}

impl From<SubmissionError> for Error {
    fn from(err: SubmissionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Respond with `{"error": message}`. Details of server-side failures are
/// logged rather than sent.
impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let message = match &self {
            Self::Db(_) => {
                error!("Database error: {self}");
                "Internal server error".to_string()
            }
            Self::Analysis(AnalysisError::Unavailable) => "Analysis is not available".to_string(),
            Self::Analysis(_) => {
                error!("{self}");
                "Failed to generate analysis".to_string()
            }
            _ => self.to_string(),
        };
        status::Custom(status, Json(json!({ "error": message }))).respond_to(req)
    }
}
