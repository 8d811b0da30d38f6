//! Error types returned by the import pipeline and the HTTP handlers, and
//! their mapping onto JSON responses.
//!
//! Every error body carries an `error` string. Import failures that happen
//! after the rows were read also carry the `feedback` computed so far, so the
//! uploader can see which columns were detected and which rows were skipped.

use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::import::{ImportOutcome, ParseIssue};
use log::error;
use serde_json::json;
use thiserror::Error;

/// Terminal failures of one import call. None of them is retried.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No file provided")]
    InputMissing,

    #[error("CSV parsing error")]
    MalformedInput(Vec<ParseIssue>),

    #[error("No valid residents found in CSV")]
    NoValidRows {
        feedback: Box<ImportOutcome>,
        suggestion: String,
    },

    #[error("failed to save residents: {source}")]
    PersistenceFailure {
        #[source]
        source: StoreError,
        feedback: Box<ImportOutcome>,
    },
}

impl ImportError {
    pub fn status(&self) -> StatusCode {
        match self {
            ImportError::InputMissing
            | ImportError::MalformedInput(_)
            | ImportError::NoValidRows { .. } => StatusCode::BAD_REQUEST,
            ImportError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            ImportError::InputMissing => json!({ "error": self.to_string() }),
            ImportError::MalformedInput(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            ImportError::NoValidRows {
                feedback,
                suggestion,
            } => json!({
                "error": self.to_string(),
                "feedback": feedback,
                "suggestion": suggestion,
            }),
            ImportError::PersistenceFailure { source, feedback } => json!({
                "error": source.to_string(),
                "feedback": feedback,
            }),
        }
    }
}

/// Everything an `/api/residents` handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Import(err) => err.status(),
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Import(err) => err.body(),
            ApiError::Internal(detail) => {
                error!("internal error: {detail}");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
