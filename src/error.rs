// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::message::ChatResponse;

pub const UNAUTHORIZED_REPLY: &str = "Unauthorized — missing Clerk token.";
pub const INVALID_TOKEN_REPLY: &str = "Invalid or expired Clerk token.";

/// Failures of the chat completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode LLM response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing or malformed Authorization header")]
    AuthMissing,

    #[error("token verification failed")]
    AuthInvalid,

    #[error("{0}")]
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reply) = match self {
            AppError::AuthMissing => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_REPLY.to_string()),
            AppError::AuthInvalid => (StatusCode::FORBIDDEN, INVALID_TOKEN_REPLY.to_string()),
            // The raw message reaches the client; callers rely on this shape.
            AppError::Internal(msg) => {
                error!("Error in /api/chat: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal Server Error: {}", msg),
                )
            }
        };

        (status, Json(ChatResponse { reply })).into_response()
    }
}
