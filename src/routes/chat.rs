use axum::{
    Json,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    response::Html,
};
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::chatbot::generate_reply,
    state::SharedState,
};

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a valid question.";

const CHAT_PAGE: &str = include_str!("../../templates/chat.html");

/// `POST /api/chat`
///
/// The body stays unread until the caller is authorized, so auth failures
/// answer 401/403 whatever the payload size.
pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<ChatResponse>, AppError> {
    let request_id = Uuid::new_v4();
    handle_chat(&state, &headers, body)
        .instrument(info_span!("chat", %request_id))
        .await
}

async fn handle_chat(
    state: &SharedState,
    headers: &HeaderMap,
    body: Body,
) -> Result<Json<ChatResponse>, AppError> {
    let token = bearer_token(headers).ok_or_else(|| {
        warn!("Rejected chat request: missing Clerk token");
        AppError::AuthMissing
    })?;

    if !state.verifier.verify(&token).await {
        warn!("Rejected chat request: Clerk token failed verification");
        return Err(AppError::AuthInvalid);
    }

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let payload: ChatRequest =
        serde_json::from_slice(&bytes).map_err(|e| AppError::Internal(e.to_string()))?;

    let trimmed = payload.message.trim();
    if trimmed.is_empty() {
        return Ok(Json(ChatResponse {
            reply: EMPTY_MESSAGE_REPLY.to_string(),
        }));
    }

    let reply = generate_reply(state.llm.as_ref(), trimmed).await?;
    Ok(Json(ChatResponse { reply }))
}

/// The word after `Bearer `, up to the next space. `None` when the header is
/// absent or uses another scheme.
///
/// Header bytes are read as latin-1, so a non-ASCII token still reaches the
/// verifier instead of counting as missing.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.as_bytes();
    if !value.starts_with(b"Bearer ") {
        return None;
    }
    value
        .split(|&b| b == b' ')
        .nth(1)
        .map(|token| token.iter().map(|&b| char::from(b)).collect())
}

/// `GET /chat`
pub async fn chat_page_handler(State(state): State<SharedState>) -> Html<String> {
    Html(CHAT_PAGE.replace(
        "{{ clerk_publishable_key }}",
        &state.config.clerk_publishable_key,
    ))
}
