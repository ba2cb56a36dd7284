//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::{ErrorResponse, MessageDto, PostMessageRequest, encode_messages_pushed},
    ui::state::AppState,
    usecase::PostMessageError,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let messages = state.get_recent_messages_usecase.count().await;
    let subscribers = state.subscribe_live_feed_usecase.count().await;
    Json(serde_json::json!({
        "status": "ok",
        "messages": messages,
        "subscribers": subscribers,
    }))
}

/// Most recent window of messages, newest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let messages = state
        .get_recent_messages_usecase
        .execute()
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch messages: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?;

    // Domain Model から DTO への変換
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

/// Store a new message and push it to live subscribers
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let message = match state.post_message_usecase.execute(&request.content).await {
        Ok(message) => message,
        Err(e @ (PostMessageError::InvalidContent(_) | PostMessageError::Profane)) => {
            tracing::info!("Post rejected: {}", e);
            return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e));
        }
        Err(e @ PostMessageError::Storage(_)) => {
            tracing::error!("Post failed: {}", e);
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e));
        }
    };

    match encode_messages_pushed(std::slice::from_ref(&message)) {
        Ok(payload) => match state.post_message_usecase.broadcast_posted(&payload).await {
            Ok(delivered) => {
                tracing::debug!("Pushed '{}' to {} subscribers", message.id.as_str(), delivered)
            }
            Err(e) => tracing::warn!("Failed to push live update: {}", e),
        },
        Err(e) => tracing::error!("Failed to encode live update: {}", e),
    }

    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}
