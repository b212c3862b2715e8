//! Message Routes - CRUD and search over stored messages

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{api_error, json_error, ApiError};
use crate::models::{MessageListQuery, MessagePageResponse, MessageRequest, MessageResponse};
use crate::MessageAppState;

pub fn router() -> Router<MessageAppState> {
    Router::new()
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/:id",
            get(get_message).put(update_message).delete(delete_message),
        )
}

/// Create a message
#[utoipa::path(
    post,
    path = "/messages",
    request_body = MessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Messages"
)]
pub async fn create_message(
    State(state): State<MessageAppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(json_error)?;
    payload.validate().map_err(api_error)?;

    let message = state
        .message_service
        .create(payload.into())
        .await
        .map_err(api_error)?;

    let location = format!("/messages/{}", message.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(MessageResponse::from(message)),
    )
        .into_response())
}

/// Search, sort and page through messages
#[utoipa::path(
    get,
    path = "/messages",
    params(MessageListQuery),
    responses(
        (status = 200, description = "One page of messages", body = MessagePageResponse),
        (status = 400, description = "Unknown sort type"),
        (status = 404, description = "No messages on this page"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Messages"
)]
pub async fn list_messages(
    State(state): State<MessageAppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessagePageResponse>, ApiError> {
    let sort = query.sort().map_err(api_error)?;

    let page = state
        .message_service
        .get_paginated(sort, query.query, query.page_number, query.page_size)
        .await
        .map_err(api_error)?;

    if page.items.is_empty() {
        return Err((StatusCode::NOT_FOUND, "No messages found".to_string()));
    }

    Ok(Json(page.into()))
}

/// Get a message by ID
#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(
        ("id" = i32, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message found", body = MessageResponse),
        (status = 404, description = "Message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Messages"
)]
pub async fn get_message(
    State(state): State<MessageAppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .message_service
        .get(id)
        .await
        .map_err(api_error)?
        .ok_or((StatusCode::NOT_FOUND, "Message not found".to_string()))?;

    Ok(Json(message.into()))
}

/// Replace a message's fields
#[utoipa::path(
    put,
    path = "/messages/{id}",
    params(
        ("id" = i32, Path, description = "Message ID")
    ),
    request_body = MessageRequest,
    responses(
        (status = 204, description = "Message updated"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Messages"
)]
pub async fn update_message(
    State(state): State<MessageAppState>,
    Path(id): Path<i32>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(json_error)?;
    payload.validate().map_err(api_error)?;

    state
        .message_service
        .update(id, payload.into())
        .await
        .map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a message
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(
        ("id" = i32, Path, description = "Message ID")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "Message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Messages"
)]
pub async fn delete_message(
    State(state): State<MessageAppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .message_service
        .delete(id)
        .await
        .map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
