//! Contact Routes - Contact-form intake and administration
//!
//! HTTP handlers that delegate to ContactService for business logic.
//! Submission is anonymous; every other route is for administrators.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use contactdesk::NewContactMessage;

use super::{api_error, json_error, ApiError};
use crate::models::{
    ContactFileResponse, ContactMessageResponse, CreateContactRequest, ListContactsQuery,
    UpdateContactStatusRequest,
};
use crate::ContactAppState;

/// Anonymous submission route
pub fn submission_router() -> Router<ContactAppState> {
    Router::new().route("/v1/contacts", post(create_contact))
}

/// Administrative routes
pub fn admin_router() -> Router<ContactAppState> {
    Router::new()
        .route("/v1/contacts", get(list_contacts))
        .route("/v1/contacts/:id", get(get_contact).delete(delete_contact))
        .route("/v1/contacts/:id/status", put(update_contact_status))
        .route("/v1/contacts/:id/files", get(list_contact_files))
        .route("/v1/contacts/:id/files/:file_id", delete(delete_contact_file))
        .route(
            "/v1/contacts/:id/files/:file_id/download",
            get(download_contact_file),
        )
}

/// Submit a contact message
#[utoipa::path(
    post,
    path = "/v1/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact message created", body = ContactMessageResponse),
        (status = 400, description = "Invalid request"),
        (status = 429, description = "Too many submissions"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Contacts"
)]
pub async fn create_contact(
    State(state): State<ContactAppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(json_error)?;
    payload.validate().map_err(api_error)?;

    let created = state
        .contact_service
        .create(NewContactMessage::from(payload))
        .await
        .map_err(api_error)?;

    let location = format!("/v1/contacts/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(ContactMessageResponse::from(created)),
    )
        .into_response())
}

/// List contact messages, newest first
#[utoipa::path(
    get,
    path = "/v1/contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "One page of contact messages", body = Vec<ContactMessageResponse>),
        (status = 400, description = "Unknown status or contact type"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn list_contacts(
    State(state): State<ContactAppState>,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<Vec<ContactMessageResponse>>, ApiError> {
    let params = query.parse().map_err(api_error)?;

    let messages = state
        .contact_service
        .list(
            params.page,
            params.page_size,
            params.status,
            params.contact_type,
        )
        .await
        .map_err(api_error)?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Get a contact message with its files
#[utoipa::path(
    get,
    path = "/v1/contacts/{id}",
    params(
        ("id" = i32, Path, description = "Contact message ID")
    ),
    responses(
        (status = 200, description = "Contact message found", body = ContactMessageResponse),
        (status = 404, description = "Contact message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn get_contact(
    State(state): State<ContactAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContactMessageResponse>, ApiError> {
    let message = state
        .contact_service
        .get_by_id(id)
        .await
        .map_err(api_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            "Contact message not found".to_string(),
        ))?;

    Ok(Json(message.into()))
}

/// Change the status (and optionally the priority) of a contact message
#[utoipa::path(
    put,
    path = "/v1/contacts/{id}/status",
    params(
        ("id" = i32, Path, description = "Contact message ID")
    ),
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ContactMessageResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Contact message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn update_contact_status(
    State(state): State<ContactAppState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateContactStatusRequest>, JsonRejection>,
) -> Result<Json<ContactMessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(json_error)?;

    let message = state
        .contact_service
        .update_status(id, payload.status, payload.priority)
        .await
        .map_err(api_error)?;

    Ok(Json(message.into()))
}

/// Delete a contact message and its files
#[utoipa::path(
    delete,
    path = "/v1/contacts/{id}",
    params(
        ("id" = i32, Path, description = "Contact message ID")
    ),
    responses(
        (status = 204, description = "Contact message deleted"),
        (status = 404, description = "Contact message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn delete_contact(
    State(state): State<ContactAppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.contact_service.delete(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the files attached to a contact message
#[utoipa::path(
    get,
    path = "/v1/contacts/{id}/files",
    params(
        ("id" = i32, Path, description = "Contact message ID")
    ),
    responses(
        (status = 200, description = "Attached files", body = Vec<ContactFileResponse>),
        (status = 404, description = "Contact message not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn list_contact_files(
    State(state): State<ContactAppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ContactFileResponse>>, ApiError> {
    let files = state
        .contact_service
        .list_files(id)
        .await
        .map_err(api_error)?;

    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// Delete one attached file
#[utoipa::path(
    delete,
    path = "/v1/contacts/{id}/files/{file_id}",
    params(
        ("id" = i32, Path, description = "Contact message ID"),
        ("file_id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "File not found for this contact message"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn delete_contact_file(
    State(state): State<ContactAppState>,
    Path((id, file_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .contact_service
        .delete_file(id, file_id)
        .await
        .map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Download an attached file from the upload service
#[utoipa::path(
    get,
    path = "/v1/contacts/{id}/files/{file_id}/download",
    params(
        ("id" = i32, Path, description = "Contact message ID"),
        ("file_id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found for this contact message"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Upload service failure")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn download_contact_file(
    State(state): State<ContactAppState>,
    Path((id, file_id)): Path<(i32, i32)>,
) -> Result<Response, ApiError> {
    let (_, downloaded) = state
        .contact_service
        .download_file(id, file_id)
        .await
        .map_err(api_error)?;

    let content_type = HeaderValue::from_str(&downloaded.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        downloaded.file_name.replace('"', "_")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        Body::from(downloaded.content),
    )
        .into_response())
}
