//! Shared helpers for the HTTP integration tests: server spawning, a fake
//! upload service and bearer tokens.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::sync::oneshot;

use contactdesk_server::config::JwtSettings;

pub const ISSUER: &str = "https://auth.maliev.test";
pub const AUDIENCE: &str = "contactdesk";
pub const SECRET: &str = "integration-test-signing-key-0123456789";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        security_key: SECRET.to_string(),
    }
}

pub fn bearer_token() -> String {
    let claims = serde_json::json!({
        "sub": "admin@maliev.test",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token");
    format!("Bearer {}", token)
}

/// Serve `router` on an ephemeral port. Dropping or firing the sender stops it.
pub async fn spawn(router: Router) -> (String, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .ok();
    });
    (format!("http://{addr}"), shutdown_tx)
}

/// What the fake upload service has seen
#[derive(Clone, Default)]
pub struct UploadLog {
    /// Raw multipart bodies, lossily decoded
    pub uploads: Arc<Mutex<Vec<String>>>,
    pub deletes: Arc<Mutex<Vec<String>>>,
}

impl UploadLog {
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

/// Fake upload service.
///
/// - uploads whose object name ends in `reject.txt` fail with 500
/// - deleting `missing` answers 404, `broken` answers 500, anything else 204
/// - downloading `missing` answers 404; anything else returns text content
pub async fn start_upload_service() -> (String, UploadLog, oneshot::Sender<()>) {
    let log = UploadLog::default();
    let router = Router::new()
        .route("/api/v1/upload", post(fake_upload))
        .route("/api/v1/files/:id", delete(fake_delete))
        .route("/api/v1/files/:id/download", get(fake_download))
        .with_state(log.clone());

    let (url, shutdown) = spawn(router).await;
    (url, log, shutdown)
}

async fn fake_upload(State(log): State<UploadLog>, headers: HeaderMap, body: Bytes) -> Response {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));
    if !is_multipart {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let body = String::from_utf8_lossy(&body).to_string();
    let Some(object_name) = form_field(&body, "objectName") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if object_name.ends_with("reject.txt") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let file_id = {
        let mut uploads = log.uploads.lock().unwrap();
        uploads.push(body.clone());
        format!("file-{}", uploads.len())
    };

    Json(serde_json::json!({
        "fileId": file_id,
        "objectName": object_name,
        "bucket": "contacts",
        "fileSize": 5,
        "uploadedAt": chrono::Utc::now(),
    }))
    .into_response()
}

async fn fake_delete(State(log): State<UploadLog>, Path(id): Path<String>) -> StatusCode {
    log.deletes.lock().unwrap().push(id.clone());
    match id.as_str() {
        "missing" => StatusCode::NOT_FOUND,
        "broken" => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::NO_CONTENT,
    }
}

async fn fake_download(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }

    (
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.txt\"", id),
            ),
        ],
        format!("content of {}", id),
    )
        .into_response()
}

/// Value of a text field in a multipart body
pub fn form_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{}\"", name);
    let rest = &body[body.find(&marker)? + marker.len()..];
    let rest = &rest[rest.find("\r\n\r\n")? + 4..];
    let end = rest.find("\r\n")?;
    Some(rest[..end].to_string())
}
