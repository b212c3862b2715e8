//! Contactdesk API Routes
//!
//! - /v1/contacts - Contact message intake and administration
//! - /v1/contacts/:id/files - Attachment management
//! - /messages - Message service CRUD and search
//! - /{contacts,messages}/liveness, /readiness - Health checks
//! - /{contacts,messages}/swagger - OpenAPI documentation

pub mod contacts;
pub mod health;
pub mod messages;
pub mod swagger;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use contactdesk::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, String);

/// Map a domain error to its HTTP status. Server-side failures are logged
/// and their details are kept out of the response.
pub fn api_error(e: DomainError) -> ApiError {
    match e {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        DomainError::ExternalService(_) | DomainError::Repository(_) => {
            tracing::error!(error = %e, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            )
        }
    }
}

/// Missing or malformed JSON bodies are plain validation failures
pub fn json_error(rejection: JsonRejection) -> ApiError {
    (StatusCode::BAD_REQUEST, rejection.body_text())
}

/// CORS policy: permissive without a list, otherwise exact origins plus
/// `*.example.com` style wildcard subdomains
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(allowed) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let allowed = allowed.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| origin_allowed(&allowed, origin))
                .unwrap_or(false)
        }))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|pattern| {
        if pattern == "*" {
            return true;
        }
        match pattern.strip_prefix("*.") {
            Some(domain) => origin_host(origin)
                .map(|host| host.ends_with(&format!(".{}", domain)))
                .unwrap_or(false),
            None => pattern.eq_ignore_ascii_case(origin),
        }
    })
}

/// Host part of an origin such as `https://app.maliev.com:8443`
fn origin_host(origin: &str) -> Option<&str> {
    let rest = origin.split_once("://").map(|(_, rest)| rest)?;
    let host = rest.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(
            api_error(DomainError::not_found("ContactMessage", 1)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            api_error(DomainError::Validation("bad".to_string())),
            (StatusCode::BAD_REQUEST, "bad".to_string())
        );

        let (status, body) = api_error(DomainError::Repository("connection reset".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("connection reset"));

        assert_eq!(
            api_error(DomainError::ExternalService("down".to_string())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_origin_allowed() {
        let allowed = vec![
            "https://maliev.com".to_string(),
            "*.maliev.com".to_string(),
        ];

        assert!(origin_allowed(&allowed, "https://maliev.com"));
        assert!(origin_allowed(&allowed, "https://admin.maliev.com"));
        assert!(origin_allowed(&allowed, "https://admin.maliev.com:8443"));
        assert!(!origin_allowed(&allowed, "https://maliev.com.evil.io"));
        assert!(!origin_allowed(&allowed, "https://evilmaliev.com"));
        assert!(!origin_allowed(&allowed, "http://localhost:3000"));
    }
}
