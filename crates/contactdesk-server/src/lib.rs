//! Contactdesk API servers
//!
//! Two HTTP services built on the `contactdesk` domain crate:
//!
//! - **Contact Service**: contact-form intake with attachments forwarded to
//!   the upload service, plus administrative listing and status management
//! - **Message Service**: CRUD with search, sorting and pagination
//!
//! Each binary wires its adapters from [`config::Settings`] and serves the
//! router returned by [`contact_app`] or [`message_app`].

pub mod adapters;
pub mod application;
pub mod auth;
pub mod config;
pub mod models;
pub mod rate_limit;
pub mod routes;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{ContactService, MessageService};
use auth::JwtVerifier;
use config::Settings;
use rate_limit::SlidingWindowLimiter;

/// Contact Service state
#[derive(Clone)]
pub struct ContactAppState {
    pub contact_service: Arc<ContactService>,
}

/// Message Service state
#[derive(Clone)]
pub struct MessageAppState {
    pub message_service: Arc<MessageService>,
}

/// Cross-cutting request guards shared by both services
#[derive(Clone)]
pub struct Guards {
    /// `None` lets every request through
    pub verifier: Option<Arc<JwtVerifier>>,
    pub global_limiter: Arc<SlidingWindowLimiter>,
    pub contact_limiter: Arc<SlidingWindowLimiter>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub max_request_bytes: usize,
}

impl Guards {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            verifier: settings.jwt.as_ref().map(|jwt| Arc::new(JwtVerifier::new(jwt))),
            global_limiter: Arc::new(SlidingWindowLimiter::per_minute(
                "global",
                settings.rate_limits.global_per_minute,
            )),
            contact_limiter: Arc::new(SlidingWindowLimiter::per_minute(
                "contact",
                settings.rate_limits.contact_per_minute,
            )),
            cors_allowed_origins: settings.cors_allowed_origins.clone(),
            max_request_bytes: settings.max_request_bytes,
        }
    }
}

/// Apply bearer auth and the global limiter to a group of routes. The
/// limiter runs first so rejected tokens still count against the caller.
fn protect<S>(router: Router<S>, guards: &Guards) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn_with_state(
            guards.verifier.clone(),
            auth::require_bearer,
        ))
        .route_layer(middleware::from_fn_with_state(
            guards.global_limiter.clone(),
            rate_limit::enforce,
        ))
}

/// Outer layers shared by both services
fn finish(router: Router, guards: &Guards) -> Router {
    router
        .layer(DefaultBodyLimit::max(guards.max_request_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(routes::cors_layer(guards.cors_allowed_origins.as_deref())),
        )
}

/// Contact Service router
pub fn contact_app(state: ContactAppState, guards: &Guards) -> Router {
    let submissions = routes::contacts::submission_router().route_layer(
        middleware::from_fn_with_state(guards.contact_limiter.clone(), rate_limit::enforce),
    );
    let admin = protect(routes::contacts::admin_router(), guards);

    let router = Router::new()
        .merge(
            SwaggerUi::new("/contacts/swagger").url(
                "/contacts/api-docs/v1/swagger.json",
                routes::swagger::ContactApiDoc::openapi(),
            ),
        )
        .merge(routes::health::contact_router())
        .merge(submissions)
        .merge(admin)
        .with_state(state);

    finish(router, guards)
}

/// Message Service router
pub fn message_app(state: MessageAppState, guards: &Guards) -> Router {
    let router = Router::new()
        .merge(
            SwaggerUi::new("/messages/swagger").url(
                "/messages/api-docs/v1/swagger.json",
                routes::swagger::MessageApiDoc::openapi(),
            ),
        )
        .merge(routes::health::message_router())
        .merge(protect(routes::messages::router(), guards))
        .with_state(state);

    finish(router, guards)
}

/// Install the fmt subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
