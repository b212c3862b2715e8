//! Contact Service
//!
//! Accepts contact-form submissions, forwards attachments to the upload
//! service and exposes administrative endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use contactdesk::{ContactMessage, ContactRepository};
use contactdesk_server::{
    adapters::{HttpUploadClient, InMemoryContactRepository, PgContactRepository, TtlCache},
    application::ContactService,
    config::{CacheSettings, Settings, UploadSettings},
    contact_app, init_tracing, ContactAppState, Guards,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    tracing::info!("📨 Contact Service initializing...");

    let settings = Settings::from_env()?;
    let upload_settings = UploadSettings::from_env()?;
    let cache_settings = CacheSettings::from_env()?;

    let repo: Arc<dyn ContactRepository> = match &settings.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations/contacts")
                .run(&pool)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!("🗄️  PostgreSQL connected, migrations applied");

            Arc::new(PgContactRepository::new(pool))
        }
        None => {
            tracing::warn!("⚠️  No DATABASE_URL set - using in-memory store");
            Arc::new(InMemoryContactRepository::new())
        }
    };

    let uploads = HttpUploadClient::new(&upload_settings)
        .context("Failed to build upload service client")?;
    tracing::info!(base_url = %upload_settings.base_url, "📤 Upload service client ready");

    let cache = TtlCache::<ContactMessage>::new(cache_settings.max_entries);
    let contact_service = ContactService::new(
        repo,
        Arc::new(uploads),
        Arc::new(cache),
        cache_settings.ttl,
    );

    let guards = Guards::from_settings(&settings);
    if guards.verifier.is_some() {
        tracing::info!("🔐 JWT authentication enabled");
    } else {
        tracing::warn!("⚠️  No JWT settings - authentication disabled");
    }

    let app = contact_app(
        ContactAppState {
            contact_service: Arc::new(contact_service),
        },
        &guards,
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("📚 Swagger UI: /contacts/swagger");
    tracing::info!("✅ Contact Service listening on {}", settings.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("👋 Contact Service shutting down");
}
