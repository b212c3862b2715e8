//! Message Service
//!
//! CRUD and search over stored messages.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use contactdesk::MessageRepository;
use contactdesk_server::{
    adapters::{InMemoryMessageRepository, PgMessageRepository},
    application::MessageService,
    config::Settings,
    init_tracing, message_app, Guards, MessageAppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    tracing::info!("💬 Message Service initializing...");

    let settings = Settings::from_env()?;

    let repo: Arc<dyn MessageRepository> = match &settings.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations/messages")
                .run(&pool)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!("🗄️  PostgreSQL connected, migrations applied");

            Arc::new(PgMessageRepository::new(pool))
        }
        None => {
            tracing::warn!("⚠️  No DATABASE_URL set - using in-memory store");
            Arc::new(InMemoryMessageRepository::new())
        }
    };

    let guards = Guards::from_settings(&settings);
    if guards.verifier.is_none() {
        tracing::warn!("⚠️  No JWT settings - authentication disabled");
    }

    let app = message_app(
        MessageAppState {
            message_service: Arc::new(MessageService::new(repo)),
        },
        &guards,
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("📚 Swagger UI: /messages/swagger");
    tracing::info!("✅ Message Service listening on {}", settings.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
    })
    .await
    .context("Server error")?;

    Ok(())
}
