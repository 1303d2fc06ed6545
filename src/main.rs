// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guild API Server
//!
//! Syncs users from Clerk, issues cookie sessions and authorizes direct
//! uploads to S3 for profile pictures and video lessons.

use guild_api::{
    config::Config,
    db::{FirestoreDb, MemoryStore, Store},
    services::{ClerkClient, S3Presigner},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting Guild API"
    );

    // Firestore when a project is configured, otherwise process-local storage
    let store: Arc<dyn Store> = match &config.gcp_project_id {
        Some(project_id) => Arc::new(FirestoreDb::new(project_id).await?),
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let identity = Arc::new(ClerkClient::from_config(&config)?);
    tracing::info!(base_url = %config.clerk_api_url, "Clerk client initialized");

    let presigner = S3Presigner::from_env(&config.aws_region, &config.s3_bucket_name).await;
    tracing::info!(
        region = %config.aws_region,
        bucket = %config.s3_bucket_name,
        "S3 presigner initialized"
    );

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        identity,
        Arc::new(presigner),
    ));

    // Build router
    let app = guild_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guild_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
