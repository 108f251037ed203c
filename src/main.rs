// SPDX-License-Identifier: MIT

//! EcoTrack Points API Server

use ecotrack_points::{
    config::Config,
    db::FirestoreDb,
    services::{EstimatorService, SubmissionService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting EcoTrack Points API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize CO2e estimator client
    let estimator = EstimatorService::new(&config.estimator_url);
    tracing::info!(url = %config.estimator_url, "CO2e estimator client initialized");

    let submissions = SubmissionService::new(db.clone(), estimator);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        submissions,
    });

    // Build router
    let app = ecotrack_points::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecotrack_points=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
