// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

use ecotrack_points::config::Config;
use ecotrack_points::db::FirestoreDb;
use ecotrack_points::middleware::auth::create_jwt;
use ecotrack_points::models::{Activity, Category, User};
use ecotrack_points::routes::create_router;
use ecotrack_points::services::{EstimatorService, SubmissionService};
use ecotrack_points::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let submissions = SubmissionService::new(db.clone(), EstimatorService::new_mock());

    let state = Arc::new(AppState {
        config,
        db,
        submissions,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    let submissions = SubmissionService::new(db.clone(), EstimatorService::new_mock());

    let state = Arc::new(AppState {
        config,
        db,
        submissions,
    });

    (create_router(state.clone()), state)
}

/// Mint a session token for a test user.
#[allow(dead_code)]
pub fn auth_token(user_id: u64, is_admin: bool, signing_key: &[u8]) -> String {
    create_jwt(user_id, is_admin, signing_key).expect("Failed to mint test token")
}

/// A fresh user ledger for seeding.
#[allow(dead_code)]
pub fn make_user(user_id: u64, username: &str) -> User {
    User {
        user_id,
        username: username.to_string(),
        email: Some(format!("{}@campus.example", username)),
        is_admin: false,
        total_points: 0,
        current_streak: 0,
        max_streak: 0,
        last_activity_date: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// A catalog activity for seeding.
#[allow(dead_code)]
pub fn make_activity(activity_id: u64, name: &str, category: Category, unit: &str) -> Activity {
    Activity {
        activity_id,
        name: name.to_string(),
        category,
        unit: unit.to_string(),
        description: None,
    }
}
