// SPDX-License-Identifier: MIT

//! Admin review routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ReviewVerdict, User};
use crate::routes::api::CompletionResponse;
use crate::services::leveling;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Admin routes. Auth middleware is applied in routes/mod.rs; the admin
/// flag is checked per handler so the response carries a Forbidden body.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/admin/completions/{completion_id}/review",
            post(review_completion),
        )
        .route("/api/admin/completions/pending", get(list_pending))
}

fn require_admin(user: &AuthUser) -> Result<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Reviewing completions requires an admin account".to_string(),
        ))
    }
}

#[derive(Deserialize)]
struct ReviewRequest {
    /// "approved" or "rejected"; anything else is InvalidStatus
    status: String,
    admin_notes: Option<String>,
}

/// User ledger as returned after a review decision.
#[derive(Serialize)]
pub struct LedgerResponse {
    pub user_id: u64,
    pub total_points: u32,
    pub level: String,
    pub current_streak: u32,
    pub max_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<String>,
}

impl From<User> for LedgerResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            total_points: u.total_points,
            level: leveling::level_for(u.total_points).to_string(),
            current_streak: u.current_streak,
            max_streak: u.max_streak,
            last_activity_date: u.last_activity_date.map(crate::time_utils::day_key),
        }
    }
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub completion: CompletionResponse,
    pub user: LedgerResponse,
}

/// Apply a review decision to a completion.
async fn review_completion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(completion_id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    require_admin(&user)?;

    let verdict = ReviewVerdict::parse(&req.status).ok_or_else(|| {
        AppError::InvalidStatus(format!(
            "Review status must be \"approved\" or \"rejected\", got \"{}\"",
            req.status
        ))
    })?;

    tracing::info!(
        admin_id = user.user_id,
        completion_id = %completion_id,
        status = %req.status,
        "Review requested"
    );

    let (completion, ledger) = state
        .db
        .review_completion_atomic(&completion_id, verdict, req.admin_notes)
        .await?;

    Ok(Json(ReviewResponse {
        completion: completion.into(),
        user: ledger.into(),
    }))
}

/// List completions awaiting review, oldest first.
async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CompletionResponse>>> {
    require_admin(&user)?;

    let pending = state.db.list_pending_completions().await?;
    Ok(Json(pending.into_iter().map(Into::into).collect()))
}
