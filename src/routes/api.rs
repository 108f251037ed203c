// SPDX-License-Identifier: MIT

//! API routes for authenticated users, plus public read paths.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityCompletion, ReviewStatus};
use crate::services::leveling;
use crate::services::{display_streak, streak_broken, NewSubmission};
use crate::time_utils::{format_utc_rfc3339, utc_day};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authenticated routes. The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/completions", post(submit_completion))
        .route(
            "/api/completions/{completion_id}/resubmit",
            post(resubmit_completion),
        )
        .route("/api/me/progress", get(get_progress))
        .route("/api/me/completions", get(get_my_completions))
}

/// Public read-only routes (no auth).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/activities", get(get_activities))
}

// ─── Completion Views ────────────────────────────────────────

/// Completion as returned by the API.
#[derive(Serialize)]
pub struct CompletionResponse {
    pub completion_id: String,
    pub activity_id: u64,
    pub user_id: u64,
    pub status: ReviewStatus,
    pub quantity: f64,
    pub co2e_kg: f64,
    pub points_earned: u32,
    pub completed_at: String,
    pub day: String,
    pub evidence_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl From<ActivityCompletion> for CompletionResponse {
    fn from(c: ActivityCompletion) -> Self {
        Self {
            completion_id: c.completion_id,
            activity_id: c.activity_id,
            user_id: c.user_id,
            status: c.status,
            quantity: c.quantity,
            co2e_kg: c.co2e_kg,
            points_earned: c.points_earned,
            completed_at: format_utc_rfc3339(c.completed_at),
            day: crate::time_utils::day_key(c.day),
            evidence_path: c.evidence_path,
            notes: c.notes,
            admin_notes: c.admin_notes,
            submitted_at: c.submitted_at,
            reviewed_at: c.reviewed_at,
        }
    }
}

// ─── Submission ──────────────────────────────────────────────

#[derive(Deserialize)]
struct SubmitRequest {
    activity_id: u64,
    quantity: f64,
    evidence_path: String,
    /// When the activity happened (RFC3339); defaults to now
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    notes: Option<String>,
}

/// Submit a completion for review.
async fn submit_completion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<CompletionResponse>> {
    let completion = state
        .submissions
        .submit(NewSubmission {
            user_id: user.user_id,
            activity_id: req.activity_id,
            quantity: req.quantity,
            evidence_path: req.evidence_path,
            completed_at: req.completed_at,
            notes: req.notes,
        })
        .await?;

    Ok(Json(completion.into()))
}

#[derive(Deserialize, Default)]
struct ResubmitRequest {
    notes: Option<String>,
    evidence_path: Option<String>,
}

/// Resubmit a rejected completion.
async fn resubmit_completion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(completion_id): Path<String>,
    Json(req): Json<ResubmitRequest>,
) -> Result<Json<CompletionResponse>> {
    let completion = state
        .submissions
        .resubmit(&completion_id, user.user_id, req.notes, req.evidence_path)
        .await?;

    Ok(Json(completion.into()))
}

// ─── Progress ────────────────────────────────────────────────

/// Current user's standing. Level, progress and the streak view are
/// derived fresh from the ledger on every call.
#[derive(Serialize)]
pub struct ProgressResponse {
    pub user_id: u64,
    pub username: String,
    pub total_points: u32,
    pub level: String,
    pub points_to_next: u32,
    pub progress_percentage: f64,
    /// Stored streak, zeroed for display when broken
    pub current_streak: u32,
    pub max_streak: u32,
    pub streak_broken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<String>,
}

/// Get the caller's points, level and streak view.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let ledger = state.db.get_user(user.user_id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("User {} not found", user.user_id))
    })?;

    let today = utc_day(chrono::Utc::now());
    let points = ledger.total_points;

    Ok(Json(ProgressResponse {
        user_id: ledger.user_id,
        username: ledger.username.clone(),
        total_points: points,
        level: leveling::level_for(points).to_string(),
        points_to_next: leveling::points_to_next(points),
        progress_percentage: leveling::progress_percentage(points),
        current_streak: display_streak(&ledger, today),
        max_streak: ledger.max_streak,
        streak_broken: streak_broken(&ledger, today),
        last_activity_date: ledger.last_activity_date.map(crate::time_utils::day_key),
    }))
}

/// Get the caller's completion history, newest first.
async fn get_my_completions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CompletionResponse>>> {
    let completions = state.db.get_completions_for_user(user.user_id).await?;
    Ok(Json(completions.into_iter().map(Into::into).collect()))
}

// ─── Public Reads ────────────────────────────────────────────

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub tiers: Vec<crate::services::leaderboard::TierGroup>,
}

/// Get the tiered leaderboard.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeaderboardResponse>> {
    let users = state.db.list_users().await?;
    Ok(Json(LeaderboardResponse {
        tiers: crate::services::build_leaderboard(&users),
    }))
}

#[derive(Serialize)]
pub struct ActivitySummary {
    pub activity_id: u64,
    pub name: String,
    pub category: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// List the activity catalog.
async fn get_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivitySummary>>> {
    let mut activities = state.db.list_activities().await?;
    activities.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(
        activities
            .into_iter()
            .map(|a| ActivitySummary {
                activity_id: a.activity_id,
                name: a.name,
                category: a.category.display_name().to_string(),
                unit: a.unit,
                description: a.description,
            })
            .collect(),
    ))
}
