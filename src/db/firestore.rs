// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (the points/streak ledger)
//! - Activities (read-only catalog)
//! - Completions (submitted activity attempts under review)
//!
//! The two write paths with invariants, completion creation and the
//! review transition, run as read-write transactions (`run_transaction`)
//! so their reads are registered for conflict detection and the
//! completion and the user ledger can never disagree after a declared
//! success.

use chrono::Utc;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Activity, ActivityCompletion, ReviewVerdict, User};
use crate::time_utils::format_utc_rfc3339;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Ledger Operations ──────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user ledger record.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.user_id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all users, for leaderboard derivation.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Activity Catalog Operations ─────────────────────────────

    /// Get a catalog activity by ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(&activity_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a catalog activity (admin/seed tooling).
    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(activity.activity_id.to_string())
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List the activity catalog.
    pub async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Completion Operations ───────────────────────────────────

    /// Get a completion by its document ID.
    pub async fn get_completion(
        &self,
        completion_id: &str,
    ) -> Result<Option<ActivityCompletion>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COMPLETIONS)
            .obj()
            .one(completion_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a completion (used by resubmission; creation goes through
    /// `create_completion`).
    pub async fn upsert_completion(
        &self,
        completion: &ActivityCompletion,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMPLETIONS)
            .document_id(&completion.completion_id)
            .object(completion)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all completions for a user, newest first.
    pub async fn get_completions_for_user(
        &self,
        user_id: u64,
    ) -> Result<Vec<ActivityCompletion>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMPLETIONS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id)]))
            .order_by([(
                "completed_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List completions awaiting review, oldest submission first.
    pub async fn list_pending_completions(&self) -> Result<Vec<ActivityCompletion>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMPLETIONS)
            .filter(|q| q.for_all([q.field("status").eq("pending_review")]))
            .order_by([(
                "submitted_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a completion, rejecting duplicates for the same
    /// (user, activity, day).
    ///
    /// The document ID is the (user, activity, day) triple, so two racing
    /// submissions target the same document. The existence read runs
    /// through the transaction-bound client, which registers the document
    /// in the transaction's read set: the loser's commit conflicts, the
    /// store retries it with fresh data, and the retry observes the
    /// winner's record and surfaces `DuplicateSubmission`. Exactly one
    /// Pending Review record can result.
    pub async fn create_completion(
        &self,
        completion: &ActivityCompletion,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        client
            .run_transaction(|db, transaction| {
                let completion = completion.clone();
                Box::pin(async move {
                    let existing: Option<ActivityCompletion> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COMPLETIONS)
                        .obj()
                        .one(&completion.completion_id)
                        .await?;

                    if existing.is_some() {
                        return Ok(Err(AppError::DuplicateSubmission(format!(
                            "Activity {} already logged for {}; resubmit the existing completion if it was rejected",
                            completion.activity_id, completion.day
                        ))));
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::COMPLETIONS)
                        .document_id(&completion.completion_id)
                        .object(&completion)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(()))
                })
            })
            .await
            .map_err(|e| AppError::Transient(format!("Submission transaction failed: {}", e)))?
    }

    // ─── Atomic Review Transition ────────────────────────────────

    /// Apply an admin review decision atomically.
    ///
    /// Loads the completion and its owner's ledger through the
    /// transaction-bound client (registering both documents in the read
    /// set), runs the review state machine in memory, and commits both
    /// records in a single Firestore transaction: points can never be
    /// credited without the completion marked Approved, or vice versa.
    /// If another reviewer races on the same user, the loser's commit
    /// conflicts and the store retries it against fresh snapshots; only
    /// retry exhaustion surfaces a `Transient` error.
    pub async fn review_completion_atomic(
        &self,
        completion_id: &str,
        verdict: ReviewVerdict,
        admin_notes: Option<String>,
    ) -> Result<(ActivityCompletion, User), AppError> {
        let client = self.get_client()?;
        let now = format_utc_rfc3339(Utc::now());
        let completion_id = completion_id.to_string();

        let outcome = client
            .run_transaction(|db, transaction| {
                let completion_id = completion_id.clone();
                let admin_notes = admin_notes.clone();
                let now = now.clone();
                Box::pin(async move {
                    let completion: Option<ActivityCompletion> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COMPLETIONS)
                        .obj()
                        .one(&completion_id)
                        .await?;

                    let Some(mut completion) = completion else {
                        return Ok(Err(AppError::NotFound(format!(
                            "Completion {} not found",
                            completion_id
                        ))));
                    };

                    let user: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&completion.user_id.to_string())
                        .await?;

                    let Some(mut user) = user else {
                        return Ok(Err(AppError::Database(format!(
                            "User {} missing for completion {}",
                            completion.user_id, completion_id
                        ))));
                    };

                    let effect = completion.apply_review(&mut user, verdict, admin_notes, &now);

                    db.fluent()
                        .update()
                        .in_col(collections::COMPLETIONS)
                        .document_id(&completion.completion_id)
                        .object(&completion)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(user.user_id.to_string())
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(Ok((completion, user, effect)))
                })
            })
            .await
            .map_err(|e| AppError::Transient(format!("Review transaction failed: {}", e)))?;

        let (completion, user, effect) = outcome?;

        tracing::info!(
            completion_id = %completion.completion_id,
            user_id = user.user_id,
            status = ?completion.status,
            to_approved = effect.to_approved,
            to_rejected = effect.to_rejected,
            points_awarded = effect.points_awarded,
            total_points = user.total_points,
            current_streak = user.current_streak,
            "Review committed"
        );

        Ok((completion, user))
    }
}
