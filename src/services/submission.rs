// SPDX-License-Identifier: MIT

//! Completion submission and resubmission.
//!
//! Submission validates input, buckets the completion to a UTC day,
//! stores the CO2e estimate, and persists the record in Pending Review.
//! No points are touched here: credit is deferred to review so a flood
//! of unreviewed submissions cannot inflate anyone's score.

use chrono::{DateTime, Utc};

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{ActivityCompletion, ReviewStatus};
use crate::services::EstimatorService;
use crate::time_utils::{format_utc_rfc3339, utc_day};

/// A user's submission request, identity already resolved by the caller.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: u64,
    pub activity_id: u64,
    pub quantity: f64,
    pub evidence_path: String,
    /// When the activity happened; defaults to now
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Submission workflow service.
#[derive(Clone)]
pub struct SubmissionService {
    db: FirestoreDb,
    estimator: EstimatorService,
}

impl SubmissionService {
    pub fn new(db: FirestoreDb, estimator: EstimatorService) -> Self {
        Self { db, estimator }
    }

    /// Submit a new completion in Pending Review state.
    pub async fn submit(&self, submission: NewSubmission) -> Result<ActivityCompletion> {
        validate_submission(submission.quantity, &submission.evidence_path)?;

        let activity = self
            .db
            .get_activity(submission.activity_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Activity {} not found", submission.activity_id))
            })?;

        let completed_at = submission.completed_at.unwrap_or_else(Utc::now);
        let day = utc_day(completed_at);

        let co2e_kg = self
            .estimator
            .estimate(activity.category, submission.quantity)
            .await;

        let completion = ActivityCompletion {
            completion_id: ActivityCompletion::document_id(
                submission.user_id,
                submission.activity_id,
                day,
            ),
            user_id: submission.user_id,
            activity_id: submission.activity_id,
            category: activity.category,
            completed_at,
            day,
            quantity: submission.quantity,
            co2e_kg,
            points_earned: 0,
            status: ReviewStatus::PendingReview,
            admin_notes: None,
            evidence_path: submission.evidence_path,
            notes: submission.notes,
            submitted_at: format_utc_rfc3339(Utc::now()),
            reviewed_at: None,
        };

        // The duplicate check and the create commit together, so two
        // racing submissions for the same day yield exactly one record.
        self.db.create_completion(&completion).await?;

        tracing::info!(
            user_id = completion.user_id,
            activity_id = completion.activity_id,
            completion_id = %completion.completion_id,
            co2e_kg,
            "Completion submitted for review"
        );

        Ok(completion)
    }

    /// Return a rejected completion to Pending Review, preserving its
    /// identity. Points and streak are untouched; only a subsequent
    /// review decision moves the ledger.
    pub async fn resubmit(
        &self,
        completion_id: &str,
        user_id: u64,
        notes: Option<String>,
        evidence_path: Option<String>,
    ) -> Result<ActivityCompletion> {
        let mut completion = self
            .db
            .get_completion(completion_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Completion {} not found", completion_id))
            })?;

        if completion.user_id != user_id {
            return Err(AppError::Forbidden(
                "Completion belongs to another user".to_string(),
            ));
        }
        if completion.status != ReviewStatus::Rejected {
            return Err(AppError::InvalidState(
                "Only rejected completions can be resubmitted".to_string(),
            ));
        }

        if let Some(evidence) = evidence_path {
            if evidence.trim().is_empty() {
                return Err(AppError::Validation(
                    "Evidence image path must not be empty".to_string(),
                ));
            }
            completion.evidence_path = evidence;
        }
        if notes.is_some() {
            completion.notes = notes;
        }

        completion.status = ReviewStatus::PendingReview;
        completion.admin_notes = None;
        completion.reviewed_at = None;

        self.db.upsert_completion(&completion).await?;

        tracing::info!(
            user_id,
            completion_id = %completion.completion_id,
            "Completion resubmitted for review"
        );

        Ok(completion)
    }
}

/// Validate caller-supplied submission fields. Each invariant fails with
/// its own message because the client shows different guidance for each.
fn validate_submission(quantity: f64, evidence_path: &str) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }
    if evidence_path.trim().is_empty() {
        return Err(AppError::Validation(
            "Evidence image is required".to_string(),
        ));
    }
    Ok(())
}
