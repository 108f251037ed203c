// SPDX-License-Identifier: MIT

//! Activity completion model and the review state machine.
//!
//! A completion is one user's attempt to log one activity on one UTC
//! calendar day. It is born Pending Review with zero points; an admin
//! decision moves it to Approved or Rejected, and that transition is the
//! only place points and streaks change. The transition itself is pure
//! (`apply_review` mutates in-memory snapshots); the Firestore layer
//! runs it inside a transaction and commits both records together.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, User};
use crate::time_utils::day_key;

/// Points per 0.5 kg of estimated CO2e.
const CO2E_POINT_STEP_KG: f64 = 0.5;
/// Water-category completions earn one bonus point per 10 quantity units.
const WATER_BONUS_UNIT: f64 = 10.0;

/// Review state of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    PendingReview,
    Approved,
    Rejected,
}

/// An admin's requested decision. Only Approved/Rejected are legal
/// review targets; anything else is `InvalidStatus` at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approved,
    Rejected,
}

impl ReviewVerdict {
    /// Parse a caller-supplied status string. Returns None for anything
    /// that is not a legal review target (including "pending_review").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(ReviewVerdict::Approved),
            "rejected" => Some(ReviewVerdict::Rejected),
            _ => None,
        }
    }

    pub fn status(&self) -> ReviewStatus {
        match self {
            ReviewVerdict::Approved => ReviewStatus::Approved,
            ReviewVerdict::Rejected => ReviewStatus::Rejected,
        }
    }
}

/// What a review transition did to the ledger.
#[derive(Debug, Clone, Copy)]
pub struct ReviewEffect {
    /// A genuine approval (previous status was not Approved)
    pub to_approved: bool,
    /// A genuine approval reversal (Approved -> Rejected)
    pub to_rejected: bool,
    /// Points credited to the user by this transition
    pub points_awarded: u32,
}

/// Stored completion record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCompletion {
    /// Document ID: `{user_id}_{activity_id}_{day}`. One document per
    /// (user, activity, day) is what enforces duplicate rejection, and
    /// resubmission reuses the same document.
    pub completion_id: String,
    /// Owning user
    pub user_id: u64,
    /// Catalog activity that was logged
    pub activity_id: u64,
    /// Category, denormalized from the catalog at submission time so the
    /// review transaction needs no catalog read
    pub category: Category,
    /// When the activity happened (authoritative for day bucketing)
    pub completed_at: DateTime<Utc>,
    /// UTC calendar day of `completed_at`
    pub day: NaiveDate,
    /// Quantity in the activity's unit, > 0
    pub quantity: f64,
    /// CO2e estimate stored at submission time (kg, >= 0)
    pub co2e_kg: f64,
    /// Points awarded; authoritative only while Approved, otherwise 0
    #[serde(default)]
    pub points_earned: u32,
    /// Review state
    pub status: ReviewStatus,
    /// Reviewer's notes, cleared on resubmission
    #[serde(default)]
    pub admin_notes: Option<String>,
    /// Opaque path to the evidence image
    pub evidence_path: String,
    /// Submitter's free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// When the completion was submitted (ISO 8601)
    pub submitted_at: String,
    /// When the most recent review decision was made (ISO 8601)
    #[serde(default)]
    pub reviewed_at: Option<String>,
}

impl ActivityCompletion {
    /// Document ID for a (user, activity, day) triple.
    pub fn document_id(user_id: u64, activity_id: u64, day: NaiveDate) -> String {
        format!("{}_{}_{}", user_id, activity_id, day_key(day))
    }

    /// Points this completion is worth when approved, recomputed from
    /// stored fields so re-approval replaces rather than accumulates:
    /// floor(co2e / 0.5), plus floor(quantity / 10) for water activities.
    pub fn award_points(&self) -> u32 {
        let co2e_points = (self.co2e_kg.max(0.0) / CO2E_POINT_STEP_KG).floor() as u32;
        let water_bonus = if self.category.is_water() {
            (self.quantity.max(0.0) / WATER_BONUS_UNIT).floor() as u32
        } else {
            0
        };
        co2e_points + water_bonus
    }

    /// Apply an admin decision to this completion and the owner's ledger.
    ///
    /// Only a genuine approval credits points and streak, and only a
    /// genuine approval reversal (Approved -> Rejected) rolls credit
    /// back. Re-stating the current status is a ledger no-op. Streak
    /// credit uses the completion's own day, never the review time.
    pub fn apply_review(
        &mut self,
        user: &mut User,
        verdict: ReviewVerdict,
        admin_notes: Option<String>,
        now: &str,
    ) -> ReviewEffect {
        let target = verdict.status();
        let to_approved = self.status != ReviewStatus::Approved && target == ReviewStatus::Approved;
        let to_rejected = self.status == ReviewStatus::Approved && target == ReviewStatus::Rejected;

        let mut points_awarded = 0;
        if to_approved {
            points_awarded = self.award_points();
            self.points_earned = points_awarded;
            user.total_points += points_awarded;
            user.credit_streak(self.day);
        } else if to_rejected {
            // Floor at zero: rollback never drives the ledger negative.
            user.total_points = user.total_points.saturating_sub(self.points_earned);
            self.points_earned = 0;
        }

        self.status = target;
        self.admin_notes = admin_notes;
        self.reviewed_at = Some(now.to_string());

        ReviewEffect {
            to_approved,
            to_rejected,
            points_awarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_completion(category: Category, quantity: f64, co2e: f64) -> ActivityCompletion {
        let d = day("2026-03-14");
        ActivityCompletion {
            completion_id: ActivityCompletion::document_id(1, 7, d),
            user_id: 1,
            activity_id: 7,
            category,
            completed_at: "2026-03-14T08:30:00Z".parse().unwrap(),
            day: d,
            quantity,
            co2e_kg: co2e,
            points_earned: 0,
            status: ReviewStatus::PendingReview,
            admin_notes: None,
            evidence_path: "evidence/1/7.jpg".to_string(),
            notes: None,
            submitted_at: "2026-03-14T09:00:00Z".to_string(),
            reviewed_at: None,
        }
    }

    fn make_user() -> User {
        User {
            user_id: 1,
            username: "ada".to_string(),
            email: None,
            is_admin: false,
            total_points: 0,
            current_streak: 0,
            max_streak: 0,
            last_activity_date: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    const NOW: &str = "2026-03-15T12:00:00Z";

    #[test]
    fn test_water_bonus_award() {
        // floor(1.0/0.5) + floor(25/10) = 2 + 2
        let completion = make_completion(Category::WaterConservation, 25.0, 1.0);
        assert_eq!(completion.award_points(), 4);
    }

    #[test]
    fn test_non_water_category_gets_no_bonus() {
        // floor(1.2/0.5) = 2, no water term
        let completion = make_completion(Category::Transportation, 25.0, 1.2);
        assert_eq!(completion.award_points(), 2);
    }

    #[test]
    fn test_zero_co2e_water_activity_still_earns_bonus() {
        let completion = make_completion(Category::WaterConservation, 30.0, 0.0);
        assert_eq!(completion.award_points(), 3);
    }

    #[test]
    fn test_approval_credits_points_and_streak() {
        let mut completion = make_completion(Category::Transportation, 10.0, 2.0);
        let mut user = make_user();

        let effect = completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);

        assert!(effect.to_approved);
        assert_eq!(effect.points_awarded, 4);
        assert_eq!(completion.status, ReviewStatus::Approved);
        assert_eq!(completion.points_earned, 4);
        assert_eq!(user.total_points, 4);
        assert_eq!(user.current_streak, 1);
        assert_eq!(user.last_activity_date, Some(completion.day));
        assert_eq!(completion.reviewed_at.as_deref(), Some(NOW));
    }

    #[test]
    fn test_duplicate_approval_is_idempotent() {
        let mut completion = make_completion(Category::Transportation, 10.0, 2.0);
        let mut user = make_user();

        completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);
        let points_after_one = user.total_points;
        let earned_after_one = completion.points_earned;

        let effect = completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);

        assert!(!effect.to_approved);
        assert_eq!(user.total_points, points_after_one);
        assert_eq!(completion.points_earned, earned_after_one);
    }

    #[test]
    fn test_approval_reversal_rolls_back_exactly() {
        let mut completion = make_completion(Category::WaterConservation, 25.0, 1.0);
        let mut user = make_user();
        user.total_points = 100;

        completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);
        assert_eq!(user.total_points, 104);

        let effect = completion.apply_review(
            &mut user,
            ReviewVerdict::Rejected,
            Some("photo does not match".to_string()),
            NOW,
        );

        assert!(effect.to_rejected);
        assert_eq!(user.total_points, 100);
        assert_eq!(completion.points_earned, 0);
        assert_eq!(completion.status, ReviewStatus::Rejected);
        assert_eq!(
            completion.admin_notes.as_deref(),
            Some("photo does not match")
        );
    }

    #[test]
    fn test_rejecting_pending_item_is_not_a_reversal() {
        let mut completion = make_completion(Category::Energy, 5.0, 3.0);
        let mut user = make_user();
        user.total_points = 50;

        let effect = completion.apply_review(&mut user, ReviewVerdict::Rejected, None, NOW);

        assert!(!effect.to_approved);
        assert!(!effect.to_rejected);
        assert_eq!(user.total_points, 50);
        assert_eq!(completion.status, ReviewStatus::Rejected);
        assert_eq!(completion.points_earned, 0);
    }

    #[test]
    fn test_rollback_floors_at_zero() {
        let mut completion = make_completion(Category::Transportation, 10.0, 5.0);
        let mut user = make_user();

        completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);
        // Simulate an earlier out-of-band deduction leaving fewer points
        // than this completion awarded.
        user.total_points = 3;

        completion.apply_review(&mut user, ReviewVerdict::Rejected, None, NOW);
        assert_eq!(user.total_points, 0);
    }

    #[test]
    fn test_approving_previously_rejected_item_awards() {
        let mut completion = make_completion(Category::Food, 2.0, 1.5);
        let mut user = make_user();

        completion.apply_review(&mut user, ReviewVerdict::Rejected, None, NOW);
        let effect = completion.apply_review(&mut user, ReviewVerdict::Approved, None, NOW);

        assert!(effect.to_approved);
        assert_eq!(user.total_points, 3);
        assert_eq!(completion.points_earned, 3);
    }

    #[test]
    fn test_points_stay_non_negative_across_any_sequence() {
        let mut completion = make_completion(Category::WaterConservation, 100.0, 4.0);
        let mut user = make_user();

        for verdict in [
            ReviewVerdict::Rejected,
            ReviewVerdict::Approved,
            ReviewVerdict::Approved,
            ReviewVerdict::Rejected,
            ReviewVerdict::Rejected,
            ReviewVerdict::Approved,
        ] {
            completion.apply_review(&mut user, verdict, None, NOW);
            assert!(user.max_streak >= user.current_streak);
        }
        // u32 by type; the sequence above exercises the saturating path.
        assert_eq!(user.total_points, completion.award_points());
    }

    #[test]
    fn test_verdict_parse_rejects_other_statuses() {
        assert_eq!(ReviewVerdict::parse("approved"), Some(ReviewVerdict::Approved));
        assert_eq!(ReviewVerdict::parse("rejected"), Some(ReviewVerdict::Rejected));
        assert_eq!(ReviewVerdict::parse("pending_review"), None);
        assert_eq!(ReviewVerdict::parse("Approved"), None);
        assert_eq!(ReviewVerdict::parse(""), None);
    }
}
