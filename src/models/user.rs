// SPDX-License-Identifier: MIT

//! User ledger model and streak bookkeeping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user ledger stored in Firestore.
///
/// `total_points`, `current_streak`, `max_streak` and
/// `last_activity_date` are mutated only through the review transition
/// (see `ActivityCompletion::apply_review`), never by user-facing
/// endpoints. Level is deliberately NOT a field: it is derived from
/// `total_points` on every read so it can never go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub user_id: u64,
    /// Username, unique, used as the final leaderboard tie-break
    pub username: String,
    /// Email address (may be None if not shared)
    #[serde(default)]
    pub email: Option<String>,
    /// Whether this user may review completions
    #[serde(default)]
    pub is_admin: bool,
    /// Cumulative points across all approved completions
    #[serde(default)]
    pub total_points: u32,
    /// Consecutive-day streak as of `last_activity_date`
    #[serde(default)]
    pub current_streak: u32,
    /// High-water mark of `current_streak`
    #[serde(default)]
    pub max_streak: u32,
    /// UTC day of the most recent streak credit (None = never credited)
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
    /// When the user registered (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}

impl User {
    /// Credit a streak for an approved completion dated `day`.
    ///
    /// Uses the completion's own day, never "now", so that a backfilled
    /// item approved late still credits the day the activity happened:
    /// - no prior credit: streak starts at 1
    /// - same day as last credit: no change (one credit per day)
    /// - day after last credit: streak extends
    /// - gap after last credit: streak restarts at 1
    /// - day BEFORE last credit (out-of-order approval): no change at all
    pub fn credit_streak(&mut self, day: NaiveDate) {
        match self.last_activity_date {
            None => {
                self.current_streak = 1;
                self.last_activity_date = Some(day);
            }
            Some(last) if last == day => return,
            Some(last) if last.succ_opt() == Some(day) => {
                self.current_streak += 1;
                self.last_activity_date = Some(day);
            }
            Some(last) if last < day => {
                self.current_streak = 1;
                self.last_activity_date = Some(day);
            }
            // last > day: an older completion approved after a newer one.
            Some(_) => return,
        }
        self.max_streak = self.max_streak.max(self.current_streak);
    }
}
