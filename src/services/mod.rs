// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod estimator;
pub mod leaderboard;
pub mod leveling;
pub mod submission;

pub use estimator::EstimatorService;
pub use leaderboard::{build_leaderboard, display_streak, streak_broken};
pub use submission::{NewSubmission, SubmissionService};
