// SPDX-License-Identifier: MIT

//! EcoTrack Points: campus sustainability engagement backend.
//!
//! Users submit evidence of eco-friendly activities; admins review them.
//! Approval awards points from a stored CO2e estimate (plus a water
//! bonus) and advances a consecutive-day streak. Levels and leaderboards
//! are pure derivations of the resulting ledger.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::SubmissionService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub submissions: SubmissionService,
}
