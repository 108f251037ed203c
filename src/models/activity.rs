// SPDX-License-Identifier: MIT

//! Activity catalog entry.
//!
//! The catalog is read-only to this service; entries describe what can
//! be logged, not who logged it.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Catalog entry for a loggable sustainable activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID (also used as document ID)
    pub activity_id: u64,
    /// Display name ("Bike to campus", "Shorter shower", ...)
    pub name: String,
    /// Normalized category, drives CO2e estimation and the water bonus
    pub category: Category,
    /// Unit the quantity is measured in ("km", "minutes", "items", ...)
    pub unit: String,
    /// Optional description shown in the submission UI
    #[serde(default)]
    pub description: Option<String>,
}
