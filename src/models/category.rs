// SPDX-License-Identifier: MIT

//! Activity categories as a closed, tagged type.
//!
//! Categories drive two things: the key sent to the external CO2e
//! estimator, and whether the water-conservation bonus applies at review
//! time. Stored strings that match no known variant deserialize to
//! `Unknown`, which contributes nothing to either.

use serde::{Deserialize, Serialize};

/// Normalized activity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transportation,
    Energy,
    WaterConservation,
    Waste,
    Food,
    #[serde(other)]
    Unknown,
}

impl Category {
    /// Key understood by the CO2e estimator. Total mapping; `Unknown`
    /// maps to a key the estimator treats as a zero estimate.
    pub fn estimator_key(&self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Energy => "energy",
            Category::WaterConservation => "water_conservation",
            Category::Waste => "waste",
            Category::Food => "food",
            Category::Unknown => "unknown",
        }
    }

    /// Whether approvals in this category earn the water bonus.
    pub fn is_water(&self) -> bool {
        matches!(self, Category::WaterConservation)
    }

    /// Human-readable name for API responses.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Transportation => "Transportation",
            Category::Energy => "Energy",
            Category::WaterConservation => "Water Conservation",
            Category::Waste => "Waste",
            Category::Food => "Food",
            Category::Unknown => "Unknown",
        }
    }
}
