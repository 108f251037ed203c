// SPDX-License-Identifier: MIT

//! Level tier calculator.
//!
//! Pure functions over the fixed threshold table. Level is never stored;
//! every read path that reports a tier calls these against the user's
//! current points, so a tier can never be stale for the points it claims
//! to describe.

/// Tier thresholds, ascending, first threshold 0 by construction.
pub const LEVELS: &[(&str, u32)] = &[
    ("Bronze", 0),
    ("Silver", 500),
    ("Gold", 1000),
    ("Platinum", 5000),
];

fn tier_index(points: u32) -> usize {
    let mut idx = 0;
    for (i, (_, threshold)) in LEVELS.iter().enumerate() {
        if points >= *threshold {
            idx = i;
        }
    }
    idx
}

/// Name of the highest tier whose threshold is <= points.
pub fn level_for(points: u32) -> &'static str {
    LEVELS[tier_index(points)].0
}

/// Points still needed to reach the next tier; 0 at the top tier.
pub fn points_to_next(points: u32) -> u32 {
    match LEVELS.get(tier_index(points) + 1) {
        Some((_, next)) => next - points,
        None => 0,
    }
}

/// Progress through the current tier as a percentage, one decimal place.
/// 0.0 at the top tier.
pub fn progress_percentage(points: u32) -> f64 {
    let idx = tier_index(points);
    let Some((_, next)) = LEVELS.get(idx + 1) else {
        return 0.0;
    };
    let current = LEVELS[idx].1;
    let pct = f64::from(points - current) / f64::from(next - current) * 100.0;
    (pct * 10.0).round() / 10.0
}
