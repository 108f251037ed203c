// SPDX-License-Identifier: MIT

//! Leaderboard and streak-read derivations.
//!
//! Pure views over the user ledger. Ranking groups users by their
//! computed level (never a stored one) and is fully deterministic:
//! points descending, then current streak descending, then username
//! ascending. Reads never mutate the ledger; a broken streak is zeroed
//! for display only.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::User;
use crate::services::leveling::{level_for, LEVELS};

/// One ranked row within a tier.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_points: u32,
    pub current_streak: u32,
    pub max_streak: u32,
}

/// Users of one tier, ranked.
#[derive(Debug, Clone, Serialize)]
pub struct TierGroup {
    pub level: String,
    pub users: Vec<LeaderboardEntry>,
}

/// Build the tiered leaderboard, highest tier first. Empty tiers are
/// omitted.
pub fn build_leaderboard(users: &[User]) -> Vec<TierGroup> {
    let mut tiers = Vec::new();

    for (level_name, _) in LEVELS.iter().rev() {
        let mut members: Vec<&User> = users
            .iter()
            .filter(|u| level_for(u.total_points) == *level_name)
            .collect();
        if members.is_empty() {
            continue;
        }

        members.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| b.current_streak.cmp(&a.current_streak))
                .then_with(|| a.username.cmp(&b.username))
        });

        tiers.push(TierGroup {
            level: level_name.to_string(),
            users: members
                .into_iter()
                .map(|u| LeaderboardEntry {
                    username: u.username.clone(),
                    total_points: u.total_points,
                    current_streak: u.current_streak,
                    max_streak: u.max_streak,
                })
                .collect(),
        });
    }

    tiers
}

/// Whether the streak is broken as of `today`: the last credited day is
/// strictly earlier than yesterday.
pub fn streak_broken(user: &User, today: NaiveDate) -> bool {
    match (user.last_activity_date, today.checked_sub_days(Days::new(1))) {
        (Some(last), Some(yesterday)) => last < yesterday,
        (None, _) => user.current_streak > 0,
        _ => false,
    }
}

/// Streak value to show on read paths: 0 when broken, the stored value
/// otherwise. The stored field is corrected only through the review
/// flow, never by a read.
pub fn display_streak(user: &User, today: NaiveDate) -> u32 {
    if streak_broken(user, today) {
        0
    } else {
        user.current_streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn user(name: &str, points: u32, streak: u32) -> User {
        User {
            user_id: 0,
            username: name.to_string(),
            email: None,
            is_admin: false,
            total_points: points,
            current_streak: streak,
            max_streak: streak,
            last_activity_date: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_groups_by_computed_level_highest_first() {
        let users = vec![user("a", 5200, 0), user("b", 10, 0), user("c", 600, 0)];
        let tiers = build_leaderboard(&users);

        let names: Vec<&str> = tiers.iter().map(|t| t.level.as_str()).collect();
        assert_eq!(names, vec!["Platinum", "Silver", "Bronze"]);
        assert_eq!(tiers[0].users[0].username, "a");
        assert_eq!(tiers[1].users[0].username, "c");
    }

    #[test]
    fn test_tie_breaks_points_then_streak_then_username() {
        let mut low_streak = user("zoe", 100, 2);
        low_streak.max_streak = 9;
        let users = vec![
            user("mia", 100, 5),
            low_streak,
            user("Ann", 100, 2),
            user("ann", 100, 2),
            user("bea", 120, 0),
        ];

        let tiers = build_leaderboard(&users);
        assert_eq!(tiers.len(), 1);
        let order: Vec<&str> = tiers[0].users.iter().map(|u| u.username.as_str()).collect();
        // Case-sensitive lexicographic: "Ann" < "ann" < "zoe".
        assert_eq!(order, vec!["bea", "mia", "Ann", "ann", "zoe"]);
    }

    #[test]
    fn test_streak_display_zeroes_when_broken() {
        let mut u = user("ada", 50, 4);
        u.last_activity_date = Some(day("2026-03-10"));

        // Credited yesterday or today: intact.
        assert_eq!(display_streak(&u, day("2026-03-10")), 4);
        assert_eq!(display_streak(&u, day("2026-03-11")), 4);
        // Two days without a credit: broken for display.
        assert_eq!(display_streak(&u, day("2026-03-12")), 0);
        assert!(streak_broken(&u, day("2026-03-12")));

        // Display never mutates the stored value.
        assert_eq!(u.current_streak, 4);
    }

    #[test]
    fn test_never_credited_user_shows_zero() {
        let u = user("new", 0, 0);
        assert_eq!(display_streak(&u, day("2026-03-12")), 0);
        assert!(!streak_broken(&u, day("2026-03-12")));
    }
}
