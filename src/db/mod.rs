//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Read-only activity catalog
    pub const ACTIVITIES: &str = "activities";
    /// Completion attempts, keyed by `{user}_{activity}_{day}`
    pub const COMPLETIONS: &str = "completions";
}
