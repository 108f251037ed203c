// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod category;
pub mod completion;
pub mod user;

pub use activity::Activity;
pub use category::Category;
pub use completion::{ActivityCompletion, ReviewEffect, ReviewStatus, ReviewVerdict};
pub use user::User;
