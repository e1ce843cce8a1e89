//! HTTP handlers for users and course categories.

pub mod categories;
pub mod users;
pub use categories::*;
pub use users::*;
