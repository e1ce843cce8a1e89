//! Server actions: frontend-initiated calls that go straight to the database.

pub mod auth;

pub use auth::{authorize_credentials, sign_up, ActionResult, ActionStatus, SignUpInput};
