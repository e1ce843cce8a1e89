pub mod bearer;

pub use bearer::{bearer_from_headers, BearerToken};
