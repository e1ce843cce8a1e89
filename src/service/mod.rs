pub mod users;
pub mod validation;

pub use users::*;
pub use validation::*;
