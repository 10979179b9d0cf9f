pub use errors::{ServiceError, ServiceResult};

pub mod errors;
pub mod groups;
pub mod main;
pub mod membership;
