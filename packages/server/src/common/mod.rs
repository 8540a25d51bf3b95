// Common types and utilities shared across the application

pub mod auth;
pub mod errors;
pub mod utils;

pub use auth::{require_role, AuthError, Role};
pub use errors::{ServiceError, ServiceResult};
