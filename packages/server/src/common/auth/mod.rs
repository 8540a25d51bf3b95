//! Authentication and authorization primitives shared by all domains.
//!
//! Role checks happen in actions, not in GraphQL resolvers:
//!
//! ```ignore
//! require_role(user.role(), &[Role::Agent])?;
//! ```

mod errors;
mod role;

pub use errors::AuthError;
pub use role::{require_role, Role};
