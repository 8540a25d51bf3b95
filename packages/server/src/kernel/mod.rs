//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod redis_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioAdapter};
pub use redis_store::RedisStore;
pub use traits::*;
