pub mod inputs;
pub mod user;

pub use inputs::*;
pub use user::*;
