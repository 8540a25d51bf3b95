pub mod identifier;
pub mod sendgrid;

pub use identifier::*;
pub use sendgrid::*;
