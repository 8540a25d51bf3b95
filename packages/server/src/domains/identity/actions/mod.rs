//! Identity domain actions - business logic functions
//!
//! Actions are async functions called directly from GraphQL resolvers. They
//! take `ServerDeps` and return `ServiceResult<T>`.

mod google_login;
mod login;
mod logout;
mod refresh_token;
mod signup;
mod tokens;
mod verify_signup_otp;

pub use google_login::google_login;
pub use login::login;
pub use logout::logout;
pub use refresh_token::refresh_token;
pub use signup::signup;
pub use tokens::issue_tokens;
pub use verify_signup_otp::verify_signup_otp;
