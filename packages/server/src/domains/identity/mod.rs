//! Identity domain - accounts, password and Google sign-in, JWT sessions
//!
//! Signup is two-phase: `signup` stages a `UserDraft` behind an emailed OTP,
//! `verify_signup_otp` turns it into a `users` row.

pub mod actions;
pub mod data;
pub mod draft;
pub mod google;
pub mod jwt;
pub mod models;
pub mod password;
pub mod validation;

pub use data::{AuthPayload, OtpDispatchResult, UserData};
pub use draft::UserDraft;
pub use google::GoogleTokenInfoVerifier;
pub use jwt::{Claims, JwtService, TokenPair};
pub use models::User;
