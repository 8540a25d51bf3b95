// Identity & Company Onboarding API - Core
//
// Accounts and company profiles are created in two phases: a draft is staged
// in Redis behind a one-time code, and becomes a Postgres row only after the
// code is confirmed.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
