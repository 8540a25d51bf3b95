//! Company domain - agent onboarding of phone-verified businesses

pub mod actions;
pub mod data;
pub mod draft;
pub mod models;
pub mod validation;

pub use data::{CompanyData, CompanyPayload};
pub use draft::CompanyDraft;
pub use models::Company;
