//! Company domain actions

mod create_company;
mod verify_company_otp;

pub use create_company::create_company;
pub use verify_company_otp::verify_company_otp;
