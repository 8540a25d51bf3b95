// Business domains
pub mod company;
pub mod identity;
pub mod otp;
