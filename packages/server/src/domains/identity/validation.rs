//! Input checks for identity mutations. Each returns the first failing message.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::Role;

pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

/// Missing role means `USER`; anything else must name a known role
pub fn validate_role(role: Option<&str>) -> Result<Role, String> {
    match role {
        None => Ok(Role::User),
        Some(r) => r
            .parse()
            .map_err(|_| "Role must be one of USER, AGENT, ADMIN".to_string()),
    }
}

pub fn validate_otp(otp: &str) -> Result<(), String> {
    if otp.trim().is_empty() {
        return Err("OTP is required".to_string());
    }
    Ok(())
}
