//! Input checks for company onboarding

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;
use uuid::Uuid;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{9,14}$").unwrap();
}

pub fn validate_company_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Company name is required.".to_string());
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.trim().is_empty() {
        return Err("Phone number is required.".to_string());
    }
    if !PHONE_RE.is_match(phone.trim()) {
        return Err("Invalid phone number format.".to_string());
    }
    Ok(())
}

/// Absolute http(s) URL
pub fn validate_url(value: &str, field: &str) -> Result<(), String> {
    match Url::parse(value.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(format!("Invalid {} URL.", field)),
    }
}

pub fn parse_user_id(user_id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(user_id.trim()).map_err(|_| "Invalid user ID provided.".to_string())
}

/// Blank optional strings are treated as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
