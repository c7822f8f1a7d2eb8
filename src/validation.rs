//! Field checks and defaults shared by the request DTOs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

/// Stored in string fields a client left out when creating a record.
pub const NO_INFORMATION: &str = "no information";

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Present and non-blank, trimmed.
pub fn required(field: &str, value: Option<String>) -> AppResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

/// Like [`required`] but keeps the value untouched (passwords).
pub fn required_raw(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

pub fn email(value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if is_valid_email(&value) {
        Ok(value)
    } else {
        Err(AppError::bad_request("email must be a valid email address"))
    }
}

pub fn required_email(value: Option<String>) -> AppResult<String> {
    email(required("email", value)?)
}

pub fn or_no_information(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_INFORMATION.to_string())
}
