//! Input validation utilities and request payloads

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::{error::ApiError, models::MealInput};

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
}

impl CreateUserPayload {
    /// Returns the trimmed name and email once both are valid
    pub fn validate(self) -> Result<(String, String), ApiError> {
        validate_name(&self.name).map_err(ApiError::Validation)?;
        validate_email(&self.email).map_err(ApiError::Validation)?;
        Ok((self.name.trim().to_string(), self.email.trim().to_string()))
    }
}

/// Request body for creating or replacing a meal
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPayload {
    pub name: String,
    pub description: String,
    pub date_and_hour: String,
    #[serde(alias = "permited")]
    pub permitted: bool,
}

impl MealPayload {
    pub fn validate(self) -> Result<MealInput, ApiError> {
        validate_name(&self.name).map_err(ApiError::Validation)?;
        validate_description(&self.description).map_err(ApiError::Validation)?;
        let occurred_at = parse_occurred_at(&self.date_and_hour).map_err(ApiError::Validation)?;

        Ok(MealInput {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            permitted: self.permitted,
            occurred_at,
        })
    }
}

/// Validate a user or meal name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name must be at most {MAX_NAME_LEN} characters long"));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email must be at most {MAX_EMAIL_LEN} characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a meal description
pub fn validate_description(description: &str) -> Result<(), String> {
    let description = description.trim();
    if description.is_empty() {
        return Err("Description is required".to_string());
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters long"
        ));
    }

    Ok(())
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_occurred_at(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("dateAndHour is not an RFC 3339 timestamp: {e}"))
}
