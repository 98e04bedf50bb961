use anyhow::{Result, anyhow};
use url::Url;

use crate::INTERVAL_RANGE_SECONDS;

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }

    pub fn to_result(&self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(anyhow!(self.error.clone().unwrap_or_else(|| "Validation failed".to_string())))
        }
    }
}

/// Validate the probe endpoint URL
pub fn validate_probe_endpoint(target: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("Endpoint cannot be empty");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none() {
                return ValidationResult::err("Endpoint must have a valid host");
            }

            ValidationResult::ok()
        }
        Err(e) => {
            // If it fails to parse, check if it's missing a scheme
            if !target.contains("://") {
                ValidationResult::err("Endpoint must include scheme (http:// or https://)")
            } else {
                ValidationResult::err(format!("Invalid endpoint: {e}"))
            }
        }
    }
}

/// Validate the polling interval. Out-of-range values are rejected rather
/// than clamped so a zero/negative interval can never spin the loop.
pub fn validate_interval(interval_seconds: u64) -> ValidationResult {
    let (min, max) = INTERVAL_RANGE_SECONDS;

    if interval_seconds < min {
        return ValidationResult::err(format!(
            "Interval too short: {interval_seconds} seconds (minimum: {min})"
        ));
    }

    if interval_seconds > max {
        return ValidationResult::err(format!(
            "Interval too long: {interval_seconds} seconds (maximum: {max})"
        ));
    }

    ValidationResult::ok()
}
