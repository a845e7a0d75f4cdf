use crate::error::AppError;

/// A blank setting (API key, base URL) is a configuration error.
pub fn require_setting(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Configuration(format!("{name} cannot be empty")));
    }
    Ok(())
}

/// Campaign names are configuration, not per-record data, so a blank one is a
/// configuration error rather than a validation error.
pub fn require_campaign_name(value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Configuration(
            "Campaign Name is required".to_string(),
        ));
    }
    Ok(())
}
