//! Shared field constraint checks

use crate::error::{Result, TuneError};

/// Trim a required text field and check its length in characters
pub(crate) fn required_text(
    value: Option<String>,
    missing: &str,
    entity: &str,
    field: &str,
    (min, max): (usize, usize),
) -> Result<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TuneError::validation(missing))?;
    check_length(&value, entity, field, min, max)?;
    Ok(value)
}

/// Trim an optional text field; empty strings count as absent
pub(crate) fn optional_text(
    value: Option<String>,
    entity: &str,
    field: &str,
    (min, max): (usize, usize),
) -> Result<Option<String>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => {
            check_length(&v, entity, field, min, max)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

fn check_length(value: &str, entity: &str, field: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(TuneError::validation(format!(
            "{entity} {field} must be at least {min} characters long."
        )));
    }
    if len > max {
        return Err(TuneError::validation(format!(
            "{entity} {field} cannot exceed {max} characters."
        )));
    }
    Ok(())
}

/// Ratings are 0..=5 and default to 0
pub(crate) fn rating(value: Option<f64>) -> Result<f64> {
    let value = value.unwrap_or(0.0);
    if !value.is_finite() || value < 0.0 {
        return Err(TuneError::validation("Rating must be at least 0."));
    }
    if value > 5.0 {
        return Err(TuneError::validation("Rating cannot exceed 5."));
    }
    Ok(value)
}

/// Pick a value from a fixed list, falling back to `default` when absent
pub(crate) fn one_of(
    value: Option<String>,
    allowed: &[&str],
    default: &str,
    field: &str,
) -> Result<String> {
    let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(default.to_string());
    };
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(TuneError::validation(format!(
            "{field} must be one of: {}",
            allowed.join(",")
        )))
    }
}
