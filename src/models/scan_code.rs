//! Scan code validation

use crate::error::{AppError, AppResult};

pub const MIN_CODE_LEN: usize = 3;
pub const MAX_CODE_LEN: usize = 500;

/// Validate a raw decoded payload and return the trimmed code.
///
/// Lengths are counted in characters after trimming.
pub fn validate(raw: &str) -> AppResult<&str> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(AppError::Validation("Scan code is empty".to_string()));
    }
    let len = code.chars().count();
    if len < MIN_CODE_LEN {
        return Err(AppError::Validation(format!(
            "Scan code is too short ({} < {})",
            len, MIN_CODE_LEN
        )));
    }
    if len > MAX_CODE_LEN {
        return Err(AppError::Validation(format!(
            "Scan code is too long ({} > {})",
            len, MAX_CODE_LEN
        )));
    }
    if code.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "Scan code contains control characters".to_string(),
        ));
    }
    Ok(code)
}

/// Adapter for `#[validate(custom(...))]` on request bodies
pub fn validate_field(raw: &str) -> Result<(), validator::ValidationError> {
    validate(raw).map(|_| ()).map_err(|e| {
        let mut err = validator::ValidationError::new("scan_code");
        err.message = Some(e.to_string().into());
        err
    })
}
