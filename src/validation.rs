//! Field checks shared by configuration and credential validation.
//!
//! Each check returns the human-readable reason on failure; callers decide
//! which [`SyncError`](crate::error::SyncError) variant carries it.

pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.len();
    if len < min || len > max {
        return Err(format!(
            "{field} must be between {min} and {max} characters (got {len})"
        ));
    }
    Ok(())
}

pub fn check_present(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

/// Unlike [`check_present`], whitespace counts as content.
pub fn check_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

/// Argument values are passed to the wrapper as separate argv entries, so the
/// only thing that cannot travel is an interior NUL byte.
pub fn check_no_nul(field: &str, value: &str) -> Result<(), String> {
    if value.contains('\0') {
        return Err(format!("{field} must not contain null bytes"));
    }
    Ok(())
}

pub fn check_url(value: &str) -> Result<(), String> {
    check_length("url", value, 1, 2048)?;
    let parsed = url::Url::parse(value).map_err(|e| format!("url is not valid: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("url must use http or https scheme".into());
    }
    if parsed.host_str().is_none() {
        return Err("url must have a host".into());
    }
    Ok(())
}

/// Store and domain names are handed to the wrapper as-is; Jenkins decides
/// what it accepts.
pub fn check_name(field: &str, value: &str) -> Result<(), String> {
    check_length(field, value, 1, 255)?;
    check_no_nul(field, value)
}
