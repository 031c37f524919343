use crate::HttpZError;

pub fn validate_required<T>(value: Option<T>, field: &str) -> Result<T, HttpZError> {
    value.ok_or_else(|| HttpZError::validation(format!("{field} is required")))
}

pub fn validate_not_empty_string(value: &str, field: &str) -> Result<(), HttpZError> {
    if value.trim().is_empty() {
        return Err(HttpZError::validation(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(())
}

pub fn validate_positive_number(value: u16, field: &str) -> Result<(), HttpZError> {
    if value == 0 {
        return Err(HttpZError::validation(format!(
            "{field} must be a positive number"
        ))
        .with_details(value.to_string()));
    }
    Ok(())
}

pub const LINE_BREAKS: &[char] = &['\r', '\n'];

/// Rejects a value containing any of `forbidden`, which would change how the
/// emitted row parses back.
pub fn validate_no_chars(value: &str, forbidden: &[char], field: &str) -> Result<(), HttpZError> {
    match value.chars().find(|ch| forbidden.contains(ch)) {
        Some(found) => Err(
            HttpZError::validation(format!("{field} must not contain {found:?}")).with_details(value),
        ),
        None => Ok(()),
    }
}

/// Checks that a JSON model field, when present, is an array.
pub fn validate_array(value: &serde_json::Value, field: &str) -> Result<(), HttpZError> {
    match value.get(field) {
        None | Some(serde_json::Value::Array(_)) => Ok(()),
        Some(other) => Err(HttpZError::validation(format!("{field} must be an array"))
            .with_details(other.to_string())),
    }
}
