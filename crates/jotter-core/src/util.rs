//! Shared helpers for text normalization and API error bodies.

use reqwest::StatusCode;
use serde_json::Value;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Condense an error response body into a single human-readable line.
///
/// Understands the shapes the notes API returns: `{"detail": ".."}`,
/// `{"message": ".."}`, `{"error": ".."}` and field errors such as
/// `{"email": ["user with this email already exists."]}`.
pub fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                return format!("{} ({})", message.trim(), status.as_u16());
            }
        }

        let field_error = fields.iter().find_map(|(field, value)| {
            let message = match value {
                Value::String(message) => Some(message.as_str()),
                Value::Array(items) => items.iter().find_map(Value::as_str),
                _ => None,
            }?;
            Some(format!("{field}: {}", message.trim()))
        });
        if let Some(message) = field_error {
            return format!("{message} ({})", status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
