//! Best-effort extraction of a JSON array from LLM output.
//!
//! Models rarely return the bare array they were asked for: fenced code
//! blocks, leading prose, and trailing commentary are all common. Extraction
//! tries the cheap path first and only then scans for a balanced `[...]`
//! substring. A `None` means the text is unusable and the caller should treat
//! the model as failed.

use serde_json::Value;

/// Try to pull a JSON array out of free-form model output.
pub fn extract_json_array(text: &str) -> Option<Value> {
    let stripped = strip_code_fences(text);

    if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(stripped) {
        return Some(value);
    }

    let candidate = balanced_array_slice(stripped)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Array(_)) => Some(value),
        _ => None,
    }
}

/// Drops a leading/trailing markdown fence (``` or ```json) if present
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json", "JSON", ...) up to the first newline
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Finds the first balanced top-level `[...]` slice, ignoring brackets inside
/// JSON string literals.
fn balanced_array_slice(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
