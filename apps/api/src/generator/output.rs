//! Interpretation of generator stdout.

use serde_json::Value;

use crate::generator::GeneratorError;

/// Parses a script's stdout into a JSON value.
///
/// Scripts may log diagnostics before their result, so when the whole stream is not
/// JSON the trailing JSON document is located and parsed on its own. `null`, `{}`, `[]` and blank output count as
/// no result; an object with a truthy `error` key is an explicit failure.
pub fn parse_output(stdout: &str) -> Result<Value, GeneratorError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(GeneratorError::Empty);
    }

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(whole_err) => trailing_json(trimmed)
            .ok_or_else(|| GeneratorError::MalformedOutput(whole_err.to_string()))?,
    };

    check_result(value)
}

/// Walks back over lines opening with `{` or `[` and returns the first suffix that
/// parses as a complete document. Nested openers fail to parse because the closing
/// brackets of their parents follow them.
fn trailing_json(text: &str) -> Option<Value> {
    let lines: Vec<&str> = text.lines().collect();
    (0..lines.len())
        .rev()
        .filter(|&i| lines[i].trim_start().starts_with(['{', '[']))
        .find_map(|i| serde_json::from_str(&lines[i..].join("\n")).ok())
}

fn check_result(value: Value) -> Result<Value, GeneratorError> {
    match &value {
        Value::Null => return Err(GeneratorError::Empty),
        Value::Array(items) if items.is_empty() => return Err(GeneratorError::Empty),
        Value::Object(map) if map.is_empty() => return Err(GeneratorError::Empty),
        Value::Object(map) => {
            if let Some(marker) = map.get("error") {
                match marker {
                    Value::Null | Value::Bool(false) => {}
                    Value::String(message) => {
                        return Err(GeneratorError::ErrorMarker(message.clone()))
                    }
                    other => return Err(GeneratorError::ErrorMarker(other.to_string())),
                }
            }
        }
        _ => {}
    }
    Ok(value)
}
