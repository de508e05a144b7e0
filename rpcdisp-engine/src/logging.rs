//! Request/response logging
//!
//! Incoming payloads are logged on target `rpcdisp::request` with a `-->`
//! prefix and outgoing bodies on `rpcdisp::response` with `<--`, both at
//! `info`. With `trim_log_values` set, long values are abbreviated so large
//! payloads stay readable in the log.

use serde_json::Value;

const TRIM_OVER: usize = 30;
const KEEP: usize = 10;

/// Abbreviate a string longer than 30 characters to its first and last 10
///
/// ```rust
/// use rpcdisp_engine::logging::trim_string;
///
/// assert_eq!(trim_string("short"), "short");
/// assert_eq!(
///     trim_string("abcdefghijklmnopqrstuvwxyz0123456789"),
///     "abcdefghij...0123456789"
/// );
/// ```
pub fn trim_string(text: &str) -> String {
    let count = text.chars().count();
    if count <= TRIM_OVER {
        return text.to_string();
    }
    let head: String = text.chars().take(KEEP).collect();
    let tail: String = text.chars().skip(count - KEEP).collect();
    format!("{}...{}", head, tail)
}

/// Abbreviate every long value, recursing into arrays and objects
///
/// Scalars other than strings are judged by their rendered length and
/// replaced with a trimmed string only when too long.
pub fn trim_values(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(trim_values).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), trim_values(value)))
                .collect(),
        ),
        Value::String(text) => Value::String(trim_string(text)),
        Value::Null => Value::Null,
        scalar => {
            let rendered = scalar.to_string();
            if rendered.chars().count() > TRIM_OVER {
                Value::String(trim_string(&rendered))
            } else {
                scalar.clone()
            }
        }
    }
}

fn render_text(text: &str, trim: bool) -> String {
    if !trim {
        return text.to_string();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => trim_values(&value).to_string(),
        Err(_) => trim_string(text),
    }
}

pub(crate) fn log_request(text: &str, trim: bool) {
    tracing::info!(target: "rpcdisp::request", "--> {}", render_text(text, trim));
}

pub(crate) fn log_response(text: &str, trim: bool) {
    tracing::info!(target: "rpcdisp::response", "<-- {}", render_text(text, trim));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim_boundary() {
        let exact = "a".repeat(30);
        assert_eq!(trim_string(&exact), exact);

        let over = format!("{}{}", "a".repeat(20), "b".repeat(11));
        assert_eq!(trim_string(&over), format!("{}...{}", "a".repeat(10), "b".repeat(10)));
    }

    #[test]
    fn test_trim_counts_characters() {
        let text = "é".repeat(40);
        assert_eq!(trim_string(&text), format!("{}...{}", "é".repeat(10), "é".repeat(10)));
    }

    #[test]
    fn test_trim_values_recursive() {
        let long = "x".repeat(50);
        let value = json!({
            "method": "store",
            "params": [long.clone(), {"nested": long.clone()}, 5, null, true],
        });

        let trimmed = trim_values(&value);
        let short = format!("{}...{}", "x".repeat(10), "x".repeat(10));
        assert_eq!(
            trimmed,
            json!({
                "method": "store",
                "params": [short.clone(), {"nested": short}, 5, null, true],
            })
        );
    }

    #[test]
    fn test_render_unparseable_text() {
        let text = format!("{{{}", "y".repeat(40));
        assert_eq!(render_text(&text, true), trim_string(&text));
        assert_eq!(render_text(&text, false), text);
    }
}
