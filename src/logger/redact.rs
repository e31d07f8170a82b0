//! Payload serialization and secret redaction.
//!
//! Two passes exist:
//! - [`redact_text`] rewrites `"password"`, `"apiKey"` and `"token"` string
//!   values in already-serialized JSON. Only flat, unescaped values match.
//! - [`redact_value`] walks a decoded JSON tree and masks the same keys at
//!   any depth. Used on captured HTTP bodies before they are embedded as
//!   strings, where their quotes would be escaped.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Replacement for redacted values.
pub const MASK: &str = "*****";

/// Substituted when a payload cannot be serialized.
pub const UNSERIALIZABLE: &str = "[Unserializable object]";

const SENSITIVE_KEYS: [&str; 3] = ["password", "apiKey", "token"];

static SENSITIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(password|apiKey|token)":\s*"[^"]*""#).expect("Invalid regex pattern")
});

/// Serialize to JSON, or return the placeholder. Never fails.
pub fn stringify<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
}

/// Mask sensitive string values in serialized JSON.
pub fn redact_text(serialized: &str) -> String {
    SENSITIVE_PATTERN
        .replace_all(serialized, format!(r#""${{1}}":"{MASK}""#).as_str())
        .into_owned()
}

/// Serialize and redact in one step.
pub fn sanitize<T: Serialize + ?Sized>(value: &T) -> String {
    redact_text(&stringify(value))
}

/// Mask sensitive keys in a decoded JSON tree, at any depth.
pub fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) && !entry.is_null() {
                    *entry = Value::String(MASK.to_string());
                } else {
                    redact_value(entry);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_redacts_sensitive_values() {
        let data = json!({
            "email": "d@jwt.com",
            "password": "diner",
            "apiKey": "abc123",
            "token": "eyJhbGciOi",
        });

        let out = sanitize(&data);
        assert!(!out.contains("diner\""));
        assert!(!out.contains("abc123"));
        assert!(!out.contains("eyJhbGciOi"));
        assert!(out.contains(r#""password":"*****""#));
        assert!(out.contains(r#""apiKey":"*****""#));
        assert!(out.contains(r#""token":"*****""#));
        assert!(out.contains(r#""email":"d@jwt.com""#));
    }

    #[test]
    fn test_redacts_with_whitespace_after_colon() {
        let out = redact_text(r#"{"password": "hunter2", "name": "pizza"}"#);
        assert_eq!(out, r#"{"password":"*****", "name": "pizza"}"#);
    }

    #[test]
    fn test_leaves_non_string_and_other_keys() {
        let input = r#"{"passwordHint":"x","token":null,"tokens":3}"#;
        assert_eq!(redact_text(input), input);
    }

    #[test]
    fn test_textual_pass_misses_escaped_values() {
        let embedded = json!({"reqBody": "{\"password\":\"a\"}"});
        assert!(sanitize(&embedded).contains(r#"\"password\":\"a\""#));
    }

    #[test]
    fn test_unserializable_placeholder() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("cannot serialize"))
            }
        }

        assert_eq!(stringify(&Broken), UNSERIALIZABLE);

        let mut non_string_keys = HashMap::new();
        non_string_keys.insert((1, 2), "pair");
        assert_eq!(sanitize(&non_string_keys), UNSERIALIZABLE);
    }

    #[test]
    fn test_structural_redaction_nested() {
        let mut body = json!({
            "user": {"email": "a@b.c", "password": "secret"},
            "sessions": [{"token": "t1"}, {"token": "t2", "id": 7}],
            "apiKey": 12345,
        });
        redact_value(&mut body);

        assert_eq!(
            body,
            json!({
                "user": {"email": "a@b.c", "password": MASK},
                "sessions": [{"token": MASK}, {"token": MASK, "id": 7}],
                "apiKey": MASK,
            })
        );
    }
}
