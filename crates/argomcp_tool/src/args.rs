//! Tool call arguments.
//!
//! Arguments arrive as a JSON object from an MCP client, or as
//! `key=value` pairs from the command line, where every value starts out
//! as a string. The accessors accept both forms.

use crate::trait_::ToolError;
use serde_json::{Map, Value};

/// Arguments object of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Empty arguments
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; `null` means no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] for anything but an object
    /// or `null`.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ToolError::InvalidArguments {
                reason: format!("arguments must be an object, got {other}"),
            }),
        }
    }

    /// Set one argument
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Non-empty string argument
    #[must_use]
    pub fn opt_string(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// String argument or `default`
    #[must_use]
    pub fn string(&self, key: &str, default: &str) -> String {
        self.opt_string(key).unwrap_or(default).to_string()
    }

    /// String argument that must be present and non-empty
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] naming the missing key
    pub fn required_string(&self, key: &str) -> Result<&str, ToolError> {
        self.opt_string(key).ok_or_else(|| ToolError::InvalidArguments {
            reason: format!("'{key}' is required"),
        })
    }

    /// Boolean argument or `default`; accepts `true`/`false` strings
    #[must_use]
    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Integer argument; accepts JSON numbers and numeric strings
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Requested item limit; non-positive values are ignored
    #[must_use]
    pub fn limit(&self, key: &str) -> Option<usize> {
        self.int(key)
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Underlying object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Parse command-line `key=value` pairs.
///
/// Values that parse as JSON keep their JSON type (`prune=true`,
/// `limit=5`); anything else is a string.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] for a pair without `=` or with
/// an empty key.
pub fn parse_pairs<I, S>(pairs: I) -> Result<Arguments, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Map::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments {
                reason: format!("expected key=value, got '{pair}'"),
            })?;
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => v,
            Ok(v @ (Value::Array(_) | Value::Object(_))) => v,
            _ => Value::String(raw.to_string()),
        };
        values.insert(key.to_string(), value);
    }
    Ok(Arguments { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert!(Arguments::from_value(json!({"a": 1})).is_ok());
        assert!(Arguments::from_value(Value::Null).unwrap().as_map().is_empty());
        assert!(matches!(
            Arguments::from_value(json!([1])),
            Err(ToolError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_string_accessors() {
        let args = Arguments::new().with("name", "guestbook").with("empty", "");
        assert_eq!(args.string("name", "x"), "guestbook");
        assert_eq!(args.string("empty", "x"), "x");
        assert_eq!(args.string("missing", ""), "");
        assert_eq!(args.required_string("name").unwrap(), "guestbook");
        let err = args.required_string("empty").unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: 'empty' is required");
    }

    #[test]
    fn test_bool_and_int() {
        let args = Arguments::new()
            .with("prune", true)
            .with("cascade", "false")
            .with("limit", 5)
            .with("count", "12")
            .with("ratio", 2.7)
            .with("bad", "abc");
        assert!(args.bool("prune", false));
        assert!(!args.bool("cascade", true));
        assert!(args.bool("missing", true));
        assert_eq!(args.int("limit"), Some(5));
        assert_eq!(args.int("count"), Some(12));
        assert_eq!(args.int("ratio"), Some(2));
        assert_eq!(args.int("bad"), None);
    }

    #[test]
    fn test_limit() {
        let args = Arguments::new()
            .with("a", 3)
            .with("b", 0)
            .with("c", -4)
            .with("d", "7");
        assert_eq!(args.limit("a"), Some(3));
        assert_eq!(args.limit("b"), None);
        assert_eq!(args.limit("c"), None);
        assert_eq!(args.limit("d"), Some(7));
    }

    #[test]
    fn test_parse_pairs() {
        let args = parse_pairs(["name=guestbook", "prune=true", "limit=5", "revision=1.0.0"]).unwrap();
        assert_eq!(args.get("name"), Some(&json!("guestbook")));
        assert_eq!(args.get("prune"), Some(&json!(true)));
        assert_eq!(args.get("limit"), Some(&json!(5)));
        assert_eq!(args.get("revision"), Some(&json!("1.0.0")));

        let args = parse_pairs(["msg=a=b"]).unwrap();
        assert_eq!(args.string("msg", ""), "a=b");

        assert!(parse_pairs(["novalue"]).is_err());
        assert!(parse_pairs(["=x"]).is_err());
    }
}
