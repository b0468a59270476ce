use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Typed view of one submitted form value after coercion.
///
/// The evaluator core only ever pattern-matches over this closed set; raw
/// `serde_json::Value` never leaves this module. `Missing` covers absent
/// fields, empty strings, and unparseable content alike: a zero is a
/// legitimate failing value, "not yet provided" is not a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    Missing,
}

impl FieldValue {
    /// Locale-agnostic numeric coercion. Whitespace is trimmed, empty and
    /// non-numeric content collapse to `Missing`.
    pub(crate) fn number(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Number(number)) => match number.as_f64() {
                Some(parsed) => Self::Number(parsed),
                None => Self::Missing,
            },
            Some(Value::String(text)) => match text.trim().parse::<f64>() {
                Ok(parsed) => Self::Number(parsed),
                Err(_) => Self::Missing,
            },
            _ => Self::Missing,
        }
    }

    /// Boolean coercion. Explicit `true`/`false` (native or string-encoded)
    /// are recognized; a YES/NO pair object is affirmative iff YES is
    /// checked, regardless of NO's state.
    pub(crate) fn boolean(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Bool(flag)) => Self::Boolean(*flag),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Self::Boolean(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Self::Boolean(false)
                } else {
                    Self::Missing
                }
            }
            Some(Value::Object(pair)) => match pair.get("yes").and_then(Value::as_bool) {
                Some(yes) => Self::Boolean(yes),
                None => Self::Missing,
            },
            _ => Self::Missing,
        }
    }

    /// Text coercion for MATCH_VALUE. Trims; numbers and booleans compare by
    /// their canonical rendering; blank submissions collapse to `Missing`.
    pub(crate) fn text(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Self::Missing
                } else {
                    Self::Text(trimmed.to_string())
                }
            }
            Some(Value::Number(number)) => Self::Text(number.to_string()),
            Some(Value::Bool(flag)) => Self::Text(flag.to_string()),
            _ => Self::Missing,
        }
    }

    /// Whether a checklist item counts as checked.
    pub(crate) fn affirmative(raw: Option<&Value>) -> bool {
        matches!(Self::boolean(raw), Self::Boolean(true))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "'{text}'"),
            Self::Boolean(flag) => write!(f, "{flag}"),
            Self::Missing => f.write_str("(no value)"),
        }
    }
}
