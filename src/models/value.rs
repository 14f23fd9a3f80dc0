//! Dynamically typed column values.
//!
//! Every decoded cell becomes a `SqlValue`. The variant is the runtime type the
//! record mapper matches against setter parameter types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single column value as returned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact DECIMAL/NUMERIC text as reported by the server
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Json(JsonValue),
}

impl SqlValue {
    /// Check if this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the runtime type, used in mapping diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamptz",
            Self::Json(_) => "json",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) | Self::Decimal(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to JSON. Binary data is base64 encoded, temporal values use ISO-8601.
    pub fn to_json(&self) -> JsonValue {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Int(v) => JsonValue::Number((*v).into()),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(v.to_string())),
            Self::Decimal(v) | Self::Text(v) => JsonValue::String(v.clone()),
            Self::Bytes(v) => JsonValue::String(STANDARD.encode(v)),
            Self::Date(v) => JsonValue::String(v.to_string()),
            Self::Time(v) => JsonValue::String(v.to_string()),
            Self::Timestamp(v) => JsonValue::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Self::TimestampTz(v) => JsonValue::String(v.to_rfc3339()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Decimal(v) | Self::Text(v) => write!(f, "{}", v),
            Self::Json(v) => write!(f, "{}", v),
            other => match other.to_json() {
                JsonValue::String(s) => write!(f, "{}", s),
                json => write!(f, "{}", json),
            },
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(SqlValue::Null.type_name(), "null");
        assert_eq!(SqlValue::from(1_i64).type_name(), "int");
        assert_eq!(SqlValue::from("Ann").type_name(), "text");
        assert_eq!(
            SqlValue::Decimal("10.50".to_string()).type_name(),
            "decimal"
        );
    }

    #[test]
    fn test_option_conversion() {
        assert!(SqlValue::from(None::<i64>).is_null());
        assert_eq!(SqlValue::from(Some(5_i64)), SqlValue::Int(5));
    }

    #[test]
    fn test_to_json_scalars() {
        assert_eq!(SqlValue::Int(1).to_json(), serde_json::json!(1));
        assert_eq!(SqlValue::from("Ann").to_json(), serde_json::json!("Ann"));
        assert_eq!(SqlValue::Null.to_json(), JsonValue::Null);
        assert_eq!(SqlValue::Bool(true).to_json(), serde_json::json!(true));
    }

    #[test]
    fn test_to_json_non_finite_float_is_string() {
        assert_eq!(
            SqlValue::Float(f64::NAN).to_json(),
            JsonValue::String("NaN".to_string())
        );
    }

    #[test]
    fn test_to_json_bytes_base64() {
        let value = SqlValue::Bytes(b"hello world".to_vec());
        assert_eq!(value.to_json(), serde_json::json!("aGVsbG8gd29ybGQ="));
    }

    #[test]
    fn test_display_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(SqlValue::Date(date).to_string(), "2024-02-29");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
    }
}
