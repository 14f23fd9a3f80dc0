//! Record binding tables.
//!
//! A record type declares, once, which properties it exposes and which value
//! types each setter accepts. The mapper matches columns to those setters by
//! name and converts values through [`FromSqlValue`].

use crate::error::BoxError;
use crate::models::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;

/// Conversion from a column value into a setter parameter.
///
/// `from_sql_value` returns `None` when the runtime type is not accepted.
pub trait FromSqlValue: Sized {
    /// Type name shown in mismatch diagnostics.
    fn expected_type() -> &'static str;

    fn from_sql_value(value: &SqlValue) -> Option<Self>;
}

macro_rules! impl_from_sql_int {
    ($($int:ty => $name:literal),+ $(,)?) => {
        $(
            impl FromSqlValue for $int {
                fn expected_type() -> &'static str {
                    $name
                }

                fn from_sql_value(value: &SqlValue) -> Option<Self> {
                    value.as_i64().and_then(|v| <$int>::try_from(v).ok())
                }
            }
        )+
    };
}

impl_from_sql_int!(i64 => "int", i32 => "int", i16 => "int", u32 => "int");

impl FromSqlValue for f64 {
    fn expected_type() -> &'static str {
        "float"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Float(v) => Some(*v),
            // Only integers a double represents exactly
            SqlValue::Int(v) => {
                let widened = *v as f64;
                (widened as i128 == i128::from(*v)).then_some(widened)
            }
            _ => None,
        }
    }
}

impl FromSqlValue for bool {
    fn expected_type() -> &'static str {
        "bool"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSqlValue for String {
    fn expected_type() -> &'static str {
        "text"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromSqlValue for Vec<u8> {
    fn expected_type() -> &'static str {
        "bytes"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bytes(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveDate {
    fn expected_type() -> &'static str {
        "date"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Date(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveTime {
    fn expected_type() -> &'static str {
        "time"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Time(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    fn expected_type() -> &'static str {
        "timestamp"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn expected_type() -> &'static str {
        "timestamptz"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::TimestampTz(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSqlValue for JsonValue {
    fn expected_type() -> &'static str {
        "json"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Json(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromSqlValue for SqlValue {
    fn expected_type() -> &'static str {
        "any"
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn expected_type() -> &'static str {
        T::expected_type()
    }

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Null => Some(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

type ApplyFn<T> = Box<dyn Fn(&mut T, &SqlValue) -> bool + Send + Sync>;

/// One typed setter for a property of `T`.
pub struct Binding<T> {
    property: &'static str,
    expected: &'static str,
    apply: ApplyFn<T>,
}

impl<T> Binding<T> {
    /// Bind `property` to a setter taking a `V`.
    pub fn new<V, F>(property: &'static str, setter: F) -> Self
    where
        V: FromSqlValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            property,
            expected: V::expected_type(),
            apply: Box::new(move |target, value| match V::from_sql_value(value) {
                Some(v) => {
                    setter(target, v);
                    true
                }
                None => false,
            }),
        }
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn expected_type(&self) -> &'static str {
        self.expected
    }

    /// Setter name this binding answers to.
    pub fn setter_name(&self) -> String {
        setter_name(self.property)
    }

    /// Apply the value if its type is accepted. Returns whether it was.
    pub fn apply(&self, target: &mut T, value: &SqlValue) -> bool {
        (self.apply)(target, value)
    }
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("property", &self.property)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// A type rows can be mapped onto.
///
/// Several bindings may share a property; they are tried in order.
pub trait Record: Sized {
    /// Create an empty instance to receive column values.
    fn instantiate() -> Result<Self, BoxError>;

    fn bindings() -> Vec<Binding<Self>>;
}

/// Upper-case the first character, leave the rest unchanged.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"set"` followed by the capitalized name.
pub fn setter_name(name: &str) -> String {
    format!("set{}", capitalize(name))
}

/// Implement [`Record`] for a `Default` type from `"property" => field: Type` entries.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default)]
/// struct Person {
///     id: i64,
///     name: Option<String>,
/// }
///
/// impl_record!(Person {
///     "id" => id: i64,
///     "name" => name: Option<String>,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($property:literal => $field:ident : $fty:ty),+ $(,)? }) => {
        impl $crate::mapper::Record for $ty {
            fn instantiate() -> ::std::result::Result<Self, $crate::error::BoxError> {
                Ok(<Self as ::std::default::Default>::default())
            }

            fn bindings() -> ::std::vec::Vec<$crate::mapper::Binding<Self>> {
                vec![
                    $(
                        $crate::mapper::Binding::new($property, |target: &mut Self, value: $fty| {
                            target.$field = value;
                        }),
                    )+
                ]
            }
        }
    };
}

pub use impl_record;
