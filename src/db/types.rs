//! Database-agnostic type mappings.
//!
//! This module turns driver rows into [`Row`]s of [`SqlValue`]s.
//!
//! # Architecture
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. Database-specific decoders handle the actual value extraction
//!
//! A decoder that cannot read a column with its category's Rust type falls
//! back to text, then to raw bytes, then to the value's raw wire form. Queries
//! run without arguments, so both servers send that form as text; vendor types
//! with no Rust mapping (intervals, geometric and network types, arrays, BIT)
//! come back as their text rendering instead of failing the read.

use crate::error::{DbError, DbResult};
use crate::models::{ColumnMetadata, DatabaseType, Row, Schema, SqlValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueFormat, PgValueRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row as _, Type, TypeInfo, ValueRef};
use std::sync::Arc;

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Unknown,
}

/// Classify a database type name into a logical category.
pub fn categorize_type(type_name: &str, db: DatabaseType) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Arrays: "INT4[]" from sqlx, "_int4" for arrays of unnamed element types
    if lower.ends_with("[]") || lower.starts_with('_') {
        return TypeCategory::Unknown;
    }

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        // SQLite's NUMERIC is actually a float
        if db == DatabaseType::SQLite && lower == "numeric" {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }

    // Temporal types before integers: "interval" and "point" contain "int"
    if lower == "timestamptz" || lower == "timestamp with time zone" {
        return TypeCategory::TimestampTz;
    }
    if lower.starts_with("timestamp") || lower == "datetime" {
        return TypeCategory::Timestamp;
    }
    if lower == "date" {
        return TypeCategory::Date;
    }
    if lower == "time" || lower == "time without time zone" {
        return TypeCategory::Time;
    }
    if lower.contains("interval") || lower.contains("point") {
        return TypeCategory::Unknown;
    }

    // Integer types
    if lower.contains("int")
        || lower.contains("serial")
        || lower.contains("tiny")
        || lower == "year"
    {
        return TypeCategory::Integer;
    }

    // Boolean
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    // Float types
    if lower.contains("float")
        || lower.contains("double")
        || lower == "real"
        || lower == "float4"
        || lower == "float8"
    {
        return TypeCategory::Float;
    }

    // JSON types
    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    // UUID (PostgreSQL)
    if lower == "uuid" {
        return TypeCategory::Uuid;
    }

    // Binary types
    if lower.contains("blob") || lower.contains("binary") || lower == "bytea" {
        return TypeCategory::Binary;
    }

    if lower.contains("char") || lower.contains("text") || lower == "name" {
        return TypeCategory::Text;
    }

    TypeCategory::Unknown
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Wrapper type for raw DECIMAL/NUMERIC values as strings.
/// This preserves the exact database representation.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("NUMERIC")
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        match value.format() {
            PgValueFormat::Text => Ok(RawDecimal(value.as_str()?.to_string())),
            PgValueFormat::Binary => Ok(RawDecimal(pg_numeric_to_string(value.as_bytes()?)?)),
        }
    }
}

/// Render a PostgreSQL binary NUMERIC (base-10000 digits) as exact decimal text.
fn pg_numeric_to_string(bytes: &[u8]) -> Result<String, sqlx::error::BoxDynError> {
    if bytes.len() < 8 {
        return Err("NUMERIC value too short".into());
    }
    let read_i16 = |at: usize| i16::from_be_bytes([bytes[at], bytes[at + 1]]);
    let read_u16 = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);

    let ndigits = read_i16(0).max(0) as usize;
    let weight = read_i16(2) as i32;
    let sign = read_u16(4);
    let dscale = read_u16(6) as usize;

    match sign {
        0xC000 => return Ok("NaN".to_string()),
        0xD000 => return Ok("Infinity".to_string()),
        0xF000 => return Ok("-Infinity".to_string()),
        _ => {}
    }
    if bytes.len() < 8 + ndigits * 2 {
        return Err("NUMERIC value truncated".into());
    }

    let digit_at = |pos: i32| -> i16 {
        if pos >= 0 && (pos as usize) < ndigits {
            read_i16(8 + pos as usize * 2)
        } else {
            0
        }
    };

    let mut out = String::new();
    if sign == 0x4000 {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        for pos in 0..=weight {
            if pos == 0 {
                out.push_str(&digit_at(pos).to_string());
            } else {
                out.push_str(&format!("{:04}", digit_at(pos)));
            }
        }
    }
    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut pos = weight + 1;
        while frac.len() < dscale {
            frac.push_str(&format!("{:04}", digit_at(pos)));
            pos += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }
    Ok(out)
}

// =============================================================================
// Row Decoding Trait
// =============================================================================

/// Trait for converting driver rows into generic values.
pub trait DecodeRow {
    /// Column names and types in schema order.
    fn column_metadata(&self) -> Vec<ColumnMetadata>;
    /// Decode every column, in schema order.
    fn decode_values(&self) -> DbResult<Vec<SqlValue>>;
}

fn column_metadata_of<R: sqlx::Row>(row: &R) -> Vec<ColumnMetadata> {
    row.columns()
        .iter()
        .map(|col| ColumnMetadata::new(col.name(), col.type_info().name()))
        .collect()
}

impl DecodeRow for MySqlRow {
    fn column_metadata(&self) -> Vec<ColumnMetadata> {
        column_metadata_of(self)
    }

    fn decode_values(&self) -> DbResult<Vec<SqlValue>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, DatabaseType::MySQL);
                mysql::decode_column(self, idx, type_name, category)
            })
            .collect()
    }
}

impl DecodeRow for PgRow {
    fn column_metadata(&self) -> Vec<ColumnMetadata> {
        column_metadata_of(self)
    }

    fn decode_values(&self) -> DbResult<Vec<SqlValue>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, DatabaseType::PostgreSQL);
                postgres::decode_column(self, idx, type_name, category)
            })
            .collect()
    }
}

impl DecodeRow for SqliteRow {
    fn column_metadata(&self) -> Vec<ColumnMetadata> {
        column_metadata_of(self)
    }

    fn decode_values(&self) -> DbResult<Vec<SqlValue>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                // SQLite is dynamically typed: classify by the value, not the declaration
                let raw = self.try_get_raw(idx)?;
                let type_name = raw.type_info().name().to_string();
                let category = categorize_type(&type_name, DatabaseType::SQLite);
                let declared = col.type_info().name();
                sqlite::decode_column(self, idx, declared, category)
            })
            .collect()
    }
}

/// Decode one driver row, sharing the schema across all rows of a result.
///
/// The first row decoded fixes the schema; later rows reuse it.
pub fn decode_row<R: DecodeRow>(row: &R, schema: &mut Option<Schema>) -> DbResult<Row> {
    let columns = match schema {
        Some(existing) => Arc::clone(existing),
        None => {
            let fresh: Schema = row.column_metadata().into();
            *schema = Some(Arc::clone(&fresh));
            fresh
        }
    };
    let values = row.decode_values()?;
    if values.len() != columns.len() {
        return Err(DbError::mapping(format!(
            "Row has {} columns but the result schema has {}",
            values.len(),
            columns.len()
        )));
    }
    Ok(Row::new(columns, values))
}

/// Integer value for an unsigned column; above `i64::MAX` the exact digits are kept.
fn unsigned_value(v: u64) -> SqlValue {
    i64::try_from(v)
        .map(SqlValue::Int)
        .unwrap_or_else(|_| SqlValue::Decimal(v.to_string()))
}

/// Text when the raw value is UTF-8, bytes otherwise.
fn text_or_bytes(raw: Vec<u8>) -> SqlValue {
    String::from_utf8(raw)
        .map(SqlValue::Text)
        .unwrap_or_else(|e| SqlValue::Bytes(e.into_bytes()))
}

/// MySQL BIT(n): big-endian bits, at most eight bytes.
fn bit_value(raw: Vec<u8>) -> SqlValue {
    if raw.len() > 8 {
        return SqlValue::Bytes(raw);
    }
    let bits = raw.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    unsigned_value(bits)
}

fn unsupported_column(idx: usize, type_name: &str) -> DbError {
    DbError::mapping(format!(
        "Cannot read column {} of type {}",
        idx, type_name
    ))
}

// =============================================================================
// Database-Specific Decoders
// =============================================================================

mod mysql {
    use super::*;

    pub fn decode_column(
        row: &MySqlRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> DbResult<SqlValue> {
        if row.try_get_raw(idx)?.is_null() {
            return Ok(SqlValue::Null);
        }
        if type_name.eq_ignore_ascii_case("BIT") {
            return raw_value(row, idx)
                .map(bit_value)
                .ok_or_else(|| unsupported_column(idx, type_name));
        }

        let typed = match category {
            TypeCategory::Decimal => row
                .try_get::<RawDecimal, _>(idx)
                .ok()
                .map(|v| SqlValue::Decimal(v.0)),
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => row.try_get::<bool, _>(idx).ok().map(SqlValue::Bool),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Binary => row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes),
            // MySQL JSON type should be decoded as serde_json::Value directly
            TypeCategory::Json => row.try_get::<JsonValue, _>(idx).ok().map(SqlValue::Json),
            TypeCategory::Date => row.try_get::<NaiveDate, _>(idx).ok().map(SqlValue::Date),
            TypeCategory::Time => row.try_get::<NaiveTime, _>(idx).ok().map(SqlValue::Time),
            TypeCategory::Timestamp | TypeCategory::TimestampTz => row
                .try_get::<NaiveDateTime, _>(idx)
                .ok()
                .map(SqlValue::Timestamp),
            _ => None,
        };

        typed
            .or_else(|| row.try_get::<String, _>(idx).ok().map(SqlValue::Text))
            .or_else(|| row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes))
            .or_else(|| {
                tracing::debug!(column = idx, type_name, "Reading column as raw text");
                raw_value(row, idx).map(text_or_bytes)
            })
            .ok_or_else(|| unsupported_column(idx, type_name))
    }

    /// The value as sent by the server, skipping the type compatibility check.
    fn raw_value(row: &MySqlRow, idx: usize) -> Option<Vec<u8>> {
        row.try_get_unchecked::<Vec<u8>, _>(idx).ok()
    }

    fn decode_integer(row: &MySqlRow, idx: usize) -> Option<SqlValue> {
        // Try signed types
        if let Ok(v) = row.try_get::<i8, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<i16, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<i32, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Some(SqlValue::Int(v));
        }
        // Try unsigned types
        if let Ok(v) = row.try_get::<u8, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<u16, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<u32, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<u64, _>(idx) {
            return Some(unsigned_value(v));
        }
        None
    }

    fn decode_float(row: &MySqlRow, idx: usize) -> Option<SqlValue> {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Some(SqlValue::Float(v));
        }
        if let Ok(v) = row.try_get::<f32, _>(idx) {
            return Some(SqlValue::Float(v as f64));
        }
        None
    }
}

mod postgres {
    use super::*;
    use sqlx::postgres::types::Oid;

    pub fn decode_column(
        row: &PgRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> DbResult<SqlValue> {
        if row.try_get_raw(idx)?.is_null() {
            return Ok(SqlValue::Null);
        }

        let typed = match category {
            TypeCategory::Decimal => match row.try_get::<RawDecimal, _>(idx) {
                Ok(v) => Some(SqlValue::Decimal(v.0)),
                Err(e) => {
                    tracing::error!("Failed to decode NUMERIC: {:?}", e);
                    None
                }
            },
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => row.try_get::<bool, _>(idx).ok().map(SqlValue::Bool),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Binary => row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes),
            TypeCategory::Json => row.try_get::<JsonValue, _>(idx).ok().map(SqlValue::Json),
            TypeCategory::Uuid => row
                .try_get::<uuid::Uuid, _>(idx)
                .ok()
                .map(|v| SqlValue::Text(v.hyphenated().to_string())),
            TypeCategory::Date => row.try_get::<NaiveDate, _>(idx).ok().map(SqlValue::Date),
            TypeCategory::Time => row.try_get::<NaiveTime, _>(idx).ok().map(SqlValue::Time),
            TypeCategory::Timestamp => row
                .try_get::<NaiveDateTime, _>(idx)
                .ok()
                .map(SqlValue::Timestamp),
            TypeCategory::TimestampTz => row
                .try_get::<DateTime<Utc>, _>(idx)
                .ok()
                .map(SqlValue::TimestampTz),
            TypeCategory::Text | TypeCategory::Unknown => None,
        };

        typed
            .or_else(|| row.try_get::<String, _>(idx).ok().map(SqlValue::Text))
            .or_else(|| row.try_get::<Oid, _>(idx).ok().map(|v| SqlValue::Int(v.0.into())))
            .or_else(|| row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes))
            .or_else(|| {
                tracing::debug!(column = idx, type_name, "Reading column as raw text");
                raw_value(row, idx)
            })
            .ok_or_else(|| unsupported_column(idx, type_name))
    }

    /// The value as sent by the server: its text rendering, or bytes in binary format.
    fn raw_value(row: &PgRow, idx: usize) -> Option<SqlValue> {
        let raw = row.try_get_raw(idx).ok()?;
        let bytes = raw.as_bytes().ok()?.to_vec();
        match raw.format() {
            PgValueFormat::Text => Some(text_or_bytes(bytes)),
            PgValueFormat::Binary => Some(SqlValue::Bytes(bytes)),
        }
    }

    fn decode_integer(row: &PgRow, idx: usize) -> Option<SqlValue> {
        if let Ok(v) = row.try_get::<i16, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<i32, _>(idx) {
            return Some(SqlValue::Int(v.into()));
        }
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Some(SqlValue::Int(v));
        }
        None
    }

    fn decode_float(row: &PgRow, idx: usize) -> Option<SqlValue> {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Some(SqlValue::Float(v));
        }
        if let Ok(v) = row.try_get::<f32, _>(idx) {
            return Some(SqlValue::Float(v as f64));
        }
        None
    }
}

mod sqlite {
    use super::*;

    pub fn decode_column(
        row: &SqliteRow,
        idx: usize,
        declared_type: &str,
        category: TypeCategory,
    ) -> DbResult<SqlValue> {
        if row.try_get_raw(idx)?.is_null() {
            return Ok(SqlValue::Null);
        }

        // Declared BOOLEAN/DATE/DATETIME columns store plain integers or text
        let declared = categorize_type(declared_type, DatabaseType::SQLite);
        let typed = match (declared, category) {
            (TypeCategory::Boolean, TypeCategory::Integer) => {
                row.try_get::<bool, _>(idx).ok().map(SqlValue::Bool)
            }
            (TypeCategory::Date, TypeCategory::Text) => {
                row.try_get::<NaiveDate, _>(idx).ok().map(SqlValue::Date)
            }
            (TypeCategory::Time, TypeCategory::Text) => {
                row.try_get::<NaiveTime, _>(idx).ok().map(SqlValue::Time)
            }
            (TypeCategory::Timestamp, TypeCategory::Text) => row
                .try_get::<NaiveDateTime, _>(idx)
                .ok()
                .map(SqlValue::Timestamp),
            (_, TypeCategory::Integer) => row.try_get::<i64, _>(idx).ok().map(SqlValue::Int),
            (_, TypeCategory::Float) => row.try_get::<f64, _>(idx).ok().map(SqlValue::Float),
            (_, TypeCategory::Binary) => row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes),
            _ => None,
        };

        typed
            .or_else(|| decode_text(row, idx, declared_type))
            .or_else(|| row.try_get::<Vec<u8>, _>(idx).ok().map(SqlValue::Bytes))
            .ok_or_else(|| unsupported_column(idx, declared_type))
    }

    fn decode_text(row: &SqliteRow, idx: usize, declared_type: &str) -> Option<SqlValue> {
        let v = row.try_get::<String, _>(idx).ok()?;
        if declared_type.to_lowercase().contains("json") {
            if let Ok(json) = serde_json::from_str::<JsonValue>(&v) {
                return Some(SqlValue::Json(json));
            }
        }
        Some(SqlValue::Text(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_type_integer() {
        assert_eq!(
            categorize_type("INT", DatabaseType::MySQL),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("BIGINT", DatabaseType::PostgreSQL),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("TINYINT", DatabaseType::MySQL),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("INT UNSIGNED", DatabaseType::MySQL),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("YEAR", DatabaseType::MySQL),
            TypeCategory::Integer
        );
    }

    #[test]
    fn test_categorize_type_decimal() {
        assert_eq!(
            categorize_type("DECIMAL", DatabaseType::MySQL),
            TypeCategory::Decimal
        );
        assert_eq!(
            categorize_type("NUMERIC", DatabaseType::PostgreSQL),
            TypeCategory::Decimal
        );
        // SQLite NUMERIC is a float
        assert_eq!(
            categorize_type("numeric", DatabaseType::SQLite),
            TypeCategory::Float
        );
    }

    #[test]
    fn test_categorize_type_temporal() {
        assert_eq!(
            categorize_type("TIMESTAMPTZ", DatabaseType::PostgreSQL),
            TypeCategory::TimestampTz
        );
        assert_eq!(
            categorize_type("DATETIME", DatabaseType::MySQL),
            TypeCategory::Timestamp
        );
        assert_eq!(
            categorize_type("DATE", DatabaseType::SQLite),
            TypeCategory::Date
        );
        assert_eq!(
            categorize_type("TIME", DatabaseType::PostgreSQL),
            TypeCategory::Time
        );
    }

    #[test]
    fn test_categorize_type_interval_is_not_integer() {
        assert_eq!(
            categorize_type("INTERVAL", DatabaseType::PostgreSQL),
            TypeCategory::Unknown
        );
        assert_eq!(
            categorize_type("POINT", DatabaseType::PostgreSQL),
            TypeCategory::Unknown
        );
    }

    #[test]
    fn test_categorize_type_text_and_json() {
        assert_eq!(
            categorize_type("VARCHAR", DatabaseType::MySQL),
            TypeCategory::Text
        );
        assert_eq!(
            categorize_type("jsonb", DatabaseType::PostgreSQL),
            TypeCategory::Json
        );
        assert_eq!(
            categorize_type("uuid", DatabaseType::PostgreSQL),
            TypeCategory::Uuid
        );
    }

    #[test]
    fn test_categorize_type_vendor_specific_is_unknown() {
        for name in ["BIT", "INET", "MONEY", "TIMETZ", "SET", "GEOMETRY", "INT4[]", "_int4"] {
            let db = if name == "SET" || name == "GEOMETRY" {
                DatabaseType::MySQL
            } else {
                DatabaseType::PostgreSQL
            };
            assert_eq!(categorize_type(name, db), TypeCategory::Unknown, "{}", name);
        }
    }

    #[test]
    fn test_unsigned_value_above_i64_max_keeps_digits() {
        assert_eq!(unsigned_value(42), SqlValue::Int(42));
        assert_eq!(unsigned_value(i64::MAX as u64), SqlValue::Int(i64::MAX));
        assert_eq!(
            unsigned_value(u64::MAX),
            SqlValue::Decimal("18446744073709551615".to_string())
        );
    }

    #[test]
    fn test_text_or_bytes() {
        assert_eq!(
            text_or_bytes(b"1 day 02:00:00".to_vec()),
            SqlValue::from("1 day 02:00:00")
        );
        assert_eq!(
            text_or_bytes(vec![0xFF, 0x00]),
            SqlValue::Bytes(vec![0xFF, 0x00])
        );
    }

    #[test]
    fn test_bit_value() {
        assert_eq!(bit_value(vec![0x01]), SqlValue::Int(1));
        assert_eq!(bit_value(vec![0x01, 0x02]), SqlValue::Int(258));
        assert_eq!(bit_value(Vec::new()), SqlValue::Int(0));
        assert_eq!(
            bit_value(vec![0xFF; 8]),
            SqlValue::Decimal(u64::MAX.to_string())
        );
        assert_eq!(bit_value(vec![1; 9]), SqlValue::Bytes(vec![1; 9]));
    }

    fn numeric_bytes(weight: i16, sign: u16, dscale: u16, digits: &[i16]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(digits.len() as i16).to_be_bytes());
        buf.extend_from_slice(&weight.to_be_bytes());
        buf.extend_from_slice(&sign.to_be_bytes());
        buf.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            buf.extend_from_slice(&d.to_be_bytes());
        }
        buf
    }

    #[test]
    fn test_pg_numeric_with_fraction() {
        let bytes = numeric_bytes(0, 0, 2, &[123, 4500]);
        assert_eq!(pg_numeric_to_string(&bytes).unwrap(), "123.45");
    }

    #[test]
    fn test_pg_numeric_small_fraction() {
        let bytes = numeric_bytes(-1, 0, 2, &[500]);
        assert_eq!(pg_numeric_to_string(&bytes).unwrap(), "0.05");
    }

    #[test]
    fn test_pg_numeric_trailing_zero_groups() {
        let bytes = numeric_bytes(1, 0, 0, &[1]);
        assert_eq!(pg_numeric_to_string(&bytes).unwrap(), "10000");
    }

    #[test]
    fn test_pg_numeric_negative_and_nan() {
        let bytes = numeric_bytes(1, 0x4000, 1, &[1234, 5678, 9000]);
        assert_eq!(pg_numeric_to_string(&bytes).unwrap(), "-12345678.9");
        let nan = numeric_bytes(0, 0xC000, 0, &[]);
        assert_eq!(pg_numeric_to_string(&nan).unwrap(), "NaN");
    }

    #[test]
    fn test_pg_numeric_rejects_short_input() {
        assert!(pg_numeric_to_string(&[0, 1]).is_err());
    }
}
