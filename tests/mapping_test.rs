//! Integration tests for result mapping against SQLite.
//!
//! Tests verify that:
//! - Query results map to generic rows in column order
//! - Typed records receive every column that has a setter
//! - Missing setters and type mismatches are reported, not fatal
//! - Instantiation failures abort with a mapping error
//! - Statement errors keep their database class

use chrono::NaiveDate;
use db_rowmap::db::{DbConnection, Session};
use db_rowmap::error::{BoxError, DbError};
use db_rowmap::impl_record;
use db_rowmap::mapper::{Binding, DiagnosticKind, Record, collect_records, to_column_lists};
use db_rowmap::models::{ConnectionConfig, SqlValue};

#[derive(Debug, Default, PartialEq)]
struct Person {
    id: i64,
    name: Option<String>,
}

impl_record!(Person {
    "id" => id: i64,
    "name" => name: Option<String>,
});

#[derive(Debug, Default)]
struct Measurement {
    id: i32,
    reading: f64,
    active: bool,
    taken_on: Option<NaiveDate>,
    payload: Vec<u8>,
}

impl_record!(Measurement {
    "id" => id: i32,
    "reading" => reading: f64,
    "active" => active: bool,
    "taken_on" => taken_on: Option<NaiveDate>,
    "payload" => payload: Vec<u8>,
});

/// Open an in-memory database with a `people` table holding (1, 'Ann').
async fn setup_people() -> Session<DbConnection> {
    let config = ConnectionConfig::new("sqlite::memory:").unwrap();
    let mut session = Session::open(&config).await.unwrap();
    session
        .execute_update("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)")
        .await
        .unwrap();
    session
        .execute_update("INSERT INTO people (id, name) VALUES (1, 'Ann')")
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn test_generic_rows_for_single_row() {
    let mut session = setup_people().await;

    let rows = session
        .query_generic("SELECT id, name FROM people")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let json = serde_json::Value::Object(rows[0].to_json());
    assert_eq!(json.to_string(), r#"{"id":1,"name":"Ann"}"#);

    session.close().await;
}

#[tokio::test]
async fn test_records_for_single_row() {
    let mut session = setup_people().await;

    let mapped = session
        .query_records::<Person>("SELECT id, name FROM people")
        .await
        .unwrap();

    assert!(mapped.is_clean());
    assert_eq!(
        mapped.records,
        vec![Person {
            id: 1,
            name: Some("Ann".to_string())
        }]
    );

    session.close().await;
}

#[tokio::test]
async fn test_missing_setter_reported_and_row_kept() {
    let mut session = setup_people().await;

    let mapped = session
        .query_records::<Person>("SELECT id, name AS unknown_col FROM people")
        .await
        .unwrap();

    assert_eq!(mapped.records.len(), 1);
    assert_eq!(mapped.records[0].id, 1);
    assert_eq!(mapped.records[0].name, None);
    assert_eq!(mapped.diagnostics.len(), 1);
    assert_eq!(mapped.diagnostics[0].column, "unknown_col");
    assert_eq!(
        mapped.diagnostics[0].kind,
        DiagnosticKind::MissingSetter {
            setter: "setUnknown_col".to_string()
        }
    );

    session.close().await;
}

#[tokio::test]
async fn test_empty_result_maps_to_empty_list() {
    let mut session = setup_people().await;

    let rows = session
        .query_generic("SELECT id, name FROM people WHERE id < 0")
        .await
        .unwrap();
    assert!(rows.is_empty());

    let mapped = session
        .query_records::<Person>("SELECT id, name FROM people WHERE id < 0")
        .await
        .unwrap();
    assert!(mapped.records.is_empty());
    assert!(mapped.diagnostics.is_empty());

    session.close().await;
}

#[tokio::test]
async fn test_duplicate_column_names() {
    let mut session = setup_people().await;

    let result = session.query("SELECT 1 AS v, 2 AS v").await.unwrap();

    // Generic rows keep the later value
    let rows = session.query_generic("SELECT 1 AS v, 2 AS v").await.unwrap();
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0].get("v"), Some(&SqlValue::Int(2)));

    // Column lists keep both
    let lists = to_column_lists(&result);
    assert_eq!(
        lists[0],
        vec![
            ("v".to_string(), SqlValue::Int(1)),
            ("v".to_string(), SqlValue::Int(2)),
        ]
    );

    session.close().await;
}

#[tokio::test]
async fn test_row_count_matches_result() {
    let mut session = setup_people().await;
    for id in 2..=5 {
        session
            .execute_update(&format!(
                "INSERT INTO people (id, name) VALUES ({}, 'p{}')",
                id, id
            ))
            .await
            .unwrap();
    }

    let result = session
        .query("SELECT id, name FROM people ORDER BY id")
        .await
        .unwrap();
    let rows = session
        .query_generic("SELECT id, name FROM people ORDER BY id")
        .await
        .unwrap();

    assert_eq!(result.row_count(), 5);
    assert_eq!(rows.len(), result.row_count());
    for row in &rows {
        assert_eq!(row.len(), result.columns().len());
    }
    assert_eq!(rows[4].get("name"), Some(&SqlValue::from("p5")));

    session.close().await;
}

#[tokio::test]
async fn test_typed_columns() {
    let config = ConnectionConfig::new("sqlite::memory:").unwrap();
    let mut session = Session::open(&config).await.unwrap();
    session
        .execute_update(
            "CREATE TABLE measurements (
                id INTEGER PRIMARY KEY,
                reading REAL,
                active BOOLEAN,
                taken_on DATE,
                payload BLOB
            )",
        )
        .await
        .unwrap();
    session
        .execute_update(
            "INSERT INTO measurements VALUES (1, 20.5, 1, '2024-02-29', X'CAFE'), \
             (2, 3, 0, NULL, X'')",
        )
        .await
        .unwrap();

    let mapped = session
        .query_records::<Measurement>("SELECT * FROM measurements ORDER BY id")
        .await
        .unwrap();

    assert!(mapped.is_clean(), "diagnostics: {:?}", mapped.diagnostics);
    let first = &mapped.records[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.reading, 20.5);
    assert!(first.active);
    assert_eq!(first.taken_on, NaiveDate::from_ymd_opt(2024, 2, 29));
    assert_eq!(first.payload, vec![0xCA, 0xFE]);

    let second = &mapped.records[1];
    assert_eq!(second.reading, 3.0);
    assert!(!second.active);
    assert_eq!(second.taken_on, None);

    session.close().await;
}

#[tokio::test]
async fn test_null_into_required_field_is_type_mismatch() {
    let mut session = setup_people().await;

    let mapped = session
        .query_records::<Person>("SELECT NULL AS id, name FROM people")
        .await
        .unwrap();

    assert_eq!(mapped.records.len(), 1);
    assert_eq!(mapped.records[0].id, 0);
    assert_eq!(mapped.records[0].name.as_deref(), Some("Ann"));
    match &mapped.diagnostics[0].kind {
        DiagnosticKind::TypeMismatch { actual, .. } => assert_eq!(*actual, "null"),
        other => panic!("unexpected diagnostic: {:?}", other),
    }

    session.close().await;
}

#[derive(Debug)]
struct Sealed;

impl Record for Sealed {
    fn instantiate() -> Result<Self, BoxError> {
        Err("constructor is not accessible".into())
    }

    fn bindings() -> Vec<Binding<Self>> {
        Vec::new()
    }
}

#[tokio::test]
async fn test_instantiation_failure_is_mapping_error() {
    let mut session = setup_people().await;

    let err = session
        .query_records::<Sealed>("SELECT id FROM people")
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Mapping { .. }));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("constructor is not accessible"));

    session.close().await;
}

#[tokio::test]
async fn test_statement_errors_while_mapping_surface_verbatim() {
    let mut session = setup_people().await;

    let err = session
        .query_records::<Person>("SELEC id FROM people")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Database { .. }), "got {:?}", err);
    assert!(err.to_string().contains("syntax error"));

    let err = session
        .query_generic("SELECT id FROM people WHERE nosuchcol = 1")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Database { .. }), "got {:?}", err);
    assert!(err.to_string().contains("no such column"));

    // Same class as the plain query
    let err = session.query("SELECT id FROM no_such_table").await.unwrap_err();
    assert!(matches!(err, DbError::Database { .. }));

    session.close().await;
}

#[tokio::test]
async fn test_blank_sql_is_invalid_input() {
    let mut session = setup_people().await;

    let err = session.query_generic("   ").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidInput { .. }));
    let err = session.execute_update("").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidInput { .. }));

    session.close().await;
}

#[tokio::test]
async fn test_cursor_streams_then_maps() {
    let mut session = setup_people().await;
    session
        .execute_update("INSERT INTO people (id, name) VALUES (2, 'Bo')")
        .await
        .unwrap();

    {
        let mut cursor = session.execute_query("SELECT id, name FROM people ORDER BY id");
        let first = cursor.next_row().await.unwrap().unwrap();
        assert_eq!(first.get("name"), Some(&SqlValue::from("Ann")));
    }

    let cursor = session.execute_query("SELECT id, name FROM people ORDER BY id");
    let mapped = collect_records::<Person>(cursor).await.unwrap();
    assert_eq!(mapped.records.len(), 2);
    assert_eq!(mapped.records[1].name.as_deref(), Some("Bo"));

    session.close().await;
}
