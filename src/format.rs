//! Output formatting for query results.
//!
//! Renders a `ResultSet` as JSON, an ASCII table (like the MySQL CLI) or a
//! Markdown table.

use crate::mapper::to_generic_rows;
use crate::models::{ResultSet, SqlValue};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of row objects (default)
    #[default]
    Json,
    /// ASCII table format (like MySQL CLI)
    Table,
    /// Markdown table format
    Markdown,
}

/// Render a query result in the requested format.
pub fn format_result(result: &ResultSet, format: OutputFormat, elapsed: Duration) -> String {
    match format {
        OutputFormat::Json => format_as_json(result),
        OutputFormat::Table => format_as_table(result, elapsed),
        OutputFormat::Markdown => format_as_markdown(result),
    }
}

/// Render the outcome of an update statement.
pub fn format_update(rows_affected: u64, elapsed: Duration) -> String {
    let row_text = if rows_affected == 1 { "row" } else { "rows" };
    format!(
        "Query OK, {} {} affected ({:.2} sec)\n",
        rows_affected,
        row_text,
        elapsed.as_secs_f64()
    )
}

pub fn format_as_json(result: &ResultSet) -> String {
    let rows: Vec<JsonValue> = to_generic_rows(result)
        .iter()
        .map(|row| JsonValue::Object(row.to_json()))
        .collect();
    // Serializing a Value cannot fail
    serde_json::to_string_pretty(&JsonValue::Array(rows)).unwrap_or_default()
}

fn cell(value: &SqlValue) -> String {
    value.to_string()
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right_align {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

fn center(text: &str, width: usize) -> String {
    let total = width.saturating_sub(text.width());
    let left = total / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(total - left))
}

pub fn format_as_table(result: &ResultSet, elapsed: Duration) -> String {
    if result.columns().is_empty() {
        return format!("Empty set ({:.2} sec)\n", elapsed.as_secs_f64());
    }

    let cells: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| row.values().iter().map(cell).collect())
        .collect();

    let mut widths: Vec<usize> = result.columns().iter().map(|c| c.name.width()).collect();
    for row in &cells {
        for (i, text) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.width());
        }
    }

    let mut output = String::new();
    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    output.push_str(&separator);
    let header: String = result
        .columns()
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("| {} ", center(&col.name, *w)))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for (row, texts) in result.rows().iter().zip(&cells) {
        let row_str: String = row
            .values()
            .iter()
            .zip(texts)
            .zip(&widths)
            .map(|((value, text), w)| {
                let numeric = matches!(
                    value,
                    SqlValue::Int(_) | SqlValue::Float(_) | SqlValue::Decimal(_)
                );
                format!("| {} ", pad(text, *w, numeric))
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&separator);

    let row_count = result.row_count();
    let row_text = if row_count == 1 { "row" } else { "rows" };
    output.push_str(&format!(
        "{} {} in set ({:.2} sec)\n",
        row_count,
        row_text,
        elapsed.as_secs_f64()
    ));

    output
}

pub fn format_as_markdown(result: &ResultSet) -> String {
    if result.columns().is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();

    let header: String = result
        .columns()
        .iter()
        .map(|c| format!("| {} ", c.name))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);

    let sep: String = result.columns().iter().map(|_| "|---").collect::<String>() + "|\n";
    output.push_str(&sep);

    for row in result.rows() {
        let row_str: String = row
            .values()
            .iter()
            .map(|value| format!("| {} ", cell(value).replace('|', "\\|")))
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&format!("\n*{} rows*", result.row_count()));

    output
}
