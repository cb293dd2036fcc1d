use arrow::array::{Array, AsArray};
use arrow::datatypes::DataType;
use arrow::json::writer::LineDelimitedWriter;
use arrow::util::display::array_value_to_string;
use clap::ValueEnum;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{Cell, Table};
use serde::Deserialize;
use std::fmt::Write;

use crate::error::{FileQueryError, Result};
use crate::filedb::QueryResult;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Vertical,
    Ndjson,
}

pub fn render(result: &QueryResult, format: OutputFormat, truncate: usize) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_as_table(result, truncate)),
        OutputFormat::Vertical => Ok(format_vertical(result, truncate)),
        OutputFormat::Ndjson => format_ndjson(result),
    }
}

pub fn format_array_value(array: &dyn Array, row_idx: usize) -> String {
    if array.is_null(row_idx) {
        return "NULL".to_string();
    }

    match array.data_type() {
        DataType::Struct(_) => {
            let struct_array = array.as_struct();
            let mut parts = Vec::new();

            for (i, field) in struct_array.fields().iter().enumerate() {
                let child_value = format_array_value(struct_array.column(i).as_ref(), row_idx);
                parts.push(format!("{}: {}", field.name(), child_value));
            }

            format!("{{{}}}", parts.join(", "))
        }
        DataType::List(_) => {
            let list_value = array.as_list::<i32>().value(row_idx);
            format_list_items(list_value.as_ref())
        }
        DataType::LargeList(_) => {
            let list_value = array.as_list::<i64>().value(row_idx);
            format_list_items(list_value.as_ref())
        }
        _ => array_value_to_string(array, row_idx)
            .unwrap_or_else(|_| format!("<{:?}>", array.data_type())),
    }
}

fn format_list_items(values: &dyn Array) -> String {
    let items: Vec<String> = (0..values.len())
        .map(|i| format_array_value(values, i))
        .collect();
    format!("[{}]", items.join(", "))
}

fn truncate_value(value: String, truncate_len: usize) -> String {
    if truncate_len == 0 || value.chars().count() <= truncate_len {
        return value;
    }
    let cut: String = value.chars().take(truncate_len).collect();
    format!("{}...", cut)
}

/// Render a result as an aligned text table: header, separator, one line per
/// record. A result with no rows renders as header and separator only.
pub fn format_as_table(result: &QueryResult, truncate_len: usize) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);

    let header: Vec<Cell> = result.column_names().into_iter().map(Cell::new).collect();
    table.set_header(header);

    for batch in result.batches() {
        for row_idx in 0..batch.num_rows() {
            let row: Vec<Cell> = batch
                .columns()
                .iter()
                .map(|column| {
                    let value = format_array_value(column.as_ref(), row_idx);
                    Cell::new(truncate_value(value, truncate_len))
                })
                .collect();
            table.add_row(row);
        }
    }

    table.to_string()
}

pub fn format_vertical(result: &QueryResult, truncate_len: usize) -> String {
    let mut out = String::new();
    let schema = result.schema();
    let mut record = 0;

    for batch in result.batches() {
        for row_idx in 0..batch.num_rows() {
            if record > 0 {
                out.push('\n'); // blank line between records
            }
            record += 1;

            let _ = writeln!(
                out,
                "*************************** {} ***************************",
                record
            );

            for (col_idx, column) in batch.columns().iter().enumerate() {
                let value = format_array_value(column.as_ref(), row_idx);
                let _ = writeln!(
                    out,
                    "{:>20}: {}",
                    schema.field(col_idx).name(),
                    truncate_value(value, truncate_len)
                );
            }
        }
    }

    out.trim_end().to_string()
}

pub fn format_ndjson(result: &QueryResult) -> Result<String> {
    let render_err = |e: arrow::error::ArrowError| FileQueryError::Render(e.to_string());

    let mut buffer = Vec::new();
    {
        let mut writer = LineDelimitedWriter::new(&mut buffer);
        for batch in result.batches() {
            writer.write(batch).map_err(render_err)?;
        }
        writer.finish().map_err(render_err)?;
    }

    let json = String::from_utf8(buffer).map_err(|e| FileQueryError::Render(e.to_string()))?;
    Ok(json.trim_end().to_string())
}
