//! Writing query results to CSV or Parquet files.

use std::fs::File;
use std::path::Path;

use arrow::csv::WriterBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{FileQueryError, Result};

/// Encoding of an exported result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Parquet,
}

impl FileType {
    /// Parquet only when the flag is exactly `parquet`, CSV for anything else.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("parquet") => FileType::Parquet,
            _ => FileType::Csv,
        }
    }
}

/// Write batches to `path`, returning the number of rows written.
///
/// The schema is passed separately so an empty result still produces a
/// valid file (a CSV header line, or a Parquet file with no row groups).
pub fn write_batches(
    path: &Path,
    file_type: FileType,
    schema: SchemaRef,
    batches: &[RecordBatch],
) -> Result<usize> {
    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();

    match file_type {
        FileType::Csv => write_csv(path, schema, batches)?,
        FileType::Parquet => write_parquet(path, schema, batches)?,
    }

    tracing::debug!("wrote {} rows to {}", total_rows, path.display());
    Ok(total_rows)
}

fn write_csv(path: &Path, schema: SchemaRef, batches: &[RecordBatch]) -> Result<()> {
    let file = File::create(path).map_err(|e| FileQueryError::export(path, e))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);

    if batches.is_empty() {
        writer
            .write(&RecordBatch::new_empty(schema))
            .map_err(|e| FileQueryError::export(path, e))?;
    }
    for batch in batches {
        writer
            .write(batch)
            .map_err(|e| FileQueryError::export(path, e))?;
    }

    Ok(())
}

fn write_parquet(path: &Path, schema: SchemaRef, batches: &[RecordBatch]) -> Result<()> {
    let file = File::create(path).map_err(|e| FileQueryError::export(path, e))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .map_err(|e| FileQueryError::export(path, e))?;

    for batch in batches {
        writer
            .write(batch)
            .map_err(|e| FileQueryError::export(path, e))?;
    }

    writer.close().map_err(|e| FileQueryError::export(path, e))?;
    Ok(())
}
