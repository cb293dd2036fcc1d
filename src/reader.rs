use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FileQueryError, Result};

/// Input file formats that can be registered as tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

/// A file to be registered as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub name: String,
    pub path: PathBuf,
    pub format: TableFormat,
}

pub fn get_table_format(path: &Path) -> Option<TableFormat> {
    let extension = path.extension().and_then(|s| s.to_str())?;

    match extension.to_ascii_lowercase().as_str() {
        "csv" => Some(TableFormat::Csv),
        "parquet" => Some(TableFormat::Parquet),
        _ => None,
    }
}

/// Table name for a file: its stem, lowercased, with anything that is not an
/// ASCII letter, digit or underscore replaced by `_`.
pub fn table_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Collect the table sources for a file or a directory of files.
///
/// A single file must have a recognised extension. For a directory, files
/// directly inside it are taken in name order and unrecognised ones skipped.
pub fn discover_tables(path: &Path) -> Result<Vec<TableSource>> {
    if !path.exists() {
        return Err(FileQueryError::Database(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if path.is_file() {
        let format = get_table_format(path).ok_or_else(|| {
            FileQueryError::Database(format!(
                "Unsupported file type for file: {}",
                path.display()
            ))
        })?;
        return Ok(vec![TableSource {
            name: table_name_for(path),
            path: path.to_path_buf(),
            format,
        }]);
    }

    let read_dir = |e: std::io::Error| {
        FileQueryError::Database(format!("cannot read directory {}: {}", path.display(), e))
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(read_dir)? {
        let entry_path = entry.map_err(read_dir)?.path();
        if entry_path.is_file() {
            entries.push(entry_path);
        }
    }
    entries.sort();

    let mut sources: Vec<TableSource> = Vec::new();
    for entry_path in entries {
        let Some(format) = get_table_format(&entry_path) else {
            tracing::debug!("skipping unsupported file {}", entry_path.display());
            continue;
        };

        let name = table_name_for(&entry_path);
        if let Some(existing) = sources.iter().find(|s| s.name == name) {
            return Err(FileQueryError::Database(format!(
                "files {} and {} both map to table '{}'",
                existing.path.display(),
                entry_path.display(),
                name
            )));
        }
        sources.push(TableSource {
            name,
            path: entry_path,
            format,
        });
    }

    if sources.is_empty() {
        return Err(FileQueryError::Database(format!(
            "no CSV or Parquet files found in {}",
            path.display()
        )));
    }

    Ok(sources)
}
