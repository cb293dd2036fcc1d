//! Argument resolution: merges command-line flags or a JSON config file into
//! one validated [`ArgumentSet`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{FileQueryError, Result};
use crate::export::FileType;
use crate::output::OutputFormat;

/// Fully resolved run parameters for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSet {
    pub filename: Option<PathBuf>,
    pub filesdir: Option<PathBuf>,
    pub query: Option<String>,
    pub query_file: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub out_file_format: FileType,
    pub format: OutputFormat,
    pub truncate: usize,
    pub show_schema: bool,
}

impl ArgumentSet {
    /// The file or directory to open as a database. Empty paths are skipped.
    pub fn source_path(&self) -> Option<&Path> {
        non_empty_path(&self.filename).or(non_empty_path(&self.filesdir))
    }

    pub fn query_file_path(&self) -> Option<&Path> {
        non_empty_path(&self.query_file)
    }
}

fn non_empty_path(value: &Option<PathBuf>) -> Option<&Path> {
    value.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// Shape of the JSON config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    filename: Option<PathBuf>,
    filesdir: Option<PathBuf>,
    query: Option<String>,
    query_file: Option<PathBuf>,
    out_file: Option<PathBuf>,
    out_file_format: Option<String>,
    format: Option<OutputFormat>,
    truncate: Option<usize>,
    show_schema: Option<bool>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self> {
        let config_err = |reason: String| FileQueryError::ConfigParse {
            path: path.to_path_buf(),
            reason,
        };
        let contents = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| config_err(e.to_string()))
    }

    fn into_arguments(self) -> ArgumentSet {
        ArgumentSet {
            filename: self.filename,
            filesdir: self.filesdir,
            query: self.query,
            query_file: self.query_file,
            out_file: self.out_file,
            out_file_format: FileType::from_flag(self.out_file_format.as_deref()),
            format: self.format.unwrap_or_default(),
            truncate: self.truncate.unwrap_or(0),
            show_schema: self.show_schema.unwrap_or(false),
        }
    }
}

/// Build the argument set from the config file when one is given, otherwise
/// from the discrete flags, then validate it.
pub fn resolve_arguments(cli: &Cli) -> Result<ArgumentSet> {
    let args = match &cli.config {
        Some(config_path) => {
            tracing::debug!("loading arguments from config {}", config_path.display());
            ConfigFile::load(config_path)?.into_arguments()
        }
        None => ArgumentSet {
            filename: cli.filename.clone(),
            filesdir: cli.filesdir.clone(),
            query: cli.query.clone(),
            query_file: cli.query_file.clone(),
            out_file: cli.out_file.clone(),
            out_file_format: FileType::from_flag(cli.out_file_format.as_deref()),
            format: cli.format,
            truncate: cli.truncate,
            show_schema: cli.schema,
        },
    };

    validate_arguments(&args)?;
    Ok(args)
}

fn is_set_path(value: &Option<PathBuf>) -> bool {
    non_empty_path(value).is_some()
}

fn is_set_str(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|s| !s.is_empty())
}

/// Check the mutual-exclusion rules in order, failing on the first violation.
pub fn validate_arguments(args: &ArgumentSet) -> Result<()> {
    let has_filename = is_set_path(&args.filename);
    let has_filesdir = is_set_path(&args.filesdir);
    let has_query = is_set_str(&args.query);
    let has_query_file = is_set_path(&args.query_file);

    if !has_filename && !has_filesdir {
        return Err(FileQueryError::Argument(
            "you must provide either a file name or a path to a directory containing CSV and/or Parquet files"
                .to_string(),
        ));
    }
    if has_filename && has_filesdir {
        return Err(FileQueryError::Argument(
            "you cannot provide both filename and filesdir".to_string(),
        ));
    }
    if !has_query && !has_query_file {
        return Err(FileQueryError::Argument(
            "you must provide either a query or a path to a file with a query".to_string(),
        ));
    }
    if has_query && has_query_file {
        return Err(FileQueryError::Argument(
            "you cannot provide both query and query_file".to_string(),
        ));
    }

    Ok(())
}
