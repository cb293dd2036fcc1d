use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Run SQL queries against CSV and Parquet files
#[derive(Parser, Debug, Default)]
#[command(name = "filequery", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to CSV or Parquet file
    #[arg(long)]
    pub filename: Option<PathBuf>,

    /// Path to a directory which can contain a combination of CSV and Parquet files
    #[arg(long)]
    pub filesdir: Option<PathBuf>,

    /// SQL query to execute against file
    #[arg(long)]
    pub query: Option<String>,

    /// Path to file with query to execute
    #[arg(long = "query_file")]
    pub query_file: Option<PathBuf>,

    /// File to write results to instead of printing to standard output
    #[arg(long = "out_file")]
    pub out_file: Option<PathBuf>,

    /// Either csv or parquet, defaults to csv
    #[arg(long = "out_file_format")]
    pub out_file_format: Option<String>,

    /// Path to JSON config file (all other query and file options are ignored)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format for printed results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Truncate long column values (0 to disable, default: disabled)
    #[arg(long, default_value_t = 0)]
    pub truncate: usize,

    /// Print the schema of every table before running the query
    #[arg(long)]
    pub schema: bool,

    /// Enable verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
