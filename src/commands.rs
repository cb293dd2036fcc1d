use std::fs;
use std::io::{self, Write};

use crate::args::ArgumentSet;
use crate::error::{FileQueryError, Result};
use crate::filedb::{FileDatabase, FileDb};
use crate::output::{OutputFormat, render};
use crate::schema::schema_tree;
use crate::splitter::split_queries;

/// Handle one invocation: read the query, open the files, then either export
/// the result or print every statement's result to stdout.
pub async fn run(args: &ArgumentSet) -> Result<()> {
    let query = read_query_text(args)?;

    let source = args.source_path().ok_or_else(|| {
        FileQueryError::Argument("no file or directory to query".to_string())
    })?;
    let db = FileDb::open(source).await?;

    let mut stdout = io::stdout();
    if args.show_schema {
        for table in db.table_names() {
            let schema = db.table_schema(table).await?;
            writeln!(stdout, "{}", schema_tree(table, &schema))?;
        }
    }

    execute(&db, args, &query, &mut stdout).await
}

/// Query text given inline, or the full contents of the query file.
pub fn read_query_text(args: &ArgumentSet) -> Result<String> {
    if let Some(query_file) = args.query_file_path() {
        return fs::read_to_string(query_file).map_err(|source| FileQueryError::QueryFileRead {
            path: query_file.to_path_buf(),
            source,
        });
    }

    Ok(args.query.clone().unwrap_or_default())
}

/// Export when an output file is requested, otherwise run and print.
pub async fn execute<D: FileDatabase, W: Write>(
    db: &D,
    args: &ArgumentSet,
    query: &str,
    out: &mut W,
) -> Result<()> {
    if let Some(out_file) = &args.out_file {
        // export runs the text as a single statement
        let rows = db
            .export_query(query, out_file, args.out_file_format)
            .await?;
        tracing::info!("exported {} rows to {}", rows, out_file.display());
        return Ok(());
    }

    let queries = split_queries(query);
    tracing::debug!("split query into {} statements: {:?}", queries.len(), queries);
    run_sql(db, &queries, args.format, args.truncate, out).await
}

pub async fn run_sql<D: FileDatabase, W: Write>(
    db: &D,
    queries: &[String],
    format: OutputFormat,
    truncate: usize,
    out: &mut W,
) -> Result<()> {
    let results = match queries {
        [] => return Err(FileQueryError::EmptyQuery),
        [single] => vec![db.exec_query(single).await?],
        many => db.exec_many_queries(many).await?,
    };

    for result in &results {
        tracing::debug!("statement returned {} rows", result.num_rows());
        writeln!(out, "{}", render(result, format, truncate)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FileType;
    use crate::filedb::QueryResult;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingDb {
        executed: RefCell<Vec<String>>,
        many_calls: RefCell<usize>,
        exported: RefCell<Vec<(String, PathBuf, FileType)>>,
    }

    impl FileDatabase for RecordingDb {
        async fn exec_query(&self, sql: &str) -> Result<QueryResult> {
            self.executed.borrow_mut().push(sql.to_string());
            let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, false)]));
            let batch = RecordBatch::try_new(
                schema.clone(),
                vec![Arc::new(Int64Array::from(vec![self.executed.borrow().len() as i64]))],
            )
            .unwrap();
            Ok(QueryResult::new(schema, vec![batch]))
        }

        async fn exec_many_queries(&self, sqls: &[String]) -> Result<Vec<QueryResult>> {
            *self.many_calls.borrow_mut() += 1;
            let mut results = Vec::new();
            for sql in sqls {
                results.push(self.exec_query(sql).await?);
            }
            Ok(results)
        }

        async fn export_query(
            &self,
            sql: &str,
            out_path: &Path,
            file_type: FileType,
        ) -> Result<usize> {
            self.exported
                .borrow_mut()
                .push((sql.to_string(), out_path.to_path_buf(), file_type));
            Ok(0)
        }
    }

    fn args_with_query(query: &str) -> ArgumentSet {
        ArgumentSet {
            filename: Some(PathBuf::from("data.csv")),
            filesdir: None,
            query: Some(query.to_string()),
            query_file: None,
            out_file: None,
            out_file_format: FileType::Csv,
            format: OutputFormat::Table,
            truncate: 0,
            show_schema: false,
        }
    }

    #[tokio::test]
    async fn test_single_statement_uses_exec_query() {
        let db = RecordingDb::default();
        let args = args_with_query("SELECT 1;");
        let mut out = Vec::new();

        execute(&db, &args, "SELECT 1;", &mut out).await.unwrap();

        assert_eq!(*db.executed.borrow(), vec!["SELECT 1"]);
        assert_eq!(*db.many_calls.borrow(), 0);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_multiple_statements_use_exec_many() {
        let db = RecordingDb::default();
        let sql = "SELECT 1; SELECT 2;";
        let args = args_with_query(sql);
        let mut out = Vec::new();

        execute(&db, &args, sql, &mut out).await.unwrap();

        assert_eq!(*db.executed.borrow(), vec!["SELECT 1", " SELECT 2"]);
        assert_eq!(*db.many_calls.borrow(), 1);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 6);
    }

    #[tokio::test]
    async fn test_export_uses_unsplit_query() {
        let db = RecordingDb::default();
        let sql = "SELECT 1; SELECT 2;";
        let mut args = args_with_query(sql);
        args.out_file = Some(PathBuf::from("out.parquet"));
        args.out_file_format = FileType::Parquet;
        let mut out = Vec::new();

        execute(&db, &args, sql, &mut out).await.unwrap();

        assert!(db.executed.borrow().is_empty());
        assert_eq!(
            *db.exported.borrow(),
            vec![(sql.to_string(), PathBuf::from("out.parquet"), FileType::Parquet)]
        );
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_error() {
        let db = RecordingDb::default();
        let args = args_with_query("  ");
        let mut out = Vec::new();

        let result = execute(&db, &args, "  ", &mut out).await;
        assert!(matches!(result, Err(FileQueryError::EmptyQuery)));
    }

    #[test]
    fn test_read_query_text() {
        let mut query_file = tempfile::NamedTempFile::new().unwrap();
        write!(query_file, "SELECT *\nFROM people;\n").unwrap();

        let mut args = args_with_query("ignored");
        args.query = None;
        args.query_file = Some(query_file.path().to_path_buf());
        assert_eq!(read_query_text(&args).unwrap(), "SELECT *\nFROM people;\n");

        args.query_file = Some(PathBuf::from("/nonexistent/query.sql"));
        assert!(matches!(
            read_query_text(&args),
            Err(FileQueryError::QueryFileRead { .. })
        ));

        assert_eq!(read_query_text(&args_with_query("SELECT 1")).unwrap(), "SELECT 1");

        // an empty query file path falls back to the inline query
        let mut args = args_with_query("SELECT 1");
        args.query_file = Some(PathBuf::new());
        assert_eq!(read_query_text(&args).unwrap(), "SELECT 1");
    }

    #[tokio::test]
    async fn test_run_exports_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        fs::create_dir(&tables).unwrap();
        fs::write(tables.join("people.csv"), "id,name\n1,alice\n2,bob\n").unwrap();

        let out_file = dir.path().join("result.csv");
        let args = ArgumentSet {
            filename: None,
            filesdir: Some(tables),
            query: Some("SELECT name FROM people WHERE id = 2".to_string()),
            query_file: None,
            out_file: Some(out_file.clone()),
            out_file_format: FileType::Csv,
            format: OutputFormat::Table,
            truncate: 0,
            show_schema: false,
        };

        run(&args).await.unwrap();
        assert_eq!(fs::read_to_string(&out_file).unwrap(), "name\nbob\n");
    }

    #[tokio::test]
    async fn test_run_with_empty_filename_uses_filesdir() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        fs::create_dir(&tables).unwrap();
        fs::write(tables.join("people.csv"), "id,name\n1,alice\n").unwrap();

        let out_file = dir.path().join("names.csv");
        let mut args = args_with_query("SELECT name FROM people");
        args.filename = Some(PathBuf::new());
        args.filesdir = Some(tables);
        args.out_file = Some(out_file.clone());

        crate::args::validate_arguments(&args).unwrap();
        run(&args).await.unwrap();
        assert_eq!(fs::read_to_string(&out_file).unwrap(), "name\nalice\n");
    }

    #[tokio::test]
    async fn test_run_with_missing_file() {
        let mut args = args_with_query("SELECT 1");
        args.filename = Some(PathBuf::from("/nonexistent/data.csv"));
        let result = run(&args).await;
        assert!(matches!(result, Err(FileQueryError::Database(_))));
    }
}
