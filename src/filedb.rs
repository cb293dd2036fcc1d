//! File-backed database: CSV and Parquet files registered as DataFusion
//! tables, queried with SQL.

use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use datafusion::prelude::{CsvReadOptions, ParquetReadOptions, SessionContext};

use crate::error::{FileQueryError, Result};
use crate::export::{FileType, write_batches};
use crate::reader::{TableFormat, TableSource, discover_tables};

/// Result of one executed statement.
#[derive(Debug, Clone)]
pub struct QueryResult {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl QueryResult {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields().iter().map(|f| f.name().as_str()).collect()
    }
}

/// Query capability the CLI handler runs against.
pub trait FileDatabase {
    async fn exec_query(&self, sql: &str) -> Result<QueryResult>;

    /// Run statements in order, stopping at the first failure.
    async fn exec_many_queries(&self, sqls: &[String]) -> Result<Vec<QueryResult>> {
        let mut results = Vec::with_capacity(sqls.len());
        for (idx, sql) in sqls.iter().enumerate() {
            tracing::debug!("executing statement {} of {}", idx + 1, sqls.len());
            results.push(self.exec_query(sql).await?);
        }
        Ok(results)
    }

    /// Run one statement and write its result to `out_path`.
    async fn export_query(
        &self,
        sql: &str,
        out_path: &Path,
        file_type: FileType,
    ) -> Result<usize>;
}

/// DataFusion session with one table per CSV/Parquet file.
pub struct FileDb {
    ctx: SessionContext,
    tables: Vec<TableSource>,
}

impl FileDb {
    /// Open a single file (one table) or a directory (one table per file).
    pub async fn open(path: &Path) -> Result<Self> {
        let tables = discover_tables(path)?;
        let ctx = SessionContext::new();

        for table in &tables {
            register_table(&ctx, table).await?;
            tracing::info!(
                "registered table '{}' from {}",
                table.name,
                table.path.display()
            );
        }

        Ok(Self { ctx, tables })
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub async fn table_schema(&self, name: &str) -> Result<SchemaRef> {
        let df = self.ctx.table(name).await?;
        Ok(Arc::clone(df.schema().inner()))
    }
}

async fn register_table(ctx: &SessionContext, table: &TableSource) -> Result<()> {
    let path = table.path.to_str().ok_or_else(|| {
        FileQueryError::Database(format!("path is not valid UTF-8: {}", table.path.display()))
    })?;
    // keep the on-disk extension so upper-case names like DATA.CSV still match
    let extension = table
        .path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let registered = match table.format {
        TableFormat::Csv => {
            let options = CsvReadOptions::new()
                .has_header(true)
                .file_extension(extension.as_str());
            ctx.register_csv(table.name.as_str(), path, options).await
        }
        TableFormat::Parquet => {
            let options = ParquetReadOptions {
                file_extension: extension.as_str(),
                ..Default::default()
            };
            ctx.register_parquet(table.name.as_str(), path, options).await
        }
    };

    registered.map_err(|e| {
        FileQueryError::Database(format!(
            "failed to register {} as table '{}': {}",
            table.path.display(),
            table.name,
            e
        ))
    })
}

impl FileDatabase for FileDb {
    async fn exec_query(&self, sql: &str) -> Result<QueryResult> {
        tracing::debug!("executing query: {}", sql.trim());
        let df = self.ctx.sql(sql).await?;
        let schema = Arc::clone(df.schema().inner());
        let batches = df.collect().await?;
        Ok(QueryResult::new(schema, batches))
    }

    async fn export_query(
        &self,
        sql: &str,
        out_path: &Path,
        file_type: FileType,
    ) -> Result<usize> {
        let result = self.exec_query(sql).await?;
        write_batches(
            out_path,
            file_type,
            Arc::clone(result.schema()),
            result.batches(),
        )
    }
}
