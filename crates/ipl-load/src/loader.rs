use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ipl_ingest::read_artifact;
use ipl_model::{ColumnProfile, profile};
use polars::prelude::DataFrame;
use rusqlite::{Connection, TransactionBehavior, params_from_iter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LoadError, Result};
use crate::sql::{
    affinity, create_table_sql, declared_type, insert_sql, quote_ident, table_columns, to_sql,
};

/// What happens to rows left by earlier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Delete existing rows, then insert, in the same transaction.
    #[default]
    Replace,
    /// Insert alongside existing rows.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub table: String,
    pub rows_written: usize,
    /// Rows removed under [`LoadMode::Replace`].
    pub rows_replaced: usize,
    pub table_created: bool,
}

#[derive(Debug, Clone)]
pub struct Loader {
    database: PathBuf,
    table: String,
    mode: LoadMode,
}

impl Loader {
    pub fn new(database: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            mode: LoadMode::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn storage_err(&self, operation: &'static str) -> impl FnOnce(rusqlite::Error) -> LoadError {
        let database = self.database.clone();
        move |source| LoadError::StorageUnavailable {
            database,
            operation,
            source: Box::new(source),
        }
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self
            .database
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|err| LoadError::StorageUnavailable {
                database: self.database.clone(),
                operation: "create database directory",
                source: Box::new(err),
            })?;
        }
        let conn = Connection::open(&self.database).map_err(self.storage_err("open database"))?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(self.storage_err("set busy timeout"))?;
        Ok(conn)
    }

    /// Read the staged artifact at `artifact` and persist every record.
    pub fn load(&self, artifact: &Path) -> Result<LoadSummary> {
        let df = read_artifact(artifact)?;
        self.load_frame(&df)
    }

    /// Persist `df` into the destination table in one transaction.
    ///
    /// The transaction takes the write lock up front, so a concurrent writer
    /// makes this wait (up to the busy timeout) instead of failing after the
    /// table has been inspected.
    pub fn load_frame(&self, df: &DataFrame) -> Result<LoadSummary> {
        let columns = profile(df);
        let mut conn = self.open()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(self.storage_err("begin transaction"))?;

        let existing = table_columns(&tx, &self.table).map_err(self.storage_err("inspect table"))?;
        let table_created = existing.is_empty();
        if table_created {
            let sql = create_table_sql(&self.table, &columns);
            debug!(%sql, "creating table");
            tx.execute(&sql, ())
                .map_err(self.storage_err("create table"))?;
        } else {
            self.check_drift(&existing, &columns)?;
        }

        let rows_replaced = match self.mode {
            LoadMode::Replace if !table_created => tx
                .execute(&format!("DELETE FROM {}", quote_ident(&self.table)), ())
                .map_err(self.storage_err("clear table"))?,
            _ => 0,
        };

        {
            let mut stmt = tx
                .prepare(&insert_sql(&self.table, &columns))
                .map_err(self.storage_err("prepare insert"))?;
            let frame_columns = df.get_columns();
            for idx in 0..df.height() {
                let mut values = Vec::with_capacity(frame_columns.len());
                for column in frame_columns {
                    values.push(to_sql(column.get(idx)?));
                }
                stmt.execute(params_from_iter(values))
                    .map_err(self.storage_err("insert row"))?;
            }
        }

        tx.commit().map_err(self.storage_err("commit"))?;

        let summary = LoadSummary {
            table: self.table.clone(),
            rows_written: df.height(),
            rows_replaced,
            table_created,
        };
        info!(
            database = %self.database.display(),
            table = %summary.table,
            rows = summary.rows_written,
            replaced = summary.rows_replaced,
            created = summary.table_created,
            "load committed"
        );
        Ok(summary)
    }

    /// Names must match in order; typed table columns must agree with every
    /// artifact column that holds values.
    fn check_drift(&self, existing: &[(String, String)], columns: &[ColumnProfile]) -> Result<()> {
        let names_match = existing.len() == columns.len()
            && existing
                .iter()
                .zip(columns)
                .all(|((name, _), column)| *name == column.name);
        let types_match = names_match
            && existing
                .iter()
                .zip(columns)
                .all(|((_, declared), column)| match affinity(declared) {
                    Some(expected) => expected == column.column_type || !column.has_values(),
                    None => true,
                });
        if types_match {
            return Ok(());
        }
        Err(LoadError::SchemaDrift {
            table: self.table.clone(),
            existing: existing
                .iter()
                .map(|(name, declared)| format!("{name} {declared}").trim_end().to_string())
                .collect(),
            incoming: columns
                .iter()
                .map(|column| format!("{} {}", column.name, declared_type(column.column_type)))
                .collect(),
        })
    }
}
