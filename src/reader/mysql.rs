//! MySQL implementation of [`SchemaSource`].

use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Row};
use tokio::runtime::Runtime;

use super::{ConnectionParams, ReaderError, SchemaSource, column_from_row, is_system_database};
use crate::model::{ForeignKeyEdge, Schema};

const TABLES_QUERY: &str = "SELECT TABLE_NAME
     FROM INFORMATION_SCHEMA.TABLES
     WHERE TABLE_SCHEMA = ?
     ORDER BY TABLE_NAME";

const COLUMNS_QUERY: &str = "SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, IS_NULLABLE, COLUMN_KEY, EXTRA
     FROM INFORMATION_SCHEMA.COLUMNS
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
     ORDER BY ORDINAL_POSITION";

const FOREIGN_KEYS_QUERY: &str = "SELECT
        kcu.TABLE_NAME,
        kcu.COLUMN_NAME,
        kcu.REFERENCED_TABLE_NAME,
        kcu.REFERENCED_COLUMN_NAME,
        kcu.CONSTRAINT_NAME
     FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS kcu
     WHERE kcu.TABLE_SCHEMA = ?
       AND kcu.REFERENCED_TABLE_NAME IS NOT NULL
     ORDER BY kcu.TABLE_NAME, kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION";

/// One MySQL connection driven by a private current-thread runtime.
///
/// Every call blocks until the server answers.
pub struct MySqlSource {
    runtime: Runtime,
    conn: Conn,
}

impl MySqlSource {
    pub fn connect(params: &ConnectionParams) -> Result<Self, ReaderError> {
        tracing::info!(host = %params.host, port = params.port, user = %params.user, "connecting to MySQL");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ReaderError::Runtime(e.to_string()))?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(params.host.clone())
            .tcp_port(params.port)
            .user(Some(params.user.clone()))
            .pass(Some(params.password.clone()));

        let conn = runtime
            .block_on(Conn::new(opts))
            .map_err(|e| ReaderError::Connect(e.to_string()))?;

        tracing::info!(host = %params.host, "MySQL connection established");
        Ok(Self { runtime, conn })
    }

    /// Run a statement that returns no rows.
    pub fn execute(&mut self, statement: &str) -> Result<(), ReaderError> {
        let conn = &mut self.conn;
        self.runtime
            .block_on(conn.query_drop(statement))
            .map_err(|e| ReaderError::Query(e.to_string()))
    }

    fn table_names(&mut self, database: &str) -> Result<Vec<String>, ReaderError> {
        let conn = &mut self.conn;
        let rows: Vec<Row> = self
            .runtime
            .block_on(conn.exec(TABLES_QUERY, (database.to_string(),)))
            .map_err(|e| ReaderError::Query(e.to_string()))?;

        rows.iter().map(|row| required_text(row, 0)).collect()
    }

    fn foreign_keys(&mut self, database: &str) -> Result<Vec<ForeignKeyEdge>, ReaderError> {
        let conn = &mut self.conn;
        let rows: Vec<Row> = self
            .runtime
            .block_on(conn.exec(FOREIGN_KEYS_QUERY, (database.to_string(),)))
            .map_err(|e| ReaderError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok::<_, ReaderError>(ForeignKeyEdge::new(
                    required_text(row, 0)?,
                    required_text(row, 1)?,
                    required_text(row, 2)?,
                    required_text(row, 3)?,
                )
                .with_constraint(text(row, 4)?.unwrap_or_default()))
            })
            .collect()
    }
}

impl SchemaSource for MySqlSource {
    #[tracing::instrument(skip(self))]
    fn list_databases(&mut self) -> Result<Vec<String>, ReaderError> {
        let conn = &mut self.conn;
        let rows: Vec<Row> = self
            .runtime
            .block_on(conn.query("SHOW DATABASES"))
            .map_err(|e| ReaderError::Query(e.to_string()))?;

        let mut databases = Vec::new();
        for row in &rows {
            let name = required_text(row, 0)?;
            if !is_system_database(&name) {
                databases.push(name);
            }
        }
        Ok(databases)
    }

    #[tracing::instrument(skip(self))]
    fn read_schema(&mut self, database: &str) -> Result<(Schema, Vec<ForeignKeyEdge>), ReaderError> {
        let mut schema = Schema::new();

        for table in self.table_names(database)? {
            let conn = &mut self.conn;
            let rows: Vec<Row> = self
                .runtime
                .block_on(conn.exec(COLUMNS_QUERY, (database.to_string(), table.clone())))
                .map_err(|e| ReaderError::Query(e.to_string()))?;

            let mut columns = Vec::with_capacity(rows.len());
            for row in &rows {
                columns.push(column_from_row(
                    required_text(row, 0)?,
                    text(row, 1)?.unwrap_or_default(),
                    number(row, 2)?,
                    &text(row, 3)?.unwrap_or_default(),
                    &text(row, 4)?.unwrap_or_default(),
                    text(row, 5)?.unwrap_or_default(),
                ));
            }
            tracing::debug!(table = %table, columns = columns.len(), "read table");
            schema.insert(table, columns);
        }

        let edges = self.foreign_keys(database)?;
        tracing::info!(database, tables = schema.len(), foreign_keys = edges.len(), "schema read");
        Ok((schema, edges))
    }
}

fn text(row: &Row, idx: usize) -> Result<Option<String>, ReaderError> {
    match row.get_opt::<Option<String>, usize>(idx) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ReaderError::Query(format!("column {}: {}", idx, e))),
        None => Ok(None),
    }
}

fn required_text(row: &Row, idx: usize) -> Result<String, ReaderError> {
    text(row, idx)?.ok_or_else(|| ReaderError::Query(format!("column {} is NULL", idx)))
}

fn number(row: &Row, idx: usize) -> Result<Option<u64>, ReaderError> {
    match row.get_opt::<Option<u64>, usize>(idx) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ReaderError::Query(format!("column {}: {}", idx, e))),
        None => Ok(None),
    }
}
