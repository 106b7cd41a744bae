//! Schema introspection.
//!
//! [`SchemaSource`] is what the session talks to; [`MySqlSource`] implements
//! it over a single `mysql_async` connection.

#[cfg(not(target_arch = "wasm32"))]
mod mysql;

#[cfg(not(target_arch = "wasm32"))]
pub use mysql::MySqlSource;

use crate::model::{ColumnDescriptor, ForeignKeyEdge, KeyKind, Schema};

/// Databases every MySQL server carries that are never diagrammed.
pub const SYSTEM_DATABASES: &[&str] = &["information_schema", "mysql", "performance_schema", "sys"];

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Error connecting to MySQL: {0}")]
    Connect(String),
    #[error("{0}")]
    Query(String),
    #[error("Failed to start runtime: {0}")]
    Runtime(String),
}

/// Connection form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: String::new(),
            password: String::new(),
        }
    }
}

/// A live connection that can be introspected.
pub trait SchemaSource {
    /// User databases on the server, system databases excluded.
    fn list_databases(&mut self) -> Result<Vec<String>, ReaderError>;

    /// All tables of `database` with their columns, plus every foreign key.
    ///
    /// Either the whole schema is returned or an error; never a partial one.
    fn read_schema(&mut self, database: &str) -> Result<(Schema, Vec<ForeignKeyEdge>), ReaderError>;
}

pub fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES.contains(&name)
}

/// Build a column from one `INFORMATION_SCHEMA.COLUMNS` row.
pub fn column_from_row(
    name: String,
    data_type: String,
    max_length: Option<u64>,
    is_nullable: &str,
    column_key: &str,
    extra: String,
) -> ColumnDescriptor {
    ColumnDescriptor {
        name,
        data_type,
        length: max_length,
        nullable: is_nullable == "YES",
        key: KeyKind::from_column_key(column_key),
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_databases() {
        assert!(is_system_database("information_schema"));
        assert!(is_system_database("sys"));
        assert!(!is_system_database("hotel_booking_test_db"));
    }

    #[test]
    fn test_column_from_row() {
        let col = column_from_row(
            "email".into(),
            "varchar".into(),
            Some(100),
            "NO",
            "UNI",
            String::new(),
        );
        assert_eq!(col.name, "email");
        assert_eq!(col.length, Some(100));
        assert!(!col.nullable);
        assert_eq!(col.key, KeyKind::Unique);
    }

    #[test]
    fn test_column_from_row_multiple_key() {
        let col = column_from_row("guest_id".into(), "int".into(), None, "YES", "MUL", String::new());
        assert!(col.nullable);
        assert_eq!(col.key, KeyKind::None);
    }

    #[test]
    fn test_connection_defaults() {
        let params = ConnectionParams::default();
        assert_eq!(params.host, "localhost");
        assert_eq!(params.port, 3306);
    }
}
