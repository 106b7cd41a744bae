//! Schema records read from the database.

use serde::{Deserialize, Serialize};

/// Key classification of a column as reported by `COLUMN_KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    #[default]
    None,
    Primary,
    Unique,
}

impl KeyKind {
    /// Map a MySQL `COLUMN_KEY` value. `MUL` and anything unknown count as no key.
    pub fn from_column_key(s: &str) -> Self {
        match s {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub key: KeyKind,
    #[serde(default)]
    pub extra: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            nullable: true,
            key: KeyKind::None,
            extra: String::new(),
        }
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_key(mut self, key: KeyKind) -> Self {
        self.key = key;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// A foreign-key reference from `source_table.source_column` to
/// `target_table.target_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    #[serde(default)]
    pub constraint_name: String,
}

impl ForeignKeyEdge {
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            constraint_name: String::new(),
        }
    }

    pub fn with_constraint(mut self, name: impl Into<String>) -> Self {
        self.constraint_name = name.into();
        self
    }

    pub fn source(&self) -> ColumnRef {
        ColumnRef::new(&self.source_table, &self.source_column)
    }

    pub fn target(&self) -> ColumnRef {
        ColumnRef::new(&self.target_table, &self.target_column)
    }
}

/// Identity of a single column across the whole schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

/// Tables in the order the database returned them. Names are unique and
/// case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table at the end, or replace the columns of an existing table of
    /// the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, columns: Vec<ColumnDescriptor>) {
        let name = name.into();
        match self.tables.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.columns = columns,
            None => self.tables.push(Table { name, columns }),
        }
    }

    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        self.insert(name, columns);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[ColumnDescriptor]> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.columns.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for Schema {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for table in iter {
            schema.insert(table.name, table.columns);
        }
        schema
    }
}
