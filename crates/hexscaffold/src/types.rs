//! Core data types for the schema model and the generated output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::typemap::ColumnMapping;

/// A parsed schema: the ordered set of tables of one compilation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

/// One `CREATE TABLE` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

/// A single column as declared in the source schema, plus its resolved mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Bare column name, with any identifier quotes removed.
    pub name: String,
    /// The name was written as a quoted identifier and is re-quoted in DDL.
    #[serde(default)]
    pub quoted: bool,
    /// Source type exactly as written, e.g. `VARCHAR(255)` or `DOUBLE PRECISION`.
    pub source_type: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub default_value: Option<String>,
    pub mapping: ColumnMapping,
}

impl Schema {
    /// Get a table by name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Return the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total column count across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

impl Column {
    /// The name as it must appear in SQL.
    pub fn sql_name(&self) -> String {
        if self.quoted {
            format!("\"{}\"", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl Table {
    /// Get a column by name, compared case-insensitively.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// A single generated artifact, addressed relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    /// Scripts are written with the executable bit on unix.
    pub executable: bool,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            executable: false,
        }
    }

    pub fn executable(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            executable: true,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The complete in-memory output of one run, in generation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneratedFiles {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedFiles {
    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(GeneratedFile::size).sum()
    }
}

/// Errors that can abort a compilation run.
#[derive(thiserror::Error, Debug)]
pub enum ScaffoldError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table '{0}' is declared more than once")]
    DuplicateTable(String),

    #[error("table '{table}' opened on line {line} is never closed with ');'")]
    UnterminatedTable { table: String, line: usize },

    #[error("tables '{first}' and '{second}' both map to entity '{entity}'")]
    EntityCollision {
        first: String,
        second: String,
        entity: String,
    },

    #[error("no tables found in schema '{0}'; expected at least one CREATE TABLE statement")]
    NoTables(String),

    #[error("template '{name}' not found at {}", path.display())]
    TemplateNotFound { name: String, path: PathBuf },

    #[error("failed to load template '{name}': {source}")]
    TemplateIo {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience result type.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
