//! The identity/audit column contract shared by every generated layer.
//!
//! Generated domain models embed a `MetaField` base entity carrying these
//! columns. Any generator that decides whether a declared column belongs to
//! the base entity must call [`is_meta_column`].

use crate::types::Table;

/// One column of the base entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaColumn {
    Id,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    IsDeleted,
}

impl MetaColumn {
    /// All meta columns in migration order (identity first, soft-delete flag last).
    pub const ALL: [MetaColumn; 5] = [
        MetaColumn::Id,
        MetaColumn::CreatedAt,
        MetaColumn::UpdatedAt,
        MetaColumn::DeletedAt,
        MetaColumn::IsDeleted,
    ];

    /// The audit columns appended after the declared columns.
    pub const TRAILING: [MetaColumn; 4] = [
        MetaColumn::CreatedAt,
        MetaColumn::UpdatedAt,
        MetaColumn::DeletedAt,
        MetaColumn::IsDeleted,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DeletedAt => "deleted_at",
            Self::IsDeleted => "is_deleted",
        }
    }

    /// Case-insensitive lookup by column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.column_name().eq_ignore_ascii_case(name))
    }

    /// Column definition used when a table does not declare this column itself.
    pub fn migration_definition(&self) -> &'static str {
        match self {
            Self::Id => "id BIGSERIAL PRIMARY KEY",
            Self::CreatedAt => "created_at TIMESTAMPTZ DEFAULT NOW()",
            Self::UpdatedAt => "updated_at TIMESTAMPTZ DEFAULT NOW()",
            Self::DeletedAt => "deleted_at TIMESTAMPTZ",
            Self::IsDeleted => "is_deleted BOOLEAN DEFAULT FALSE",
        }
    }

    /// Whether `table` declares this column explicitly.
    pub fn declared_in(&self, table: &Table) -> bool {
        table
            .columns
            .iter()
            .any(|c| MetaColumn::from_name(&c.name) == Some(*self))
    }
}

/// The single suppression predicate: is this column supplied by the base entity?
pub fn is_meta_column(name: &str) -> bool {
    MetaColumn::from_name(name).is_some()
}
