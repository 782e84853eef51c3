//! Goose migration synthesis.
//!
//! The forward script creates the optional schema, every table in source
//! order, then the lookup indexes. The backward script drops the indexes,
//! the tables in reverse order, then the schema. Meta columns a table does
//! not declare are synthesized with fixed definitions: identity first,
//! audit and soft-delete columns last.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::meta::MetaColumn;
use crate::registry::names;
use crate::template::{Bindings, TemplateEngine};
use crate::typemap;
use crate::types::{Column, ScaffoldResult, Schema, Table};

/// Exact column names that get an index besides `_id` columns.
const INDEXED_NAMES: &[&str] = &["timestamp", "key_time", "start_ts", "end_ts"];

/// The fragments of one migration, in script order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationScripts {
    pub schema_creation: String,
    pub table_creations: String,
    pub index_creations: String,
    pub index_drops: String,
    pub table_drops: String,
    pub schema_drops: String,
}

impl MigrationScripts {
    /// The forward script.
    pub fn up(&self) -> String {
        format!(
            "{}{}{}",
            self.schema_creation, self.table_creations, self.index_creations
        )
    }

    /// The backward script.
    pub fn down(&self) -> String {
        format!(
            "{}{}{}",
            self.index_drops, self.table_drops, self.schema_drops
        )
    }

    pub fn bindings(&self) -> Bindings {
        Bindings::new()
            .with("schema_creation", self.schema_creation.as_str())
            .with("table_creations", self.table_creations.as_str())
            .with("index_creations", self.index_creations.as_str())
            .with("index_drops", self.index_drops.as_str())
            .with("table_drops", self.table_drops.as_str())
            .with("schema_drops", self.schema_drops.as_str())
    }
}

/// Build forward and backward DDL for `schema`.
pub fn synthesize(schema: &Schema, db_schema: Option<&str>) -> MigrationScripts {
    let mut scripts = MigrationScripts::default();

    if let Some(name) = db_schema {
        scripts.schema_creation = format!("CREATE SCHEMA IF NOT EXISTS \"{name}\";\n\n");
        scripts.schema_drops = format!("DROP SCHEMA IF EXISTS \"{name}\" CASCADE;\n");
    }

    for table in &schema.tables {
        scripts.table_creations.push_str(&create_table(table, db_schema));
        scripts.table_creations.push('\n');

        for column in indexed_columns(table) {
            let index = index_name(table, column);
            scripts.index_creations.push_str(&format!(
                "CREATE INDEX IF NOT EXISTS {index} ON {}({});\n",
                qualified(&table.name, db_schema),
                column.sql_name()
            ));
            scripts.index_drops.push_str(&format!(
                "DROP INDEX IF EXISTS {};\n",
                qualified(&index, db_schema)
            ));
        }
    }

    for table in schema.tables.iter().rev() {
        scripts.table_drops.push_str(&format!(
            "DROP TABLE IF EXISTS {};\n",
            qualified(&table.name, db_schema)
        ));
    }

    if !scripts.index_creations.is_empty() {
        scripts.index_creations.push('\n');
    }

    scripts
}

/// Render the goose migration file body.
pub fn render_migration(
    engine: &TemplateEngine<'_>,
    scripts: &MigrationScripts,
) -> ScaffoldResult<String> {
    engine.render(names::GOOSE_MIGRATION, &scripts.bindings())
}

/// `migrations/<YYYYmmddHHMMSS>_create_<module>_tables.sql`
pub fn migration_path(module_name: &str, generated_at: NaiveDateTime) -> PathBuf {
    PathBuf::from("migrations").join(format!(
        "{}_create_{module_name}_tables.sql",
        generated_at.format("%Y%m%d%H%M%S")
    ))
}

/// One `CREATE TABLE` statement, terminated by `);` and a newline.
pub fn create_table(table: &Table, db_schema: Option<&str>) -> String {
    let mut definitions: Vec<String> = Vec::with_capacity(table.columns.len() + 5);

    if !MetaColumn::Id.declared_in(table) {
        definitions.push(MetaColumn::Id.migration_definition().to_string());
    }
    definitions.extend(table.columns.iter().map(column_definition));
    definitions.extend(
        MetaColumn::TRAILING
            .iter()
            .filter(|meta| !meta.declared_in(table))
            .map(|meta| meta.migration_definition().to_string()),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);\n",
        qualified(&table.name, db_schema),
        definitions.join(",\n    ")
    )
}

/// Definition of one declared column. Keeps the source type; falls back to
/// the reverse mapping only when no source type survived.
pub fn column_definition(column: &Column) -> String {
    let sql_type = if column.source_type.trim().is_empty() {
        typemap::map_reverse(column.mapping.target, &column.name)
    } else {
        column.source_type.as_str()
    };

    let mut def = format!("{} {sql_type}", column.sql_name());
    if column.is_primary_key {
        def.push_str(" PRIMARY KEY");
    } else {
        if !column.is_nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default_value {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
    }
    def
}

/// Columns that get a lookup index: non-key `_id` columns and time-ordered names.
pub fn indexed_columns(table: &Table) -> impl Iterator<Item = &Column> {
    table.columns.iter().filter(|column| {
        let lower = column.name.to_lowercase();
        !column.is_primary_key && (lower.contains("_id") || INDEXED_NAMES.contains(&lower.as_str()))
    })
}

/// Always a plain identifier, even for a quoted column.
fn index_name(table: &Table, column: &Column) -> String {
    let column: String = column
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("idx_{}_{column}", table.name)
}

fn qualified(name: &str, db_schema: Option<&str>) -> String {
    match db_schema {
        Some(schema) => format!("{schema}.{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use chrono::NaiveDate;

    fn schema(sql: &str) -> Schema {
        parser::parse(sql).unwrap().schema
    }

    const USERS: &str = "CREATE TABLE users (\n\
        id BIGSERIAL PRIMARY KEY,\n\
        name TEXT NOT NULL,\n\
        email TEXT UNIQUE NOT NULL\n\
        );";

    #[test]
    fn test_declared_identity_is_not_duplicated() {
        let scripts = synthesize(&schema(USERS), None);
        let up = scripts.up();
        assert_eq!(up.matches("id BIGSERIAL").count(), 1);
        assert!(up.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(up.contains("email TEXT NOT NULL"));
    }

    #[test]
    fn test_meta_column_order() {
        let up = synthesize(&schema(USERS), None).up();
        let positions: Vec<usize> = [
            "id BIGSERIAL",
            "name TEXT",
            "email TEXT",
            "created_at",
            "updated_at",
            "deleted_at",
            "is_deleted",
        ]
        .iter()
        .map(|needle| up.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{up}");
        assert!(up.contains("is_deleted BOOLEAN DEFAULT FALSE\n);"));
    }

    #[test]
    fn test_synthesized_identity_comes_first() {
        let up = synthesize(&schema("CREATE TABLE tags (\n label TEXT\n);"), None).up();
        assert!(up.contains(
            "CREATE TABLE IF NOT EXISTS tags (\n    id BIGSERIAL PRIMARY KEY,\n    label TEXT,"
        ));
    }

    #[test]
    fn test_declared_meta_columns_are_not_synthesized() {
        let sql = "CREATE TABLE notes (\n body TEXT,\n Created_At TIMESTAMP DEFAULT NOW(),\n \
                   IS_DELETED BOOLEAN\n);";
        let up = synthesize(&schema(sql), None).up();
        assert_eq!(up.to_lowercase().matches("created_at").count(), 1);
        assert_eq!(up.to_lowercase().matches("is_deleted").count(), 1);
        assert!(up.contains("deleted_at TIMESTAMPTZ"));
    }

    #[test]
    fn test_table_order_and_indexes() {
        let sql = "CREATE TABLE accounts (\n id BIGSERIAL PRIMARY KEY\n);\n\
                   CREATE TABLE sessions (\n account_id BIGINT NOT NULL,\n start_ts BIGINT\n);";
        let scripts = synthesize(&schema(sql), None);
        let up = scripts.up();
        let down = scripts.down();

        assert!(
            up.find("CREATE TABLE IF NOT EXISTS accounts").unwrap()
                < up.find("CREATE TABLE IF NOT EXISTS sessions").unwrap()
        );
        assert!(
            down.find("DROP TABLE IF EXISTS sessions").unwrap()
                < down.find("DROP TABLE IF EXISTS accounts").unwrap()
        );
        assert!(up.contains(
            "CREATE INDEX IF NOT EXISTS idx_sessions_account_id ON sessions(account_id);"
        ));
        assert!(up.contains("idx_sessions_start_ts"));
        assert!(down.starts_with("DROP INDEX IF EXISTS idx_sessions_account_id;"));
    }

    #[test]
    fn test_primary_key_id_column_not_indexed() {
        let sql = "CREATE TABLE devices (\n device_id TEXT PRIMARY KEY,\n owner_id BIGINT\n);";
        let table = &schema(sql).tables[0];
        let indexed: Vec<&str> = indexed_columns(table).map(|c| c.name.as_str()).collect();
        assert_eq!(indexed, vec!["owner_id"]);
    }

    #[test]
    fn test_db_schema_qualification() {
        let sql = "CREATE TABLE sessions (\n account_id BIGINT\n);";
        let scripts = synthesize(&schema(sql), Some("app"));
        let up = scripts.up();
        let down = scripts.down();

        assert!(up.starts_with("CREATE SCHEMA IF NOT EXISTS \"app\";"));
        assert!(up.contains("CREATE TABLE IF NOT EXISTS app.sessions"));
        assert!(up.contains(
            "CREATE INDEX IF NOT EXISTS idx_sessions_account_id ON app.sessions(account_id);"
        ));
        assert!(down.contains("DROP INDEX IF EXISTS app.idx_sessions_account_id;"));
        assert!(down.ends_with("DROP SCHEMA IF EXISTS \"app\" CASCADE;\n"));
    }

    #[test]
    fn test_primary_key_drops_not_null_and_default() {
        let col = parser::parse_column("code TEXT PRIMARY KEY NOT NULL DEFAULT 'x'").unwrap();
        assert_eq!(column_definition(&col), "code TEXT PRIMARY KEY");
    }

    #[test]
    fn test_blank_source_type_uses_reverse_mapping() {
        let mut col = parser::parse_column("step_count TEXT").unwrap();
        col.source_type = String::new();
        assert_eq!(column_definition(&col), "step_count INTEGER");
    }

    #[test]
    fn test_spaced_numeric_type_kept_whole() {
        let sql = "CREATE TABLE products (\n price NUMERIC(10, 2) NOT NULL,\n \
                   weight DECIMAL(8, 3)\n);";
        let up = synthesize(&schema(sql), None).up();
        assert!(up.contains("    price NUMERIC(10, 2) NOT NULL,\n"), "{up}");
        assert!(up.contains("    weight DECIMAL(8, 3),\n"), "{up}");
    }

    #[test]
    fn test_quoted_names_stay_quoted() {
        let sql = "CREATE TABLE orders (\n \"order\" INTEGER NOT NULL,\n \"user\" TEXT,\n \
                   \"timestamp\" BIGINT\n);";
        let scripts = synthesize(&schema(sql), None);
        let up = scripts.up();
        assert!(up.contains("    \"order\" INTEGER NOT NULL,\n"), "{up}");
        assert!(up.contains("    \"user\" TEXT,\n"), "{up}");
        assert!(!up.contains(" order INTEGER"));
        assert!(up.contains(
            "CREATE INDEX IF NOT EXISTS idx_orders_timestamp ON orders(\"timestamp\");"
        ));
        assert!(scripts
            .down()
            .starts_with("DROP INDEX IF EXISTS idx_orders_timestamp;"));
    }

    #[test]
    fn test_migration_path() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            migration_path("shop", at),
            PathBuf::from("migrations/20240102030405_create_shop_tables.sql")
        );
    }
}
