//! Domain model and DTO generators.
//!
//! Both layers list only the columns the shared `MetaField` base entity does
//! not already carry; [`entity_columns`] is the one filter they share.

use std::path::PathBuf;

use crate::codegen::{Entity, Scaffold};
use crate::meta;
use crate::naming::to_target_case;
use crate::registry::names;
use crate::types::{Column, GeneratedFile, ScaffoldResult, Table};

/// Declared columns that are not part of the meta contract, in source order.
pub fn entity_columns(table: &Table) -> impl Iterator<Item = &Column> {
    table.columns.iter().filter(|c| !meta::is_meta_column(&c.name))
}

/// Whether any entity column maps to `time.Time`.
pub fn needs_time_import(table: &Table) -> bool {
    entity_columns(table).any(|c| c.mapping.target.needs_time_import())
}

/// `internal/domain/model/<table>.go`
pub fn generate_domain_model(
    scaffold: &Scaffold<'_>,
    entity: &Entity<'_>,
) -> ScaffoldResult<GeneratedFile> {
    let mut fields = String::new();
    for column in entity_columns(entity.table) {
        fields.push_str(&format!(
            "\t{} {} `{} {}`\n",
            to_target_case(&column.name),
            column.mapping.target.go_type(),
            column.mapping.persistence_tag,
            column.mapping.serialization_tag
        ));
    }

    let import_statement = if needs_time_import(entity.table) {
        "import \"time\"\n\n"
    } else {
        ""
    };

    let qualified_table = match &scaffold.config.db_schema {
        Some(schema) => format!("{schema}.{}", entity.table.name),
        None => entity.table.name.clone(),
    };

    let bindings = scaffold
        .entity_bindings(entity)
        .with("fields", fields)
        .with("import_statement", import_statement)
        .with("qualified_table", qualified_table);

    Ok(GeneratedFile::new(
        PathBuf::from("internal/domain/model").join(format!("{}.go", entity.names.file_stem)),
        scaffold.render(names::DOMAIN_MODEL, &bindings)?,
    ))
}

/// `internal/application/dto/<entity>.go`, with Marshal/Unmarshal field lists.
pub fn generate_dto(scaffold: &Scaffold<'_>, entity: &Entity<'_>) -> ScaffoldResult<GeneratedFile> {
    let mut fields = String::from("\tID int64 `json:\"id,omitempty\"`\n");
    let mut marshal_fields = String::new();
    let mut unmarshal_fields = String::new();

    for column in entity_columns(entity.table) {
        let field = to_target_case(&column.name);
        fields.push_str(&format!(
            "\t{field} {} `json:\"{},omitempty\"`\n",
            column.mapping.target.go_type(),
            column.name.to_lowercase()
        ));
        marshal_fields.push_str(&format!("\n\t\t{field}: d.{field},"));
        unmarshal_fields.push_str(&format!("\n\td.{field} = domainModel.{field}"));
    }

    let import_statement = if needs_time_import(entity.table) {
        "\t\"time\"\n\n"
    } else {
        ""
    };

    let bindings = scaffold
        .entity_bindings(entity)
        .with("fields", fields)
        .with("marshal_fields", marshal_fields)
        .with("unmarshal_fields", unmarshal_fields)
        .with("import_statement", import_statement);

    Ok(GeneratedFile::new(
        PathBuf::from("internal/application/dto").join(format!("{}.go", entity.names.entity_var)),
        scaffold.render(names::DTO, &bindings)?,
    ))
}

/// `internal/domain/model/meta.go`
pub fn generate_meta_field(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    Ok(GeneratedFile::new(
        "internal/domain/model/meta.go",
        scaffold.render(names::META_FIELD, &scaffold.module_bindings())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScaffoldConfig;
    use crate::parser;
    use crate::registry::TemplateRegistry;
    use crate::template::{BuiltinTemplates, TemplateEngine};
    use crate::types::Schema;

    fn render<F>(sql: &str, db_schema: Option<&str>, generate: F) -> String
    where
        F: Fn(&Scaffold<'_>, &Entity<'_>) -> ScaffoldResult<GeneratedFile>,
    {
        let schema: Schema = parser::parse(sql).unwrap().schema;
        let config = ScaffoldConfig::new("shop").with_db_schema(db_schema.map(String::from));
        let registry = TemplateRegistry::standard();
        let engine = TemplateEngine::new(&registry, &BuiltinTemplates);
        let scaffold = Scaffold::new(&schema, &config, &engine).unwrap();
        generate(&scaffold, &scaffold.entities[0]).unwrap().content
    }

    const EVENTS: &str = "CREATE TABLE events (\n\
        id BIGSERIAL PRIMARY KEY,\n\
        user_id BIGINT NOT NULL,\n\
        happened_at TIMESTAMPTZ,\n\
        Updated_At TIMESTAMPTZ,\n\
        payload JSONB\n\
        );";

    #[test]
    fn test_domain_model_fields() {
        let out = render(EVENTS, None, generate_domain_model);
        assert!(out.contains("type Event struct {\n\tMetaField\n"));
        assert!(out.contains(
            "\tUserID int64 `gorm:\"column:user_id;not null\" json:\"user_id,omitempty\"`\n"
        ));
        assert!(out.contains("\tHappenedAt time.Time"));
        assert!(out.contains(
            "\tPayload []string `gorm:\"column:payload;type:jsonb;serializer:json\""
        ));
        assert!(out.contains("import \"time\""));
        assert!(!out.contains("\tID "));
        assert!(!out.contains("UpdatedAt"));
        assert!(out.contains("return \"events\""));
    }

    #[test]
    fn test_domain_model_schema_qualified_table() {
        let out = render(EVENTS, Some("app"), generate_domain_model);
        assert!(out.contains("return \"app.events\""));
    }

    #[test]
    fn test_time_import_only_for_entity_columns() {
        let sql = "CREATE TABLE notes (\n body TEXT,\n created_at TIMESTAMPTZ\n);";
        let model = render(sql, None, generate_domain_model);
        assert!(!model.contains("import \"time\""));
        let dto = render(sql, None, generate_dto);
        assert!(!dto.contains("\"time\""));
    }

    #[test]
    fn test_dto_fields_and_mappings() {
        let out = render(EVENTS, None, generate_dto);
        assert!(out.contains("\tID int64 `json:\"id,omitempty\"`\n\tUserID int64"));
        assert!(out.contains("\t\tUserID: d.UserID,"));
        assert!(out.contains("\td.HappenedAt = domainModel.HappenedAt"));
        assert!(out.contains("\t\"time\"\n\n\t\"shop/internal/domain/model\""));
        assert!(!out.contains("UpdatedAt"));
        assert!(out.contains("type Events []Event"));
    }

    #[test]
    fn test_entity_columns_skip_meta() {
        let schema = parser::parse(EVENTS).unwrap().schema;
        let names: Vec<&str> = entity_columns(&schema.tables[0])
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["user_id", "happened_at", "payload"]);
    }
}
