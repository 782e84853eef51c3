//! Top-level code generation orchestrator.
//!
//! Fans one parsed schema out to every artifact of the Go project. Each
//! sub-generator renders through the template engine and returns an
//! in-memory [`GeneratedFile`]; nothing touches the disk here, so a missing
//! template aborts the run before any file exists.

use std::collections::HashMap;

use crate::codegen_base;
use crate::codegen_layers;
use crate::codegen_model;
use crate::codegen_rest;
use crate::config::ScaffoldConfig;
use crate::migration;
use crate::naming::EntityNames;
use crate::template::{Bindings, TemplateEngine};
use crate::types::{GeneratedFile, GeneratedFiles, ScaffoldError, ScaffoldResult, Schema, Table};

/// One table together with the names every layer derives from it.
pub struct Entity<'a> {
    pub table: &'a Table,
    pub names: EntityNames,
}

impl<'a> Entity<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            names: EntityNames::for_table(&table.name),
        }
    }
}

/// Shared state of one generation run.
pub struct Scaffold<'a> {
    pub config: &'a ScaffoldConfig,
    pub engine: &'a TemplateEngine<'a>,
    pub schema: &'a Schema,
    pub entities: Vec<Entity<'a>>,
}

impl<'a> Scaffold<'a> {
    /// Derive entity names for every table and reject tables that collide.
    pub fn new(
        schema: &'a Schema,
        config: &'a ScaffoldConfig,
        engine: &'a TemplateEngine<'a>,
    ) -> ScaffoldResult<Self> {
        let entities: Vec<Entity<'a>> = schema.tables.iter().map(Entity::new).collect();

        // File paths and Go identifiers derive from the lowercased entity name.
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for entity in &entities {
            if let Some(first) = seen.insert(&entity.names.entity_var, &entity.table.name) {
                return Err(ScaffoldError::EntityCollision {
                    first: first.to_string(),
                    second: entity.table.name.clone(),
                    entity: entity.names.entity_var.clone(),
                });
            }
        }

        Ok(Self {
            config,
            engine,
            schema,
            entities,
        })
    }

    pub fn module_name(&self) -> &str {
        &self.config.module_name
    }

    /// Bindings every per-table template can rely on.
    pub fn entity_bindings(&self, entity: &Entity<'_>) -> Bindings {
        let names = &entity.names;
        Bindings::new()
            .with("module_name", self.module_name())
            .with("table_name", names.table.as_str())
            .with("struct_name", names.struct_name.as_str())
            .with("entity_name", names.entity_var.as_str())
            .with("entity_var", names.entity_var.as_str())
            .with("entity_param", names.param.as_str())
            .with("entity_plural", names.entity_plural.as_str())
            .with("plural_name", names.plural_name.as_str())
    }

    /// Bindings for templates that only need the module name.
    pub fn module_bindings(&self) -> Bindings {
        Bindings::new().with("module_name", self.module_name())
    }

    pub fn render(&self, name: &str, bindings: &Bindings) -> ScaffoldResult<String> {
        self.engine.render(name, bindings)
    }
}

/// Render every artifact of the project, in memory.
pub fn generate_all(
    schema: &Schema,
    config: &ScaffoldConfig,
    engine: &TemplateEngine<'_>,
) -> ScaffoldResult<GeneratedFiles> {
    let scaffold = Scaffold::new(schema, config, engine)?;
    let mut files = GeneratedFiles::default();

    // Base project files
    for file in codegen_base::generate_base(&scaffold)? {
        push(&mut files, file);
    }
    push(&mut files, codegen_base::generate_main(&scaffold)?);

    // Per-table layers
    for entity in &scaffold.entities {
        push(&mut files, codegen_model::generate_domain_model(&scaffold, entity)?);
        push(&mut files, codegen_layers::generate_application_service(&scaffold, entity)?);
        push(&mut files, codegen_model::generate_dto(&scaffold, entity)?);
        push(&mut files, codegen_layers::generate_interactor_adapter(&scaffold, entity)?);
        push(&mut files, codegen_layers::generate_postgres_repository(&scaffold, entity)?);
        push(&mut files, codegen_rest::generate_rest_handler(&scaffold, entity)?);
    }

    // Cross-table aggregates
    push(&mut files, codegen_layers::generate_application_interfaces(&scaffold)?);
    push(&mut files, codegen_layers::generate_interactor_interfaces(&scaffold)?);
    push(&mut files, codegen_rest::generate_rest_main(&scaffold)?);
    push(&mut files, codegen_rest::generate_rest_parameters(&scaffold)?);

    // Migration
    let scripts = migration::synthesize(schema, config.db_schema.as_deref());
    push(
        &mut files,
        GeneratedFile::new(
            migration::migration_path(&config.module_name, config.generated_at),
            migration::render_migration(engine, &scripts)?,
        ),
    );

    tracing::info!(
        "rendered {} files ({} bytes) for {} table(s)",
        files.len(),
        files.total_bytes(),
        schema.len()
    );
    Ok(files)
}

fn push(files: &mut GeneratedFiles, file: GeneratedFile) {
    tracing::debug!("rendered {} ({} bytes)", file.path.display(), file.size());
    files.push(file);
}
