//! Project-level files: module definition, entry point, configuration,
//! database connection, container and build scripts.

use std::path::PathBuf;

use crate::codegen::Scaffold;
use crate::codegen_layers::service_type;
use crate::codegen_model;
use crate::registry::names;
use crate::types::{GeneratedFile, ScaffoldResult};

/// Templates that only need the module name, and where they land.
const MODULE_FILES: &[(&str, &str)] = &[
    (names::GO_MOD, "go.mod"),
    (names::MAKEFILE, "Makefile"),
    (names::DOCKERFILE, "Dockerfile"),
    (names::DOCKER_COMPOSE, "docker-compose.yml"),
    (names::CONFIG, "internal/config/config.go"),
    (names::DB_CONNECTION, "internal/repository/implementor/postgres/connection.go"),
];

const SCRIPTS: &[(&str, &str)] = &[
    (names::BUILD_SCRIPT, "script/build.sh"),
    (names::BUILD_SCRIPT_CROSS_PLATFORM, "script/build-all.sh"),
];

/// Every file that does not depend on the tables, except `main.go`.
pub fn generate_base(scaffold: &Scaffold<'_>) -> ScaffoldResult<Vec<GeneratedFile>> {
    let bindings = scaffold.module_bindings();
    let mut files = Vec::with_capacity(MODULE_FILES.len() + SCRIPTS.len() + 2);

    for (template, path) in MODULE_FILES {
        files.push(GeneratedFile::new(*path, scaffold.render(template, &bindings)?));
    }
    files.push(generate_readme(scaffold)?);
    files.push(codegen_model::generate_meta_field(scaffold)?);
    for (template, path) in SCRIPTS {
        files.push(GeneratedFile::executable(
            *path,
            scaffold.render(template, &bindings)?,
        ));
    }

    Ok(files)
}

/// `README.md`, listing one resource per table.
pub fn generate_readme(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let mut resources = String::new();
    for entity in &scaffold.entities {
        resources.push_str(&format!(
            "- `/{}` ({}, table `{}`)\n",
            entity.names.entity_plural, entity.names.struct_name, entity.table.name
        ));
    }
    let bindings = scaffold.module_bindings().with("resources", resources);
    Ok(GeneratedFile::new(
        "README.md",
        scaffold.render(names::README, &bindings)?,
    ))
}

/// `cmd/<module>/main.go`, wiring repository → service → adapter → REST per table.
pub fn generate_main(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let mut repositories = String::from("\n\t// Repositories\n");
    let mut services = String::from("\n\t// Application services\n");
    let mut adapters = String::from("\n\t// Interactor adapters\n");
    let mut parameters = String::new();
    let mut endpoints = String::new();

    for entity in &scaffold.entities {
        let n = &entity.names;
        let var = &n.entity_var;
        repositories.push_str(&format!(
            "\t{var}Repo := postgres.New{}Repo(db)\n",
            n.struct_name
        ));
        services.push_str(&format!(
            "\t{var}AppService := application.New{}(ctx, {var}Repo)\n",
            service_type(entity)
        ));
        adapters.push_str(&format!(
            "\t{var}Adapter := interactor.New{}Adapter(ctx, {var}AppService)\n",
            n.struct_name
        ));
        parameters.push_str(&format!(", {var}Adapter"));
        endpoints.push_str(&format!(
            "\n\tlog.Info(\"  GET/POST /{plural} - {name} management\")\
             \n\tlog.Info(\"  GET/PUT/DELETE /{plural}/:id - {name} operations\")",
            plural = n.entity_plural,
            name = n.struct_name
        ));
    }

    let bindings = scaffold
        .module_bindings()
        .with("repository_initialization", repositories)
        .with("application_service_initialization", services)
        .with("adapter_initialization", adapters)
        .with("service_parameters", parameters)
        .with("endpoint_logging", endpoints);

    Ok(GeneratedFile::new(
        PathBuf::from("cmd")
            .join(scaffold.module_name())
            .join("main.go"),
        scaffold.render(names::MAIN_GO, &bindings)?,
    ))
}
