//! Application, interactor and repository layer generators.

use std::path::PathBuf;

use crate::codegen::{Entity, Scaffold};
use crate::registry::names;
use crate::types::{GeneratedFile, ScaffoldResult};

/// `internal/application/adapter.go`: one repository port per table.
pub fn generate_application_interfaces(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let interfaces = render_blocks(scaffold, names::APPLICATION_INTERFACE_CONTENT)?;
    let bindings = scaffold.module_bindings().with("interfaces", interfaces);
    Ok(GeneratedFile::new(
        "internal/application/adapter.go",
        scaffold.render(names::APPLICATION_INTERFACES, &bindings)?,
    ))
}

/// `internal/interactor/adapter.go`: one service port per table.
pub fn generate_interactor_interfaces(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let interfaces = render_blocks(scaffold, names::INTERACTOR_INTERFACE_CONTENT)?;
    let bindings = scaffold.module_bindings().with("interfaces", interfaces);
    Ok(GeneratedFile::new(
        "internal/interactor/adapter.go",
        scaffold.render(names::INTERACTOR_INTERFACES, &bindings)?,
    ))
}

/// Render `template` once per table and join the blocks with blank lines.
fn render_blocks(scaffold: &Scaffold<'_>, template: &str) -> ScaffoldResult<String> {
    let mut blocks = Vec::with_capacity(scaffold.entities.len());
    for entity in &scaffold.entities {
        blocks.push(scaffold.render(template, &scaffold.entity_bindings(entity))?);
    }
    Ok(blocks.join("\n").trim_end().to_string())
}

/// `internal/application/<entity>_service.go`
pub fn generate_application_service(
    scaffold: &Scaffold<'_>,
    entity: &Entity<'_>,
) -> ScaffoldResult<GeneratedFile> {
    let bindings = scaffold
        .entity_bindings(entity)
        .with("service_name", service_type(entity));
    Ok(GeneratedFile::new(
        PathBuf::from("internal/application")
            .join(format!("{}_service.go", entity.names.entity_var)),
        scaffold.render(names::APPLICATION_SERVICE, &bindings)?,
    ))
}

/// `internal/interactor/<entity>_adapter.go`
pub fn generate_interactor_adapter(
    scaffold: &Scaffold<'_>,
    entity: &Entity<'_>,
) -> ScaffoldResult<GeneratedFile> {
    let bindings = scaffold
        .entity_bindings(entity)
        .with("adapter_name", format!("{}Adapter", entity.names.struct_name))
        .with("app_service_type", service_type(entity));
    Ok(GeneratedFile::new(
        PathBuf::from("internal/interactor")
            .join(format!("{}_adapter.go", entity.names.entity_var)),
        scaffold.render(names::INTERACTOR_ADAPTER, &bindings)?,
    ))
}

/// `internal/repository/implementor/postgres/<table>_repo.go`
pub fn generate_postgres_repository(
    scaffold: &Scaffold<'_>,
    entity: &Entity<'_>,
) -> ScaffoldResult<GeneratedFile> {
    let bindings = scaffold
        .entity_bindings(entity)
        .with("repo_name", format!("{}Repo", entity.names.struct_name));
    Ok(GeneratedFile::new(
        PathBuf::from("internal/repository/implementor/postgres")
            .join(format!("{}_repo.go", entity.names.file_stem)),
        scaffold.render(names::POSTGRES_REPOSITORY, &bindings)?,
    ))
}

/// Name of the application service struct, e.g. `UserDomain`.
pub fn service_type(entity: &Entity<'_>) -> String {
    format!("{}Domain", entity.names.struct_name)
}
