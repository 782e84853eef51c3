//! REST layer generators: the router, one handler per table and the shared
//! query-parameter descriptors.

use std::path::PathBuf;

use crate::codegen::{Entity, Scaffold};
use crate::codegen_model::entity_columns;
use crate::registry::names;
use crate::typemap::TargetType;
use crate::types::{GeneratedFile, ScaffoldResult};

/// Handler fragments, in the order they appear in a handler file.
const HANDLER_SECTIONS: &[&str] = &[
    names::REST_GET_ALL,
    names::REST_CREATE,
    names::REST_GET_BY_ID,
    names::REST_UPDATE,
    names::REST_DELETE,
];

/// `internal/interactor/rest/rest.go`
pub fn generate_rest_main(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let mut service_fields = String::new();
    let mut service_params = String::new();
    let mut service_init = String::new();
    let mut routes = String::new();

    for entity in &scaffold.entities {
        let n = &entity.names;
        let field = format!("{}Service", n.entity_var);
        let interface = format!("interactor.I{}Service", n.struct_name);

        service_fields.push_str(&format!("\t{field} {interface}\n"));
        service_params.push_str(&format!(", {field} {interface}"));
        service_init.push_str(&format!("\t\t{field}: {field},\n"));

        let handler = format!("{}Handler", n.entity_var);
        let plural = &n.entity_plural;
        routes.push_str(&format!("\n\t// {} routes\n", n.struct_name));
        routes.push_str(&format!(
            "\t{handler} := New{}Handler(r.ctx, r.{field})\n",
            n.struct_name
        ));
        routes.push_str(&format!(
            "\trouter.GET(\"/{plural}\", {handler}.GetAll{})\n",
            n.plural_name
        ));
        routes.push_str(&format!(
            "\trouter.POST(\"/{plural}\", {handler}.Create{})\n",
            n.struct_name
        ));
        routes.push_str(&format!(
            "\trouter.GET(\"/{plural}/:id\", {handler}.Get{}ByID)\n",
            n.struct_name
        ));
        routes.push_str(&format!(
            "\trouter.PUT(\"/{plural}/:id\", {handler}.Update{})\n",
            n.struct_name
        ));
        routes.push_str(&format!(
            "\trouter.DELETE(\"/{plural}/:id\", {handler}.Delete{})\n",
            n.struct_name
        ));
    }

    let bindings = scaffold
        .module_bindings()
        .with("service_fields", service_fields)
        .with("service_params", service_params)
        .with("service_init", service_init)
        .with("route_registrations", routes);

    Ok(GeneratedFile::new(
        "internal/interactor/rest/rest.go",
        scaffold.render(names::REST_API_MAIN, &bindings)?,
    ))
}

/// `internal/interactor/rest/<table>_handler.go`: header plus one section per route.
pub fn generate_rest_handler(
    scaffold: &Scaffold<'_>,
    entity: &Entity<'_>,
) -> ScaffoldResult<GeneratedFile> {
    let bindings = scaffold.entity_bindings(entity);

    let mut handler = scaffold.render(names::REST_HANDLER_HEADER, &bindings)?;
    for section in HANDLER_SECTIONS {
        handler.push('\n');
        handler.push_str(&scaffold.render(section, &bindings)?);
    }

    Ok(GeneratedFile::new(
        PathBuf::from("internal/interactor/rest")
            .join(format!("{}_handler.go", entity.names.file_stem)),
        handler,
    ))
}

/// `internal/interactor/rest/rest_parameter.go`: every table's filter and
/// sort descriptors inside one shared `var` block.
pub fn generate_rest_parameters(scaffold: &Scaffold<'_>) -> ScaffoldResult<GeneratedFile> {
    let mut blocks = Vec::with_capacity(scaffold.entities.len());
    for entity in &scaffold.entities {
        let (filter_fields, sorting_fields) = parameter_fields(entity);
        let bindings = scaffold
            .entity_bindings(entity)
            .with("filter_fields", filter_fields)
            .with("sorting_fields", sorting_fields);
        blocks.push(scaffold.render(names::REST_PARAMETER, &bindings)?);
    }

    let bindings = scaffold
        .module_bindings()
        .with("parameters", blocks.join("\n"));

    Ok(GeneratedFile::new(
        "internal/interactor/rest/rest_parameter.go",
        scaffold.render(names::REST_PARAMETER_HEADER, &bindings)?,
    ))
}

/// Filter and sort descriptor lines: `id` first, then every entity column.
fn parameter_fields(entity: &Entity<'_>) -> (String, String) {
    let mut filters = String::new();
    let mut sorts = String::new();

    let columns = std::iter::once(("id", TargetType::Int64)).chain(
        entity_columns(entity.table).map(|c| (c.name.as_str(), c.mapping.target)),
    );
    for (name, target) in columns {
        let kind = target.reflect_kind();
        filters.push_str(&format!(
            "\n\t\t{{Omitempty: true, DBKey: \"{name}\", Kind: {kind}, QueryKey: \"{name}\"}},"
        ));
        sorts.push_str(&format!(
            "\n\t\t{{DBKey: \"{name}\", QueryKey: \"{name}\", Kind: {kind}}},"
        ));
    }

    (filters, sorts)
}
