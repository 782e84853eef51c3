//! Identifier normalization shared by every generator.
//!
//! Every artifact derives its entity names from [`EntityNames::for_table`], so
//! the model, DTO, service, adapter, repository and REST layers always agree
//! on what a table is called.

/// Convert a snake_case identifier to Go-style CamelCase.
///
/// A whole `id` segment becomes the acronym `ID`: `user_id` → `UserID`.
pub fn to_target_case(identifier: &str) -> String {
    identifier
        .to_lowercase()
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment == "id" {
                return "ID".to_string();
            }
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert CamelCase back to snake_case.
///
/// Not an exact inverse of [`to_target_case`]: `UserID` becomes `user_i_d`.
pub fn to_source_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    for (i, ch) in identifier.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Strip one trailing `s` from a conventionally plural table name.
///
/// Names ending in `ss` are kept as-is, which keeps the function idempotent.
/// This is a heuristic: `status` still becomes `statu`.
pub fn singularize(name: &str) -> String {
    if name.ends_with('s') && !name.ends_with("ss") {
        name[..name.len() - 1].to_string()
    } else {
        name.to_string()
    }
}

/// Go keywords plus the package names and locals the generated code already
/// uses. An entity variable equal to one of these cannot be a parameter name.
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var", "a", "application", "c", "config", "context", "ctx", "db", "dto",
    "err", "gin", "gorm", "h", "http", "id", "interactor", "items", "model",
    "out", "params", "postgres", "r", "record", "rest", "s", "service", "time",
];

/// `name`, or `name` + `Item` when it collides with a reserved identifier.
pub fn safe_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}Item")
    } else {
        name.to_string()
    }
}

/// All names derived from one table, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNames {
    /// Original table name, e.g. `activity_sessions`.
    pub table: String,
    /// Go struct name, e.g. `ActivitySession`.
    pub struct_name: String,
    /// Lowercased struct name used for variables and file names, e.g. `activitysession`.
    pub entity_var: String,
    /// Plural struct name, e.g. `ActivitySessions`.
    pub plural_name: String,
    /// Plural lowercase form used in routes and collection names.
    pub entity_plural: String,
    /// Lowercased table name used in per-table file names.
    pub file_stem: String,
    /// `entity_var`, made safe to use as a bare Go identifier.
    pub param: String,
}

impl EntityNames {
    pub fn for_table(table: &str) -> Self {
        let struct_name = singularize(&to_target_case(table));
        let entity_var = struct_name.to_lowercase();
        Self {
            table: table.to_string(),
            plural_name: format!("{struct_name}s"),
            entity_plural: format!("{entity_var}s"),
            file_stem: table.to_lowercase(),
            param: safe_identifier(&entity_var),
            struct_name,
            entity_var,
        }
    }
}
