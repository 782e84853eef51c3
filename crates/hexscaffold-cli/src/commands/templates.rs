//! Command: templates. List the registry and where each body comes from.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use hexscaffold::{
    BuiltinTemplates, DirectoryTemplates, TemplateCategory, TemplateRegistry, TemplateSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Override,
    Builtin,
    Missing,
}

#[derive(Debug, Serialize)]
pub struct TemplateListing {
    pub override_dir: Option<PathBuf>,
    pub templates: Vec<TemplateEntry>,
}

#[derive(Debug, Serialize)]
pub struct TemplateEntry {
    pub name: String,
    pub category: TemplateCategory,
    pub path: PathBuf,
    pub origin: Origin,
}

/// Every registered template, resolved against an optional override directory.
pub fn run(template_dir: Option<&Path>) -> TemplateListing {
    let registry = TemplateRegistry::standard();
    let overrides = template_dir.map(DirectoryTemplates::new);

    let templates = registry
        .entries()
        .map(|(name, category)| {
            let path = registry.relative_path(name);
            let overridden = overrides
                .as_ref()
                .is_some_and(|dir| dir.read(&path).is_ok());
            let origin = if overridden {
                Origin::Override
            } else if BuiltinTemplates.read(&path).is_ok() {
                Origin::Builtin
            } else {
                Origin::Missing
            };
            TemplateEntry {
                name: name.to_string(),
                category,
                path,
                origin,
            }
        })
        .collect();

    TemplateListing {
        override_dir: template_dir.map(Path::to_path_buf),
        templates,
    }
}

pub fn render(listing: &TemplateListing) -> String {
    let mut out = String::new();
    if let Some(dir) = &listing.override_dir {
        let _ = writeln!(out, "Overrides: {}", dir.display());
    }
    for e in &listing.templates {
        let origin = match e.origin {
            Origin::Override => "override",
            Origin::Builtin => "builtin",
            Origin::Missing => "MISSING",
        };
        let _ = writeln!(
            out,
            "{:<32} {:<12} {:<9} {}",
            e.name,
            e.category.dir_name(),
            origin,
            e.path.display()
        );
    }
    let _ = writeln!(out, "{} template(s)", listing.templates.len());
    out
}
