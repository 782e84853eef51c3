//! Template name → category registry.
//!
//! Each template belongs to one category, which is also the sub-directory
//! its body lives in. Names that are not registered resolve at the template
//! root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// Logical layer a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Application,
    Interactor,
    Domain,
    Repository,
    Rest,
    Base,
    Migration,
    Docker,
}

impl TemplateCategory {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Interactor => "interactor",
            Self::Domain => "domain",
            Self::Repository => "repository",
            Self::Rest => "rest",
            Self::Base => "base",
            Self::Migration => "migration",
            Self::Docker => "docker",
        }
    }
}

/// Names of the templates the generators render.
pub mod names {
    pub const APPLICATION_INTERFACE_CONTENT: &str = "application-interface-content";
    pub const APPLICATION_INTERFACES: &str = "application-interfaces";
    pub const APPLICATION_SERVICE: &str = "application-service";
    pub const DTO: &str = "dto";

    pub const INTERACTOR_ADAPTER: &str = "interactor-adapter";
    pub const INTERACTOR_INTERFACE_CONTENT: &str = "interactor-interface-content";
    pub const INTERACTOR_INTERFACES: &str = "interactor-interfaces";

    pub const DOMAIN_MODEL: &str = "domain-model";
    pub const META_FIELD: &str = "meta-field";

    pub const POSTGRES_REPOSITORY: &str = "postgres-repository";

    pub const REST_API_MAIN: &str = "rest-api-main";
    pub const REST_HANDLER_HEADER: &str = "rest-handler-header";
    pub const REST_GET_ALL: &str = "rest-get-all";
    pub const REST_CREATE: &str = "rest-create";
    pub const REST_GET_BY_ID: &str = "rest-get-by-id";
    pub const REST_UPDATE: &str = "rest-update";
    pub const REST_DELETE: &str = "rest-delete";
    pub const REST_PARAMETER_HEADER: &str = "rest-parameter-header";
    pub const REST_PARAMETER: &str = "rest-parameter";

    pub const GO_MOD: &str = "go-mod";
    pub const MAIN_GO: &str = "main-go";
    pub const README: &str = "readme";
    pub const CONFIG: &str = "config";
    pub const DB_CONNECTION: &str = "db-connection";

    pub const GOOSE_MIGRATION: &str = "goose-migration";

    pub const DOCKERFILE: &str = "dockerfile";
    pub const DOCKER_COMPOSE: &str = "docker-compose";
    pub const BUILD_SCRIPT: &str = "build-script";
    pub const BUILD_SCRIPT_CROSS_PLATFORM: &str = "build-script-cross-platform";
    pub const MAKEFILE: &str = "makefile";
}

const STANDARD: &[(&str, TemplateCategory)] = &[
    (names::APPLICATION_INTERFACE_CONTENT, TemplateCategory::Application),
    (names::APPLICATION_INTERFACES, TemplateCategory::Application),
    (names::APPLICATION_SERVICE, TemplateCategory::Application),
    (names::DTO, TemplateCategory::Application),
    (names::INTERACTOR_ADAPTER, TemplateCategory::Interactor),
    (names::INTERACTOR_INTERFACE_CONTENT, TemplateCategory::Interactor),
    (names::INTERACTOR_INTERFACES, TemplateCategory::Interactor),
    (names::DOMAIN_MODEL, TemplateCategory::Domain),
    (names::META_FIELD, TemplateCategory::Domain),
    (names::POSTGRES_REPOSITORY, TemplateCategory::Repository),
    (names::REST_API_MAIN, TemplateCategory::Rest),
    (names::REST_HANDLER_HEADER, TemplateCategory::Rest),
    (names::REST_GET_ALL, TemplateCategory::Rest),
    (names::REST_CREATE, TemplateCategory::Rest),
    (names::REST_GET_BY_ID, TemplateCategory::Rest),
    (names::REST_UPDATE, TemplateCategory::Rest),
    (names::REST_DELETE, TemplateCategory::Rest),
    (names::REST_PARAMETER_HEADER, TemplateCategory::Rest),
    (names::REST_PARAMETER, TemplateCategory::Rest),
    (names::GO_MOD, TemplateCategory::Base),
    (names::MAIN_GO, TemplateCategory::Base),
    (names::README, TemplateCategory::Base),
    (names::CONFIG, TemplateCategory::Base),
    (names::DB_CONNECTION, TemplateCategory::Base),
    (names::GOOSE_MIGRATION, TemplateCategory::Migration),
    (names::DOCKERFILE, TemplateCategory::Docker),
    (names::DOCKER_COMPOSE, TemplateCategory::Docker),
    (names::BUILD_SCRIPT, TemplateCategory::Docker),
    (names::BUILD_SCRIPT_CROSS_PLATFORM, TemplateCategory::Docker),
    (names::MAKEFILE, TemplateCategory::Docker),
];

/// File extension of every template body.
pub const TEMPLATE_EXTENSION: &str = "template";

/// Maps template names to categories. Built once and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, TemplateCategory>,
}

impl TemplateRegistry {
    /// An empty registry: every name resolves at the template root.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of every template the generators use.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (name, category) in STANDARD {
            registry.register(*name, *category);
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, category: TemplateCategory) -> &mut Self {
        self.entries.insert(name.into(), category);
        self
    }

    /// Category of `name`, or `None` for uncategorized templates.
    pub fn category_of(&self, name: &str) -> Option<TemplateCategory> {
        self.entries.get(name).copied()
    }

    /// Path of the template body relative to the template root.
    pub fn relative_path(&self, name: &str) -> PathBuf {
        let file = format!("{name}.{TEMPLATE_EXTENSION}");
        match self.category_of(name) {
            Some(category) => PathBuf::from(category.dir_name()).join(file),
            None => PathBuf::from(file),
        }
    }

    /// Registered names in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, TemplateCategory)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_paths() {
        let registry = TemplateRegistry::standard();
        assert_eq!(
            registry.relative_path("domain-model"),
            PathBuf::from("domain/domain-model.template")
        );
        assert_eq!(
            registry.relative_path("goose-migration"),
            PathBuf::from("migration/goose-migration.template")
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_root() {
        let registry = TemplateRegistry::standard();
        assert_eq!(registry.category_of("custom-banner"), None);
        assert_eq!(
            registry.relative_path("custom-banner"),
            PathBuf::from("custom-banner.template")
        );
    }

    #[test]
    fn test_local_registry_override() {
        let mut registry = TemplateRegistry::new();
        registry.register("domain-model", TemplateCategory::Base);
        assert_eq!(
            registry.relative_path("domain-model"),
            PathBuf::from("base/domain-model.template")
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_standard_has_no_duplicates() {
        let registry = TemplateRegistry::standard();
        assert_eq!(registry.len(), STANDARD.len());
    }
}
