//! The default template set, compiled into the library.

macro_rules! builtin {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!("../templates/", $path)))),*]
    };
}

static BUILTIN: &[(&str, &str)] = builtin![
    "application/application-interface-content.template",
    "application/application-interfaces.template",
    "application/application-service.template",
    "application/dto.template",
    "base/config.template",
    "base/db-connection.template",
    "base/go-mod.template",
    "base/main-go.template",
    "base/readme.template",
    "docker/build-script-cross-platform.template",
    "docker/build-script.template",
    "docker/docker-compose.template",
    "docker/dockerfile.template",
    "docker/makefile.template",
    "domain/domain-model.template",
    "domain/meta-field.template",
    "interactor/interactor-adapter.template",
    "interactor/interactor-interface-content.template",
    "interactor/interactor-interfaces.template",
    "migration/goose-migration.template",
    "repository/postgres-repository.template",
    "rest/rest-api-main.template",
    "rest/rest-create.template",
    "rest/rest-delete.template",
    "rest/rest-get-all.template",
    "rest/rest-get-by-id.template",
    "rest/rest-handler-header.template",
    "rest/rest-parameter-header.template",
    "rest/rest-parameter.template",
    "rest/rest-update.template",
];

/// Body of the builtin template at `relative` (forward slashes), if any.
pub fn lookup(relative: &str) -> Option<&'static str> {
    BUILTIN
        .iter()
        .find(|(path, _)| *path == relative)
        .map(|(_, body)| *body)
}

/// Relative paths of every builtin template.
pub fn paths() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(path, _)| *path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(lookup("domain/meta-field.template")
            .unwrap()
            .contains("type MetaField struct"));
        assert!(lookup("domain/missing.template").is_none());
    }

    #[test]
    fn test_paths_are_categorized() {
        for path in paths() {
            assert!(path.ends_with(".template"), "{path}");
            assert!(path.contains('/'), "{path}");
        }
    }
}
