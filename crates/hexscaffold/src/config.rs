//! Run configuration and template directory resolution.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::types::{ScaffoldError, ScaffoldResult};

/// Environment variable naming a template override directory.
pub const TEMPLATES_ENV: &str = "HEXSCAFFOLD_TEMPLATES";

/// Everything one compilation run needs besides the schema itself.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldConfig {
    /// Go module name; also the project directory and binary name.
    pub module_name: String,
    /// Directory the project directory is created in.
    pub output_root: PathBuf,
    /// Postgres schema the migration qualifies tables with.
    pub db_schema: Option<String>,
    /// Template directory overriding the builtin set.
    pub template_dir: Option<PathBuf>,
    /// Timestamp used for the migration file name.
    pub generated_at: NaiveDateTime,
    pub run_toolchain: bool,
    /// Render everything but write nothing.
    pub dry_run: bool,
}

impl ScaffoldConfig {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            output_root: PathBuf::from("."),
            db_schema: None,
            template_dir: None,
            generated_at: Local::now().naive_local(),
            run_toolchain: true,
            dry_run: false,
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_db_schema(mut self, schema: Option<String>) -> Self {
        self.db_schema = schema.filter(|s| !s.is_empty());
        self
    }

    pub fn with_template_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.template_dir = dir;
        self
    }

    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    pub fn with_toolchain(mut self, run: bool) -> Self {
        self.run_toolchain = run;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// `<output_root>/<module_name>`, the root every artifact path is relative to.
    pub fn project_root(&self) -> PathBuf {
        self.output_root.join(&self.module_name)
    }

    pub fn validate(&self) -> ScaffoldResult<()> {
        validate_module_name(&self.module_name)?;
        if let Some(schema) = &self.db_schema {
            if !is_sql_identifier(schema) {
                return Err(ScaffoldError::InvalidConfig(format!(
                    "database schema '{schema}' must be letters, digits and underscores"
                )));
            }
        }
        Ok(())
    }
}

/// Module names become directory names, so separators and whitespace are rejected.
pub fn validate_module_name(name: &str) -> ScaffoldResult<()> {
    if name.is_empty() {
        return Err(ScaffoldError::InvalidConfig(
            "module name must not be empty".to_string(),
        ));
    }
    if name == "." || name == ".." {
        return Err(ScaffoldError::InvalidConfig(format!(
            "module name '{name}' is not a directory name"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '<' | '>' | '"'))
    {
        return Err(ScaffoldError::InvalidConfig(format!(
            "module name '{name}' contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

fn is_sql_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Resolve the template override directory.
///
/// Explicit path, then `HEXSCAFFOLD_TEMPLATES`, then `./templates` when it
/// exists. `None` means the builtin set alone.
pub fn resolve_template_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(TEMPLATES_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let cwd_templates = PathBuf::from("templates");
    if cwd_templates.is_dir() {
        return Some(cwd_templates);
    }

    None
}
