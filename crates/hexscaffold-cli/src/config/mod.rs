//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use hexscaffold::{resolve_template_dir, ScaffoldConfig};

/// Environment variable naming the default output directory.
pub const OUTPUT_ENV: &str = "HEXSCAFFOLD_OUTPUT";

/// Options of one `generate` invocation, before resolution.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub module_name: String,
    pub output: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub db_schema: Option<String>,
    pub skip_toolchain: bool,
    pub dry_run: bool,
    /// Fixed migration timestamp; the current local time when absent.
    pub timestamp: Option<NaiveDateTime>,
}

/// Resolve the directory the project directory is created in.
pub fn resolve_output_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(env_path) = std::env::var(OUTPUT_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    PathBuf::from(".")
}

/// Turn command-line options into a library configuration.
pub fn build_config(options: &GenerateOptions) -> ScaffoldConfig {
    let mut config = ScaffoldConfig::new(options.module_name.clone())
        .with_output_root(resolve_output_root(options.output.as_deref()))
        .with_template_dir(resolve_template_dir(options.templates.as_deref()))
        .with_db_schema(options.db_schema.clone())
        .with_toolchain(!options.skip_toolchain)
        .with_dry_run(options.dry_run);

    if let Some(at) = options.timestamp {
        config = config.with_generated_at(at);
    }
    config
}

/// Parse a `--timestamp` value: `YYYYmmddHHMMSS` or `YYYY-mm-ddTHH:MM:SS`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("'{value}' is not YYYYmmddHHMMSS or YYYY-mm-ddTHH:MM:SS"))
}
