//! End-to-end compilation: parse, render, write, then the advisory toolchain.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::codegen;
use crate::config::ScaffoldConfig;
use crate::parser::{self, DroppedLine};
use crate::registry::TemplateRegistry;
use crate::template::{LayeredTemplates, TemplateEngine, TemplateSource};
use crate::toolchain::{self, ToolOutcome};
use crate::types::{GeneratedFiles, ScaffoldError, ScaffoldResult};
use crate::writer::ProjectWriter;

/// Path and size of one rendered artifact.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub size: usize,
    pub executable: bool,
}

/// What one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub module_name: String,
    pub project_root: PathBuf,
    pub template_source: String,
    pub tables: usize,
    pub columns: usize,
    pub dropped: Vec<DroppedLine>,
    pub files: Vec<FileSummary>,
    /// False for dry runs.
    pub written: bool,
    pub tools: Vec<ToolOutcome>,
    #[serde(skip)]
    pub rendered: GeneratedFiles,
}

impl CompileReport {
    pub fn total_bytes(&self) -> usize {
        self.rendered.total_bytes()
    }
}

/// Compile a schema file using the configured template directory.
pub fn compile(schema_path: &Path, config: &ScaffoldConfig) -> ScaffoldResult<CompileReport> {
    let text = std::fs::read_to_string(schema_path).map_err(|source| ScaffoldError::Io {
        path: schema_path.to_path_buf(),
        source,
    })?;
    let source = LayeredTemplates::with_overrides(config.template_dir.as_deref());
    compile_with(&text, &schema_path.display().to_string(), config, &source)
}

/// Compile schema text against an explicit template source.
///
/// `label` names the input in errors. Every artifact is rendered before the
/// first write, so a parse or template failure leaves the disk untouched.
pub fn compile_with(
    text: &str,
    label: &str,
    config: &ScaffoldConfig,
    source: &dyn TemplateSource,
) -> ScaffoldResult<CompileReport> {
    config.validate()?;

    tracing::debug!("parsing {label}");
    let parsed = parser::parse(text)?;
    if parsed.schema.is_empty() {
        return Err(ScaffoldError::NoTables(label.to_string()));
    }

    let registry = TemplateRegistry::standard();
    let engine = TemplateEngine::new(&registry, source);
    let rendered = codegen::generate_all(&parsed.schema, config, &engine)?;

    let project_root = config.project_root();
    let written = !config.dry_run;
    let mut tools = Vec::new();

    if written {
        let writer = ProjectWriter::new(&project_root);
        writer.create_layout(&config.module_name)?;
        writer.write_all(&rendered)?;

        if config.run_toolchain {
            tools = toolchain::run_all(&project_root, &config.module_name);
        }
    } else {
        tracing::info!("dry run: {} file(s) rendered, nothing written", rendered.len());
    }

    let files = rendered
        .files
        .iter()
        .map(|f| FileSummary {
            path: f.path.clone(),
            size: f.size(),
            executable: f.executable,
        })
        .collect();

    Ok(CompileReport {
        module_name: config.module_name.clone(),
        project_root,
        template_source: source.describe(),
        tables: parsed.schema.len(),
        columns: parsed.schema.column_count(),
        dropped: parsed.dropped,
        files,
        written,
        tools,
        rendered,
    })
}
