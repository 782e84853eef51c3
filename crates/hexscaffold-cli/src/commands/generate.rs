//! Command: generate. Compile a schema into a Go project.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use hexscaffold::{compile, CompileReport, ToolStatus};

use crate::config::{build_config, GenerateOptions};

pub fn run(schema: &Path, options: &GenerateOptions) -> anyhow::Result<CompileReport> {
    let config = build_config(options);
    tracing::debug!("configuration: {config:?}");

    compile(schema, &config).with_context(|| {
        format!(
            "failed to generate '{}' from {}",
            options.module_name,
            schema.display()
        )
    })
}

pub fn render(report: &CompileReport) -> String {
    let mut out = String::new();
    let verb = if report.written { "Generated" } else { "Rendered (dry run)" };
    let _ = writeln!(
        out,
        "{verb} {} files ({} bytes) for module {} in {}",
        report.files.len(),
        report.total_bytes(),
        report.module_name,
        report.project_root.display()
    );
    let _ = writeln!(
        out,
        "  Tables: {}  Columns: {}  Templates: {}",
        report.tables, report.columns, report.template_source
    );

    if !report.dropped.is_empty() {
        let _ = writeln!(out, "  Dropped lines:");
        for d in &report.dropped {
            let _ = writeln!(out, "    {} {}", d.location(), d.text);
        }
    }

    for file in &report.files {
        let marker = if file.executable { " (x)" } else { "" };
        let _ = writeln!(out, "  {}{marker}", file.path.display());
    }

    if !report.tools.is_empty() {
        let _ = writeln!(out, "  Toolchain:");
        for tool in &report.tools {
            let status = match tool.status {
                ToolStatus::Succeeded => "ok",
                ToolStatus::Failed => "FAILED",
                ToolStatus::Missing => "not installed",
                ToolStatus::Skipped => "skipped",
            };
            let _ = writeln!(out, "    {:<7} {:<14} {}", tool.step, status, tool.command);
        }
    }
    out
}
