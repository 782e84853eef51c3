//! Command: inspect. Show how a schema parses and maps, without generating.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use hexscaffold::meta::is_meta_column;
use hexscaffold::{parse_file, DroppedLine, EntityNames};

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub source: String,
    pub tables: Vec<TableSummary>,
    pub dropped: Vec<DroppedLine>,
}

#[derive(Debug, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub entity: String,
    pub route: String,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub source_type: String,
    pub go_type: &'static str,
    pub primary_key: bool,
    pub nullable: bool,
    pub default: Option<String>,
    /// Supplied by the shared base entity rather than the table's own model.
    pub meta: bool,
}

pub fn run(schema: &Path) -> anyhow::Result<InspectReport> {
    let parsed = parse_file(schema)
        .with_context(|| format!("failed to parse {}", schema.display()))?;

    let tables = parsed
        .schema
        .tables
        .iter()
        .map(|table| {
            let names = EntityNames::for_table(&table.name);
            TableSummary {
                name: table.name.clone(),
                entity: names.struct_name,
                route: format!("/{}", names.entity_plural),
                columns: table
                    .columns
                    .iter()
                    .map(|c| ColumnSummary {
                        name: c.name.clone(),
                        source_type: c.source_type.clone(),
                        go_type: c.mapping.target.go_type(),
                        primary_key: c.is_primary_key,
                        nullable: c.is_nullable,
                        default: c.default_value.clone(),
                        meta: is_meta_column(&c.name),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(InspectReport {
        source: schema.display().to_string(),
        tables,
        dropped: parsed.dropped,
    })
}

pub fn render(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} table(s)", report.source, report.tables.len());

    for table in &report.tables {
        let _ = writeln!(out, "\n{} -> {} ({})", table.name, table.entity, table.route);
        for c in &table.columns {
            let mut flags = Vec::new();
            if c.primary_key {
                flags.push("pk".to_string());
            }
            if !c.nullable {
                flags.push("not null".to_string());
            }
            if let Some(d) = &c.default {
                flags.push(format!("default {d}"));
            }
            if c.meta {
                flags.push("meta".to_string());
            }
            let _ = writeln!(
                out,
                "  {:<20} {:<20} {:<10} {}",
                c.name,
                c.source_type,
                c.go_type,
                flags.join(", ")
            );
        }
    }

    if !report.dropped.is_empty() {
        let _ = writeln!(out, "\nDropped lines:");
        for d in &report.dropped {
            let _ = writeln!(out, "  {} {}", d.location(), d.text);
        }
    }
    out
}
