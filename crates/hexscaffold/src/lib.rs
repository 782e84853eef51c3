//! hexscaffold: compile SQL table declarations into a hexagonal Go service
//! and its reversible migration.

pub mod builtin;
pub mod codegen;
pub mod codegen_base;
pub mod codegen_layers;
pub mod codegen_model;
pub mod codegen_rest;
pub mod config;
pub mod meta;
pub mod migration;
pub mod naming;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod template;
pub mod toolchain;
pub mod typemap;
pub mod types;
pub mod writer;

pub use codegen::generate_all;
pub use config::{resolve_template_dir, ScaffoldConfig};
pub use migration::{synthesize, MigrationScripts};
pub use naming::{singularize, to_source_case, to_target_case, EntityNames};
pub use parser::{parse, parse_file, DroppedLine, ParseReport};
pub use pipeline::{compile, compile_with, CompileReport};
pub use registry::{TemplateCategory, TemplateRegistry};
pub use template::{
    substitute, Bindings, BuiltinTemplates, DirectoryTemplates, LayeredTemplates,
    MemoryTemplates, TemplateEngine, TemplateSource,
};
pub use toolchain::{ToolOutcome, ToolStatus};
pub use typemap::{map_forward, map_reverse, TargetType};
pub use types::*;
