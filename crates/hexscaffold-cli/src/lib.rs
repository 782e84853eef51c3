//! hexscaffold command-line interface.

pub mod commands;
pub mod config;

pub use config::{build_config, resolve_output_root, GenerateOptions};
