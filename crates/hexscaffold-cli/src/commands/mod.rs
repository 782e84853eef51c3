//! Subcommand implementations.
//!
//! Each command returns a serializable report; `main` prints it either as
//! pretty JSON or through the command's `render` function.

pub mod generate;
pub mod inspect;
pub mod templates;

use serde::Serialize;

/// Print `report` as pretty JSON or as the human-readable rendering.
pub fn emit<T: Serialize>(report: &T, json: bool, render: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render(report));
    }
    Ok(())
}
