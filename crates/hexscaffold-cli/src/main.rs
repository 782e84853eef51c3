//! hexscaffold entry point.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use hexscaffold::resolve_template_dir;
use hexscaffold_cli::commands::{self, generate, inspect, templates};
use hexscaffold_cli::config::{parse_timestamp, GenerateOptions};

#[derive(Parser)]
#[command(
    name = "hexscaffold",
    about = "Generate a hexagonal Go service and its migration from SQL table declarations",
    version
)]
struct Cli {
    /// Print reports as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go project from a schema file.
    Generate {
        /// Go module name; also the project directory name.
        module: String,

        /// Schema file with CREATE TABLE declarations.
        schema: PathBuf,

        /// Directory the project directory is created in.
        /// Also reads from HEXSCAFFOLD_OUTPUT env var.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template directory overriding the builtin set.
        /// Also reads from HEXSCAFFOLD_TEMPLATES env var.
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Postgres schema to qualify tables with.
        #[arg(long)]
        db_schema: Option<String>,

        /// Do not run gofmt, go mod tidy, go build or go vet afterwards.
        #[arg(long)]
        skip_toolchain: bool,

        /// Render everything but write nothing.
        #[arg(long)]
        dry_run: bool,

        /// Migration timestamp (YYYYmmddHHMMSS), for reproducible output.
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<NaiveDateTime>,
    },

    /// Show tables, columns and mapped types of a schema file.
    Inspect {
        /// Schema file with CREATE TABLE declarations.
        schema: PathBuf,
    },

    /// List the template registry and where each body is loaded from.
    Templates {
        /// Template directory overriding the builtin set.
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   hexscaffold completions bash > ~/.local/share/bash-completion/completions/hexscaffold
    ///   hexscaffold completions zsh > ~/.zfunc/_hexscaffold
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            module,
            schema,
            output,
            templates,
            db_schema,
            skip_toolchain,
            dry_run,
            timestamp,
        } => {
            let options = GenerateOptions {
                module_name: module,
                output,
                templates,
                db_schema,
                skip_toolchain,
                dry_run,
                timestamp,
            };
            let report = generate::run(&schema, &options)?;
            commands::emit(&report, cli.json, generate::render)?;
        }

        Commands::Inspect { schema } => {
            let report = inspect::run(&schema)?;
            commands::emit(&report, cli.json, inspect::render)?;
        }

        Commands::Templates { templates: dir } => {
            let dir = resolve_template_dir(dir.as_deref());
            let listing = templates::run(dir.as_deref());
            commands::emit(&listing, cli.json, templates::render)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hexscaffold", &mut std::io::stdout());
        }
    }

    Ok(())
}
