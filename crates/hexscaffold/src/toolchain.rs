//! Advisory post-generation Go toolchain steps.
//!
//! Every step is best effort: a missing tool or a failing command is logged
//! and recorded in a [`ToolOutcome`], never returned as an error.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Succeeded,
    Failed,
    Missing,
    Skipped,
}

/// Result of one toolchain step.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    pub step: &'static str,
    pub command: String,
    pub status: ToolStatus,
    /// Combined stdout and stderr, trimmed. Empty on success.
    pub output: String,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Succeeded
    }
}

/// Format, tidy, build and vet the generated project.
///
/// The build and vet steps are skipped when `go mod tidy` did not succeed,
/// since they cannot pass without resolved dependencies.
pub fn run_all(project_root: &Path, module_name: &str) -> Vec<ToolOutcome> {
    let mut outcomes = vec![format(project_root)];

    let tidy = run_tool("tidy", "go", &["mod", "tidy"], project_root);
    let tidy_ok = tidy.is_success();
    outcomes.push(tidy);

    let build_target = format!("./cmd/{module_name}");
    let followups: [(&'static str, Vec<&str>); 2] = [
        ("build", vec!["build", "-o", os_null(), build_target.as_str()]),
        ("vet", vec!["vet", "./..."]),
    ];
    for (step, args) in followups {
        if tidy_ok {
            outcomes.push(run_tool(step, "go", &args, project_root));
        } else {
            outcomes.push(skipped(step, "go", &args));
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed == 0 {
        tracing::info!("toolchain checks passed");
    } else {
        tracing::warn!("{failed} toolchain step(s) did not succeed; generated files are kept");
    }
    outcomes
}

/// `goimports -w .`, falling back to `gofmt -w .`.
fn format(project_root: &Path) -> ToolOutcome {
    if which::which("goimports").is_ok() {
        return run_tool("format", "goimports", &["-w", "."], project_root);
    }
    run_tool("format", "gofmt", &["-w", "."], project_root)
}

/// Run one external command in `dir`.
pub fn run_tool(step: &'static str, program: &str, args: &[&str], dir: &Path) -> ToolOutcome {
    let command = render_command(program, args);

    let Ok(resolved) = which::which(program) else {
        tracing::warn!("{step}: `{program}` not found on PATH, skipping");
        return ToolOutcome {
            step,
            command,
            status: ToolStatus::Missing,
            output: String::new(),
        };
    };

    tracing::debug!("{step}: running `{command}` in {}", dir.display());
    match Command::new(resolved).args(args).current_dir(dir).output() {
        Ok(out) if out.status.success() => ToolOutcome {
            step,
            command,
            status: ToolStatus::Succeeded,
            output: String::new(),
        },
        Ok(out) => {
            let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&out.stderr));
            let output = output.trim().to_string();
            tracing::warn!("{step}: `{command}` failed ({}): {output}", out.status);
            ToolOutcome {
                step,
                command,
                status: ToolStatus::Failed,
                output,
            }
        }
        Err(e) => {
            tracing::warn!("{step}: could not start `{command}`: {e}");
            ToolOutcome {
                step,
                command,
                status: ToolStatus::Failed,
                output: e.to_string(),
            }
        }
    }
}

fn skipped(step: &'static str, program: &str, args: &[&str]) -> ToolOutcome {
    tracing::debug!("{step}: skipped");
    ToolOutcome {
        step,
        command: render_command(program, args),
        status: ToolStatus::Skipped,
        output: String::new(),
    }
}

fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build output is discarded; only compilation is checked.
fn os_null() -> &'static str {
    if cfg!(windows) {
        "NUL"
    } else {
        "/dev/null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_tool() {
        let dir = TempDir::new().unwrap();
        let outcome = run_tool("version", "hexscaffold-no-such-tool", &["--version"], dir.path());
        assert_eq!(outcome.status, ToolStatus::Missing);
        assert_eq!(outcome.command, "hexscaffold-no-such-tool --version");
    }

    #[cfg(unix)]
    #[test]
    fn test_success_and_failure() {
        let dir = TempDir::new().unwrap();
        assert_eq!(run_tool("ok", "true", &[], dir.path()).status, ToolStatus::Succeeded);

        let failed = run_tool("fail", "sh", &["-c", "echo broken >&2; exit 3"], dir.path());
        assert_eq!(failed.status, ToolStatus::Failed);
        assert_eq!(failed.output, "broken");
    }

    #[test]
    fn test_skipped_outcome() {
        let outcome = skipped("vet", "go", &["vet", "./..."]);
        assert_eq!(outcome.status, ToolStatus::Skipped);
        assert!(!outcome.is_success());
        assert_eq!(outcome.command, "go vet ./...");
    }
}
