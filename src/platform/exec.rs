// Logalizer - platform/exec.rs
//
// External command execution: the configured `execute` chain and the
// PlantUML render step. Commands run through the platform shell and inherit
// stdout/stderr.

use crate::util::constants;
use crate::util::error::ExecuteError;
use std::path::Path;
use std::process::Command;

/// Build a shell invocation of `command_line`.
fn shell_command(command_line: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }
    #[cfg(not(target_os = "windows"))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Run one command line through the shell and wait for it.
pub fn run_command(command_line: &str) -> Result<(), ExecuteError> {
    tracing::info!(command = %command_line, "Running command");
    run(shell_command(command_line), command_line)
}

/// Run every command in order, stopping at the first failure.
pub fn run_all<S: AsRef<str>>(commands: &[S]) -> Result<usize, ExecuteError> {
    for command in commands {
        run_command(command.as_ref())?;
    }
    Ok(commands.len())
}

fn run(mut cmd: Command, label: &str) -> Result<(), ExecuteError> {
    let status = cmd.status().map_err(|e| ExecuteError::Spawn {
        command: label.to_string(),
        source: e,
    })?;

    if status.success() {
        tracing::debug!(command = %label, "Command succeeded");
        Ok(())
    } else {
        tracing::warn!(command = %label, code = ?status.code(), "Command failed");
        Err(ExecuteError::Failed {
            command: label.to_string(),
            code: status.code(),
        })
    }
}

/// `PLANTUML_LIMIT_SIZE` for a diagram with `line_count` lines.
pub fn plantuml_limit(line_count: usize) -> u32 {
    if line_count < constants::PLANTUML_SMALL_DIAGRAM_LINES {
        constants::PLANTUML_LIMIT_SMALL
    } else {
        constants::PLANTUML_LIMIT_LARGE
    }
}

/// Arguments passed to `java` to render `diagram` as PNG.
pub fn plantuml_args(jar: &Path, diagram: &Path, line_count: usize) -> Vec<String> {
    vec![
        format!("-DPLANTUML_LIMIT_SIZE={}", plantuml_limit(line_count)),
        "-jar".to_string(),
        jar.display().to_string(),
        "-tpng".to_string(),
        diagram.display().to_string(),
    ]
}

/// Render `diagram` with PlantUML. Arguments bypass the shell.
pub fn render_plantuml(
    java: &str,
    jar: &Path,
    diagram: &Path,
    line_count: usize,
) -> Result<(), ExecuteError> {
    let args = plantuml_args(jar, diagram, line_count);
    let label = format!("{java} {}", args.join(" "));
    tracing::info!(command = %label, "Rendering diagram");

    let mut cmd = Command::new(java);
    cmd.args(&args);
    run(cmd, &label)
}
