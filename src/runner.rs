//! Subprocess invocation for the external annotation scripts.
//!
//! The oncokb-annotator scripts have no importable structure, so they are
//! run as subprocesses. Logged command lines hide the argument following
//! any redacted flag, keeping bearer tokens out of log output.

use std::ffi::OsStr;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{AnnotatorError, Result};
use crate::token::REDACTED;

/// Render a command line for logging, replacing the argument that follows
/// any flag in `redact` with a placeholder.
fn render_for_log(program: &str, args: &[&OsStr], redact: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            parts.push(REDACTED.to_string());
            hide_next = false;
            continue;
        }
        let shown = arg.to_string_lossy().into_owned();
        if redact.contains(&shown.as_str()) {
            hide_next = true;
        }
        parts.push(shown);
    }
    parts.join(" ")
}

/// Run an external annotation tool to completion, capturing its output.
///
/// A launch failure or non-zero exit is fatal; captured stderr is surfaced
/// in the error. There is no retry or timeout here.
pub fn run_tool(program: &str, args: &[&OsStr], description: &str, redact: &[&str]) -> Result<()> {
    info!(
        "Running {}: '{}'",
        description,
        render_for_log(program, args, redact)
    );
    let output = Command::new(program).args(args).output().map_err(|e| {
        AnnotatorError::AnnotationTool {
            description: description.to_string(),
            detail: format!(
                "cannot launch '{}': {}. Is oncokb-annotator on the PATH?",
                program, e
            ),
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AnnotatorError::AnnotationTool {
            description: description.to_string(),
            detail: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    debug!("Finished {} without errors", description);
    Ok(())
}
