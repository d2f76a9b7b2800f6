//! GitHub Actions reporting: workflow commands and step outputs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use board::RunReport;

/// Escapes a workflow-command message the way the Actions toolkit does.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats an `::error::` workflow command.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Returns `true` when running inside a GitHub Actions job.
pub fn in_actions(github_actions: Option<&str>) -> bool {
    github_actions == Some("true")
}

/// Step outputs derived from a report: `pipeline-id` and `moved-issues`.
pub fn outputs(report: &RunReport) -> Vec<(&'static str, String)> {
    let pipeline = report
        .pipeline_id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let moved = report
        .successes()
        .map(|o| o.issue.number.to_string())
        .collect::<Vec<_>>()
        .join(",");
    vec![("pipeline-id", pipeline), ("moved-issues", moved)]
}

/// Appends `name=value` lines to the `GITHUB_OUTPUT` file.
///
/// # Errors
///
/// Returns any I/O error from opening or writing the file.
pub fn append_outputs(path: &Path, outputs: &[(&str, String)]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        writeln!(file, "{name}={value}")?;
    }
    Ok(())
}

/// Describes the failed moves of a report, or `None` if every move succeeded.
pub fn failure_summary(report: &RunReport) -> Option<String> {
    let failures: Vec<String> = report
        .failures()
        .filter_map(|o| {
            o.result
                .as_ref()
                .err()
                .map(|err| format!("{} ({err})", o.issue))
        })
        .collect();
    if failures.is_empty() {
        return None;
    }
    Some(format!(
        "failed to move {} of {} cards: {}",
        failures.len(),
        report.outcomes.len(),
        failures.join("; ")
    ))
}
