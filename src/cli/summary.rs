//! Tables printed at the end of each step

use crate::generator::DiagramSummary;
use crate::setup::{CommandOutcome, InstallReport, InstallStatus, ProjectLayout};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Entities found in the ER diagram
pub fn diagram_table(summary: &DiagramSummary) -> Table {
    let mut table = new_table(vec!["Entity"]);
    for entity in &summary.entities {
        table.add_row(vec![entity.as_str()]);
    }
    table
}

/// Outcome of every install command
pub fn install_table(reports: &[InstallReport]) -> Table {
    let mut table = new_table(vec!["Package", "Command", "Status"]);
    for report in reports {
        table.add_row(vec![
            report.package.clone().unwrap_or_else(|| "-".to_string()),
            report.command.clone(),
            install_status_label(&report.status),
        ]);
    }
    table
}

/// Human-readable install status
pub fn install_status_label(status: &InstallStatus) -> String {
    match status {
        InstallStatus::AlreadyInstalled => "already installed".to_string(),
        InstallStatus::Ran(CommandOutcome::Succeeded) => "installed".to_string(),
        InstallStatus::Ran(CommandOutcome::Failed(Some(code))) => format!("failed (exit {})", code),
        InstallStatus::Ran(CommandOutcome::Failed(None)) => "failed (killed)".to_string(),
        InstallStatus::Ran(CommandOutcome::TimedOut) => "timed out".to_string(),
        InstallStatus::SpawnFailed(e) => format!("could not start: {}", e),
        InstallStatus::Unrecognized => "skipped".to_string(),
    }
}

/// Generated files, relative to the project root
pub fn files_table(layout: &ProjectLayout, files: &[PathBuf]) -> Table {
    let mut table = new_table(vec!["Generated file"]);
    for file in files {
        table.add_row(vec![layout.relative(file).display().to_string()]);
    }
    table
}

/// Commands the user should run next
pub fn tasks_table(tasks: &[String]) -> Table {
    let mut table = new_table(vec!["#", "Next step"]);
    for (i, task) in tasks.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), task.clone()]);
    }
    table
}
