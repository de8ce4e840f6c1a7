//! Output formatting for CLI

use crate::models::{ArchiveReport, ArchiveStatus, CleanupOutcome};
use std::fmt::Write;

/// Human-readable summary of an archive run
#[must_use]
pub fn format_text(report: &ArchiveReport) -> String {
    let mut out = String::new();

    let status = match report.status {
        ArchiveStatus::Completed => "completed",
        ArchiveStatus::Partial => "partial",
        ArchiveStatus::ArtifactMissing => "artifact missing",
    };
    let _ = writeln!(out, "Archive {status}: {}", report.artifact.display());

    if let (Some(version), Some(name)) = (&report.version, &report.file_name) {
        let _ = writeln!(out, "  version: {version}");
        let _ = writeln!(out, "  name:    {name}");
    }

    for copy in &report.copies {
        match &copy.error {
            None => {
                let note = if copy.replaced { " (replaced)" } else { "" };
                let _ = writeln!(
                    out,
                    "  [ok]     {:<8} {}{note}",
                    copy.destination,
                    copy.path.display()
                );
            }
            Some(err) => {
                let _ = writeln!(
                    out,
                    "  [failed] {:<8} {} ({err})",
                    copy.destination,
                    copy.path.display()
                );
            }
        }
    }

    if report.status != ArchiveStatus::ArtifactMissing {
        let cleanup = match &report.cleanup {
            CleanupOutcome::Deleted => "original deleted".to_string(),
            CleanupOutcome::Kept => "original kept".to_string(),
            CleanupOutcome::Failed { message } => format!("original not deleted: {message}"),
        };
        let _ = writeln!(out, "  cleanup: {cleanup}");
    }

    out
}

/// Format an archive report as JSON
#[must_use]
pub fn format_json(report: &ArchiveReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
