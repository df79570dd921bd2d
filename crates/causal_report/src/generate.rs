use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::case::{CaseRecord, list_case_files};
use crate::dashboard::write_dashboard;
use crate::error::{ReportError, Result};
use crate::layout::SiteLayout;
use crate::manifest::build_manifest;
use crate::report::{RenderOptions, write_report};
use crate::util::{
    CliOutput, OutputIntegration, ensure_dir, ensure_exists, now_utc_iso, output_for,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub render: RenderOptions,
    /// Report per-file failures and continue instead of aborting the batch.
    pub keep_going: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub generated_at: String,
    pub input_dir: String,
    pub output_dir: String,
    pub reports: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub manifest_entries: usize,
}

/// Loads one case file and writes its report into the output directory.
pub fn generate_report(
    case_file: &Path,
    layout: &SiteLayout,
    options: RenderOptions,
) -> Result<PathBuf> {
    let case = CaseRecord::from_path(case_file)?;
    let output_path = layout.report_path_for(case_file);
    write_report(&case, &output_path, options).map_err(|error| error.in_file(case_file))?;
    Ok(output_path)
}

/// Converts every case file, then refreshes the manifest and dashboard.
///
/// Prints one `Generated report:` line per report. Without `keep_going` the
/// first failing file aborts the run before the manifest is rewritten.
pub fn generate_site(
    layout: &SiteLayout,
    options: GenerateOptions,
    ui: &CliOutput,
) -> Result<GenerateSummary> {
    ensure_exists(&layout.input_dir)?;
    ensure_dir(&layout.output_dir)?;

    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for case_file in list_case_files(&layout.input_dir)? {
        match generate_report(&case_file, layout, options.render) {
            Ok(output_path) => {
                ui.success(&format!("Generated report: {}", output_path.display()));
                reports.push(output_path.display().to_string());
            }
            Err(error) if options.keep_going => {
                warn!(case_file = %case_file.display(), %error, "report generation failed");
                ui.error(&error.to_string());
                failures.push(FileFailure {
                    path: case_file.display().to_string(),
                    error: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    let entries = build_manifest(&layout.input_dir, &layout.manifest_path())?;
    write_dashboard(&layout.dashboard_path())?;
    info!(
        reports = reports.len(),
        failures = failures.len(),
        manifest_entries = entries.len(),
        "site generated"
    );

    Ok(GenerateSummary {
        generated_at: now_utc_iso(),
        input_dir: layout.input_dir.display().to_string(),
        output_dir: layout.output_dir.display().to_string(),
        reports,
        failures,
        manifest_entries: entries.len(),
    })
}

pub fn run_generate(layout: &SiteLayout, options: GenerateOptions) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_generate_with_integration(layout, options, &integration)
}

pub(crate) fn run_generate_with_integration(
    layout: &SiteLayout,
    options: GenerateOptions,
    integration: &OutputIntegration,
) -> Result<()> {
    let ui = output_for(integration);
    let summary = generate_site(layout, options, &ui)?;

    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "generate",
                "status": if summary.failures.is_empty() { "ok" } else { "partial" },
                "summary": summary,
                "integration": integration,
            })
        );
    }

    if summary.failures.is_empty() {
        Ok(())
    } else {
        Err(ReportError::exit(
            1,
            format!(
                "{} of {} case files failed",
                summary.failures.len(),
                summary.failures.len() + summary.reports.len()
            ),
        ))
    }
}
