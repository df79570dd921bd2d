//! Manifest of the available case files, consumed by the dashboard.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::case::{CASE_EXTENSION, list_case_files};
use crate::error::Result;
use crate::label::{humanize_stem, title_case};
use crate::util::write_string_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Filename without extension; also the report's base name.
    pub id: String,
    pub filename: String,
    /// Category: the first underscore-delimited token of the filename.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl ManifestEntry {
    /// `mediation_example1.json` -> type `mediation`, name `Example1`.
    ///
    /// When stripping the type token would leave nothing (a filename with no
    /// underscore) the full humanized name is kept.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let id = filename
            .strip_suffix(CASE_EXTENSION)
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(filename)
            .to_string();
        let kind = id.split('_').next().unwrap_or_default().to_string();

        let full_name = humanize_stem(&id);
        let type_title = title_case(&kind);
        let name = match full_name.strip_prefix(&type_title).map(str::trim) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => full_name.trim().to_string(),
        };

        Self {
            id,
            filename: filename.to_string(),
            kind,
            name,
        }
    }
}

/// Entries for every case file in `input_dir`, sorted by `(type, name)` and
/// then by `id`. A missing directory is an empty corpus.
pub fn collect_manifest(input_dir: &Path) -> Result<Vec<ManifestEntry>> {
    if !input_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<ManifestEntry> = list_case_files(input_dir)?
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| ManifestEntry::from_filename(&name.to_string_lossy()))
        .collect();

    entries.sort_by(|a, b| {
        (&a.kind, &a.name, &a.id).cmp(&(&b.kind, &b.name, &b.id))
    });
    Ok(entries)
}

/// Scans `input_dir` and writes the manifest to `output_path` as a JSON array.
/// Returns the entries written. Nothing is written when `input_dir` does not
/// exist.
pub fn build_manifest(input_dir: &Path, output_path: &Path) -> Result<Vec<ManifestEntry>> {
    if !input_dir.is_dir() {
        debug!(input_dir = %input_dir.display(), "manifest source missing; treating as empty");
        return Ok(Vec::new());
    }

    rewrite_manifest(input_dir, output_path)
}

/// Like [`build_manifest`] but always writes, so a vanished `input_dir`
/// replaces any earlier manifest with `[]`.
pub fn rewrite_manifest(input_dir: &Path, output_path: &Path) -> Result<Vec<ManifestEntry>> {
    let entries = collect_manifest(input_dir)?;
    let json = serde_json::to_string_pretty(&entries)?;
    write_string_atomic(output_path, &json)?;
    debug!(
        entries = entries.len(),
        output = %output_path.display(),
        "manifest written"
    );
    Ok(entries)
}
