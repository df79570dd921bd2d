use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "example";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const DASHBOARD_FILE: &str = "index.html";
pub const REPORT_EXTENSION: &str = "html";

/// Where case files are read from and where the generated site is written.
/// The output directory is also the root the dev server serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}

impl SiteLayout {
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(DASHBOARD_FILE)
    }

    /// URL path under which the server exposes the manifest.
    #[must_use]
    pub fn manifest_route() -> String {
        format!("/{MANIFEST_FILE}")
    }

    /// `example/daily_rain.json` -> `reports/daily_rain.html`.
    #[must_use]
    pub fn report_path_for(&self, case_file: &Path) -> PathBuf {
        let mut name = case_file
            .file_stem()
            .unwrap_or(case_file.as_os_str())
            .to_os_string();
        name.push(".");
        name.push(REPORT_EXTENSION);
        self.output_dir.join(name)
    }
}
