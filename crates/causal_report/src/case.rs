//! Case record loading.
//!
//! A case file holds either a single JSON object or an array whose first
//! element is the record. Every field is optional; absent text fields load as
//! empty strings. The record also accepts the keys used by older data sets
//! (`S'`, `Error`, and a free-text `G` graph).

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::annotate::annotate_error;
use crate::error::{ReportError, Result};
use crate::graph::GraphSpec;

pub const CASE_EXTENSION: &str = "json";

/// One causal-inference scenario, validated and normalized at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseRecord {
    pub graph: GraphSpec,
    /// Legacy free-text graph, kept for display when present.
    pub raw_graph: Option<String>,
    /// `V`
    pub intervention: String,
    /// `M`
    pub formalism: String,
    /// `T`
    pub story: String,
    /// `Q`
    pub query: String,
    /// `S`
    pub response: String,
    /// `S_prime`
    pub response_prime: String,
    pub error_type: Option<String>,
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCaseRecord {
    #[serde(deserialize_with = "nullable")]
    variable_mapping: IndexMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    edge_pairs: Vec<(String, String)>,
    #[serde(deserialize_with = "nullable")]
    bidirected_pairs: Vec<(String, String)>,
    #[serde(rename = "G")]
    graph: Option<String>,
    #[serde(rename = "V", deserialize_with = "nullable")]
    intervention: String,
    #[serde(rename = "M", deserialize_with = "nullable")]
    formalism: String,
    #[serde(rename = "T", deserialize_with = "nullable")]
    story: String,
    #[serde(rename = "Q", deserialize_with = "nullable")]
    query: String,
    #[serde(rename = "S", deserialize_with = "nullable")]
    response: String,
    #[serde(rename = "S_prime", deserialize_with = "nullable")]
    response_prime: String,
    #[serde(rename = "S'")]
    legacy_response_prime: Option<String>,
    #[serde(deserialize_with = "error_tag")]
    error_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    comment: String,
    #[serde(rename = "Error")]
    legacy_comment: Option<String>,
}

/// The current key wins unless it is blank.
fn prefer_current(current: String, legacy: Option<String>) -> String {
    match legacy {
        Some(legacy) if current.trim().is_empty() => legacy,
        _ => current,
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorTag {
    Text(String),
    Number(serde_json::Number),
}

fn error_tag<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<ErrorTag>::deserialize(deserializer)?.map(|tag| match tag {
        ErrorTag::Text(text) => text.trim().to_string(),
        ErrorTag::Number(number) => number.to_string(),
    });
    Ok(tag.filter(|tag| !tag.is_empty()))
}

impl From<RawCaseRecord> for CaseRecord {
    fn from(raw: RawCaseRecord) -> Self {
        let explicit = GraphSpec {
            variable_mapping: raw.variable_mapping,
            edge_pairs: raw.edge_pairs,
            bidirected_pairs: raw.bidirected_pairs,
        };
        let graph = match raw.graph.as_deref() {
            Some(text) if explicit.is_empty() => GraphSpec::parse_legacy(text),
            _ => explicit,
        };

        Self {
            graph,
            raw_graph: raw.graph.filter(|text| !text.trim().is_empty()),
            intervention: raw.intervention,
            formalism: raw.formalism,
            story: raw.story,
            query: raw.query,
            response: raw.response,
            response_prime: prefer_current(raw.response_prime, raw.legacy_response_prime),
            error_type: raw.error_type,
            comment: prefer_current(raw.comment, raw.legacy_comment),
        }
    }
}

impl CaseRecord {
    /// Builds a record from a parsed document. Arrays contribute only their
    /// first element.
    pub fn from_value(value: Value) -> Result<Self> {
        let record = match value {
            Value::Array(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| ReportError::invalid_case("array contains no case record"))?,
            other => other,
        };
        if !record.is_object() {
            return Err(ReportError::invalid_case(format!(
                "expected a JSON object, found {}",
                json_kind(&record)
            )));
        }

        let raw: RawCaseRecord = serde_json::from_value(record)?;
        Ok(raw.into())
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Reads and parses a case file; failures carry the file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        fs::read_to_string(path)
            .map_err(ReportError::from)
            .and_then(|text| Self::from_json_str(&text))
            .map_err(|error| error.in_file(path))
    }

    /// Error analysis sentence shown in the report.
    #[must_use]
    pub fn error_text(&self) -> String {
        annotate_error(self.error_type.as_deref(), &self.comment)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[must_use]
pub fn is_case_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CASE_EXTENSION)
}

/// Case files directly inside `dir`, sorted by path.
pub fn list_case_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if is_case_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
