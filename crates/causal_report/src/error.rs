use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid case record: {message}")]
    InvalidCase { message: String },

    #[error("{path}: {source}")]
    CaseFile {
        path: PathBuf,
        #[source]
        source: Box<ReportError>,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl ReportError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::CaseFile { source, .. } => source.exit_code(),
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_case(message: impl Into<String>) -> Self {
        Self::InvalidCase {
            message: message.into(),
        }
    }

    /// Attaches the offending case file to an error raised while loading or rendering it.
    #[must_use]
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Self::CaseFile { .. } => already,
            other => Self::CaseFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}
