#![forbid(unsafe_code)]

pub mod annotate;
pub mod case;
pub mod cli;
pub mod dashboard;
pub mod diff;
pub mod error;
pub mod generate;
pub mod graph;
pub mod label;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod report;
pub mod server;
pub mod util;

pub use cli::run_from_env;
pub use error::{ReportError, Result};
