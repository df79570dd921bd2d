use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::generate::{GenerateOptions, run_generate};
use crate::layout::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, SiteLayout};
use crate::report::RenderOptions;
use crate::server::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig, run_server};

#[derive(Debug, Parser)]
#[command(
    name = "causal_report",
    about = "Render causal-inference case records to HTML reports and serve them",
    version
)]
pub struct Cli {
    /// Convert every case file once and exit instead of starting the server.
    #[arg(long = "no-serve")]
    pub no_serve: bool,

    /// Directory of JSON case files.
    #[arg(long = "input-dir", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory receiving the reports, manifest and dashboard; served as the site root.
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// First port to try; the next free port above it is used when taken.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// HTML-escape case record fields before interpolating them.
    #[arg(long = "escape-html")]
    pub escape_html: bool,

    /// Report failing case files and continue with the rest.
    #[arg(long = "keep-going")]
    pub keep_going: bool,
}

impl Cli {
    #[must_use]
    pub fn layout(&self) -> SiteLayout {
        SiteLayout::new(&self.input_dir, &self.output_dir)
    }

    #[must_use]
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            render: RenderOptions {
                escape_html: self.escape_html,
            },
            keep_going: self.keep_going,
        }
    }

    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            generate: self.generate_options(),
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let layout = cli.layout();
    if cli.no_serve {
        run_generate(&layout, cli.generate_options())
    } else {
        run_server(&layout, &cli.server_config())
    }
}
