//! Development server: serves the output directory and rebuilds the
//! manifest whenever it is requested.

use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::dashboard::write_dashboard;
use crate::error::{ReportError, Result};
use crate::generate::{GenerateOptions, generate_site};
use crate::layout::SiteLayout;
use crate::manifest::{build_manifest, rewrite_manifest};
use crate::util::{CliOutput, OutputIntegration, ensure_dir, output_for};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// First port tried; occupied ports are skipped upwards.
    pub port: u16,
    pub generate: GenerateOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            generate: GenerateOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct ManifestRefresh {
    input_dir: Arc<PathBuf>,
    manifest_path: Arc<PathBuf>,
    route: Arc<str>,
}

/// Binds the first free port at or above `start_port`.
pub async fn bind_with_retry(host: &str, start_port: u16) -> Result<TcpListener> {
    let mut port = start_port;
    loop {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(error) if error.kind() == ErrorKind::AddrInUse => {
                info!(port, "port in use, trying the next one");
                port = port.checked_add(1).ok_or_else(|| {
                    ReportError::invalid(format!("no free port at or above {start_port}"))
                })?;
            }
            Err(error) => return Err(error.into()),
        }
    }
}

async fn refresh_manifest(
    State(refresh): State<ManifestRefresh>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::GET && request.uri().path() == &*refresh.route {
        let input_dir = Arc::clone(&refresh.input_dir);
        let manifest_path = Arc::clone(&refresh.manifest_path);
        let rebuilt = tokio::task::spawn_blocking(move || {
            rewrite_manifest(&input_dir, &manifest_path)
        })
        .await;

        let failure = match rebuilt {
            Ok(Ok(entries)) => {
                info!(entries = entries.len(), "manifest regenerated");
                None
            }
            Ok(Err(error)) => Some(error.to_string()),
            Err(join_error) => Some(join_error.to_string()),
        };
        if let Some(message) = failure {
            error!(%message, "manifest regeneration failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, message).into_response();
        }
    }

    next.run(request).await
}

/// Static file service over the output directory with the manifest
/// interception layer in front of it.
pub fn router(layout: &SiteLayout) -> Router {
    let refresh = ManifestRefresh {
        input_dir: Arc::new(layout.input_dir.clone()),
        manifest_path: Arc::new(layout.manifest_path()),
        route: Arc::from(SiteLayout::manifest_route()),
    };

    Router::new()
        .fallback_service(ServeDir::new(&layout.output_dir))
        .layer(middleware::from_fn_with_state(refresh, refresh_manifest))
        .layer(TraceLayer::new_for_http())
}

/// Serves until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, layout: &SiteLayout, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(layout))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Writes reports, manifest and dashboard before serving. Individual bad
/// case files are logged and skipped so one file cannot keep the server down.
pub fn prepare_site(layout: &SiteLayout, options: GenerateOptions, ui: &CliOutput) -> Result<()> {
    if !layout.input_dir.is_dir() {
        warn!(
            input_dir = %layout.input_dir.display(),
            "input directory missing, serving an empty corpus"
        );
        ensure_dir(&layout.output_dir)?;
        build_manifest(&layout.input_dir, &layout.manifest_path())?;
        return write_dashboard(&layout.dashboard_path());
    }

    let options = GenerateOptions {
        keep_going: true,
        ..options
    };
    let summary = generate_site(layout, options, ui)?;
    if !summary.failures.is_empty() {
        warn!(
            failures = summary.failures.len(),
            "some case files could not be rendered"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

pub fn run_server(layout: &SiteLayout, config: &ServerConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    let ui = output_for(&integration);

    prepare_site(layout, config.generate, &ui)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(listen(layout, config, &integration, &ui))
}

async fn listen(
    layout: &SiteLayout,
    config: &ServerConfig,
    integration: &OutputIntegration,
    ui: &CliOutput,
) -> Result<()> {
    let listener = bind_with_retry(&config.host, config.port).await?;
    let url = format!("http://{}/", listener.local_addr()?);
    ui.success(&format!("Serving {} at {url}", layout.output_dir.display()));

    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "serve",
                "status": "listening",
                "url": url,
                "root": layout.output_dir.display().to_string(),
                "integration": integration,
            })
        );
    }

    serve(listener, layout, shutdown_signal()).await
}
