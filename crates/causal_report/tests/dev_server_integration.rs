use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use causal_report::generate::{GenerateOptions, generate_site};
use causal_report::layout::SiteLayout;
use causal_report::manifest::ManifestEntry;
use causal_report::server::{bind_with_retry, serve};
use causal_report::util::CliOutput;
use tempfile::tempdir;
use tokio::sync::oneshot;

struct ServerHarness {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHarness {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn start_server(layout: SiteLayout) -> ServerHarness {
    let (port_tx, port_rx) = mpsc::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let join_handle = thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        runtime.block_on(async move {
            let listener = bind_with_retry("127.0.0.1", 0).await.expect("bind");
            let port = listener.local_addr().expect("local addr").port();
            port_tx.send(port).expect("send port");
            serve(listener, &layout, async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("serve");
        });
    });

    let port = port_rx.recv().expect("server port");
    ServerHarness {
        base_url: format!("http://127.0.0.1:{port}"),
        shutdown: Some(shutdown_tx),
        join_handle: Some(join_handle),
    }
}

fn write_case(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write case file");
}

fn fetch_manifest(base_url: &str) -> Vec<ManifestEntry> {
    let response =
        reqwest::blocking::get(format!("{base_url}/manifest.json")).expect("manifest request");
    assert!(response.status().is_success(), "status {}", response.status());
    serde_json::from_str(&response.text().expect("manifest body")).expect("manifest json")
}

#[test]
fn manifest_request_reflects_case_files_added_after_startup() {
    let temp = tempdir().expect("tempdir");
    let layout = SiteLayout::new(temp.path().join("example"), temp.path().join("reports"));
    fs::create_dir_all(&layout.input_dir).expect("mkdir input");
    write_case(&layout.input_dir, "daily_delayed_train.json", "{}");
    generate_site(&layout, GenerateOptions::default(), &CliOutput::new(false))
        .expect("initial site");

    let server = start_server(layout.clone());

    let before = fetch_manifest(&server.base_url);
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, "daily_delayed_train");

    write_case(&layout.input_dir, "mediation_example1.json", "{}");
    let after = fetch_manifest(&server.base_url);
    let ids: Vec<&str> = after.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["daily_delayed_train", "mediation_example1"]);
    assert_eq!(after[1].kind, "mediation");
    assert_eq!(after[1].name, "Example1");
}

#[test]
fn reports_and_dashboard_are_served_as_static_files() {
    let temp = tempdir().expect("tempdir");
    let layout = SiteLayout::new(temp.path().join("example"), temp.path().join("reports"));
    fs::create_dir_all(&layout.input_dir).expect("mkdir input");
    write_case(
        &layout.input_dir,
        "sports_vitality.json",
        r#"[{"variable_mapping": {"A": "rain"}, "edge_pairs": [["A", "B"]], "bidirected_pairs": []}]"#,
    );
    generate_site(&layout, GenerateOptions::default(), &CliOutput::new(false))
        .expect("initial site");

    let server = start_server(layout);

    let report = reqwest::blocking::get(format!("{}/sports_vitality.html", server.base_url))
        .expect("report request")
        .text()
        .expect("report body");
    assert!(report.contains("A[\"RAIN\"] --> B[\"B\"]"));

    let dashboard = reqwest::blocking::get(format!("{}/", server.base_url))
        .expect("dashboard request")
        .text()
        .expect("dashboard body");
    assert!(dashboard.contains("fetch('manifest.json'"));

    let missing = reqwest::blocking::get(format!("{}/nope.html", server.base_url))
        .expect("missing request");
    assert_eq!(missing.status().as_u16(), 404);
}

#[test]
fn manifest_request_empties_when_input_directory_is_removed() {
    let temp = tempdir().expect("tempdir");
    let layout = SiteLayout::new(temp.path().join("example"), temp.path().join("reports"));
    fs::create_dir_all(&layout.input_dir).expect("mkdir input");
    write_case(&layout.input_dir, "a_b.json", "{}");
    generate_site(&layout, GenerateOptions::default(), &CliOutput::new(false))
        .expect("initial site");

    let server = start_server(layout.clone());
    assert_eq!(fetch_manifest(&server.base_url).len(), 1);

    fs::remove_dir_all(&layout.input_dir).expect("remove input");
    assert!(fetch_manifest(&server.base_url).is_empty());
}
