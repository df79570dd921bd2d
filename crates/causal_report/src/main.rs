#![forbid(unsafe_code)]

fn main() {
    causal_report::logging::init_tracing();
    let integration = causal_report::util::OutputIntegration::detect();
    if let Err(error) = causal_report::run_from_env() {
        if integration.should_emit_json() {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                    "integration": integration,
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
