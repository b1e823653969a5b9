use std::process::ExitCode;

use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env before anything reads RUST_LOG or the config overrides
    dotenv().ok();
    let loaded = AppConfig::load_and_validate();
    let json = matches!(&loaded, Ok(cfg) if cfg.log.format == LogFormat::Json);
    common::utils::logging::init_logging(json);
    info!(service = "car-doctor", event = "logger_init", "tracing subscriber initialized");

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "car-doctor", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "car-doctor", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "car-doctor", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "car-doctor",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "server service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "car-doctor", event = "stop", %service_id, pid, "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "car-doctor", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
