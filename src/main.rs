use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

mod bfhl;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_args(std::env::args().skip(1));
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Multi-thread runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    logger::log_runtime_workers(cfg.server.workers);

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let grace = Duration::from_secs(cfg.performance.write_timeout);
    let state = Arc::new(config::AppState::new(cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::new(Notify::new());

    server::start_signal_handler(Arc::clone(&shutdown));
    server::start_server_loop(listener, state, Arc::clone(&active_connections), shutdown).await;

    let remaining = server::wait_for_drain(&active_connections, grace).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutting down with {remaining} connection(s) still open"
        ));
    }
    Ok(())
}

/// `-c <path>` / `--config <path>` / `--config=<path>`, else the default stem
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            if let Some(path) = args.next() {
                return path;
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    config::DEFAULT_CONFIG_PATH.to_string()
}
