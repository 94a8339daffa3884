//! Paste service entrypoint.

use pastejar::{config::Config, resolve_bind_address, serve_router, AppState, FsStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pastejar=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let store = FsStore::open(&config.data_dir)?;
    tracing::info!("storing items under {}", config.data_dir);

    let bind_addr = resolve_bind_address(&config);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - the service has no access control",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("pastejar running at http://{}", bind_addr);

    let state = AppState::new(config, store);
    serve_router(listener, state, shutdown_signal()).await?;

    Ok(())
}

fn print_help() {
    println!("pastejar server\n");
    println!("Usage: pastejar\n");
    println!("Environment variables:");
    println!("  DATA_DIR          Store directory (default: ~/.cache/pastejar/store)");
    println!("  PORT              Server port (default: 8787)");
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!("  BIND              Override bind address (e.g. 0.0.0.0:8787)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}
