//! HTTP paste-sharing service: submit text, get a URL, fetch it back as a
//! streamed HTML document.

/// Configuration loading and defaults.
pub mod config;
/// HTTP error mapping.
pub mod error;
/// Request handlers.
pub mod handlers;
/// Item key generation.
pub mod keys;
/// Streamed response production.
pub mod relay;
/// Fixed documents and streaming fragments.
pub mod render;
/// Content escaping.
pub mod sanitize;
/// Object store interface and backends.
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use store::{FsStore, MemStore, ObjectStore};

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `store`: Object store backend.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, store: impl ObjectStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// The route table realizes the request classification: GET and POST are the
/// only supported methods anywhere, so each route carries a method fallback
/// answering 405 with `Allow: GET,POST`.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    let max_body = state.config.max_paste_size;
    Router::new()
        .route(
            "/",
            get(handlers::show_form)
                .post(handlers::create_item)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/*key",
            get(handlers::get_item)
                .post(handlers::create_item)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_body))
                .layer(TraceLayer::new_for_http()),
        )
}

/// Resolve the listener address from the `BIND` override or the configured
/// port.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
///
/// # Returns
/// The socket address to bind; invalid overrides are logged and fall back to
/// loopback on the configured port.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    bind_address_from(std::env::var("BIND").ok().as_deref(), config.port)
}

fn bind_address_from(requested: Option<&str>, port: u16) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], port));
    match requested {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    }
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::bind_address_from;
    use std::net::SocketAddr;

    #[test]
    fn bind_defaults_to_loopback_on_configured_port() {
        assert_eq!(
            bind_address_from(None, 8787),
            SocketAddr::from(([127, 0, 0, 1], 8787))
        );
    }

    #[test]
    fn bind_override_is_honored() {
        assert_eq!(
            bind_address_from(Some("0.0.0.0:9000"), 8787),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn invalid_bind_override_falls_back() {
        assert_eq!(
            bind_address_from(Some("bad:host"), 8787),
            SocketAddr::from(([127, 0, 0, 1], 8787))
        );
    }
}
