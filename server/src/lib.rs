//! In-memory items API with a randomly failing test endpoint.
//!
//! # Overview
//! `app` builds the axum router: an explicit routing table over the handlers
//! in `handlers`, wrapped in CORS, request tracing, and panic catching.
//! All state lives in an `AppState` injected into the router; nothing is
//! global, and everything resets when the process restarts.

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod simulate;
pub mod state;
pub mod store;

use std::future::Future;

use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use envelope::Envelope;
pub use error::ApiError;
pub use handlers::{CreateItemRequest, ServiceInfo, TestData};
pub use simulate::{Delays, Outcome, RandomSource, SeededRandom, ThreadRandom};
pub use state::AppState;
pub use store::{Item, ItemStore};

/// Router with the default CORS origins.
pub fn app(state: AppState) -> Router {
    app_with_origins(state, config::DEFAULT_CORS_ORIGINS.as_slice())
}

pub fn app_with_origins<S: AsRef<str>>(state: AppState, origins: &[S]) -> Router {
    with_middleware(routes(state), origins)
}

/// The routing table with its state applied, before any middleware.
pub fn routes(state: AppState) -> Router {
    // a known path with an unsupported method is as unmatched as an unknown path
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route("/api/items/{id}", delete(handlers::delete_item))
        .route("/api/test", get(handlers::test_outcome))
        .fallback(handlers::endpoint_not_found)
        .method_not_allowed_fallback(handlers::endpoint_not_found)
        .with_state(state)
}

/// Wraps `router` in panic catching, request tracing and CORS, outermost last.
pub fn with_middleware<S: AsRef<str>>(router: Router, origins: &[S]) -> Router {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.as_ref()).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve the API built from `config` on `listener` until `shutdown` resolves.
pub async fn run<F>(
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(config.delays);
    let router = app_with_origins(state, config.cors_origins.as_slice());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
