pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod db;
pub mod models;
pub mod routes;
pub mod extract;
pub mod lifecycle;
pub mod qr;
pub mod store;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::lifecycle::EndpointManager;
use crate::qr::QrEncoder;
use crate::state::{AppState, SharedState};
use crate::store::EndpointStore;

/// Build the router around an already-constructed store. The returned state
/// owns the store; call `state.endpoints.close()` once the server has stopped.
pub fn build_app(store: Arc<dyn EndpointStore>, config: Config) -> (Router, SharedState) {
    let encoder = QrEncoder::new(config.qr_module_size);
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        endpoints: EndpointManager::new(store, encoder),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("no-referrer"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
