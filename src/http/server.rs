//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router that feeds every request to the dispatcher
//! - Wire up middleware (tracing)
//! - Bind server to listener with graceful shutdown
//! - Swap in route tables compiled by the config watcher
//!
//! # Design Decisions
//! - The route table lives behind `ArcSwap`: readers never block and a
//!   reload is a single pointer store
//! - Only compiled tables arrive here; a route file that failed to
//!   compile never leaves the watcher
//! - Server settings (override field, body limit) are fixed at startup

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::config::schema::ServerConfig;
use crate::http::request::DispatchRequest;
use crate::http::response;
use crate::routing::{ActionRegistry, Dispatch, Router};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ArcSwap<Router>>,
    pub actions: Arc<ActionRegistry>,
    pub override_field: Arc<str>,
    pub max_body_bytes: usize,
}

/// HTTP front end for a route table.
pub struct HttpServer {
    app: axum::Router,
    router: Arc<ArcSwap<Router>>,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` with handlers from `actions`.
    pub fn new(router: Router, actions: ActionRegistry, config: &ServerConfig) -> Self {
        let router = Arc::new(ArcSwap::from_pointee(router));
        let state = AppState {
            router: router.clone(),
            actions: Arc::new(actions),
            override_field: Arc::from(config.method_override_field.as_str()),
            max_body_bytes: config.max_body_bytes,
        };

        let app = axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { app, router }
    }

    /// The Axum application, for embedding or in-process testing.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Shared handle to the live route table.
    pub fn router_handle(&self) -> Arc<ArcSwap<Router>> {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// When `updates` is given, every router received replaces the route
    /// table.
    pub async fn run(
        self,
        listener: TcpListener,
        updates: Option<mpsc::UnboundedReceiver<Router>>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.router.load().len(),
            "HTTP server starting"
        );

        if let Some(updates) = updates {
            tokio::spawn(apply_updates(self.router.clone(), updates));
        }

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in each incoming table until the sender goes away.
pub async fn apply_updates(router: Arc<ArcSwap<Router>>, mut updates: mpsc::UnboundedReceiver<Router>) {
    while let Some(next) = updates.recv().await {
        tracing::info!(routes = next.len(), mount = %next.mount(), "Route table reloaded");
        router.store(Arc::new(next));
    }
}

/// Dispatch every request through the route table.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit = state.max_body_bytes, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let uri = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let request = DispatchRequest::from_parts(parts.method.clone(), uri, content_type, body, &state.override_field);

    let router = state.router.load_full();
    let matched = match router.dispatch(&request) {
        Ok(Dispatch::Matched(m)) => m,
        Ok(Dispatch::NotFound) => return response::not_found(&request),
        Err(e) => {
            tracing::warn!(path = %request.path, error = %e, "Dispatch failed");
            return e.into_response();
        }
    };

    if let Some(location) = &matched.redirect_to {
        return response::redirect(location);
    }

    match state.actions.invoke(&matched) {
        Ok(value) => Json(value).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
