//! Response shaping for dispatch outcomes.
//!
//! # Responsibilities
//! - Turn redirects, misses and dispatch errors into HTTP responses
//! - Summarize a match in a serializable form (CLI and diagnostics)
//!
//! # Design Decisions
//! - Non-canonical paths get 302 Found with a Location header
//! - A malformed body is the client's fault (400); an uninvocable action
//!   is the table's fault (500)
//! - Error bodies are JSON objects with an `error` field

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::http::request::{DispatchRequest, Payload};
use crate::routing::error::DispatchError;
use crate::routing::params::Params;
use crate::routing::router::Match;

/// 302 Found pointing at `location`.
pub fn redirect(location: &str) -> Response {
    tracing::debug!(location = %location, "Redirecting to canonical path");
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 404 for a request no route accepted.
pub fn not_found(request: &DispatchRequest) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "no route matched",
            "method": request.method.as_str(),
            "path": request.path,
        })),
    )
        .into_response()
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            DispatchError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            DispatchError::ActionNotInvocable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Serializable view of a `Match`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub route: String,
    pub name: Option<String>,
    pub template: String,
    pub action: String,
    pub args: Params,
    pub params: Params,
    pub payload: Payload,
    pub canonical_path: String,
    pub redirect_to: Option<String>,
}

impl From<&Match<'_>> for DispatchSummary {
    fn from(m: &Match<'_>) -> Self {
        Self {
            route: m.route.id().to_string(),
            name: m.route.name().map(str::to_string),
            template: m.route.template().to_string(),
            action: m.route.action().describe(),
            args: m.args.clone(),
            params: m.params.clone(),
            payload: m.payload.clone(),
            canonical_path: m.canonical_path.clone(),
            redirect_to: m.redirect_to.clone(),
        }
    }
}
