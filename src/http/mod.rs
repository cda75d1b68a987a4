//! HTTP adapter subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body limit, tracing)
//!     → request.rs (split URI, read override field, keep raw body)
//!     → routing::Router::dispatch
//!     → ActionRegistry::invoke
//!     → response.rs (JSON result, redirect, 404, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{DispatchRequest, Payload};
pub use response::DispatchSummary;
pub use server::HttpServer;
