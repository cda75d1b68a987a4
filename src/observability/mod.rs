//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing and http subsystems produce:
//!     → tracing events (definition, match, redirect, reload)
//!     → logging.rs (EnvFilter + fmt layer to stdout)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never formatted strings alone
//! - Definition events at debug, per-request events at debug,
//!   lifecycle events at info, failures at warn/error

pub mod logging;

pub use logging::init;
