//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Definition (at startup or reload):
//!     template + action + methods
//!     → shortcut.rs (resolve placeholder types)
//!     → pattern.rs (compile matching regex + parameter specs)
//!     → builder.rs (apply group scope, naming, resources)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path, query, body):
//!     → router.rs (ordered scan, method + regex filter)
//!     → matcher.rs (bind segments to parameters, fill defaults)
//!     → link.rs (canonical path, redirect decision)
//!     → Return: Match or NotFound
//!
//! Link Generation:
//!     route name or id + parameters
//!     → link.rs (canonical path, defaults elided)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at definition time, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (definition order; naming moves a route last)
//! - Matching and link generation share one notion of canonical form

pub mod action;
pub mod builder;
pub mod error;
pub mod link;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod route;
pub mod router;
pub mod shortcut;

pub use action::{Action, ActionRegistry, Handler, Invocation};
pub use builder::{RouteHandle, RouterBuilder};
pub use error::{DefinitionError, DispatchError, LinkError};
pub use params::Params;
pub use route::{Route, RouteId};
pub use router::{Argument, Dispatch, Match, Router};
pub use shortcut::{Shortcut, ShortcutCatalog};
