//! Declarative URL route compiler and request dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!     route file / builder calls
//!     ─────────────────────────▶ config ──▶ routing::RouterBuilder ──▶ Router (frozen)
//!                                                                        │
//!     Client Request                                                     ▼
//!     ─────────────────────────▶ http::server ──▶ DispatchRequest ──▶ Router::dispatch
//!                                                                        │
//!     Client Response                                                    ▼
//!     ◀───────────────────────── http::response ◀── ActionRegistry ◀── Match / NotFound
//!
//!     Router::link / Router::url ──▶ canonical path (defaults elided)
//! ```
//!
//! # Example
//!
//! ```
//! use route_compiler::http::DispatchRequest;
//! use route_compiler::routing::{Params, Router};
//!
//! let mut builder = Router::builder();
//! builder
//!     .get("/posts/{locale::locale}/{id::i}", "PostController@show")
//!     .unwrap()
//!     .name("posts.show")
//!     .unwrap();
//! let router = builder.build();
//!
//! let dispatch = router.dispatch(&DispatchRequest::get("/posts/42")).unwrap();
//! let matched = dispatch.matched().unwrap();
//! assert_eq!(matched.args.get("locale"), Some("sk"));
//! assert_eq!(matched.args.get("id"), Some("42"));
//!
//! let params: Params = [("locale", "en"), ("id", "7")].into_iter().collect();
//! assert_eq!(router.link("posts.show", &params).unwrap(), "/posts/en/7");
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use routing::{Router, RouterBuilder};
