//! Configuration schema definitions.
//!
//! This module defines the route table file format. All types derive Serde
//! traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::http::request::DEFAULT_OVERRIDE_FIELD;

/// Root configuration for a route table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix for absolute links (e.g., "https://example.com/app").
    pub base_url: Option<String>,

    /// HTTP adapter settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Extra shortcuts: name → `regex` or `regex->default`.
    pub shortcuts: BTreeMap<String, String>,

    /// Individual route definitions.
    pub routes: Vec<RouteConfig>,

    /// Resource declarations, each expanding to eight routes.
    pub resources: Vec<ResourceConfig>,

    /// Groups sharing a prefix, name prefix and exclusions.
    pub groups: Vec<GroupConfig>,
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Form field carrying the method override on POST.
    pub method_override_field: String,

    /// Largest request body read, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            method_override_field: DEFAULT_OVERRIDE_FIELD.to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A single route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path template, e.g. `/users/{id::i}`.
    pub template: String,

    /// `Controller@method` or a registered function name.
    pub action: String,

    /// Accepted methods (default: GET and POST).
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Optional name, appended to the enclosing group's name prefix.
    pub name: Option<String>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string()]
}

/// A CRUD resource.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Base path, e.g. `/books`.
    pub path: String,

    /// Controller receiving the eight conventional methods.
    pub controller: String,

    /// Name prefix for the generated routes, e.g. `books.`.
    pub name: Option<String>,

    /// Shortcut typing the `id` segment (default: word).
    pub shortcut: Option<String>,
}

/// A group of routes sharing ambient settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GroupConfig {
    /// Path prefix, may contain placeholders.
    pub prefix: String,

    /// Name prefix.
    pub name: String,

    /// Parameters withheld from handler arguments.
    pub exclude: Vec<String>,

    pub routes: Vec<RouteConfig>,

    pub resources: Vec<ResourceConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.server.method_override_field, "_method");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_config_parses() {
        let raw = r#"
            base_url = "https://example.com"

            [server]
            bind_address = "0.0.0.0:3000"

            [shortcuts]
            slug = "([a-z0-9-]+)"

            [[routes]]
            template = "/users/{id::i}"
            action = "UserController@show"
            methods = ["GET"]
            name = "users.show"

            [[resources]]
            path = "/books"
            controller = "BookController"
            name = "books."

            [[groups]]
            prefix = "/{locale::locale}"
            name = "l10n."
            exclude = ["locale"]

            [[groups.routes]]
            template = "/about"
            action = "PageController@about"
        "#;
        let config: RouterConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.shortcuts["slug"], "([a-z0-9-]+)");
        assert_eq!(config.routes[0].methods, vec!["GET"]);
        assert_eq!(config.resources[0].name.as_deref(), Some("books."));
        assert_eq!(config.groups[0].routes[0].methods, vec!["GET", "POST"]);
        assert_eq!(config.groups[0].exclude, vec!["locale"]);
    }
}
