//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every route and resource is complete
//! - Check method names, shortcut fragments and shortcut references
//! - Detect duplicate route names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system; template compilation
//!   errors still surface later as `DefinitionError`

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use regex::Regex;

use crate::config::schema::{ResourceConfig, RouteConfig, RouterConfig};
use crate::http::request::parse_method;
use crate::routing::shortcut::ShortcutCatalog;

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted location, e.g. `groups[0].routes[2].methods`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

struct Validator {
    shortcuts: ShortcutCatalog,
    names: HashSet<String>,
    errors: Vec<ValidationError>,
}

impl Validator {
    fn route(&mut self, field: &str, name_prefix: &str, route: &RouteConfig) {
        if route.template.trim().is_empty() {
            self.errors.push(ValidationError::new(format!("{field}.template"), "must not be empty"));
        }
        if route.action.trim().is_empty() {
            self.errors.push(ValidationError::new(format!("{field}.action"), "must not be empty"));
        }
        if route.methods.is_empty() {
            self.errors.push(ValidationError::new(format!("{field}.methods"), "must list at least one method"));
        }
        for method in &route.methods {
            if parse_method(method).is_none() {
                self.errors.push(ValidationError::new(
                    format!("{field}.methods"),
                    format!("unknown method '{method}'"),
                ));
            }
        }
        if let Some(name) = &route.name {
            self.name(field, format!("{name_prefix}{name}"));
        }
    }

    fn resource(&mut self, field: &str, name_prefix: &str, resource: &ResourceConfig) {
        if resource.path.trim().is_empty() {
            self.errors.push(ValidationError::new(format!("{field}.path"), "must not be empty"));
        }
        if resource.controller.trim().is_empty() {
            self.errors.push(ValidationError::new(format!("{field}.controller"), "must not be empty"));
        }
        if let Some(shortcut) = &resource.shortcut {
            if self.shortcuts.get(shortcut).is_none() {
                self.errors.push(ValidationError::new(
                    format!("{field}.shortcut"),
                    format!("unknown shortcut '{shortcut}'"),
                ));
            }
        }
        let prefix = format!("{}{}", name_prefix, resource.name.as_deref().unwrap_or(""));
        for suffix in ["index", "create", "store", "show", "edit", "update", "destroy", "destroy_"] {
            self.name(field, format!("{prefix}{suffix}"));
        }
    }

    fn name(&mut self, field: &str, full: String) {
        if !self.names.insert(full.clone()) {
            self.errors.push(ValidationError::new(
                format!("{field}.name"),
                format!("duplicate route name '{full}'"),
            ));
        }
    }
}

/// Check a parsed config for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut v = Validator {
        shortcuts: ShortcutCatalog::new(),
        names: HashSet::new(),
        errors: Vec::new(),
    };

    for (name, raw) in &config.shortcuts {
        v.shortcuts.register(name, raw);
        let fragment = &v.shortcuts.resolve(Some(name.as_str())).fragment;
        if let Err(e) = Regex::new(&format!("^(?:{fragment})$")) {
            v.errors.push(ValidationError::new(
                format!("shortcuts.{name}"),
                format!("invalid pattern: {e}"),
            ));
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        v.errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.method_override_field.is_empty() {
        v.errors.push(ValidationError::new("server.method_override_field", "must not be empty"));
    }
    if config.server.max_body_bytes == 0 {
        v.errors.push(ValidationError::new("server.max_body_bytes", "must be greater than 0"));
    }
    if let Some(base) = &config.base_url {
        if url::Url::parse(base).is_err() {
            v.errors.push(ValidationError::new("base_url", format!("'{base}' is not an absolute URL")));
        }
    }

    for (i, route) in config.routes.iter().enumerate() {
        v.route(&format!("routes[{i}]"), "", route);
    }
    for (i, resource) in config.resources.iter().enumerate() {
        v.resource(&format!("resources[{i}]"), "", resource);
    }
    for (g, group) in config.groups.iter().enumerate() {
        for (i, route) in group.routes.iter().enumerate() {
            v.route(&format!("groups[{g}].routes[{i}]"), &group.name, route);
        }
        for (i, resource) in group.resources.iter().enumerate() {
            v.resource(&format!("groups[{g}].resources[{i}]"), &group.name, resource);
        }
    }

    if v.errors.is_empty() {
        Ok(())
    } else {
        Err(v.errors)
    }
}
