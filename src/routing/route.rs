//! Compiled route definition.

use std::collections::BTreeSet;
use std::fmt;

use axum::http::Method;
use regex::Regex;
use uuid::Uuid;

use crate::routing::action::Action;
use crate::routing::pattern::{CompiledPattern, DynamicParam, ParamSpec};

/// Opaque, stable identifier assigned when a route is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(Uuid);

impl RouteId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl std::str::FromStr for RouteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    template: String,
    pattern: Regex,
    params: Vec<ParamSpec>,
    methods: Vec<Method>,
    action: Action,
    excluded: BTreeSet<String>,
    pub(crate) name: Option<String>,
}

impl Route {
    pub(crate) fn new(
        template: String,
        compiled: CompiledPattern,
        methods: Vec<Method>,
        action: Action,
        excluded: BTreeSet<String>,
    ) -> Self {
        Self {
            id: RouteId::new(),
            template,
            pattern: compiled.regex,
            params: compiled.params,
            methods,
            action,
            excluded,
            name: None,
        }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Full template, including any group prefix.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if set, otherwise the id. Used in logs and errors.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn dynamic_params(&self) -> impl Iterator<Item = &DynamicParam> {
        self.params.iter().filter_map(ParamSpec::as_dynamic)
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Parameter names stripped before invocation.
    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Whether the request method, or a POST override, is accepted.
    pub fn accepts_method(&self, method: &Method, method_override: Option<&Method>) -> bool {
        if self.methods.contains(method) {
            return true;
        }
        *method == Method::POST && method_override.is_some_and(|m| self.methods.contains(m))
    }

    /// Whether the route takes a request body (POST, PUT or DELETE).
    pub fn accepts_body(&self) -> bool {
        self.methods
            .iter()
            .any(|m| *m == Method::POST || *m == Method::PUT || *m == Method::DELETE)
    }
}
