//! Definition-phase route registry.
//!
//! # Responsibilities
//! - Compile templates into routes under the current group scope
//! - Name routes through the handle returned by each definition
//! - Expand resource declarations into their conventional routes
//! - Turn a `RouterConfig` into definitions
//!
//! # Design Decisions
//! - The builder is the only mutable form of a route table; `build`
//!   consumes it and returns an immutable `Router`
//! - Group scopes form a stack: nested prefixes and names concatenate,
//!   exclusions accumulate, and a scope is popped even when its body fails
//! - Every definition fault is returned immediately; nothing is skipped

use std::collections::BTreeSet;

use axum::http::Method;

use crate::config::schema::{GroupConfig, ResourceConfig, RouteConfig, RouterConfig};
use crate::http::request::parse_method;
use crate::routing::action::Action;
use crate::routing::error::DefinitionError;
use crate::routing::pattern;
use crate::routing::route::{Route, RouteId};
use crate::routing::router::Router;
use crate::routing::shortcut::{ShortcutCatalog, WORD};

/// Ambient state applied to routes defined inside a group.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    name: String,
    excluded: BTreeSet<String>,
}

impl Scope {
    fn nest(&self, prefix: &str, name: &str, excluded: &[String]) -> Self {
        let mut combined = self.excluded.clone();
        combined.extend(excluded.iter().cloned());
        Self {
            prefix: join_path(&self.prefix, prefix),
            name: format!("{}{}", self.name, name),
            excluded: combined,
        }
    }
}

/// Join two template fragments with exactly one slash between them.
fn join_path(prefix: &str, template: &str) -> String {
    match (prefix.trim_end_matches('/'), template.trim_start_matches('/')) {
        ("", rest) => format!("/{rest}"),
        (head, "") => head.to_string(),
        (head, rest) => format!("{head}/{rest}"),
    }
}

/// Mutable route table used while routes are being defined.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    shortcuts: ShortcutCatalog,
    routes: Vec<Route>,
    scopes: Vec<Scope>,
    base_url: Option<String>,
}

/// Handle to a route just defined.
pub struct RouteHandle<'b> {
    builder: &'b mut RouterBuilder,
    index: usize,
}

impl RouteHandle<'_> {
    pub fn id(&self) -> RouteId {
        self.builder.routes[self.index].id()
    }

    /// Name the route `<group name prefix><suffix>`.
    ///
    /// The route moves to the end of the match order. Take `id()` first if
    /// the id is needed.
    pub fn name(self, suffix: &str) -> Result<(), DefinitionError> {
        let full = format!("{}{}", self.builder.scope().name, suffix);
        let taken = self
            .builder
            .routes
            .iter()
            .enumerate()
            .any(|(i, r)| i != self.index && r.name() == Some(full.as_str()));
        if taken {
            return Err(DefinitionError::DuplicateName(full));
        }

        let mut route = self.builder.routes.remove(self.index);
        tracing::debug!(route = %route.id(), name = %full, "Route named");
        route.name = Some(full);
        self.builder.routes.push(route);
        Ok(())
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a shortcut; `raw` may end in `->default`.
    pub fn add_shortcut(&mut self, name: &str, raw: &str) -> &mut Self {
        self.shortcuts.register(name, raw);
        self
    }

    /// Base URL used by `Router::url`.
    pub fn base_url(&mut self, url: &str) -> &mut Self {
        self.base_url = Some(url.to_string());
        self
    }

    fn scope(&self) -> Scope {
        self.scopes.last().cloned().unwrap_or_default()
    }

    /// Define a route accepting `methods`.
    pub fn route(
        &mut self,
        template: &str,
        action: impl Into<Action>,
        methods: &[Method],
    ) -> Result<RouteHandle<'_>, DefinitionError> {
        let scope = self.scope();
        let full = join_path(&scope.prefix, template);
        let compiled = pattern::compile(&full, &self.shortcuts)?;
        let route = Route::new(full, compiled, methods.to_vec(), action.into(), scope.excluded);

        tracing::debug!(
            route = %route.id(),
            template = %route.template(),
            methods = ?route.methods(),
            action = %route.action().describe(),
            "Route defined"
        );

        self.routes.push(route);
        Ok(RouteHandle {
            index: self.routes.len() - 1,
            builder: self,
        })
    }

    pub fn get(&mut self, template: &str, action: impl Into<Action>) -> Result<RouteHandle<'_>, DefinitionError> {
        self.route(template, action, &[Method::GET])
    }

    pub fn post(&mut self, template: &str, action: impl Into<Action>) -> Result<RouteHandle<'_>, DefinitionError> {
        self.route(template, action, &[Method::POST])
    }

    pub fn put(&mut self, template: &str, action: impl Into<Action>) -> Result<RouteHandle<'_>, DefinitionError> {
        self.route(template, action, &[Method::PUT])
    }

    pub fn delete(&mut self, template: &str, action: impl Into<Action>) -> Result<RouteHandle<'_>, DefinitionError> {
        self.route(template, action, &[Method::DELETE])
    }

    /// GET, POST, PUT and DELETE.
    pub fn any(&mut self, template: &str, action: impl Into<Action>) -> Result<RouteHandle<'_>, DefinitionError> {
        self.route(
            template,
            action,
            &[Method::GET, Method::POST, Method::PUT, Method::DELETE],
        )
    }

    /// Run `body` with a path prefix, name prefix and excluded parameters.
    pub fn group<F>(&mut self, prefix: &str, name: &str, excluded: &[String], body: F) -> Result<(), DefinitionError>
    where
        F: FnOnce(&mut Self) -> Result<(), DefinitionError>,
    {
        let scope = self.scope().nest(prefix, name, excluded);
        self.scopes.push(scope);
        let result = body(self);
        self.scopes.pop();
        result
    }

    /// `group` with only a path prefix.
    pub fn prefix<F>(&mut self, prefix: &str, body: F) -> Result<(), DefinitionError>
    where
        F: FnOnce(&mut Self) -> Result<(), DefinitionError>,
    {
        self.group(prefix, "", &[], body)
    }

    /// Define the eight conventional CRUD routes for `controller` under `base`.
    ///
    /// Routes are named `<name>index`, `<name>create`, … within the current
    /// name prefix; `shortcut` types the `id` placeholder (word by default).
    pub fn resource(
        &mut self,
        base: &str,
        controller: &str,
        name: Option<&str>,
        shortcut: Option<&str>,
    ) -> Result<(), DefinitionError> {
        let base = base.trim_end_matches('/');
        let member = format!("{}/{{id::{}}}", base, shortcut.unwrap_or(WORD));
        let action = |method: &str| Action::controller(controller, method);

        self.group("", name.unwrap_or(""), &[], |b| {
            b.get(&format!("{base}/{{page::paginator}}?"), action("index"))?.name("index")?;
            b.get(&format!("{base}/create"), action("create"))?.name("create")?;
            b.post(base, action("store"))?.name("store")?;
            b.get(&member, action("show"))?.name("show")?;
            b.get(&format!("{member}/edit"), action("edit"))?.name("edit")?;
            b.put(&member, action("update"))?.name("update")?;
            b.delete(&member, action("destroy"))?.name("destroy")?;
            b.get(&format!("{member}/delete"), action("destroy"))?.name("destroy_")?;
            Ok(())
        })
    }

    /// Number of routes defined so far.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the table.
    pub fn build(self) -> Router {
        Router::from_parts(self.routes, self.shortcuts, self.base_url)
    }

    /// Define everything a config file describes.
    ///
    /// Order: shortcuts, routes, resources, then groups.
    pub fn from_config(config: &RouterConfig) -> Result<Self, DefinitionError> {
        let mut builder = Self::new();
        if let Some(base) = &config.base_url {
            builder.base_url(base);
        }
        for (name, raw) in &config.shortcuts {
            builder.add_shortcut(name, raw);
        }
        builder.define_routes(&config.routes)?;
        builder.define_resources(&config.resources)?;
        for group in &config.groups {
            builder.define_group(group)?;
        }
        Ok(builder)
    }

    fn define_routes(&mut self, routes: &[RouteConfig]) -> Result<(), DefinitionError> {
        for route in routes {
            let methods = route
                .methods
                .iter()
                .map(|m| parse_method(m).ok_or_else(|| DefinitionError::UnknownMethod(m.clone())))
                .collect::<Result<Vec<_>, _>>()?;
            let handle = self.route(&route.template, route.action.as_str(), &methods)?;
            if let Some(name) = &route.name {
                handle.name(name)?;
            }
        }
        Ok(())
    }

    fn define_resources(&mut self, resources: &[ResourceConfig]) -> Result<(), DefinitionError> {
        for resource in resources {
            self.resource(
                &resource.path,
                &resource.controller,
                resource.name.as_deref(),
                resource.shortcut.as_deref(),
            )?;
        }
        Ok(())
    }

    fn define_group(&mut self, group: &GroupConfig) -> Result<(), DefinitionError> {
        self.group(&group.prefix, &group.name, &group.exclude, |b| {
            b.define_routes(&group.routes)?;
            b.define_resources(&group.resources)
        })
    }
}
