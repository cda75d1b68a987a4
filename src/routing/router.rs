//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in definition order
//! - Find the first route accepting a request and bind its arguments
//! - Flag non-canonical request paths for redirect
//! - Resolve links by route name or id
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in insertion order: first match wins
//! - Explicit NotFound rather than silent default
//! - The path of `base_url` is the mount point: it is stripped from inbound
//!   paths and put back on redirect targets
//! - A query value only shapes the canonical path when the placeholder's
//!   shortcut accepts it

use std::collections::HashMap;

use axum::http::Method;

use crate::http::request::{DispatchRequest, Payload};
use crate::routing::action::Invocation;
use crate::routing::builder::RouterBuilder;
use crate::routing::error::{DispatchError, LinkError};
use crate::routing::link;
use crate::routing::matcher::{self, normalize_path};
use crate::routing::params::Params;
use crate::routing::route::{Route, RouteId};
use crate::routing::shortcut::ShortcutCatalog;

/// Outcome of a dispatch.
#[derive(Debug)]
pub enum Dispatch<'r> {
    Matched(Match<'r>),
    NotFound,
}

impl<'r> Dispatch<'r> {
    pub fn matched(&self) -> Option<&Match<'r>> {
        match self {
            Dispatch::Matched(m) => Some(m),
            Dispatch::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Dispatch::NotFound)
    }
}

/// A route bound to a request.
#[derive(Debug)]
pub struct Match<'r> {
    pub route: &'r Route,
    /// Arguments for the handler: declared order, query extras, exclusions removed.
    pub args: Params,
    /// Same values before exclusions were removed.
    pub params: Params,
    /// Decoded body; only write routes decode one.
    pub payload: Payload,
    /// Canonical path of the route, relative to the mount point.
    pub canonical_path: String,
    /// Set when the request path differs from the canonical one; includes
    /// the mount point and the query string.
    pub redirect_to: Option<String>,
}

/// One entry of the ordered handler argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Argument<'a> {
    Body(&'a Payload),
    Param(&'a str, &'a str),
}

impl<'r> Match<'r> {
    pub fn invocation(&self) -> Invocation<'_> {
        Invocation {
            route: self.route,
            payload: &self.payload,
            args: &self.args,
            params: &self.params,
        }
    }

    /// Handler arguments in call order; write routes get the body first.
    pub fn arguments(&self) -> Vec<Argument<'_>> {
        let body = self
            .route
            .accepts_body()
            .then_some(Argument::Body(&self.payload));
        body.into_iter()
            .chain(self.args.iter().map(|(k, v)| Argument::Param(k, v)))
            .collect()
    }
}

/// Frozen route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
    ids: HashMap<RouteId, usize>,
    shortcuts: ShortcutCatalog,
    base_url: Option<String>,
    mount: String,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_parts(routes: Vec<Route>, shortcuts: ShortcutCatalog, base_url: Option<String>) -> Self {
        let names = routes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.name().map(|n| (n.to_string(), i)))
            .collect();
        let ids = routes.iter().enumerate().map(|(i, r)| (r.id(), i)).collect();
        let mount = mount_path(base_url.as_deref());
        tracing::info!(routes = routes.len(), mount = %mount, "Router frozen");
        Self {
            routes,
            names,
            ids,
            shortcuts,
            base_url,
            mount,
        }
    }

    /// Routes in match priority order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn shortcuts(&self) -> &ShortcutCatalog {
        &self.shortcuts
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Path of the base URL without its trailing slash; empty at the root.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Remove the mount point from a normalized path, if present.
    fn strip_mount<'p>(&self, path: &'p str) -> &'p str {
        if self.mount.is_empty() {
            return path;
        }
        match path.strip_prefix(self.mount.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }

    /// Look a route up by name, falling back to its id.
    pub fn route(&self, key: &str) -> Option<&Route> {
        let index = self
            .names
            .get(key)
            .or_else(|| key.parse::<RouteId>().ok().and_then(|id| self.ids.get(&id)))?;
        self.routes.get(*index)
    }

    /// Match a request against the table.
    pub fn dispatch(&self, request: &DispatchRequest) -> Result<Dispatch<'_>, DispatchError> {
        let normalized = normalize_path(&request.path);
        let path = self.strip_mount(&normalized);

        for route in &self.routes {
            if !route.accepts_method(&request.method, request.method_override.as_ref()) {
                continue;
            }
            let Some(mut params) = matcher::extract(route, path) else {
                continue;
            };

            let mut canonical_params = params.clone();
            for (name, value) in request.query.iter() {
                if !params.insert_if_absent(name, value) {
                    continue;
                }
                let fits = route
                    .dynamic_params()
                    .find(|p| p.name == name)
                    .map_or(true, |p| p.accepts(value));
                if fits {
                    canonical_params.insert(name, value);
                }
            }

            let canonical_path = match link::canonical_path(route, &canonical_params) {
                Ok(canonical) => canonical,
                Err(e) => {
                    tracing::warn!(route = %route.label(), error = %e, "Canonical path unavailable");
                    path.to_string()
                }
            };
            let redirect_to = (canonical_path != path).then(|| {
                let target = format!("{}{}", self.mount, canonical_path);
                if request.query.is_empty() {
                    target
                } else {
                    format!("{}?{}", target, request.query.to_query_string())
                }
            });

            let payload = if route.accepts_body() {
                request.payload()?
            } else {
                Payload::Empty
            };

            let args = params.without(route.excluded());

            tracing::debug!(
                route = %route.label(),
                method = %effective_method(request),
                path = %path,
                redirect = ?redirect_to,
                "Route matched"
            );

            return Ok(Dispatch::Matched(Match {
                route,
                args,
                params,
                payload,
                canonical_path,
                redirect_to,
            }));
        }

        tracing::debug!(method = %request.method, path = %path, "No route matched");
        Ok(Dispatch::NotFound)
    }

    /// Canonical path for a route name (or id) and parameters.
    pub fn link(&self, key: &str, params: &Params) -> Result<String, LinkError> {
        let route = self
            .route(key)
            .ok_or_else(|| LinkError::UnknownRoute(key.to_string()))?;
        link::canonical_path(route, params)
    }

    /// Like `link`, prefixed with the base URL when one is configured.
    pub fn url(&self, key: &str, params: &Params) -> Result<String, LinkError> {
        let path = self.link(key, params)?;
        Ok(match &self.base_url {
            Some(base) => link::absolute(base, &path),
            None => path,
        })
    }
}

fn mount_path(base_url: Option<&str>) -> String {
    base_url
        .and_then(|base| url::Url::parse(base).ok())
        .map(|url| url.path().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

fn effective_method(request: &DispatchRequest) -> &Method {
    match &request.method_override {
        Some(over) if request.method == Method::POST => over,
        _ => &request.method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let mut b = Router::builder();
        b.get("/users/{id::i}", "UserController@show").unwrap().name("users.show").unwrap();
        b.get("/posts/{locale::locale}", "PostController@index").unwrap().name("posts").unwrap();
        b.get("/articles/{page::i}?", "ArticleController@index").unwrap().name("articles").unwrap();
        b.delete("/widgets", "WidgetController@destroy").unwrap();
        b.post("/books", "BookController@store").unwrap().name("books.store").unwrap();
        b.build()
    }

    #[test]
    fn test_required_param_matched() {
        let router = router();
        let d = router.dispatch(&DispatchRequest::get("/users/42")).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.route.name(), Some("users.show"));
        assert_eq!(m.args.get("id"), Some("42"));
        assert_eq!(m.canonical_path, "/users/42");
        assert_eq!(m.redirect_to, None);
    }

    #[test]
    fn test_trailing_slash_same_args() {
        let router = router();
        let d = router.dispatch(&DispatchRequest::get("/users/42/")).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.args.get("id"), Some("42"));
        assert_eq!(m.redirect_to, None);
    }

    #[test]
    fn test_default_filled_and_canonical() {
        let router = router();
        let d = router.dispatch(&DispatchRequest::get("/posts")).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.args.get("locale"), Some("sk"));
        assert_eq!(m.canonical_path, "/posts");
        assert_eq!(m.redirect_to, None);
    }

    #[test]
    fn test_explicit_default_redirects_with_query() {
        let router = router();
        let req = DispatchRequest::get("/posts/sk").with_query("sort=new");
        let d = router.dispatch(&req).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.redirect_to.as_deref(), Some("/posts?sort=new"));
    }

    #[test]
    fn test_method_override() {
        let router = router();
        let req = DispatchRequest::post("/widgets").with_method_override(Method::DELETE);
        assert!(router.dispatch(&req).unwrap().matched().is_some());

        let req = DispatchRequest::post("/widgets");
        assert!(router.dispatch(&req).unwrap().is_not_found());
    }

    #[test]
    fn test_not_found() {
        let router = router();
        assert!(router.dispatch(&DispatchRequest::get("/nonexistent")).unwrap().is_not_found());
        // Path matches but method does not
        assert!(router.dispatch(&DispatchRequest::post("/users/1")).unwrap().is_not_found());
    }

    #[test]
    fn test_query_fills_but_does_not_override() {
        let router = router();
        let req = DispatchRequest::get("/users/42").with_query("id=7&expand=posts");
        let d = router.dispatch(&req).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.args.get("id"), Some("42"));
        assert_eq!(m.args.get("expand"), Some("posts"));
        assert_eq!(m.args.names().collect::<Vec<_>>(), vec!["id", "expand"]);
    }

    #[test]
    fn test_body_prepended_for_write_routes() {
        let router = router();
        let req = DispatchRequest::post("/books").with_body("application/json", r#"{"title":"Dune"}"#);
        let d = router.dispatch(&req).unwrap();
        let m = d.matched().unwrap();
        let args = m.arguments();
        assert_eq!(args.len(), 1);
        assert!(matches!(args[0], Argument::Body(Payload::Json(_))));
    }

    #[test]
    fn test_malformed_body_is_error() {
        let router = router();
        let req = DispatchRequest::post("/books").with_body("application/json", "{oops");
        assert!(matches!(router.dispatch(&req), Err(DispatchError::MalformedBody(_))));
    }

    #[test]
    fn test_get_ignores_body() {
        let router = router();
        let req = DispatchRequest::get("/users/1").with_body("application/json", "{oops");
        let d = router.dispatch(&req).unwrap();
        assert_eq!(d.matched().unwrap().arguments(), vec![Argument::Param("id", "1")]);
    }

    #[test]
    fn test_link_by_name_and_id() {
        let router = router();
        let params: Params = [("id", "5")].into_iter().collect();
        assert_eq!(router.link("users.show", &params).unwrap(), "/users/5");

        let widgets = router.routes().find(|r| r.template() == "/widgets").unwrap();
        assert_eq!(router.link(&widgets.id().to_string(), &Params::new()).unwrap(), "/widgets");

        assert_eq!(
            router.link("missing", &params),
            Err(LinkError::UnknownRoute("missing".into()))
        );
    }

    #[test]
    fn test_url_uses_base() {
        let mut b = Router::builder();
        b.base_url("https://example.com/app/");
        b.get("/a/{x}", "A@a").unwrap().name("a").unwrap();
        let router = b.build();
        let params: Params = [("x", "y")].into_iter().collect();
        assert_eq!(router.url("a", &params).unwrap(), "https://example.com/app/a/y");
    }

    fn mounted() -> Router {
        let mut b = Router::builder();
        b.base_url("https://example.com/app/");
        b.get("/", "Home@index").unwrap().name("home").unwrap();
        b.get("/a/{x}", "A@a").unwrap().name("a").unwrap();
        b.get("/posts/{locale::locale}", "PostController@index").unwrap();
        b.build()
    }

    #[test]
    fn test_mount_stripped_before_matching() {
        let router = mounted();
        assert_eq!(router.mount(), "/app");

        let params: Params = [("x", "y")].into_iter().collect();
        let url = router.url("a", &params).unwrap();
        let path = url.strip_prefix("https://example.com").unwrap();
        let d = router.dispatch(&DispatchRequest::get(path)).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.args.get("x"), Some("y"));
        assert_eq!(m.redirect_to, None);

        let d = router.dispatch(&DispatchRequest::get("/app")).unwrap();
        assert_eq!(d.matched().unwrap().route.name(), Some("home"));

        // Only a whole leading segment counts as the mount point.
        assert!(router.dispatch(&DispatchRequest::get("/apple/a/y")).unwrap().is_not_found());
    }

    #[test]
    fn test_redirect_keeps_mount() {
        let router = mounted();
        let req = DispatchRequest::get("/app/posts/sk").with_query("sort=new");
        let d = router.dispatch(&req).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.canonical_path, "/posts");
        assert_eq!(m.redirect_to.as_deref(), Some("/app/posts?sort=new"));
    }

    #[test]
    fn test_rejected_query_value_stays_out_of_redirect() {
        let router = router();
        let req = DispatchRequest::get("/articles").with_query("page=abc");
        let d = router.dispatch(&req).unwrap();
        let m = d.matched().unwrap();
        assert_eq!(m.args.get("page"), Some("abc"));
        assert_eq!(m.canonical_path, "/articles");
        assert_eq!(m.redirect_to, None);

        let req = DispatchRequest::get("/articles").with_query("page=3%0A");
        let d = router.dispatch(&req).unwrap();
        assert_eq!(d.matched().unwrap().redirect_to, None);

        let req = DispatchRequest::get("/articles").with_query("page=3");
        let d = router.dispatch(&req).unwrap();
        assert_eq!(d.matched().unwrap().redirect_to.as_deref(), Some("/articles/3?page=3"));
    }
}
