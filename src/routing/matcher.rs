//! Parameter extraction for a route whose pattern accepted a path.
//!
//! # Responsibilities
//! - Read each placeholder's value from the route regex's captures
//! - Fill defaults, order by declaration
//!
//! # Algorithm
//! ```text
//! capture       run the route regex once; placeholder j reads group `pj`
//! default fill  placeholders whose group did not participate take their
//!               default, or stay unbound when optional
//! ```
//!
//! # Design Decisions
//! - The regex alone decides which segment feeds which placeholder, so a
//!   value spelled like a later literal still binds by position
//! - Among several assignments the regex picks the leftmost-first one:
//!   an elidable placeholder takes a segment only if the rest still matches

use crate::routing::params::Params;
use crate::routing::route::Route;

/// Trim surrounding slashes and re-root: `/users/42/` → `/users/42`, `` → `/`.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Bind the parameters of `route` from an already normalized `path`.
///
/// Returns `None` when the route's pattern does not accept the path.
pub fn extract(route: &Route, path: &str) -> Option<Params> {
    let captures = route.pattern().captures(path)?;

    let mut params = Params::new();
    for param in route.params().iter().filter_map(|spec| spec.as_dynamic()) {
        match (captures.name(param.group()), param.default.as_deref()) {
            (Some(value), _) => params.insert(param.name.as_str(), value.as_str()),
            (None, Some(default)) => params.insert(param.name.as_str(), default),
            (None, None) if param.optional => {}
            (None, None) => {
                tracing::debug!(
                    route = %route.label(),
                    param = %param.name,
                    "Required parameter unbound, skipping route"
                );
                return None;
            }
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::Method;

    use super::*;
    use crate::routing::action::Action;
    use crate::routing::pattern::compile;
    use crate::routing::shortcut::ShortcutCatalog;

    fn route(template: &str) -> Route {
        let mut catalog = ShortcutCatalog::new();
        catalog.register("slug", "([a-z-]+)");
        let compiled = compile(template, &catalog).unwrap();
        Route::new(
            template.to_string(),
            compiled,
            vec![Method::GET],
            Action::from("T@t"),
            BTreeSet::new(),
        )
    }

    fn pairs(params: &Params) -> Vec<(&str, &str)> {
        params.iter().collect()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/42/"), "/users/42");
        assert_eq!(normalize_path("users"), "/users");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_required_param() {
        let r = route("/users/{id::i}");
        let params = extract(&r, "/users/42").unwrap();
        assert_eq!(pairs(&params), vec![("id", "42")]);
    }

    #[test]
    fn test_static_after_dynamic() {
        let r = route("/books/{id::s}/edit");
        let params = extract(&r, "/books/dune/edit").unwrap();
        assert_eq!(pairs(&params), vec![("id", "dune")]);
    }

    #[test]
    fn test_default_fill() {
        let r = route("/posts/{locale::locale}");
        assert_eq!(pairs(&extract(&r, "/posts").unwrap()), vec![("locale", "sk")]);
        assert_eq!(pairs(&extract(&r, "/posts/en").unwrap()), vec![("locale", "en")]);
    }

    #[test]
    fn test_optional_without_default_stays_unbound() {
        let r = route("/articles/{page::i}?");
        assert!(extract(&r, "/articles").unwrap().is_empty());
        assert_eq!(pairs(&extract(&r, "/articles/3").unwrap()), vec![("page", "3")]);
    }

    #[test]
    fn test_elided_optional_before_value() {
        let r = route("/{locale::locale}/news/{id::i}");
        let params = extract(&r, "/news/5").unwrap();
        assert_eq!(pairs(&params), vec![("locale", "sk"), ("id", "5")]);

        let r = route("/{page::i}?/{slug::slug}");
        let params = extract(&r, "/hello-world").unwrap();
        assert_eq!(pairs(&params), vec![("slug", "hello-world")]);
    }

    // The optional could take `42`, but then `slug` would be left without a
    // segment; the value goes to the required placeholder instead.
    #[test]
    fn test_optional_yields_to_required() {
        let r = route("/{page::i}?/{slug::s}");
        let params = extract(&r, "/42").unwrap();
        assert_eq!(pairs(&params), vec![("slug", "42")]);

        let params = extract(&r, "/3/intro").unwrap();
        assert_eq!(pairs(&params), vec![("page", "3"), ("slug", "intro")]);
    }

    #[test]
    fn test_declared_order_kept() {
        let r = route("/{a::i}/x/{b::slug}");
        let params = extract(&r, "/1/x/foo").unwrap();
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_segment_binds_single_placeholder() {
        let r = route("/{a::i}?/{b::i}?");
        let params = extract(&r, "/1/2").unwrap();
        assert_eq!(pairs(&params), vec![("a", "1"), ("b", "2")]);

        // Adjacent optionals of the same type: a lone value goes to the first.
        let params = extract(&r, "/7").unwrap();
        assert_eq!(pairs(&params), vec![("a", "7")]);
    }

    #[test]
    fn test_several_elided_optionals() {
        let r = route("/{a::i}?/{b::i}?/{c::slug}");
        assert_eq!(pairs(&extract(&r, "/tail").unwrap()), vec![("c", "tail")]);
        assert_eq!(
            pairs(&extract(&r, "/4/tail").unwrap()),
            vec![("a", "4"), ("c", "tail")]
        );
    }

    // A value spelled like a later literal binds by position.
    #[test]
    fn test_value_equal_to_literal() {
        let r = route("/books/{id::s}/edit");
        let params = extract(&r, "/books/edit/edit").unwrap();
        assert_eq!(pairs(&params), vec![("id", "edit")]);

        let r = route("/{section::s}/items/{id::i}/edit");
        let params = extract(&r, "/items/items/3/edit").unwrap();
        assert_eq!(pairs(&params), vec![("section", "items"), ("id", "3")]);
    }

    #[test]
    fn test_rejected_path() {
        let r = route("/users/{id::i}");
        assert!(extract(&r, "/users/abc").is_none());
        assert!(extract(&r, "/users").is_none());
    }

    #[test]
    fn test_root() {
        let r = route("/");
        assert!(extract(&r, "/").unwrap().is_empty());
    }
}
