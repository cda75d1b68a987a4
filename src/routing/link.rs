//! Reverse resolution: route + parameters → canonical path.
//!
//! Defaults are always elided, so a route's canonical form never carries a
//! value equal to its shortcut default. The dispatcher compares this form
//! against the requested path to decide whether to redirect.

use crate::routing::error::LinkError;
use crate::routing::params::Params;
use crate::routing::pattern::ParamSpec;
use crate::routing::route::Route;

/// Build the canonical path of `route` for `params`.
///
/// The result always starts with `/` and never ends with one, except for
/// the root itself.
pub fn canonical_path(route: &Route, params: &Params) -> Result<String, LinkError> {
    let mut segments: Vec<&str> = Vec::with_capacity(route.params().len());

    for spec in route.params() {
        match spec {
            ParamSpec::Static(literal) => segments.push(literal),
            ParamSpec::Dynamic(param) => match params.get(&param.name) {
                Some(value) if value.is_empty() || param.is_default(value) => {}
                Some(value) => segments.push(value),
                None if param.is_elidable() => {}
                None => {
                    return Err(LinkError::MissingParameter {
                        route: route.label(),
                        param: param.name.clone(),
                    })
                }
            },
        }
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Prefix a path with a base URL, avoiding a doubled slash.
pub fn absolute(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
