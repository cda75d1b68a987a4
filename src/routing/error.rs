//! Error types for route definition, dispatch and link generation.

use thiserror::Error;

use crate::http::request::BodyError;

/// Faults detected while routes are being defined.
///
/// These are configuration errors: a router is never built from a
/// definition that produced one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The same dynamic parameter name appears twice in one template.
    #[error("parameter `{name}` is defined more than once in route `{template}`")]
    DuplicateParameter { name: String, template: String },

    /// A placeholder such as `{::i}` carries no name.
    #[error("placeholder `{segment}` in route `{template}` has no name")]
    EmptyParameterName { segment: String, template: String },

    /// Another route already owns this name.
    #[error("route name `{0}` is already registered")]
    DuplicateName(String),

    /// A shortcut fragment produced a regex that does not compile.
    #[error("invalid pattern for route `{template}`: {message}")]
    InvalidPattern { template: String, message: String },

    /// A method name that is not a valid HTTP method token.
    #[error("unknown HTTP method `{0}`")]
    UnknownMethod(String),
}

/// Faults surfaced while dispatching a request or invoking its action.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The body of a write request could not be decoded.
    #[error(transparent)]
    MalformedBody(#[from] BodyError),

    /// The matched route's action resolves to nothing callable.
    #[error("action `{action}` of route `{route}` is not invocable")]
    ActionNotInvocable { route: String, action: String },
}

/// Faults from reverse resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error("missing value for required parameter `{param}` of route `{route}`")]
    MissingParameter { route: String, param: String },
}
