//! Route actions and their invocation.
//!
//! # Responsibilities
//! - Describe what a route calls: a closure, a named function or a
//!   `Controller@method` descriptor
//! - Resolve descriptors against registered handlers
//! - Hand handlers an explicit invocation context
//!
//! # Design Decisions
//! - Handlers receive everything through `Invocation`; there is no shared
//!   controller state
//! - An action that resolves to nothing is an error, never a silent no-op
//! - A fallback handler is opt-in and catches every unresolved descriptor

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::http::request::Payload;
use crate::routing::error::DispatchError;
use crate::routing::params::Params;
use crate::routing::route::Route;
use crate::routing::router::Match;

/// Separator in `Controller@method` descriptors.
const CONTROLLER_SEPARATOR: char = '@';

/// Context passed to a handler.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub route: &'a Route,
    /// Decoded body for write routes, `Payload::Empty` otherwise.
    pub payload: &'a Payload,
    /// Ordered arguments with excluded names removed.
    pub args: &'a Params,
    /// Every bound and query parameter, unfiltered.
    pub params: &'a Params,
}

/// Something a route can call.
pub trait Handler: Send + Sync {
    fn call(&self, invocation: &Invocation<'_>) -> Value;
}

impl<F> Handler for F
where
    F: Fn(&Invocation<'_>) -> Value + Send + Sync,
{
    fn call(&self, invocation: &Invocation<'_>) -> Value {
        self(invocation)
    }
}

/// What a route calls when matched.
#[derive(Clone)]
pub enum Action {
    /// A handler supplied directly at definition time.
    Handler(Arc<dyn Handler>),
    /// `Controller@method`, resolved through an `ActionRegistry`.
    Controller { controller: String, method: String },
    /// A function registered under a name in an `ActionRegistry`.
    Named(String),
}

impl Action {
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Value + Send + Sync + 'static,
    {
        Action::Handler(Arc::new(handler))
    }

    pub fn controller(controller: &str, method: &str) -> Self {
        Action::Controller {
            controller: controller.to_string(),
            method: method.to_string(),
        }
    }

    /// Human-readable form for logs and listings.
    pub fn describe(&self) -> String {
        match self {
            Action::Handler(_) => "<closure>".to_string(),
            Action::Controller { controller, method } => {
                format!("{controller}{CONTROLLER_SEPARATOR}{method}")
            }
            Action::Named(name) => name.clone(),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.describe())
    }
}

impl From<&str> for Action {
    fn from(descriptor: &str) -> Self {
        match descriptor.split_once(CONTROLLER_SEPARATOR) {
            Some((controller, method)) if !controller.is_empty() && !method.is_empty() => {
                Action::controller(controller, method)
            }
            _ => Action::Named(descriptor.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(descriptor: String) -> Self {
        Action::from(descriptor.as_str())
    }
}

/// Handlers addressable by name or by `Controller@method`.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    functions: HashMap<String, Arc<dyn Handler>>,
    controllers: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
    fallback: Option<Arc<dyn Handler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function reachable through `Action::Named`.
    pub fn function<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Register one method of a controller.
    pub fn controller<F>(mut self, controller: &str, method: &str, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Value + Send + Sync + 'static,
    {
        self.controllers
            .entry(controller.to_string())
            .or_default()
            .insert(method.to_string(), Arc::new(handler));
        self
    }

    /// Handler used for any descriptor that resolves to nothing.
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Value + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Find the handler for a route's action.
    pub fn resolve(&self, route: &Route) -> Result<Arc<dyn Handler>, DispatchError> {
        let found = match route.action() {
            Action::Handler(handler) => Some(handler.clone()),
            Action::Named(name) => self.functions.get(name).cloned(),
            Action::Controller { controller, method } => self
                .controllers
                .get(controller)
                .and_then(|methods| methods.get(method))
                .cloned(),
        };

        found.or_else(|| self.fallback.clone()).ok_or_else(|| {
            tracing::error!(
                route = %route.label(),
                action = %route.action().describe(),
                "Action is not invocable"
            );
            DispatchError::ActionNotInvocable {
                route: route.label(),
                action: route.action().describe(),
            }
        })
    }

    /// Resolve and call the handler of a matched route.
    pub fn invoke(&self, matched: &Match<'_>) -> Result<Value, DispatchError> {
        let handler = self.resolve(matched.route)?;
        Ok(handler.call(&matched.invocation()))
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
