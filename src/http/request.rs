//! Inbound request as seen by the dispatcher.
//!
//! # Responsibilities
//! - Carry method, path, query, method override and raw body
//! - Split a request URI into path and query string
//! - Read the method-override field from a urlencoded POST body
//! - Decode the body of write requests (JSON object or form fields)
//!
//! # Design Decisions
//! - The body stays raw until a matched route needs it, so a GET never
//!   pays for (or fails on) body decoding
//! - A malformed JSON body is an error distinct from an absent body

use axum::body::Bytes;
use axum::http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::routing::params::Params;

/// Conventional name of the method-override body field.
pub const DEFAULT_OVERRIDE_FIELD: &str = "_method";

const JSON_MIME: &str = "application/json";
const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// Body decoding failures.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON body must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// Decoded body handed to write routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// No body supplied.
    #[default]
    Empty,
    /// `application/json` object.
    Json(Map<String, Value>),
    /// Urlencoded form fields.
    Form(Params),
}

/// The already-parsed request tuple the router dispatches on.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub method: Method,
    pub path: String,
    pub query: Params,
    pub method_override: Option<Method>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl DispatchRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            method_override: None,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Build from transport-level parts.
    ///
    /// `uri` may carry a query string. For a POST with a urlencoded body the
    /// `override_field` value, when it names a valid method, becomes the
    /// method override.
    pub fn from_parts(
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Bytes,
        override_field: &str,
    ) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Params::from_query_string(query)),
            None => (uri, Params::new()),
        };

        let mut request = Self::new(method, path);
        request.query = query;
        request.content_type = content_type.map(str::to_string);
        request.body = body;

        if request.method == Method::POST && request.has_mime(FORM_MIME) {
            let fields = Params::from_query_string(&String::from_utf8_lossy(&request.body));
            request.method_override = fields.get(override_field).and_then(parse_method);
        }
        request
    }

    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = Params::from_query_string(raw);
        self
    }

    pub fn with_method_override(mut self, method: Method) -> Self {
        self.method_override = Some(method);
        self
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.to_string());
        self.body = body.into();
        self
    }

    /// Whether the content type's essence is `application/json`.
    pub fn is_json(&self) -> bool {
        self.has_mime(JSON_MIME)
    }

    /// Decode the body: JSON object for a JSON content type, form fields otherwise.
    pub fn payload(&self) -> Result<Payload, BodyError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::Empty);
        }
        if self.is_json() {
            return match serde_json::from_slice::<Value>(&self.body)? {
                Value::Object(map) => Ok(Payload::Json(map)),
                other => Err(BodyError::NotAnObject(kind(&other))),
            };
        }
        Ok(Payload::Form(Params::from_query_string(&String::from_utf8_lossy(
            &self.body,
        ))))
    }

    fn has_mime(&self, mime: &str) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(mime))
    }
}

/// Parse a method name case-insensitively.
pub fn parse_method(name: &str) -> Option<Method> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes()).ok()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
