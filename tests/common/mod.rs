//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::{json, Value};

use route_compiler::routing::{ActionRegistry, Router};

/// Route file exercising every definition form.
pub const SAMPLE_CONFIG: &str = r#"
base_url = "https://example.com"

[server]
bind_address = "127.0.0.1:0"

[shortcuts]
slug = "([a-z0-9-]+)"

[[routes]]
template = "/"
action = "PageController@home"
methods = ["GET"]
name = "home"

[[routes]]
template = "/users/{id::i}"
action = "UserController@show"
methods = ["GET"]
name = "users.show"

[[routes]]
template = "/articles/{page::i}?"
action = "ArticleController@index"
methods = ["GET"]
name = "articles"

[[routes]]
template = "/posts/{locale::locale}"
action = "PostController@index"
methods = ["GET"]
name = "posts"

[[routes]]
template = "/widgets"
action = "WidgetController@destroy"
methods = ["DELETE"]

[[resources]]
path = "/books"
controller = "BookController"
name = "books."

[[groups]]
prefix = "/{locale::locale}/blog"
name = "blog."
exclude = ["locale"]

[[groups.routes]]
template = "/{slug::slug}"
action = "BlogController@show"
methods = ["GET"]
name = "show"
"#;

/// Router built in code, mirroring the common scenarios.
pub fn scenario_router() -> Router {
    let mut b = Router::builder();
    b.get("/users/{id::i}", "UserController@show").unwrap().name("users.show").unwrap();
    b.get("/articles/{page::i}?", "ArticleController@index").unwrap().name("articles").unwrap();
    b.get("/posts/{locale::locale}", "PostController@index").unwrap().name("posts").unwrap();
    b.delete("/widgets", "WidgetController@destroy").unwrap();
    b.resource("/books", "BookController", Some("books."), None).unwrap();
    b.build()
}

/// Registry that echoes the invocation back as JSON.
pub fn echo_registry() -> ActionRegistry {
    ActionRegistry::new().fallback(|inv| {
        json!({
            "action": inv.route.action().describe(),
            "args": inv.args,
            "payload": inv.payload,
        })
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_json(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
