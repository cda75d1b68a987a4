//! Route files: loading, validation and compilation.

mod common;

use std::io::Write;

use route_compiler::config::{build_router, load_config, parse_config, ConfigError};
use route_compiler::http::DispatchRequest;
use route_compiler::routing::Params;

use common::SAMPLE_CONFIG;

#[test]
fn test_sample_config_compiles_in_definition_order() {
    let config = parse_config(SAMPLE_CONFIG).unwrap();
    let router = build_router(&config).unwrap();

    // 5 routes, 8 resource routes, 1 grouped route
    assert_eq!(router.len(), 14);
    let names: Vec<_> = router.routes().filter_map(|r| r.name()).collect();
    assert_eq!(names.first(), Some(&"home"));
    assert_eq!(names.last(), Some(&"blog.show"));
    assert!(names.contains(&"books.destroy_"));
}

#[test]
fn test_group_scope_from_file() {
    let router = build_router(&parse_config(SAMPLE_CONFIG).unwrap()).unwrap();
    let route = router.route("blog.show").unwrap();
    assert_eq!(route.template(), "/{locale::locale}/blog/{slug::slug}");

    let d = router.dispatch(&DispatchRequest::get("/en/blog/hello-world")).unwrap();
    let m = d.matched().unwrap();
    assert_eq!(m.params.get("locale"), Some("en"));
    assert_eq!(m.args.get("locale"), None);
    assert_eq!(m.args.get("slug"), Some("hello-world"));

    let d = router.dispatch(&DispatchRequest::get("/sk/blog/hello-world")).unwrap();
    assert_eq!(d.matched().unwrap().redirect_to.as_deref(), Some("/blog/hello-world"));
}

#[test]
fn test_absolute_urls_use_base() {
    let router = build_router(&parse_config(SAMPLE_CONFIG).unwrap()).unwrap();
    let params: Params = [("id", "42")].into_iter().collect();
    assert_eq!(router.url("users.show", &params).unwrap(), "https://example.com/users/42");
    assert_eq!(router.url("home", &Params::new()).unwrap(), "https://example.com/");
}

#[test]
fn test_load_from_disk() {
    let path = std::env::temp_dir().join(format!("route-compiler-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();
    drop(file);

    let config = load_config(&path).unwrap();
    assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_validation_errors_are_collected() {
    let raw = r#"
        [[routes]]
        template = "/a"
        action = "A@a"
        methods = ["NOT A METHOD"]
        name = "dup"

        [[routes]]
        template = "/b"
        action = ""
        name = "dup"
    "#;
    match parse_config(raw) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3);
            let text = ConfigError::Validation(errors).to_string();
            assert!(text.contains("unknown method"));
            assert!(text.contains("duplicate route name 'dup'"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_shipped_example_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("routes.example.toml");
    let router = build_router(&load_config(&path).unwrap()).unwrap();
    // 4 routes, 8 book routes, 1 blog route, 8 draft routes
    assert_eq!(router.len(), 21);
    assert_eq!(
        router.route("blog.drafts.edit").unwrap().template(),
        "/{locale::locale}/blog/drafts/{id::s}/edit"
    );

    let d = router.dispatch(&DispatchRequest::get("/feed/json")).unwrap();
    assert_eq!(d.matched().unwrap().redirect_to.as_deref(), Some("/feed"));
}
