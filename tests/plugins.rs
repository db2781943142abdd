//! Loader, adapter and route factory plugins.

use std::path::Path;

use api_loader::config::LoaderConfig;
use api_loader::module::{Endpoint, ModuleResolver};
use api_loader::{
    Adapter, ApiLoader, LoaderError, LoaderResult, Registry, RouteFactory, RouteInit, RouteNode,
};
use async_trait::async_trait;
use pretty_assertions::assert_eq;

mod common;

use common::{fixture, record, Calls};

fn registry() -> Registry<Calls> {
    Registry::new().with_loader("axum", record)
}

/// Adapter with lifecycle hooks, recording everything it sees.
struct Tracking;

#[async_trait]
impl Adapter<Calls> for Tracking {
    fn handler(&self, server: &mut Calls, route: &RouteNode) -> LoaderResult<()> {
        server.push(format!("handle {}", route.method().unwrap_or("*")));
        Ok(())
    }

    async fn before(&self, server: &mut Calls, config: &LoaderConfig) -> LoaderResult<()> {
        server.push(format!("before {}", config.paths.len()));
        Ok(())
    }

    async fn after(&self, server: &mut Calls, _config: &LoaderConfig) -> LoaderResult<()> {
        server.push("after".to_string());
        Ok(())
    }
}

/// Adapter whose `before` hook refuses to start.
struct Refusing;

#[async_trait]
impl Adapter<Calls> for Refusing {
    fn handler(&self, server: &mut Calls, route: &RouteNode) -> LoaderResult<()> {
        server.push(format!("handle {}", route.method().unwrap_or("*")));
        Ok(())
    }

    async fn before(&self, _server: &mut Calls, _config: &LoaderConfig) -> LoaderResult<()> {
        Err(LoaderError::Configuration("server not ready".into()))
    }

    async fn after(&self, server: &mut Calls, _config: &LoaderConfig) -> LoaderResult<()> {
        server.push("after".to_string());
        Ok(())
    }
}

/// Route factory that ignores the filesystem layout.
struct Flat;

impl RouteFactory for Flat {
    fn path(&self, init: &RouteInit) -> String {
        match init.method {
            Some(method) => format!("{}-{}", init.key, method),
            None => init.key.clone(),
        }
    }
}

/// Resolver serving fixed documents without reading module files.
struct Static;

#[async_trait]
impl ModuleResolver for Static {
    fn extension(&self) -> &str {
        "toml"
    }

    async fn resolve(&self, path: &Path) -> LoaderResult<Endpoint> {
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        Ok(Endpoint::default().with_name(format!("static-{}", name)))
    }
}

#[tokio::test]
async fn test_function_adapter_handles_every_route() {
    let dir = fixture();
    let config = LoaderConfig::default().with_path("routes/1");
    let adapter = |server: &mut Calls, route: &RouteNode| -> LoaderResult<()> {
        server.push(format!("adapted {}", route.method().unwrap_or("*")));
        Ok(())
    };

    let mut calls = Calls::new();
    ApiLoader::new(config, registry())
        .with_root(dir.path())
        .with_adapter(adapter)
        .load(&mut calls)
        .await
        .unwrap();

    assert_eq!(calls, vec!["adapted get", "adapted post"]);
}

#[tokio::test]
async fn test_adapter_hooks_wrap_loading() {
    let dir = fixture();
    let config = LoaderConfig::default().with_path("routes/1");

    let mut calls = Calls::new();
    ApiLoader::new(config, registry())
        .with_root(dir.path())
        .with_adapter(Tracking)
        .load(&mut calls)
        .await
        .unwrap();

    assert_eq!(calls, vec!["before 1", "handle get", "handle post", "after"]);
}

#[tokio::test]
async fn test_failing_before_hook_stops_loading() {
    let dir = fixture();
    // a missing search path would fail with an io error if it were walked
    let config = LoaderConfig::default()
        .with_path("routes/1")
        .with_path("missing");

    let mut calls = Calls::new();
    let err = ApiLoader::new(config, registry())
        .with_root(dir.path())
        .with_adapter(Refusing)
        .load(&mut calls)
        .await
        .unwrap_err();

    match err {
        LoaderError::Configuration(msg) => assert_eq!(msg, "server not ready"),
        other => panic!("expected the hook's error, got {other:?}"),
    }
    assert!(calls.is_empty());
}

#[tokio::test]
async fn test_named_adapter_from_config() {
    let dir = fixture();
    let config = LoaderConfig {
        adapter: Some("tracking".into()),
        ..LoaderConfig::default().with_path("routes/2")
    };
    let registry = registry().with_adapter("tracking", Tracking);

    let mut calls = Calls::new();
    ApiLoader::new(config, registry)
        .with_root(dir.path())
        .load(&mut calls)
        .await
        .unwrap();

    assert_eq!(calls.first().map(String::as_str), Some("before 1"));
    assert_eq!(calls.last().map(String::as_str), Some("after"));
    assert_eq!(calls.len(), 4);
}

#[tokio::test]
async fn test_unknown_loader_fails_before_io() {
    let config = LoaderConfig {
        loader: Some("unknown-server".into()),
        ..LoaderConfig::default().with_path("does/not/exist")
    };

    let mut calls = Calls::new();
    let err = ApiLoader::new(config, registry())
        .load(&mut calls)
        .await
        .unwrap_err();

    match err {
        LoaderError::Configuration(msg) => assert!(msg.contains("unknown-server")),
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(calls.is_empty());
}

#[tokio::test]
async fn test_unknown_adapter_fails_before_hooks() {
    let config = LoaderConfig {
        adapter: Some("missing".into()),
        ..LoaderConfig::default().with_path("does/not/exist")
    };

    let err = ApiLoader::new(config, registry())
        .load(&mut Calls::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Configuration(_)));
}

#[tokio::test]
async fn test_missing_search_path_does_not_stop_siblings() {
    let dir = fixture();
    let config = LoaderConfig::default()
        .with_path("missing")
        .with_path("routes/1");

    let mut calls = Calls::new();
    let err = ApiLoader::new(config, registry())
        .with_root(dir.path())
        .load(&mut calls)
        .await
        .unwrap_err();

    match err {
        LoaderError::Io { path, .. } => assert!(path.ends_with("missing")),
        other => panic!("expected io error, got {other:?}"),
    }
    // the sibling search path still ran to completion
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn test_loader_error_propagates() {
    let dir = fixture();
    let config = LoaderConfig::default().with_path("routes/1");
    let refuse = |_: &mut Calls, route: &RouteNode, _: Option<&dyn Adapter<Calls>>| -> LoaderResult<()> {
        Err(LoaderError::Binding {
            method: route.method().unwrap_or_default().to_string(),
            path: route.path().to_string(),
            reason: "refused".into(),
        })
    };

    let err = ApiLoader::new(config, Registry::new())
        .with_root(dir.path())
        .with_loader(refuse)
        .load(&mut Calls::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Binding { .. }));
}

#[tokio::test]
async fn test_named_route_factory() {
    let dir = fixture();
    let config = LoaderConfig {
        route: Some("flat".into()),
        ..LoaderConfig::default().with_path("routes/3")
    };
    let loader = ApiLoader::new(config, registry().with_route("flat", Flat)).with_root(dir.path());

    let mut paths: Vec<_> = loader
        .resolve()
        .await
        .unwrap()
        .iter()
        .map(|route| route.path().to_string())
        .collect();
    paths.sort();

    assert_eq!(paths, vec!["nested-get", "nested-post"]);
}

#[tokio::test]
async fn test_unknown_route_factory() {
    let config = LoaderConfig {
        route: Some("missing".into()),
        ..LoaderConfig::default()
    };

    let err = ApiLoader::new(config, registry()).resolve().await.unwrap_err();
    assert!(matches!(err, LoaderError::Configuration(_)));
}

#[tokio::test]
async fn test_custom_module_resolver() {
    let dir = fixture();
    let config = LoaderConfig::default().with_path("routes/2");

    let routes = ApiLoader::new(config, registry())
        .with_root(dir.path())
        .with_resolver(Static)
        .resolve()
        .await
        .unwrap();

    // every directory is renamed by its module, the index included
    let mut paths: Vec<_> = routes.iter().map(|route| route.path().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["", "static-index"]);
    assert!(routes.iter().all(|route| route.endpoint().unwrap().name().is_some()));
}
