//! Named plugin lookup.
//!
//! # Responsibilities
//! - Map configuration names to loaders, adapters and route factories
//! - Resolve the plugins of a load once, before any traversal
//!
//! # Design Decisions
//! - `"conventional"` is always registered as a route factory
//! - A configured adapter name that is not registered is an error,
//!   an absent one means "no adapter"

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::schema::DEFAULT_ROUTE;
use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::plugin::{Adapter, Loader};
use crate::routing::{ConventionalRoute, RouteFactory};

/// Plugins resolved for one load.
pub struct Plugins<S: Send> {
    pub loader: Arc<dyn Loader<S>>,
    pub adapter: Option<Arc<dyn Adapter<S>>>,
    pub factory: Arc<dyn RouteFactory>,
}

/// Named loaders, adapters and route factories for servers of type `S`.
pub struct Registry<S: Send> {
    loaders: HashMap<String, Arc<dyn Loader<S>>>,
    adapters: HashMap<String, Arc<dyn Adapter<S>>>,
    routes: HashMap<String, Arc<dyn RouteFactory>>,
}

impl<S: Send> Registry<S> {
    /// A registry holding only the conventional route factory.
    pub fn new() -> Self {
        let mut routes: HashMap<String, Arc<dyn RouteFactory>> = HashMap::new();
        routes.insert(DEFAULT_ROUTE.to_string(), Arc::new(ConventionalRoute));
        Self {
            loaders: HashMap::new(),
            adapters: HashMap::new(),
            routes,
        }
    }

    pub fn with_loader(mut self, name: impl Into<String>, loader: impl Loader<S> + 'static) -> Self {
        self.loaders.insert(name.into(), Arc::new(loader));
        self
    }

    pub fn with_adapter(mut self, name: impl Into<String>, adapter: impl Adapter<S> + 'static) -> Self {
        self.adapters.insert(name.into(), Arc::new(adapter));
        self
    }

    pub fn with_route(mut self, name: impl Into<String>, factory: impl RouteFactory + 'static) -> Self {
        self.routes.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn loader(&self, name: &str) -> LoaderResult<Arc<dyn Loader<S>>> {
        self.loaders
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::Configuration(format!("unknown loader '{}'", name)))
    }

    pub fn adapter(&self, name: &str) -> LoaderResult<Arc<dyn Adapter<S>>> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::Configuration(format!("unknown adapter '{}'", name)))
    }

    pub fn route(&self, name: &str) -> LoaderResult<Arc<dyn RouteFactory>> {
        self.routes
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::Configuration(format!("unknown route factory '{}'", name)))
    }

    /// Resolve every plugin named by `config`.
    pub fn resolve(&self, config: &LoaderConfig) -> LoaderResult<Plugins<S>> {
        let loader = self.loader(config.loader_name())?;
        let adapter = config
            .adapter
            .as_deref()
            .map(|name| self.adapter(name))
            .transpose()?;
        let factory = self.route(config.route_name())?;

        tracing::debug!(
            loader = config.loader_name(),
            adapter = config.adapter.as_deref().unwrap_or("none"),
            route = config.route_name(),
            "Plugins resolved"
        );

        Ok(Plugins {
            loader,
            adapter,
            factory,
        })
    }
}

impl<S: Send> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("loaders", &sorted_keys(&self.loaders))
            .field("adapters", &sorted_keys(&self.adapters))
            .field("routes", &sorted_keys(&self.routes))
            .finish()
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteInit, RouteNode};

    type Server = Vec<String>;

    fn record(server: &mut Server, route: &RouteNode, _adapter: Option<&dyn Adapter<Server>>) -> LoaderResult<()> {
        server.push(route.path().to_string());
        Ok(())
    }

    fn skip(_server: &mut Server, _route: &RouteNode) -> LoaderResult<()> {
        Ok(())
    }

    struct Upper;

    impl RouteFactory for Upper {
        fn path(&self, init: &RouteInit) -> String {
            init.key.to_uppercase()
        }
    }

    #[test]
    fn test_resolves_defaults() {
        let registry = Registry::<Server>::new().with_loader("axum", record);
        let plugins = registry.resolve(&LoaderConfig::default()).unwrap();
        assert!(plugins.adapter.is_none());
    }

    #[test]
    fn test_unknown_loader() {
        let registry = Registry::<Server>::new();
        let config = LoaderConfig {
            loader: Some("unknown-server".into()),
            ..Default::default()
        };
        match registry.resolve(&config) {
            Err(LoaderError::Configuration(msg)) => assert!(msg.contains("unknown-server")),
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_unknown_adapter_and_route() {
        let registry = Registry::<Server>::new().with_loader("axum", record);

        let config = LoaderConfig {
            adapter: Some("missing".into()),
            ..Default::default()
        };
        assert!(matches!(registry.resolve(&config), Err(LoaderError::Configuration(_))));

        let config = LoaderConfig {
            route: Some("missing".into()),
            ..Default::default()
        };
        assert!(matches!(registry.resolve(&config), Err(LoaderError::Configuration(_))));
    }

    #[test]
    fn test_named_plugins() {
        let registry = Registry::<Server>::new()
            .with_loader("record", record)
            .with_adapter("skip", skip)
            .with_route("upper", Upper);
        let config = LoaderConfig {
            loader: Some("record".into()),
            adapter: Some("skip".into()),
            route: Some("upper".into()),
            ..Default::default()
        };

        let plugins = registry.resolve(&config).unwrap();
        assert!(plugins.adapter.is_some());
        assert_eq!(
            format!("{:?}", registry),
            r#"Registry { loaders: ["record"], adapters: ["skip"], routes: ["conventional", "upper"] }"#
        );
    }
}
