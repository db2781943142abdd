//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve loader, adapter and route factory from the configuration
//! - Run the adapter's `before` hook, walk every search path, run `after`
//! - Aggregate the routes of all search paths in configuration order
//!
//! # Design Decisions
//! - Fail fast: plugin resolution errors surface before any I/O
//! - Search paths are walked concurrently and always run to completion;
//!   the first failure in configuration order is returned
//! - Resolution without binding is available through [`ApiLoader::resolve`]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;

use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::http::AxumServer;
use crate::module::{resolver_for, ModuleResolver};
use crate::plugin::{Adapter, Loader, Plugins, Registry};
use crate::routing::{NoopSink, RouteFactory, RouteNode, RouteSink, Walker};

/// Turns the configured directory trees into routes bound to a server of
/// type `S`.
///
/// ```no_run
/// # async fn run() -> Result<(), api_loader::LoaderError> {
/// use api_loader::{ApiLoader, AxumServer, LoaderConfig};
///
/// let config = LoaderConfig::default().with_path("./routes");
/// let mut server = AxumServer::new();
/// let routes = ApiLoader::axum(config).load(&mut server).await?;
/// println!("{} routes", routes.len());
/// # Ok(())
/// # }
/// ```
pub struct ApiLoader<S: Send> {
    config: LoaderConfig,
    registry: Registry<S>,
    root: PathBuf,
    resolver: Option<Arc<dyn ModuleResolver>>,
    loader: Option<Arc<dyn Loader<S>>>,
    adapter: Option<Arc<dyn Adapter<S>>>,
    route: Option<Arc<dyn RouteFactory>>,
}

impl<S: Send> ApiLoader<S> {
    pub fn new(config: LoaderConfig, registry: Registry<S>) -> Self {
        Self {
            config,
            registry,
            root: PathBuf::from("."),
            resolver: None,
            loader: None,
            adapter: None,
            route: None,
        }
    }

    /// Directory search paths are relative to. Defaults to `.`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Replace the module resolver chosen by the `modules` setting.
    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Use `loader` regardless of the configured loader name.
    pub fn with_loader(mut self, loader: impl Loader<S> + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Use `adapter` regardless of the configured adapter name.
    pub fn with_adapter(mut self, adapter: impl Adapter<S> + 'static) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Use `factory` regardless of the configured route factory name.
    pub fn with_route(mut self, factory: impl RouteFactory + 'static) -> Self {
        self.route = Some(Arc::new(factory));
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the plugins of this load. Supplied instances win over names.
    pub fn plugins(&self) -> LoaderResult<Plugins<S>> {
        let loader = match &self.loader {
            Some(loader) => loader.clone(),
            None => self.registry.loader(self.config.loader_name())?,
        };
        let adapter = match (&self.adapter, self.config.adapter.as_deref()) {
            (Some(adapter), _) => Some(adapter.clone()),
            (None, Some(name)) => Some(self.registry.adapter(name)?),
            (None, None) => None,
        };
        let factory = self.factory()?;

        tracing::debug!(
            loader = if self.loader.is_some() { "custom" } else { self.config.loader_name() },
            adapter = adapter.is_some(),
            route = if self.route.is_some() { "custom" } else { self.config.route_name() },
            "Plugins resolved"
        );

        Ok(Plugins {
            loader,
            adapter,
            factory,
        })
    }

    /// Walk every search path and bind each handler route to `server`.
    pub async fn load(&self, server: &mut S) -> LoaderResult<Vec<Arc<RouteNode>>> {
        let plugins = self.plugins()?;

        if let Some(adapter) = &plugins.adapter {
            adapter.before(server, &self.config).await?;
        }

        let routes = {
            let binding = Binding {
                server: Mutex::new(&mut *server),
                loader: &*plugins.loader,
                adapter: plugins.adapter.as_deref(),
            };
            self.walk_all(&*plugins.factory, &binding).await?
        };

        if let Some(adapter) = &plugins.adapter {
            adapter.after(server, &self.config).await?;
        }

        tracing::info!(routes = routes.len(), paths = self.config.paths.len(), "Routes loaded");
        Ok(routes)
    }

    /// Walk every search path without binding anything.
    pub async fn resolve(&self) -> LoaderResult<Vec<Arc<RouteNode>>> {
        let factory = self.factory()?;
        self.walk_all(&*factory, &NoopSink).await
    }

    fn factory(&self) -> LoaderResult<Arc<dyn RouteFactory>> {
        match &self.route {
            Some(factory) => Ok(factory.clone()),
            None => self.registry.route(self.config.route_name()),
        }
    }

    async fn walk_all(
        &self,
        factory: &dyn RouteFactory,
        sink: &dyn RouteSink,
    ) -> LoaderResult<Vec<Arc<RouteNode>>> {
        let resolver = self
            .resolver
            .clone()
            .unwrap_or_else(|| resolver_for(self.config.modules));
        let walker = Walker::new(&*resolver, factory, sink);
        let walker = &walker;

        let results = join_all(self.config.paths.iter().map(|entry| {
            let dir = self.root.join(&entry.path);
            let settings = Arc::new(entry.clone());
            async move {
                let result = walker
                    .walk(dir.clone(), settings, &self.config.endpoints)
                    .await;
                match &result {
                    Ok(routes) => {
                        tracing::info!(path = %dir.display(), routes = routes.len(), "Search path loaded")
                    }
                    Err(e) => tracing::error!(path = %dir.display(), error = %e, "Search path failed"),
                }
                result
            }
        }))
        .await;

        let mut routes = Vec::new();
        for result in results {
            routes.extend(result?);
        }
        Ok(routes)
    }
}

impl ApiLoader<AxumServer> {
    /// A loader for Axum with the built-in registry.
    pub fn axum(config: LoaderConfig) -> Self {
        Self::new(config, Registry::axum())
    }
}

/// Hands each route to the loader as soon as the walker creates it.
struct Binding<'a, S: Send> {
    server: Mutex<&'a mut S>,
    loader: &'a dyn Loader<S>,
    adapter: Option<&'a dyn Adapter<S>>,
}

impl<S: Send> RouteSink for Binding<'_, S> {
    fn bind(&self, route: &RouteNode) -> LoaderResult<()> {
        let mut server = self
            .server
            .lock()
            .map_err(|_| LoaderError::Configuration("server lock poisoned".into()))?;
        self.loader.load(&mut **server, route, self.adapter)
    }
}
