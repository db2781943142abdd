//! Axum binding of resolved routes.
//!
//! # Responsibilities
//! - Collect handler routes into an Axum Router
//! - Reject invalid or conflicting paths before Axum sees them
//! - Provide the default "axum" loader
//! - Serve the finished router until shutdown
//!
//! # Design Decisions
//! - Paths are validated with matchit, the matcher Axum itself uses
//! - A (path, method) pair can be bound once; a second bind is an error
//! - Methods Axum cannot route are skipped with a warning

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use axum::handler::Handler;
use axum::routing::{on, MethodFilter};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{LoaderError, LoaderResult};
use crate::http::response::EndpointResponse;
use crate::plugin::{Adapter, Loader, Registry};
use crate::routing::RouteNode;

/// An Axum router under construction.
#[derive(Default)]
pub struct AxumServer {
    router: Router,
    paths: matchit::Router<()>,
    bound: BTreeMap<String, BTreeSet<&'static str>>,
}

impl AxumServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` for the method and path of `route`.
    ///
    /// Returns `Ok(false)` when the method cannot be expressed in Axum.
    pub fn bind<H, T>(&mut self, route: &RouteNode, handler: H) -> LoaderResult<bool>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let path = http_path(route.path());
        let Some(method) = route.method() else {
            return Err(LoaderError::Binding {
                method: "*".into(),
                path,
                reason: "directory nodes carry no handler".into(),
            });
        };

        let Some(filter) = method_filter(method) else {
            tracing::warn!(method, path = %path, file = %route.filepath().display(), "Method not supported by axum, skipping");
            return Ok(false);
        };

        self.claim(method, &path)?;
        let router = std::mem::take(&mut self.router);
        self.router = router.route(&path, on(filter, handler));
        Ok(true)
    }

    /// Bound paths and their methods.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &BTreeSet<&'static str>)> {
        self.bound.iter().map(|(path, methods)| (path.as_str(), methods))
    }

    /// Number of bound (path, method) pairs.
    pub fn route_count(&self) -> usize {
        self.bound.values().map(BTreeSet::len).sum()
    }

    /// Finish building, adding request tracing.
    pub fn into_router(self) -> Router {
        self.router.layer(TraceLayer::new_for_http())
    }

    fn claim(&mut self, method: &'static str, path: &str) -> LoaderResult<()> {
        let error = |reason: String| LoaderError::Binding {
            method: method.to_uppercase(),
            path: path.to_string(),
            reason,
        };

        if path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
        {
            return Err(error(
                "segments must not start with `:` or `*`, use `{param}` or `{*rest}`".into(),
            ));
        }

        match self.bound.get_mut(path) {
            Some(methods) => {
                if !methods.insert(method) {
                    return Err(error("already bound".into()));
                }
            }
            None => {
                self.paths
                    .insert(path, ())
                    .map_err(|e| error(e.to_string()))?;
                self.bound.insert(path.to_string(), BTreeSet::from([method]));
            }
        }
        Ok(())
    }
}

/// The built-in loader: serves each endpoint's document, or defers to the
/// adapter when one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxumLoader;

impl Loader<AxumServer> for AxumLoader {
    fn load(
        &self,
        server: &mut AxumServer,
        route: &RouteNode,
        adapter: Option<&dyn Adapter<AxumServer>>,
    ) -> LoaderResult<()> {
        if let Some(adapter) = adapter {
            return adapter.handler(server, route);
        }

        let response = match route.endpoint() {
            Some(endpoint) => EndpointResponse::from_endpoint(endpoint, route.filepath())?,
            None => EndpointResponse::from_endpoint(&Default::default(), route.filepath())?,
        };
        server.bind(route, move || async move { response })?;
        Ok(())
    }
}

impl Registry<AxumServer> {
    /// Registry with the built-in `"axum"` loader.
    pub fn axum() -> Self {
        Registry::new().with_loader(crate::config::schema::DEFAULT_LOADER, AxumLoader)
    }
}

/// Serve `server` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, server: AxumServer, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, routes = server.route_count(), "HTTP server starting");

    axum::serve(listener, server.into_router())
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Route path as an HTTP path: always rooted.
pub fn http_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn method_filter(method: &str) -> Option<MethodFilter> {
    Some(match method {
        "connect" => MethodFilter::CONNECT,
        "delete" => MethodFilter::DELETE,
        "get" => MethodFilter::GET,
        "head" => MethodFilter::HEAD,
        "options" => MethodFilter::OPTIONS,
        "patch" => MethodFilter::PATCH,
        "post" => MethodFilter::POST,
        "put" => MethodFilter::PUT,
        "trace" => MethodFilter::TRACE,
        _ => return None,
    })
}
