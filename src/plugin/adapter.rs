//! Adapters customise how each route is bound and wrap the whole load with
//! lifecycle hooks.
//!
//! A plain closure `Fn(&mut S, &RouteNode)` is an adapter without hooks.
//! Types implementing the trait may override [`Adapter::before`] and
//! [`Adapter::after`]; both run exactly once per load, around every search
//! path, never per route.

use async_trait::async_trait;

use crate::config::LoaderConfig;
use crate::error::LoaderResult;
use crate::routing::RouteNode;

#[async_trait]
pub trait Adapter<S: Send>: Send + Sync {
    /// Binds `route` to `server` in place of the loader's default binding.
    fn handler(&self, server: &mut S, route: &RouteNode) -> LoaderResult<()>;

    /// Runs before the first search path is walked.
    async fn before(&self, _server: &mut S, _config: &LoaderConfig) -> LoaderResult<()> {
        Ok(())
    }

    /// Runs after every search path has been walked.
    async fn after(&self, _server: &mut S, _config: &LoaderConfig) -> LoaderResult<()> {
        Ok(())
    }
}

impl<S, F> Adapter<S> for F
where
    S: Send,
    F: Fn(&mut S, &RouteNode) -> LoaderResult<()> + Send + Sync,
{
    fn handler(&self, server: &mut S, route: &RouteNode) -> LoaderResult<()> {
        self(server, route)
    }
}
