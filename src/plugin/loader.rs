//! Loaders bind resolved routes to a concrete server.

use crate::error::LoaderResult;
use crate::plugin::Adapter;
use crate::routing::RouteNode;

/// Binds one resolved handler route to `server`.
///
/// Called exactly once per handler node, as soon as the node is created.
pub trait Loader<S: Send>: Send + Sync {
    fn load(&self, server: &mut S, route: &RouteNode, adapter: Option<&dyn Adapter<S>>) -> LoaderResult<()>;
}

impl<S, F> Loader<S> for F
where
    S: Send,
    F: Fn(&mut S, &RouteNode, Option<&dyn Adapter<S>>) -> LoaderResult<()> + Send + Sync,
{
    fn load(&self, server: &mut S, route: &RouteNode, adapter: Option<&dyn Adapter<S>>) -> LoaderResult<()> {
        self(server, route, adapter)
    }
}
