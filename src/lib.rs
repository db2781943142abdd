//! Filesystem routing for HTTP servers.
//!
//! Folders become path segments and files named after HTTP methods become
//! handlers. Each configured search path is walked into a tree of
//! [`RouteNode`]s; every handler node is handed to a pluggable [`Loader`]
//! that binds it to a concrete server.
//!
//! # Architecture Overview
//!
//! ```text
//!   LoaderConfig ──▶ plugin::Registry ──▶ Plugins { loader, adapter, route factory }
//!        │
//!        ▼
//!   lifecycle::ApiLoader ── adapter.before ──────────────────────────────┐
//!        │                                                               │
//!        ├─▶ routing::Walker (search path 1) ─┐                          │
//!        ├─▶ routing::Walker (search path 2) ─┼─▶ Loader(server, route) ─┤
//!        └─▶ ...                             ─┘                          │
//!                                                                        ▼
//!   Vec<Arc<RouteNode>> ◀──────────────────────────────── adapter.after ─┘
//! ```
//!
//! The built-in `"axum"` loader binds into [`AxumServer`], serving each
//! endpoint module's document as a fixed response.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod methods;
pub mod module;
pub mod observability;
pub mod plugin;
pub mod routing;

pub use config::{LoaderConfig, Matcher, SearchPath};
pub use error::{LoaderError, LoaderResult};
pub use http::{AxumLoader, AxumServer};
pub use lifecycle::{ApiLoader, Shutdown};
pub use module::{Endpoint, ModuleResolver};
pub use plugin::{Adapter, Loader, Registry};
pub use routing::{RouteFactory, RouteInit, RouteNode, RouteSummary};
