//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Search path directory
//!     → walker.rs (list entries, resolve index module, recurse)
//!     → matcher.rs (filename → method tokens)
//!     → route.rs (RouteNode, path computed once)
//!     → RouteSink (loader binding) + returned route list
//! ```
//!
//! # Design Decisions
//! - Route nodes compiled at startup, immutable afterwards
//! - Deterministic: the same tree and config always yield the same routes
//! - Directories carry path context; only method files become routes

pub mod matcher;
pub mod route;
pub mod walker;

pub use matcher::Matchers;
pub use route::{join, ConventionalRoute, RouteFactory, RouteInit, RouteNode, RouteSummary};
pub use walker::{NoopSink, RouteSink, Walker};
