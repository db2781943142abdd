//! Pluggable collaborators of a route load.
//!
//! # Data Flow
//! ```text
//! LoaderConfig { loader, adapter, route }  (names)
//!     → registry.rs (name → instance, once, before traversal)
//!     → Plugins { loader, adapter, factory }
//!     → adapter.before → walk (loader per route) → adapter.after
//! ```
//!
//! # Design Decisions
//! - Plugins are resolved once at configuration time, never during the walk
//! - Closures and capability objects share one trait each
//! - Unknown names are configuration errors, raised before any I/O

pub mod adapter;
pub mod loader;
pub mod registry;

pub use adapter::Adapter;
pub use loader::Loader;
pub use registry::{Plugins, Registry};
