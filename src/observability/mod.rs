//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config resolution, walker, loader, server
//!     → tracing events (structured fields: method, path, file)
//!     → logging.rs (subscriber: env filter + fmt layer)
//!     → stdout
//! ```

pub mod logging;

pub use logging::init_logging;
