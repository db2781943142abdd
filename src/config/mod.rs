//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .api-loader.toml / Cargo.toml [package.metadata.api-loader]
//!     → loader.rs (discover, parse, follow `config` redirect)
//!     → validation.rs (semantic checks)
//!     → LoaderConfig (validated, immutable)
//!     → passed explicitly to ApiLoader
//! ```
//!
//! # Design Decisions
//! - Config is an explicit value; there is no process-wide defaults state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{discover_config, load_config, ConfigError};
pub use schema::{LoaderConfig, Matcher, MatcherTable, ModuleFormat, SearchPath, SearchPaths};
