//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject search paths and matcher names that can never resolve
//! - Flag matcher keys that are not HTTP methods
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoaderConfig → Result<(), Vec<ValidationError>>
//! - Unknown matcher keys only warn; the walker skips them anyway

use std::fmt;

use crate::config::schema::{LoaderConfig, MatcherTable};
use crate::methods;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A search path entry has an empty directory.
    EmptySearchPath { index: usize },

    /// A matcher resolves to an empty filename.
    EmptyMatcherName { method: String },

    /// A plugin name is present but empty.
    EmptyPluginName { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySearchPath { index } => {
                write!(f, "paths[{}] has an empty directory", index)
            }
            ValidationError::EmptyMatcherName { method } => {
                write!(f, "endpoint matcher for '{}' has an empty name", method)
            }
            ValidationError::EmptyPluginName { field } => {
                write!(f, "'{}' must not be empty", field)
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &LoaderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("loader", &config.loader),
        ("adapter", &config.adapter),
        ("route", &config.route),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            errors.push(ValidationError::EmptyPluginName { field });
        }
    }

    check_matchers(&config.endpoints, &mut errors);

    for (index, entry) in config.paths.iter().enumerate() {
        if entry.path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptySearchPath { index });
        }
        check_matchers(&entry.endpoints, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_matchers(table: &MatcherTable, errors: &mut Vec<ValidationError>) {
    for (key, matcher) in table {
        if !methods::is_method(key) {
            tracing::warn!(key = %key, "Endpoint matcher key is not an HTTP method and will be ignored");
        }
        if matcher.target(key).trim().is_empty() {
            errors.push(ValidationError::EmptyMatcherName {
                method: key.clone(),
            });
        }
    }
}
