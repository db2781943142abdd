//! Endpoint modules.
//!
//! # Data Flow
//! ```text
//! file on disk (index.toml, get.toml, users.json, ...)
//!     → resolver.rs (ModuleResolver: read + parse)
//!     → Endpoint (override metadata + document)
//!     → RouteNode path resolution / loader binding
//! ```
//!
//! # Design Decisions
//! - Module loading is an injected capability, the walker never reads files itself
//! - Only the override fields (`url`, `path`, `name`) are interpreted here
//! - The rest of the document is opaque and handed to the loader untouched

pub mod resolver;

use std::path::Path;

use serde_json::Value;

use crate::error::{LoaderError, LoaderResult};

pub use resolver::{resolver_for, JsonModuleResolver, ModuleResolver, TomlModuleResolver};

/// A loaded endpoint module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    url: Option<String>,
    path: Option<String>,
    name: Option<String>,
    document: Value,
}

impl Endpoint {
    /// Builds an endpoint from a parsed module document.
    ///
    /// The document must be an object; `url`, `path` and `name`, when
    /// present, must be strings.
    pub fn from_document(source: &Path, document: Value) -> LoaderResult<Self> {
        let Value::Object(map) = &document else {
            return Err(LoaderError::malformed(source, "module must be a table"));
        };

        let field = |key: &str| -> LoaderResult<Option<String>> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(LoaderError::malformed(
                    source,
                    format!("`{}` must be a string, found {}", key, kind(other)),
                )),
            }
        };

        Ok(Self {
            url: field("url")?,
            path: field("path")?,
            name: field("name")?,
            document,
        })
    }

    /// Full-path override, used verbatim.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Explicit path override. A leading `~/` makes it relative.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Override name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The whole module document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// A top-level field of the module document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
