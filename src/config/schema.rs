//! Configuration schema definitions.
//!
//! This module defines the configuration consumed by [`crate::ApiLoader`].
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the loader used when none is configured.
pub const DEFAULT_LOADER: &str = "axum";

/// Name of the route factory used when none is configured.
pub const DEFAULT_ROUTE: &str = "conventional";

/// Root configuration for a route load.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Registered name of the loader that binds routes to the server.
    pub loader: Option<String>,

    /// Registered name of the adapter passed to every loader call.
    pub adapter: Option<String>,

    /// Registered name of the route factory computing route paths.
    pub route: Option<String>,

    /// Endpoint module format.
    pub modules: ModuleFormat,

    /// Directories to walk.
    pub paths: SearchPaths,

    /// Matcher table shared by every search path.
    pub endpoints: MatcherTable,

    /// Redirect to another configuration file, relative to this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
}

impl LoaderConfig {
    /// Loader name, falling back to [`DEFAULT_LOADER`].
    pub fn loader_name(&self) -> &str {
        self.loader.as_deref().unwrap_or(DEFAULT_LOADER)
    }

    /// Route factory name, falling back to [`DEFAULT_ROUTE`].
    pub fn route_name(&self) -> &str {
        self.route.as_deref().unwrap_or(DEFAULT_ROUTE)
    }

    /// Adds a search path.
    pub fn with_path(mut self, path: impl Into<SearchPath>) -> Self {
        self.paths.0.push(path.into());
        self
    }

    /// Adds a global matcher.
    pub fn with_endpoint(mut self, method: impl Into<String>, matcher: impl Into<Matcher>) -> Self {
        self.endpoints.insert(method.into(), matcher.into());
        self
    }
}

/// File format of endpoint modules.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    #[default]
    Toml,
    Json,
}

/// Search paths, given either as a single entry or as a list.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(transparent)]
pub struct SearchPaths(pub Vec<SearchPath>);

impl SearchPaths {
    pub fn iter(&self) -> std::slice::Iter<'_, SearchPath> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SearchPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<SearchPath>),
            One(SearchPath),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(paths) => SearchPaths(paths),
            OneOrMany::One(path) => SearchPaths(vec![path]),
        })
    }
}

impl<T: Into<SearchPath>> FromIterator<T> for SearchPaths {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SearchPaths(iter.into_iter().map(Into::into).collect())
    }
}

/// One directory to walk, with the settings inherited by its whole subtree.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct SearchPath {
    /// Directory, relative to the loader root.
    pub path: PathBuf,

    /// Segment prepended to every path computed under this directory.
    #[serde(default)]
    pub prefix: String,

    /// Matchers overriding the global table for this directory.
    #[serde(default)]
    pub endpoints: MatcherTable,
}

impl SearchPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_endpoint(mut self, method: impl Into<String>, matcher: impl Into<Matcher>) -> Self {
        self.endpoints.insert(method.into(), matcher.into());
        self
    }
}

impl<'de> Deserialize<'de> for SearchPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Detailed {
            path: PathBuf,
            #[serde(default)]
            prefix: String,
            #[serde(default)]
            endpoints: MatcherTable,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bare(PathBuf),
            Detailed(Detailed),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bare(path) => SearchPath::new(path),
            Raw::Detailed(d) => SearchPath {
                path: d.path,
                prefix: d.prefix,
                endpoints: d.endpoints,
            },
        })
    }
}

impl From<&str> for SearchPath {
    fn from(path: &str) -> Self {
        SearchPath::new(path)
    }
}

impl From<PathBuf> for SearchPath {
    fn from(path: PathBuf) -> Self {
        SearchPath::new(path)
    }
}

/// Method key → filename matcher.
pub type MatcherTable = BTreeMap<String, Matcher>;

/// Recognises a non-conventionally named file as a method handler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Matcher {
    /// Literal filename (without extension).
    Filename(String),

    /// Descriptor; `name` defaults to the method key.
    Descriptor {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Matcher {
    /// Filename this matcher recognises when configured under `key`.
    pub fn target<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            Matcher::Filename(name) => name,
            Matcher::Descriptor { name } => name.as_deref().unwrap_or(key),
        }
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Matcher::Filename(name.to_string())
    }
}
