//! Route nodes and route path resolution.
//!
//! # Responsibilities
//! - Hold one resolved routing unit (directory or method handler)
//! - Compute its path once, at construction
//! - Keep a back-reference to the enclosing directory node
//!
//! # Path Rules (first match wins)
//! ```text
//! endpoint.url            → used verbatim
//! endpoint.path = "~/x"   → anchor / x       (renames the node's own segment)
//! endpoint.path = "x"     → used verbatim
//! handler node            → parent.path      (handler files add no segment)
//! directory node          → anchor / (endpoint.name or key)
//!
//! anchor = parent.path if non-empty, else prefix
//! handler anchor = dirname(directory.path) if non-empty, else prefix
//! ```
//!
//! # Design Decisions
//! - Nodes are immutable; descendants share parents through `Arc`
//! - Path computation is pluggable through [`RouteFactory`]

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::config::SearchPath;
use crate::module::Endpoint;

/// Marker for overrides relative to the node's anchor.
const RELATIVE_MARKER: &str = "~/";

/// Everything known about a node before its path is computed.
#[derive(Debug, Clone)]
pub struct RouteInit {
    /// Base name of the originating directory (empty at search path roots).
    pub key: String,
    /// Method token for handler nodes.
    pub method: Option<&'static str>,
    /// Backing module file, or the directory itself.
    pub filepath: PathBuf,
    /// Loaded endpoint module, if any.
    pub endpoint: Option<Arc<Endpoint>>,
    /// Segment prepended at the top of the search path.
    pub prefix: String,
    /// Enclosing directory node.
    pub parent: Option<Arc<RouteNode>>,
    /// Settings of the search path this node was found under.
    pub settings: Arc<SearchPath>,
}

impl RouteInit {
    /// Path the node's own segment is appended to.
    ///
    /// For directory nodes that is the parent's path. Handler nodes share
    /// their directory's segment, so theirs is the directory's resolved path
    /// minus its last segment; an index override is honoured that way.
    pub fn anchor(&self) -> &str {
        match (self.method, self.parent.as_deref()) {
            (None, parent) => anchor(parent, &self.prefix),
            (Some(_), Some(dir)) if dir.parent().is_some() => {
                let base = dirname(dir.path());
                if base.is_empty() {
                    &self.prefix
                } else {
                    base
                }
            }
            (Some(_), _) => &self.prefix,
        }
    }
}

/// Computes the path of a route node.
///
/// Register a custom factory under a name and refer to it from the `route`
/// configuration key to change how paths are derived.
pub trait RouteFactory: Send + Sync {
    fn path(&self, init: &RouteInit) -> String;
}

/// The filesystem convention with endpoint overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalRoute;

impl RouteFactory for ConventionalRoute {
    fn path(&self, init: &RouteInit) -> String {
        let endpoint = init.endpoint.as_deref();

        if let Some(url) = endpoint.and_then(Endpoint::url) {
            return url.to_string();
        }

        if let Some(path) = endpoint.and_then(Endpoint::path) {
            return match path.strip_prefix(RELATIVE_MARKER) {
                Some(relative) => join(init.anchor(), relative),
                None => path.to_string(),
            };
        }

        match (init.method, init.parent.as_deref()) {
            (Some(_), Some(parent)) => parent.path().to_string(),
            _ => {
                let segment = endpoint.and_then(Endpoint::name).unwrap_or(&init.key);
                join(init.anchor(), segment)
            }
        }
    }
}

/// One resolved routing unit.
#[derive(Debug)]
pub struct RouteNode {
    key: String,
    method: Option<&'static str>,
    filepath: PathBuf,
    endpoint: Option<Arc<Endpoint>>,
    prefix: String,
    parent: Option<Arc<RouteNode>>,
    settings: Arc<SearchPath>,
    path: String,
}

impl RouteNode {
    /// Build a node, computing its path with `factory`.
    pub fn new(init: RouteInit, factory: &dyn RouteFactory) -> Self {
        let path = factory.path(&init);
        Self {
            key: init.key,
            method: init.method,
            filepath: init.filepath,
            endpoint: init.endpoint,
            prefix: init.prefix,
            parent: init.parent,
            settings: init.settings,
            path,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Method token; `None` for directory nodes.
    pub fn method(&self) -> Option<&'static str> {
        self.method
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parent(&self) -> Option<&RouteNode> {
        self.parent.as_deref()
    }

    pub fn settings(&self) -> &SearchPath {
        &self.settings
    }

    /// Resolved route path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display name: the endpoint's override name, else the key.
    pub fn name(&self) -> &str {
        self.endpoint()
            .and_then(Endpoint::name)
            .unwrap_or(&self.key)
    }

    /// Returns true for method handler nodes.
    pub fn is_handler(&self) -> bool {
        self.method.is_some()
    }

    /// Enclosing directory nodes, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &RouteNode> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Serializable view of the node.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            method: self.method.unwrap_or_default().to_string(),
            path: self.path.clone(),
            filepath: self.filepath.clone(),
        }
    }
}

impl fmt::Display for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method.unwrap_or("*").to_uppercase();
        write!(f, "{} /{} ({})", method, self.path.trim_start_matches('/'), self.filepath.display())
    }
}

/// Method, path and backing file of a route.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RouteSummary {
    pub method: String,
    pub path: String,
    pub filepath: PathBuf,
}

fn anchor<'a>(parent: Option<&'a RouteNode>, prefix: &'a str) -> &'a str {
    match parent {
        Some(parent) if !parent.path().is_empty() => parent.path(),
        _ => prefix,
    }
}

fn dirname(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map_or("", |(head, _)| head)
}

/// Join two path segments with a single separator, omitting empty ones.
pub fn join(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    match (base.is_empty(), segment.is_empty()) {
        (true, _) => segment.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, segment),
    }
}
