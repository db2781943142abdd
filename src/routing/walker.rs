//! Directory tree walking.
//!
//! # Responsibilities
//! - List a directory and resolve its own identity (index or sibling module)
//! - Recurse into subdirectories concurrently
//! - Load every module file, then bind the ones naming a method, handing
//!   each node to the sink
//!
//! # Design Decisions
//! - Entries are sorted by name so route order is stable across platforms
//! - Directory nodes carry path context only, they are never returned
//! - At most one node per (directory, method); later duplicates are skipped
//! - The first error of a directory is returned after its subtrees complete

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{join, join_all, BoxFuture, FutureExt};

use crate::config::{MatcherTable, SearchPath};
use crate::error::{LoaderError, LoaderResult};
use crate::module::{Endpoint, ModuleResolver};
use crate::routing::matcher::Matchers;
use crate::routing::route::{RouteFactory, RouteInit, RouteNode};

/// Base name of a directory's own module file.
pub const INDEX: &str = "index";

/// Receives every handler node as soon as it is created.
pub trait RouteSink: Sync {
    fn bind(&self, route: &RouteNode) -> LoaderResult<()>;
}

/// Sink that only collects, used for pure resolution.
#[derive(Debug, Default)]
pub struct NoopSink;

impl RouteSink for NoopSink {
    fn bind(&self, _route: &RouteNode) -> LoaderResult<()> {
        Ok(())
    }
}

/// Settings shared by a whole search path.
struct Scope {
    settings: Arc<SearchPath>,
    matchers: Matchers,
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Walks search paths into route nodes.
pub struct Walker<'a> {
    resolver: &'a dyn ModuleResolver,
    factory: &'a dyn RouteFactory,
    sink: &'a dyn RouteSink,
}

impl<'a> Walker<'a> {
    pub fn new(
        resolver: &'a dyn ModuleResolver,
        factory: &'a dyn RouteFactory,
        sink: &'a dyn RouteSink,
    ) -> Self {
        Self {
            resolver,
            factory,
            sink,
        }
    }

    /// Walk `dir` as the root of a search path.
    pub async fn walk(
        &self,
        dir: PathBuf,
        settings: Arc<SearchPath>,
        global: &MatcherTable,
    ) -> LoaderResult<Vec<Arc<RouteNode>>> {
        let scope = Scope {
            matchers: Matchers::merge(global, &settings.endpoints),
            settings,
        };
        self.walk_dir(&scope, dir, String::new(), None).await
    }

    fn walk_dir<'s>(
        &'s self,
        scope: &'s Scope,
        dir: PathBuf,
        key: String,
        parent: Option<Arc<RouteNode>>,
    ) -> BoxFuture<'s, LoaderResult<Vec<Arc<RouteNode>>>> {
        async move {
            let entries = list(&dir).await?;
            let (filepath, endpoint) = self.identity(&dir).await?;

            let root = Arc::new(RouteNode::new(
                RouteInit {
                    key,
                    method: None,
                    filepath,
                    endpoint: endpoint.clone(),
                    prefix: scope.settings.prefix.clone(),
                    parent,
                    settings: scope.settings.clone(),
                },
                self.factory,
            ));
            tracing::trace!(dir = %dir.display(), path = root.path(), "Directory resolved");

            let subdirs = join_all(
                entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.is_dir)
                    .map(|(idx, entry)| {
                        let parent = Some(root.clone());
                        self.walk_dir(scope, entry.path.clone(), entry.name.clone(), parent)
                            .map(move |routes| (idx, routes))
                    }),
            );
            let files = self.bind_files(scope, &root, endpoint.as_ref(), &entries);

            let (subdirs, files) = join(subdirs, files).await;

            let mut slots = vec![Vec::new(); entries.len()];
            let mut first_error = None;

            match files {
                Ok(bound) => {
                    for (idx, routes) in bound {
                        slots[idx] = routes;
                    }
                }
                Err(e) => first_error = Some(e),
            }
            for (idx, routes) in subdirs {
                match routes {
                    Ok(routes) => slots[idx] = routes,
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(slots.into_iter().flatten().collect()),
            }
        }
        .boxed()
    }

    /// Binds the method files of one directory, in listing order.
    async fn bind_files(
        &self,
        scope: &Scope,
        root: &Arc<RouteNode>,
        root_endpoint: Option<&Arc<Endpoint>>,
        entries: &[Entry],
    ) -> LoaderResult<Vec<(usize, Vec<Arc<RouteNode>>)>> {
        let mut bound: HashSet<&'static str> = HashSet::new();
        let mut out = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            if entry.is_dir || !self.resolver.is_module(&entry.path) {
                continue;
            }
            let Some(stem) = entry.path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            // every module is evaluated, matched or not
            let endpoint = match root_endpoint {
                Some(index) if root.filepath() == entry.path => index.clone(),
                _ => Arc::new(self.resolver.resolve(&entry.path).await?),
            };

            let methods: Vec<_> = scope
                .matchers
                .resolve(stem)
                .into_iter()
                .filter(|method| {
                    let fresh = !bound.contains(method);
                    if !fresh {
                        tracing::debug!(
                            method,
                            file = %entry.path.display(),
                            "Method already bound in this directory, skipping"
                        );
                    }
                    fresh
                })
                .collect();
            if methods.is_empty() {
                tracing::trace!(file = %entry.path.display(), "Module matches no method");
                continue;
            }

            let mut routes = Vec::with_capacity(methods.len());
            for method in methods {
                bound.insert(method);
                let route = Arc::new(RouteNode::new(
                    RouteInit {
                        key: root.key().to_string(),
                        method: Some(method),
                        filepath: entry.path.clone(),
                        endpoint: Some(endpoint.clone()),
                        prefix: scope.settings.prefix.clone(),
                        parent: Some(root.clone()),
                        settings: scope.settings.clone(),
                    },
                    self.factory,
                ));
                self.sink.bind(&route)?;
                tracing::debug!(
                    method,
                    path = route.path(),
                    file = %entry.path.display(),
                    "Route bound"
                );
                routes.push(route);
            }
            out.push((idx, routes));
        }

        Ok(out)
    }

    /// The directory's own module: `index.<ext>` inside it, else a sibling
    /// `<dirname>.<ext>`, else the bare directory.
    async fn identity(&self, dir: &Path) -> LoaderResult<(PathBuf, Option<Arc<Endpoint>>)> {
        let ext = self.resolver.extension();

        let index = dir.join(format!("{}.{}", INDEX, ext));
        if is_file(&index).await {
            let endpoint = self.resolver.resolve(&index).await?;
            return Ok((index, Some(Arc::new(endpoint))));
        }

        if let Some(name) = dir.file_name() {
            let mut sibling = name.to_os_string();
            sibling.push(".");
            sibling.push(ext);
            let sibling = dir.with_file_name(sibling);
            if is_file(&sibling).await {
                let endpoint = self.resolver.resolve(&sibling).await?;
                return Ok((sibling, Some(Arc::new(endpoint))));
            }
        }

        Ok((dir.to_path_buf(), None))
    }
}

async fn list(dir: &Path) -> LoaderResult<Vec<Entry>> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| LoaderError::io(dir, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| LoaderError::io(dir, e))?
    {
        let path = entry.path();
        // follows symlinks
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| LoaderError::io(&path, e))?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir: meta.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
