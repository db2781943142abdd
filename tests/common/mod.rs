//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use api_loader::{Adapter, LoaderResult, RouteNode};
use tempfile::TempDir;

/// Server double: records one line per bound route.
pub type Calls = Vec<String>;

/// Loader for [`Calls`]: defers to the adapter when present, like the axum
/// loader does.
pub fn record(server: &mut Calls, route: &RouteNode, adapter: Option<&dyn Adapter<Calls>>) -> LoaderResult<()> {
    match adapter {
        Some(adapter) => adapter.handler(server, route),
        None => {
            server.push(format!("{} {}", route.method().unwrap_or("*"), route.path()));
            Ok(())
        }
    }
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// The endpoint tree most tests walk.
///
/// ```text
/// routes/1/{get,post}.toml
/// routes/2/post.toml
/// routes/2/nested/index.toml          path = "params/nested"
/// routes/2/nested/get.toml
/// routes/3/nested/get.toml            path = "~/rewrite"
/// routes/3/nested/post.toml
/// routes/4/nested/nested/get.toml     url = "/custom/url"
/// routes/4/nested/helpers.toml        (not an endpoint)
/// advanced/index.toml
/// ```
pub fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "routes/1/get.toml", "body = \"one\"\n");
    write(root, "routes/1/post.toml", "status = 201\njson = { created = true }\n");
    write(root, "routes/2/post.toml", "");
    write(root, "routes/2/nested/index.toml", "path = \"params/nested\"\n");
    write(root, "routes/2/nested/get.toml", "body = \"nested\"\n");
    write(root, "routes/3/nested/get.toml", "path = \"~/rewrite\"\n");
    write(root, "routes/3/nested/post.toml", "");
    write(root, "routes/4/nested/nested/get.toml", "url = \"/custom/url\"\nbody = \"custom\"\n");
    write(root, "routes/4/nested/helpers.toml", "answer = 42\n");
    write(root, "advanced/index.toml", "json = { advanced = true }\n");

    dir
}

/// Routes keyed by their file, relative to `root`, e.g. `"1/get"` for
/// `root/1/get.toml`.
pub fn by_file(routes: &[Arc<RouteNode>], root: &Path) -> HashMap<String, Arc<RouteNode>> {
    routes
        .iter()
        .map(|route| {
            let rel = route.filepath().strip_prefix(root).unwrap().with_extension("");
            (slash_path(&rel), route.clone())
        })
        .collect()
}

/// (method, path, relative file) triples, sorted.
pub fn summaries(routes: &[Arc<RouteNode>], root: &Path) -> Vec<(String, String, String)> {
    let mut out: Vec<_> = routes
        .iter()
        .map(|route| {
            let summary = route.summary();
            let rel = summary.filepath.strip_prefix(root).unwrap().to_path_buf();
            (summary.method, summary.path, slash_path(&rel))
        })
        .collect();
    out.sort();
    out
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute path of a fixture file.
pub fn file(root: &Path, rel: &str) -> PathBuf {
    root.join(rel)
}
