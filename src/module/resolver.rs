//! Module resolvers: turn a file path into an [`Endpoint`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ModuleFormat;
use crate::error::{LoaderError, LoaderResult};
use crate::module::Endpoint;

/// Loads endpoint modules from disk.
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// File extension (without the dot) of modules this resolver loads.
    fn extension(&self) -> &str;

    /// Load the module at `path`.
    async fn resolve(&self, path: &Path) -> LoaderResult<Endpoint>;

    /// Returns true if `path` names a module this resolver can load.
    fn is_module(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

/// Endpoint modules written as TOML tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlModuleResolver;

#[async_trait]
impl ModuleResolver for TomlModuleResolver {
    fn extension(&self) -> &str {
        "toml"
    }

    async fn resolve(&self, path: &Path) -> LoaderResult<Endpoint> {
        let content = read(path).await?;
        let table: toml::Table =
            toml::from_str(&content).map_err(|e| LoaderError::malformed(path, e.to_string()))?;
        let document =
            serde_json::to_value(table).map_err(|e| LoaderError::malformed(path, e.to_string()))?;
        Endpoint::from_document(path, document)
    }
}

/// Endpoint modules written as JSON objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModuleResolver;

#[async_trait]
impl ModuleResolver for JsonModuleResolver {
    fn extension(&self) -> &str {
        "json"
    }

    async fn resolve(&self, path: &Path) -> LoaderResult<Endpoint> {
        let content = read(path).await?;
        let document =
            serde_json::from_str(&content).map_err(|e| LoaderError::malformed(path, e.to_string()))?;
        Endpoint::from_document(path, document)
    }
}

/// Resolver for the configured module format.
pub fn resolver_for(format: ModuleFormat) -> Arc<dyn ModuleResolver> {
    match format {
        ModuleFormat::Toml => Arc::new(TomlModuleResolver),
        ModuleFormat::Json => Arc::new(JsonModuleResolver),
    }
}

async fn read(path: &Path) -> LoaderResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoaderError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_toml_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("get.toml");
        std::fs::write(&path, "url = \"/health\"\nstatus = 204\n").unwrap();

        let endpoint = TomlModuleResolver.resolve(&path).await.unwrap();
        assert_eq!(endpoint.url(), Some("/health"));
        assert_eq!(endpoint.get("status"), Some(&json!(204)));
    }

    #[tokio::test]
    async fn test_json_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.json");
        std::fs::write(&path, r#"{ "name": "create", "json": { "ok": true } }"#).unwrap();

        let endpoint = JsonModuleResolver.resolve(&path).await.unwrap();
        assert_eq!(endpoint.name(), Some("create"));
        assert_eq!(endpoint.get("json"), Some(&json!({ "ok": true })));
    }

    #[tokio::test]
    async fn test_malformed_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("get.toml");
        std::fs::write(&path, "status = ").unwrap();

        let err = TomlModuleResolver.resolve(&path).await.unwrap_err();
        assert!(matches!(err, LoaderError::MalformedModule { .. }));
    }

    #[tokio::test]
    async fn test_missing_module_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TomlModuleResolver
            .resolve(&dir.path().join("missing.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_is_module() {
        assert!(TomlModuleResolver.is_module(Path::new("routes/get.toml")));
        assert!(TomlModuleResolver.is_module(Path::new("routes/GET.TOML")));
        assert!(!TomlModuleResolver.is_module(Path::new("routes/get.json")));
        assert!(!TomlModuleResolver.is_module(Path::new("routes/README")));
    }
}
