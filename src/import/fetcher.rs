use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::error::{Result, WsdlSamplerError};

/// Retrieves the raw text of an imported schema document.
#[async_trait]
pub trait ImportFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Resolve an import's `schemaLocation` against the location of the document
/// that declares it. Absolute URLs are returned unchanged; relative ones are
/// joined onto a URL base or, failing that, onto the base file's directory.
/// File paths come back with `.` and `..` segments folded away, so one file
/// always resolves to one string.
pub fn resolve_location(base: Option<&str>, location: &str) -> String {
    if let Some(url) = parse_absolute_url(location) {
        return url.to_string();
    }

    let Some(base) = base else {
        return normalize_path(Path::new(location)).to_string_lossy().into_owned();
    };

    if let Some(base_url) = parse_absolute_url(base) {
        return match base_url.join(location) {
            Ok(joined) => joined.to_string(),
            Err(err) => {
                tracing::warn!("Cannot join {} onto {}: {}", location, base, err);
                location.to_string()
            }
        };
    }

    let joined = match Path::new(base).parent() {
        Some(directory) => directory.join(location),
        None => PathBuf::from(location),
    };
    normalize_path(&joined).to_string_lossy().into_owned()
}

/// Lexically fold `.` and `..` components. A `..` that climbs above a
/// relative path's start is kept; one above the root is dropped.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.last() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }

    if normalized.is_empty() {
        return PathBuf::from(".");
    }
    normalized.iter().collect()
}

/// A URL with a real scheme; single-letter schemes are Windows drive letters.
fn parse_absolute_url(location: &str) -> Option<Url> {
    Url::parse(location)
        .ok()
        .filter(|url| url.scheme().len() > 1)
}

fn is_http(location: &str) -> bool {
    parse_absolute_url(location)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Reads imports from the local filesystem; accepts plain paths and `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher;

impl FileFetcher {
    fn to_path(location: &str) -> Result<PathBuf> {
        match parse_absolute_url(location) {
            Some(url) if url.scheme() == "file" => url.to_file_path().map_err(|_| {
                WsdlSamplerError::import_fetch(location, "not a valid file URL")
            }),
            Some(url) => Err(WsdlSamplerError::import_fetch(
                location,
                format!("unsupported scheme `{}`", url.scheme()),
            )),
            None => Ok(PathBuf::from(location)),
        }
    }
}

#[async_trait]
impl ImportFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        let path = Self::to_path(location)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| WsdlSamplerError::import_fetch(location, format!("Failed to read file: {e}")))
    }
}

#[cfg(feature = "http-fetch")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http-fetch")]
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http-fetch")]
#[async_trait]
impl ImportFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| WsdlSamplerError::import_fetch(location, format!("Failed to fetch URL: {e}")))?;

        if !response.status().is_success() {
            return Err(WsdlSamplerError::import_fetch(
                location,
                format!("HTTP error: {}", response.status()),
            ));
        }

        response.text().await.map_err(|e| {
            WsdlSamplerError::import_fetch(location, format!("Failed to read response: {e}"))
        })
    }
}

/// HTTP(S) locations go over the network, everything else to the filesystem.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    file: FileFetcher,
    #[cfg(feature = "http-fetch")]
    http: HttpFetcher,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImportFetcher for DefaultFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        if is_http(location) {
            #[cfg(feature = "http-fetch")]
            return self.http.fetch(location).await;

            #[cfg(not(feature = "http-fetch"))]
            return Err(WsdlSamplerError::import_fetch(
                location,
                "HTTP fetching is disabled (build with the `http-fetch` feature)",
            ));
        }
        self.file.fetch(location).await
    }
}

/// In-memory documents keyed by their exact location string.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(location.into(), text.into());
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ImportFetcher for StaticFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| WsdlSamplerError::import_fetch(location, "document not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_url_base() {
        assert_eq!(
            resolve_location(Some("http://example.com/svc/service.wsdl"), "types/common.xsd"),
            "http://example.com/svc/types/common.xsd"
        );
        assert_eq!(
            resolve_location(Some("http://example.com/a.wsdl"), "https://other.org/b.xsd"),
            "https://other.org/b.xsd"
        );
    }

    #[test]
    fn test_resolve_against_file_base() {
        let resolved = resolve_location(Some("/srv/wsdl/service.wsdl"), "common.xsd");
        assert_eq!(Path::new(&resolved), Path::new("/srv/wsdl/common.xsd"));
        assert_eq!(resolve_location(None, "common.xsd"), "common.xsd");
    }

    #[test]
    fn test_parent_segments_are_folded() {
        let resolved = resolve_location(Some("/srv/wsdl/a/a.xsd"), "../b/./b.xsd");
        assert_eq!(Path::new(&resolved), Path::new("/srv/wsdl/b/b.xsd"));

        let back = resolve_location(Some(&resolved), "../a/a.xsd");
        assert_eq!(Path::new(&back), Path::new("/srv/wsdl/a/a.xsd"));

        let relative = resolve_location(Some("schemas/a.xsd"), "../../shared/c.xsd");
        assert_eq!(Path::new(&relative), Path::new("../shared/c.xsd"));

        let above_root = resolve_location(Some("/a.xsd"), "../../b.xsd");
        assert_eq!(Path::new(&above_root), Path::new("/b.xsd"));
    }

    #[tokio::test]
    async fn test_static_fetcher() {
        let fetcher = StaticFetcher::new().with_document("a.xsd", "<schema/>");
        assert_eq!(fetcher.fetch("a.xsd").await.unwrap(), "<schema/>");
        assert!(matches!(
            fetcher.fetch("b.xsd").await,
            Err(WsdlSamplerError::ImportFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_paths_and_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common.xsd");
        tokio::fs::write(&path, "<schema/>").await.unwrap();

        let fetcher = FileFetcher;
        let by_path = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        let url = Url::from_file_path(&path).unwrap();
        let by_url = fetcher.fetch(url.as_str()).await.unwrap();

        assert_eq!(by_path, "<schema/>");
        assert_eq!(by_url, "<schema/>");
        assert!(fetcher.fetch("/definitely/missing.xsd").await.is_err());
    }
}
