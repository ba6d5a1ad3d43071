//! The catalog snapshot and its loaders

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oracle_core::{CatalogError, CatalogResult};
use tokio::sync::OnceCell;

use crate::record::{CatalogDocument, CatalogMeta};
use crate::store::{FaultStore, ResetStore};

/// Sample dataset compiled into the crate
pub const BUILTIN_CATALOG: &str = include_str!("../data/builtin.yaml");

/// Immutable snapshot of both stores
#[derive(Debug, Default)]
pub struct Catalog {
    meta: CatalogMeta,
    faults: FaultStore,
    resets: ResetStore,
}

impl Catalog {
    /// Validate a single document into a catalog
    pub fn from_document(doc: CatalogDocument) -> CatalogResult<Self> {
        Self::from_documents([doc])
    }

    /// Validate several documents as one catalog.
    ///
    /// Records are concatenated in document order, so keys must be unique
    /// across all documents. Metadata comes from the first document that has
    /// any.
    pub fn from_documents(docs: impl IntoIterator<Item = CatalogDocument>) -> CatalogResult<Self> {
        let mut meta = None;
        let mut faults = Vec::new();
        let mut resets = Vec::new();

        for mut doc in docs {
            if meta.is_none() {
                meta = doc.meta.take();
            }
            let (f, r) = doc.into_labeled_records()?;
            faults.extend(f);
            resets.extend(r);
        }

        Ok(Self {
            meta: meta.unwrap_or_default(),
            faults: FaultStore::from_labeled(faults)?,
            resets: ResetStore::from_labeled(resets)?,
        })
    }

    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        Self::from_document(CatalogDocument::from_yaml(yaml)?)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Self::from_document(CatalogDocument::from_json(json)?)
    }

    /// Load a single `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Source {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_document(parse_document(path, &content)?)
    }

    /// The sample dataset shipped with the crate
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_document(CatalogDocument::from_yaml(BUILTIN_CATALOG)?.with_source("builtin"))
    }

    pub fn meta(&self) -> &CatalogMeta {
        &self.meta
    }

    pub fn faults(&self) -> &FaultStore {
        &self.faults
    }

    pub fn resets(&self) -> &ResetStore {
        &self.resets
    }
}

fn is_catalog_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

fn parse_document(path: &Path, content: &str) -> CatalogResult<CatalogDocument> {
    let doc = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        CatalogDocument::from_json(content)
    } else {
        CatalogDocument::from_yaml(content)
    };
    doc.map(|d| d.with_source(path.display().to_string()))
        .inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to parse catalog file")
        })
}

/// Where catalog documents are read from
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    /// Include the compiled-in sample dataset
    pub builtin: bool,
    /// Files, or directories whose `.yaml`/`.yml`/`.json` files are read
    pub paths: Vec<PathBuf>,
}

impl CatalogSource {
    /// Only the compiled-in dataset
    pub fn builtin() -> Self {
        Self {
            builtin: true,
            paths: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Read and validate every configured document
    pub async fn load(&self) -> CatalogResult<Catalog> {
        let mut docs = Vec::new();

        if self.builtin {
            docs.push(CatalogDocument::from_yaml(BUILTIN_CATALOG)?.with_source("builtin"));
        }

        for path in &self.paths {
            for file in catalog_files(path).await? {
                let content = tokio::fs::read_to_string(&file)
                    .await
                    .map_err(|source| CatalogError::Source {
                        path: file.display().to_string(),
                        source,
                    })?;
                docs.push(parse_document(&file, &content)?);
                tracing::debug!(path = %file.display(), "Read catalog file");
            }
        }

        if docs.is_empty() {
            tracing::warn!("No catalog sources configured, serving an empty catalog");
        }

        Catalog::from_documents(docs)
    }
}

/// Expand a path into the catalog files it names, sorted for a stable order
async fn catalog_files(path: &Path) -> CatalogResult<Vec<PathBuf>> {
    let source_err = |source| CatalogError::Source {
        path: path.display().to_string(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(source_err)?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await.map_err(source_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(source_err)? {
        let file = entry.path();
        let file_type = entry.file_type().await.map_err(source_err)?;
        if file_type.is_file() && is_catalog_file(&file) {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Lazily loaded catalog shared by concurrent callers.
///
/// The first call to [`SharedCatalog::get`] loads the source; callers that
/// arrive while that load is running wait for it instead of starting their
/// own. A failed load is not cached.
#[derive(Debug)]
pub struct SharedCatalog {
    source: CatalogSource,
    cell: OnceCell<Arc<Catalog>>,
    loads: AtomicUsize,
}

impl SharedCatalog {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Wrap an already built catalog; [`SharedCatalog::get`] never loads
    pub fn preloaded(catalog: Catalog) -> Self {
        Self {
            source: CatalogSource::default(),
            cell: OnceCell::new_with(Some(Arc::new(catalog))),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the catalog, loading it on first access
    pub async fn get(&self) -> CatalogResult<Arc<Catalog>> {
        let catalog = self
            .cell
            .get_or_try_init(|| async move {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let catalog = self.source.load().await?;
                tracing::info!(
                    fault_codes = catalog.faults().len(),
                    reset_procedures = catalog.resets().len(),
                    "Catalog loaded"
                );
                Ok::<_, CatalogError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of load attempts made so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_core::{LookupQuery, Service};
    use pretty_assertions::assert_eq;

    const UPS: &str = r#"
meta:
  name: UPS codes
faultCodes:
  - code: "A01"
    service: ups
    brand: APC
    model: Smart-UPS
    issue: Battery needs replacement
    severity: moderate
"#;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.faults().is_empty());
        assert!(!catalog.resets().is_empty());
        assert!(catalog.meta().name.is_some());
    }

    #[test]
    fn test_builtin_example_lookup() {
        let catalog = Catalog::builtin().unwrap();
        let faults = catalog.faults();

        let hits = faults.search(
            &LookupQuery::new()
                .text("oil")
                .with_service(Service::Generator)
                .with_brand("Cummins"),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "E-102");

        let hits = faults.search(&LookupQuery::new().text("oil").with_service(Service::Solar));
        assert!(hits.is_empty());

        let cummins = faults.search(&LookupQuery::new().with_brand("Cummins"));
        assert!(cummins.len() > 1);
        assert!(cummins.iter().all(|e| e.brand == "Cummins"));
    }

    #[test]
    fn test_documents_merge_and_detect_cross_file_duplicates() {
        let a = CatalogDocument::from_yaml(UPS).unwrap().with_source("a.yaml");
        let b = CatalogDocument::from_yaml(UPS).unwrap().with_source("b.yaml");
        let err = Catalog::from_documents([a, b]).unwrap_err();
        assert!(err.is_integrity());
        assert_eq!(
            err.to_string(),
            "data integrity error in b.yaml: faultCodes[0] (APC / Smart-UPS / A01): \
             duplicate key, first defined at a.yaml: faultCodes[0] (APC / Smart-UPS / A01)"
        );
    }

    #[test]
    fn test_from_file_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("ups.yaml");
        std::fs::write(&yaml_path, UPS).unwrap();
        let json_path = dir.path().join("solar.json");
        std::fs::write(
            &json_path,
            r#"{"faultCodes":[{"code":"F01","service":"solar","brand":"Growatt","model":"SPF 5000","issue":"Grid overvoltage","severity":"low"}]}"#,
        )
        .unwrap();

        let ups = Catalog::from_file(&yaml_path).unwrap();
        assert_eq!(ups.meta().name.as_deref(), Some("UPS codes"));
        assert_eq!(ups.faults().len(), 1);

        let solar = Catalog::from_file(&json_path).unwrap();
        assert_eq!(solar.faults().load_all()[0].service, Service::Solar);
    }

    #[test]
    fn test_from_file_missing_names_path() {
        let err = Catalog::from_file("/nonexistent/catalog.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Source { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.yaml"));
    }

    #[tokio::test]
    async fn test_source_reads_directory_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.yaml"),
            "faultCodes:\n  - {code: B1, service: ac, brand: Daikin, model: FTXS, issue: Indoor fan fault, severity: low}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.yml"),
            "faultCodes:\n  - {code: A1, service: ac, brand: Daikin, model: FTXS, issue: Compressor overload, severity: critical}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = CatalogSource::default()
            .with_path(dir.path())
            .load()
            .await
            .unwrap();
        let codes: Vec<&str> = catalog
            .faults()
            .load_all()
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, vec!["A1", "B1"]);
    }

    #[tokio::test]
    async fn test_source_fails_fast_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bad.yaml"),
            "faultCodes:\n  - {code: X1, service: ac, brand: Daikin, model: FTXS, severity: low}\n",
        )
        .unwrap();

        let err = CatalogSource::builtin()
            .with_path(dir.path())
            .load()
            .await
            .unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[tokio::test]
    async fn test_shared_catalog_single_flight() {
        let shared = Arc::new(SharedCatalog::new(CatalogSource::builtin()));
        assert!(!shared.is_loaded());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let shared = Arc::clone(&shared);
            handles.push(tokio::spawn(async move { shared.get().await.unwrap() }));
        }

        let mut catalogs = Vec::new();
        for handle in handles {
            catalogs.push(handle.await.unwrap());
        }

        assert!(shared.is_loaded());
        assert_eq!(shared.load_count(), 1);
        assert!(catalogs.iter().all(|c| Arc::ptr_eq(c, &catalogs[0])));
    }

    #[tokio::test]
    async fn test_preloaded_catalog_never_loads() {
        let shared = SharedCatalog::preloaded(Catalog::from_yaml(UPS).unwrap());
        assert!(shared.is_loaded());
        assert_eq!(shared.get().await.unwrap().faults().len(), 1);
        assert_eq!(shared.load_count(), 0);
    }

    #[tokio::test]
    async fn test_shared_catalog_retries_after_failure() {
        let shared = SharedCatalog::new(CatalogSource::default().with_path("/nonexistent/dir"));
        assert!(shared.get().await.is_err());
        assert!(shared.get().await.is_err());
        assert!(!shared.is_loaded());
        assert_eq!(shared.load_count(), 2);
    }
}
