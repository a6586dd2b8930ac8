//! Extension-based adapter selection.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::{dotted_extension, DataAdapter};
use crate::coercion::{ColumnCoercion, NumericMode};
use crate::delimited::CsvAdapter;
use crate::error::{DataError, DataResult};
use crate::spreadsheet::XlsxAdapter;
use crate::structured::JsonAdapter;
use crate::value::RecordSet;

/// Holds the adapters in priority order and dispatches to the first that
/// claims a file.
pub struct AdapterResolver {
    adapters: Vec<Box<dyn DataAdapter>>,
}

impl Default for AdapterResolver {
    fn default() -> Self {
        Self::new(NumericMode::default())
    }
}

impl AdapterResolver {
    /// Standard adapter set (JSON, CSV, XLSX) using the given coercion mode.
    pub fn new(mode: NumericMode) -> Self {
        Self::with_coercion(Arc::from(mode.strategy()))
    }

    /// Standard adapter set sharing an explicit coercion strategy.
    pub fn with_coercion(coercion: Arc<dyn ColumnCoercion>) -> Self {
        Self {
            adapters: vec![
                Box::new(JsonAdapter::new()),
                Box::new(CsvAdapter::new(coercion.clone())),
                Box::new(XlsxAdapter::new(coercion)),
            ],
        }
    }

    /// Resolver over a custom adapter list, tried in the given order.
    pub fn from_adapters(adapters: Vec<Box<dyn DataAdapter>>) -> Self {
        Self { adapters }
    }

    /// Select the adapter for `path`.
    pub fn resolve(&self, path: &Path) -> DataResult<&dyn DataAdapter> {
        match self.adapters.iter().find(|a| a.can_read(path)) {
            Some(adapter) => {
                debug!("Resolved {:?} to the {} adapter", path, adapter.name());
                Ok(adapter.as_ref())
            }
            None => Err(DataError::UnsupportedFormat {
                extension: dotted_extension(path),
                path: path.to_path_buf(),
            }),
        }
    }

    /// Resolve and read in one step.
    pub fn load(&self, path: &Path) -> DataResult<RecordSet> {
        self.resolve(path)?.read(path)
    }

    /// Whether any adapter claims `path`.
    pub fn supports(&self, path: &Path) -> bool {
        self.adapters.iter().any(|a| a.can_read(path))
    }

    /// Union of all supported extensions, in adapter order.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions = Vec::new();
        for ext in self.adapters.iter().flat_map(|a| a.supported_extensions()) {
            if !extensions.contains(ext) {
                extensions.push(*ext);
            }
        }
        extensions
    }
}

impl std::fmt::Debug for AdapterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterResolver")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_by_extension() {
        let resolver = AdapterResolver::default();
        assert_eq!(resolver.resolve(Path::new("a.json")).unwrap().name(), "json");
        assert_eq!(resolver.resolve(Path::new("a.CSV")).unwrap().name(), "csv");
        assert_eq!(resolver.resolve(Path::new("a.xlsx")).unwrap().name(), "xlsx");
    }

    #[test]
    fn test_unsupported_extension_names_extension() {
        let resolver = AdapterResolver::default();
        let err = resolver
            .resolve(Path::new("data.txt"))
            .err()
            .expect("txt has no adapter");
        assert!(matches!(
            &err,
            DataError::UnsupportedFormat { extension, .. } if extension == ".txt"
        ));
    }

    #[test]
    fn test_supported_extensions() {
        let resolver = AdapterResolver::new(NumericMode::Basic);
        assert_eq!(resolver.supported_extensions(), vec![".json", ".csv", ".xlsx"]);
        assert!(resolver.supports(Path::new("x.Json")));
        assert!(!resolver.supports(Path::new("x.html")));
    }

    #[test]
    fn test_first_match_wins() {
        let resolver = AdapterResolver::from_adapters(vec![
            Box::new(JsonAdapter::new()),
            Box::new(JsonAdapter::new()),
        ]);
        assert!(resolver.resolve(Path::new("x.json")).is_ok());
        assert!(resolver.resolve(Path::new("x.csv")).is_err());
    }
}
