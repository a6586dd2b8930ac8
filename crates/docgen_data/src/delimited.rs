//! Delimited-text (CSV) adapter.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::{records_from_rows, DataAdapter};
use crate::coercion::{ColumnCoercion, EnhancedCoercion};
use crate::error::{DataError, DataResult};
use crate::value::RecordSet;

/// Reads a header row followed by one record per line.
pub struct CsvAdapter {
    coercion: Arc<dyn ColumnCoercion>,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(Arc::new(EnhancedCoercion))
    }
}

impl CsvAdapter {
    pub fn new(coercion: Arc<dyn ColumnCoercion>) -> Self {
        Self { coercion }
    }
}

impl DataAdapter for CsvAdapter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".csv"]
    }

    fn read(&self, path: &Path) -> DataResult<RecordSet> {
        debug!("Reading CSV from {:?} ({} coercion)", path, self.coercion.name());

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::source_read(path, e.to_string()))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DataError::source_read(path, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| DataError::source_read(path, e.to_string()))?;
            if record.len() > headers.len() {
                return Err(DataError::source_read(
                    path,
                    format!(
                        "row {} has {} fields but the header has {}",
                        index + 2,
                        record.len(),
                        headers.len()
                    ),
                ));
            }
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let records = records_from_rows(&headers, &rows, self.coercion.as_ref());
        debug!("Read {} record(s) from {:?}", records.len(), path);
        Ok(RecordSet::new(path, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::BasicCoercion;
    use crate::value::Value;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_can_read_is_case_insensitive() {
        let adapter = CsvAdapter::default();
        assert!(adapter.can_read(Path::new("invoices.csv")));
        assert!(adapter.can_read(Path::new("INVOICES.CSV")));
        assert!(!adapter.can_read(Path::new("invoices.json")));
    }

    #[test]
    fn test_read_with_basic_coercion() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("items.csv");
        fs::write(&path, "item_name,quantity,price\nWidget,4,2.5\n").unwrap();

        let adapter = CsvAdapter::new(Arc::new(BasicCoercion));
        let set = adapter.read(&path).unwrap();

        assert_eq!(set.len(), 1);
        let record = set.first().unwrap();
        assert_eq!(record.get("quantity"), Some(&Value::text("4")));
        assert_eq!(record.get("price"), Some(&Value::text("2.5")));
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("excel_export.csv");
        fs::write(&path, "\u{feff}invoice_id,total\nA,1\n").unwrap();

        let set = CsvAdapter::default().read(&path).unwrap();
        let record = set.first().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["invoice_id", "total"]);
        assert_eq!(record.get("invoice_id"), Some(&Value::text("A")));
        assert_eq!(record.get("total"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_row_longer_than_header_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.csv");
        fs::write(&path, "a,b\n1,2,3\n").unwrap();

        let err = CsvAdapter::default().read(&path).unwrap_err();
        assert!(matches!(err, DataError::SourceRead { .. }));
        assert!(err.to_string().contains("row 2"));
    }
}
