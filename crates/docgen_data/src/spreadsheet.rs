//! Spreadsheet (XLSX) adapter.
//!
//! Only the first sheet is read. Cells are turned into text and then go
//! through the same column coercion as delimited sources. Reading requires
//! the `xlsx` cargo feature; without it the adapter still claims `.xlsx`
//! files so callers get an actionable [`DataError::MissingDependency`]
//! instead of an unsupported-format error.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::DataAdapter;
use crate::coercion::{ColumnCoercion, EnhancedCoercion};
use crate::error::{DataError, DataResult};
use crate::value::RecordSet;

/// Name of the optional capability, as reported in missing-dependency errors.
pub const SPREADSHEET_CAPABILITY: &str = "xlsx";

pub struct XlsxAdapter {
    #[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
    coercion: Arc<dyn ColumnCoercion>,
}

impl Default for XlsxAdapter {
    fn default() -> Self {
        Self::new(Arc::new(EnhancedCoercion))
    }
}

impl XlsxAdapter {
    pub fn new(coercion: Arc<dyn ColumnCoercion>) -> Self {
        Self { coercion }
    }

    /// Whether spreadsheet reading was compiled in.
    pub fn is_available() -> bool {
        cfg!(feature = "xlsx")
    }
}

impl DataAdapter for XlsxAdapter {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".xlsx"]
    }

    #[cfg(feature = "xlsx")]
    fn read(&self, path: &Path) -> DataResult<RecordSet> {
        use calamine::{open_workbook, Reader, Xlsx};

        debug!("Reading XLSX from {:?} ({} coercion)", path, self.coercion.name());

        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e: calamine::XlsxError| DataError::source_read(path, e.to_string()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| DataError::source_read(path, e.to_string()))?,
            None => {
                debug!("Workbook {:?} has no sheets", path);
                return Ok(RecordSet::empty(path));
            }
        };

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(index, cell)| match cell_text(cell) {
                    text if text.trim().is_empty() => format!("column_{}", index + 1),
                    text => text,
                })
                .collect(),
            None => return Ok(RecordSet::empty(path)),
        };

        let data: Vec<Vec<String>> = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, calamine::Data::Empty)))
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let records =
            crate::adapter::records_from_rows(&headers, &data, self.coercion.as_ref());
        debug!("Read {} record(s) from {:?}", records.len(), path);
        Ok(RecordSet::new(path, records))
    }

    #[cfg(not(feature = "xlsx"))]
    fn read(&self, path: &Path) -> DataResult<RecordSet> {
        debug!("Refusing to read {:?}: spreadsheet support not compiled in", path);
        Err(DataError::missing_dependency(
            SPREADSHEET_CAPABILITY,
            "reading .xlsx files requires building docgen with `--features xlsx`",
        ))
    }
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}
