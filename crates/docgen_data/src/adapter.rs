//! The capability every data source adapter implements.

use std::path::Path;

use crate::coercion::ColumnCoercion;
use crate::error::DataResult;
use crate::value::{Record, RecordSet};

/// A format-specific reader turning one source file into a [`RecordSet`].
pub trait DataAdapter: Send + Sync {
    /// Human-readable format name.
    fn name(&self) -> &'static str;

    /// Extensions this adapter claims, lowercase with a leading dot.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Whether this adapter claims the file. Extension based, case-insensitive.
    fn can_read(&self, path: &Path) -> bool {
        let extension = dotted_extension(path);
        !extension.is_empty() && self.supported_extensions().contains(&extension.as_str())
    }

    /// Read the whole file. All-or-nothing: no partial record set on failure.
    fn read(&self, path: &Path) -> DataResult<RecordSet>;
}

/// Lowercased extension of `path` with a leading dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Assemble records from a header row and raw data rows.
///
/// Columns are coerced as a whole so the strategy can infer a column type;
/// cells beyond a short row's end are passed on as missing.
pub(crate) fn records_from_rows(
    headers: &[String],
    rows: &[Vec<String>],
    coercion: &dyn ColumnCoercion,
) -> Vec<Record> {
    let columns: Vec<Vec<_>> = (0..headers.len())
        .map(|col| {
            let cells: Vec<Option<String>> =
                rows.iter().map(|row| row.get(col).cloned()).collect();
            coercion.coerce_column(&cells)
        })
        .collect();

    (0..rows.len())
        .map(|row| {
            headers
                .iter()
                .zip(&columns)
                .map(|(header, column)| (header.clone(), column[row].clone()))
                .collect::<Record>()
        })
        .collect()
}
