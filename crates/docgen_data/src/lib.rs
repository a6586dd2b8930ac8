//! # docgen_data
//!
//! Record model and data source adapters for docgen.
//!
//! Every supported source format is normalized into a [`RecordSet`]: an
//! ordered list of schemaless [`Record`]s mapping field names to [`Value`]s.
//!
//! - **JSON** (`.json`): an array of objects, or a single object
//! - **CSV** (`.csv`): header row plus one record per line
//! - **XLSX** (`.xlsx`): first sheet, header row; needs the `xlsx` feature
//!
//! Tabular sources run their columns through a [`ColumnCoercion`]
//! strategy (`basic` keeps text, `enhanced` infers numbers and booleans).
//!
//! ## Example
//!
//! ```rust,no_run
//! use docgen_data::{AdapterResolver, NumericMode};
//! use std::path::Path;
//!
//! let resolver = AdapterResolver::new(NumericMode::Enhanced);
//! let records = resolver.load(Path::new("data/invoices.csv")).unwrap();
//! for record in &records {
//!     println!("{:?}", record.get("invoice_id"));
//! }
//! ```

pub mod adapter;
pub mod coercion;
pub mod delimited;
pub mod error;
pub mod resolver;
pub mod spreadsheet;
pub mod structured;
pub mod value;

pub use adapter::{dotted_extension, DataAdapter};
pub use coercion::{BasicCoercion, ColumnCoercion, EnhancedCoercion, NumericMode};
pub use delimited::CsvAdapter;
pub use error::{DataError, DataResult};
pub use resolver::AdapterResolver;
pub use spreadsheet::XlsxAdapter;
pub use structured::JsonAdapter;
pub use value::{float_repr, Record, RecordSet, Value};
