//! docgen Templates - placeholder substitution engine
//!
//! Turns one record and one template into final markup:
//! - Derives the `items_html` line-item table
//! - Scans `{key}` / `{key:spec}` placeholders in a single pass
//! - Applies per-placeholder format specifiers with graceful fallback

pub mod error;
pub mod format;
pub mod items;
pub mod renderer;
pub mod scanner;

pub use error::{TemplateError, TemplateResult};
pub use format::{FormatSpec, FormatSpecError};
pub use items::{derive_items, CURRENCY_SUFFIX, ITEMS_HTML, NO_DATA_ROW};
pub use renderer::{format_value, TemplateRenderer};
pub use scanner::{placeholders, Placeholder, Scanner, Segment};
