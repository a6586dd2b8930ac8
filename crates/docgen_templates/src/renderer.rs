//! Placeholder substitution over a single record.

use docgen_data::{Record, Value};
use tracing::debug;

use crate::error::TemplateResult;
use crate::format::{fixed, FormatSpec};
use crate::items::derive_items;
use crate::scanner::{placeholders, Placeholder, Scanner, Segment};

/// Renders templates against records.
///
/// Holds no per-call state, so one renderer can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute every placeholder in `template` with values from `record`.
    ///
    /// Missing keys are left as their literal placeholder text and bad
    /// format specifiers fall back to the default rendering. The only
    /// failure is a record whose item table cannot be derived.
    pub fn render(&self, template: &str, record: &Record) -> TemplateResult<String> {
        let augmented = derive_items(record)?;

        let mut output = String::with_capacity(template.len());
        let mut missing = 0usize;
        for segment in Scanner::new(template) {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(placeholder) => match augmented.get(placeholder.key) {
                    Some(value) => output.push_str(&format_value(value, placeholder.spec)),
                    None => {
                        missing += 1;
                        output.push_str(placeholder.raw);
                    }
                },
            }
        }

        if missing > 0 {
            debug!("{} placeholder(s) left unresolved", missing);
        }
        Ok(output)
    }

    /// Keys referenced by `template` that `record` cannot resolve, in order
    /// of first appearance.
    pub fn unresolved_keys(&self, template: &str, record: &Record) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for Placeholder { key, .. } in placeholders(template) {
            let resolvable = key == crate::items::ITEMS_HTML || record.contains_key(key);
            if !resolvable && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }
}

/// Text for one resolved placeholder.
pub fn format_value(value: &Value, spec: Option<&str>) -> String {
    let spec = match spec {
        Some(spec) if !spec.is_empty() => spec,
        _ => return default_text(value),
    };

    match FormatSpec::parse(spec).and_then(|parsed| parsed.apply(value)) {
        Ok(text) => text,
        Err(e) => {
            debug!("Format '{}' not applied to {} value: {}", spec, value.kind(), e);
            default_text(value)
        }
    }
}

/// Floats get two fraction digits; everything else its natural form.
fn default_text(value: &Value) -> String {
    match value {
        Value::Float(x) => fixed(*x, 2),
        other => other.to_string(),
    }
}
