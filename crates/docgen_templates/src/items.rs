//! Line-item table derivation.
//!
//! Before placeholders are resolved every record gets a synthetic
//! [`ITEMS_HTML`] field holding table rows built from either a nested
//! `items` sequence or the flat `item_name`/`quantity`/`price` fields.

use docgen_data::{Record, Value};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::format::fixed;

/// Name of the derived field. Any existing value is overwritten.
pub const ITEMS_HTML: &str = "items_html";

/// Appended to every price and total cell.
pub const CURRENCY_SUFFIX: &str = " ₽";

/// Row emitted when the record carries no item data at all.
pub const NO_DATA_ROW: &str = "<tr><td colspan='4'>No data</td></tr>";

const ITEMS: &str = "items";
const ITEM_NAME: &str = "item_name";
const NAME: &str = "name";
const QUANTITY: &str = "quantity";
const PRICE: &str = "price";

/// Return a copy of `record` with [`ITEMS_HTML`] filled in.
///
/// A nested `items` sequence takes precedence over the flat shape.
pub fn derive_items(record: &Record) -> TemplateResult<Record> {
    let rows = match record.get(ITEMS) {
        Some(Value::Sequence(items)) => nested_rows(items)?,
        _ if record.contains_key(ITEM_NAME) => flat_row(record)?,
        _ => {
            debug!("Record has no item data, using placeholder row");
            NO_DATA_ROW.to_string()
        }
    };

    let mut augmented = record.clone();
    augmented.insert(ITEMS_HTML, rows);
    Ok(augmented)
}

fn nested_rows(items: &[Value]) -> TemplateResult<String> {
    let mut rows = String::new();
    for (index, item) in items.iter().enumerate() {
        let item = item.as_record().ok_or_else(|| {
            TemplateError::render_data(
                format!("{ITEMS}[{index}]"),
                format!("expected a record, found {}", item.kind()),
            )
        })?;
        let field = |name: &str| format!("{ITEMS}[{index}].{name}");

        let quantity_value = item.get(QUANTITY).filter(|v| !v.is_null());
        let quantity = numeric(quantity_value, || field(QUANTITY))?;
        let price = numeric(item.get(PRICE), || field(PRICE))?;
        let quantity_cell = quantity_value
            .map(Value::to_string)
            .unwrap_or_else(|| "0".to_string());

        rows.push_str(&row(
            &natural_or_empty(item.get(NAME)),
            &quantity_cell,
            price,
            quantity * price,
        ));
    }
    debug!("Derived {} item row(s) from nested items", items.len());
    Ok(rows)
}

fn flat_row(record: &Record) -> TemplateResult<String> {
    let quantity = numeric(record.get(QUANTITY), || QUANTITY.to_string())?;
    let price = numeric(record.get(PRICE), || PRICE.to_string())?;
    let total = quantity * price;

    for (field, value) in [(QUANTITY, quantity), (PRICE, price), ("total", total)] {
        if !value.is_finite() {
            return Err(TemplateError::render_data(
                field,
                format!("{} is not a finite number", fixed(value, 2)),
            ));
        }
    }

    Ok(row(
        &natural_or_empty(record.get(ITEM_NAME)),
        &(quantity.trunc() as i64).to_string(),
        price,
        total,
    ))
}

fn row(name: &str, quantity: &str, price: f64, total: f64) -> String {
    format!(
        "<tr><td>{name}</td><td>{quantity}</td><td>{}{CURRENCY_SUFFIX}</td><td>{}{CURRENCY_SUFFIX}</td></tr>\n",
        fixed(price, 2),
        fixed(total, 2),
    )
}

fn natural_or_empty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => value.to_string(),
    }
}

/// Numeric reading of an item field; absent and null count as zero.
fn numeric(value: Option<&Value>, field: impl Fn() -> String) -> TemplateResult<f64> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Integer(i)) => Ok(*i as f64),
        Some(Value::Float(x)) => Ok(*x),
        Some(Value::Boolean(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(Value::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            TemplateError::render_data(field(), format!("'{text}' is not a number"))
        }),
        Some(other) => Err(TemplateError::render_data(
            field(),
            format!("expected a number, found {}", other.kind()),
        )),
    }
}
