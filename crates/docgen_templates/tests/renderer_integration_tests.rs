//! Rendering behaviour over realistic invoice templates.

use docgen_data::{Record, Value};
use docgen_templates::{TemplateError, TemplateRenderer, CURRENCY_SUFFIX};
use serde_json::json;

const INVOICE_TEMPLATE: &str = r#"<html>
<head><style>
  body {{ font-family: sans-serif; }}
  td {{ padding: 4px; }}
</style></head>
<body>
  <h1>Invoice {invoice_id}</h1>
  <p>Customer: {customer}</p>
  <table>{items_html}</table>
  <p>Total: {total:,.2f}{currency}</p>
  <p>{footer}</p>
</body>
</html>"#;

fn record(value: serde_json::Value) -> Record {
    match Value::from(value) {
        Value::Record(record) => record,
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn test_template_without_placeholders_is_identity() {
    let renderer = TemplateRenderer::new();
    let record = record(json!({"a": 1}));
    for template in ["", "plain text", "<p>Ünïcode ✓</p>", "{{escaped}}", "{}", "{unclosed"] {
        assert_eq!(renderer.render(template, &record).unwrap(), template);
    }
}

#[test]
fn test_full_invoice_from_nested_items() {
    let record = record(json!({
        "invoice_id": "INV-001",
        "customer": "ООО Ромашка",
        "items": [
            {"name": "Консультация", "quantity": 2, "price": 1500.0},
            {"name": "Report", "quantity": 1, "price": 499.99}
        ],
        "total": 3499.99,
        "currency": " RUB"
    }));

    let html = TemplateRenderer::new()
        .render(INVOICE_TEMPLATE, &record)
        .unwrap();

    assert!(html.contains("<h1>Invoice INV-001</h1>"));
    assert!(html.contains("Customer: ООО Ромашка"));
    assert!(html.contains(
        "<tr><td>Консультация</td><td>2</td><td>1500.00 ₽</td><td>3000.00 ₽</td></tr>\n"
    ));
    assert!(html.contains("<td>Report</td><td>1</td><td>499.99 ₽</td><td>499.99 ₽</td>"));
    assert!(html.contains("Total: 3,499.99 RUB"));
    // Escaped CSS braces are untouched and the missing footer stays visible.
    assert!(html.contains("body {{ font-family: sans-serif; }}"));
    assert!(html.contains("<p>{footer}</p>"));
}

#[test]
fn test_flat_csv_style_record() {
    let record = record(json!({
        "invoice_id": "7",
        "item_name": "Widget",
        "quantity": "4",
        "price": "2.5"
    }));

    let html = TemplateRenderer::new()
        .render("{items_html}", &record)
        .unwrap();

    assert_eq!(
        html,
        format!("<tr><td>Widget</td><td>4</td><td>2.50{CURRENCY_SUFFIX}</td><td>10.00{CURRENCY_SUFFIX}</td></tr>\n")
    );
}

#[test]
fn test_schemaless_records_render_independently() {
    let renderer = TemplateRenderer::new();
    let template = "{id}:{extra}";
    let first = record(json!({"id": 1, "extra": 0.5}));
    let second = record(json!({"id": 2}));

    assert_eq!(renderer.render(template, &first).unwrap(), "1:0.50");
    assert_eq!(renderer.render(template, &second).unwrap(), "2:{extra}");
}

#[test]
fn test_record_derivation_failure_aborts_render() {
    let record = record(json!({"item_name": "Widget", "quantity": "many"}));
    let err = TemplateRenderer::new()
        .render("{item_name}", &record)
        .unwrap_err();
    assert!(matches!(err, TemplateError::RenderData { ref field, .. } if field == "quantity"));
}

#[test]
fn test_nested_values_render_as_json() {
    let record = record(json!({"meta": {"k": [1, 2]}, "tags": ["a", "b"]}));
    assert_eq!(
        TemplateRenderer::new()
            .render("{meta} {tags}", &record)
            .unwrap(),
        r#"{"k":[1,2]} ["a","b"]"#
    );
}
