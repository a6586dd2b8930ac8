//! End-to-end pipeline runs against a mock backend.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use docgen_core::{
    CoreError, DocgenConfig, GenerateRequest, HtmlBackend, MockBackend, Pipeline,
    RecordSelector,
};
use tempfile::{tempdir, TempDir};

struct Workspace {
    _temp: TempDir,
    config: DocgenConfig,
}

fn workspace() -> Workspace {
    let temp = tempdir().unwrap();
    let root = temp.path();
    let config = DocgenConfig {
        data_dir: root.join("data"),
        templates_dir: root.join("templates"),
        output_dir: root.join("output"),
        ..DocgenConfig::default()
    };
    Workspace {
        _temp: temp,
        config,
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const TEMPLATE: &str = "<h1>{invoice_id}</h1><p>{customer}</p><table>{items_html}</table>";

#[tokio::test]
async fn test_generate_from_csv() {
    let ws = workspace();
    let data = ws.config.data_dir.join("invoices.csv");
    let template = ws.config.templates_dir.join("invoice.html");
    write(
        &data,
        "invoice_id,customer,item_name,quantity,price\n\
         INV-001,Иван,Widget,4,2.5\n\
         INV-002,Anna,Gadget,1,10\n",
    );
    write(&template, TEMPLATE);

    let backend = MockBackend::new();
    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(backend.clone()));
    pipeline.ensure_directories().unwrap();

    let outcome = pipeline
        .generate(&GenerateRequest {
            data_file: data,
            template_file: template,
            record: RecordSelector::parse("INV-002"),
        })
        .await
        .unwrap();

    assert_eq!(outcome.record_index, 1);
    assert_eq!(outcome.label, "INV-002");
    assert_eq!(outcome.output_path, ws.config.output_dir.join("invoice_INV-002.pdf"));
    assert_eq!(backend.call_count(), 1);

    let markup = backend.last_markup().unwrap();
    assert!(markup.contains("<h1>INV-002</h1><p>Anna</p>"));
    assert!(markup.contains("<td>Gadget</td><td>1</td><td>10.00 ₽</td><td>10.00 ₽</td>"));
}

#[tokio::test]
async fn test_generate_with_html_backend_writes_file() {
    let ws = workspace();
    let data = ws.config.data_dir.join("invoices.json");
    let template = ws.config.templates_dir.join("invoice.html");
    write(
        &data,
        r#"[{"invoice_id": "A/1", "customer": "Acme",
             "items": [{"name": "Bolt", "quantity": 3, "price": 0.5}]}]"#,
    );
    write(&template, TEMPLATE);

    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(HtmlBackend::new()));
    let outcome = pipeline
        .generate(&GenerateRequest {
            data_file: data,
            template_file: template,
            record: RecordSelector::Index(0),
        })
        .await
        .unwrap();

    let written = fs::read_to_string(&outcome.output_path).unwrap();
    assert!(outcome.output_path.ends_with("invoice_A1.html"));
    assert!(written.contains("<td>Bolt</td><td>3</td><td>0.50 ₽</td><td>1.50 ₽</td>"));
    assert_eq!(outcome.report.bytes_written, written.len() as u64);
}

#[tokio::test]
async fn test_empty_record_set_is_distinct_error() {
    let ws = workspace();
    let data = ws.config.data_dir.join("empty.json");
    let template = ws.config.templates_dir.join("invoice.html");
    write(&data, "42");
    write(&template, TEMPLATE);

    let backend = MockBackend::new();
    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(backend.clone()));
    let err = pipeline
        .generate(&GenerateRequest {
            data_file: data,
            template_file: template,
            record: RecordSelector::Index(0),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::EmptyRecordSet(_)));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_is_surfaced() {
    let ws = workspace();
    let data = ws.config.data_dir.join("one.json");
    let template = ws.config.templates_dir.join("invoice.html");
    write(&data, r#"{"invoice_id": 1}"#);
    write(&template, TEMPLATE);

    let backend = MockBackend::new().simulate_failure("no fonts configured");
    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(backend));
    let err = pipeline
        .generate(&GenerateRequest {
            data_file: data,
            template_file: template,
            record: RecordSelector::Index(0),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Backend(_)));
    assert!(err.to_string().contains("no fonts configured"));
}

#[tokio::test]
async fn test_unsupported_data_file() {
    let ws = workspace();
    let data = ws.config.data_dir.join("data.txt");
    let template = ws.config.templates_dir.join("invoice.html");
    write(&data, "x");
    write(&template, TEMPLATE);

    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(MockBackend::new()));
    let err = pipeline
        .generate(&GenerateRequest {
            data_file: data,
            template_file: template,
            record: RecordSelector::Index(0),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::Data(docgen_data::DataError::UnsupportedFormat { ref extension, .. }) if extension == ".txt"
    ));
}

#[test]
fn test_discovery_through_pipeline() {
    let ws = workspace();
    write(&ws.config.data_dir.join("b.json"), "[]");
    write(&ws.config.data_dir.join("a.csv"), "id\n1\n");
    write(&ws.config.data_dir.join("readme.md"), "");
    write(&ws.config.templates_dir.join("invoice.HTML"), TEMPLATE);
    write(&ws.config.templates_dir.join("notes.txt"), "");

    let pipeline = Pipeline::new(ws.config.clone(), Arc::new(MockBackend::new()));
    let data: Vec<_> = pipeline
        .data_files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(data, vec!["a.csv", "b.json"]);
    assert_eq!(pipeline.template_files().unwrap().len(), 1);
}
