//! Structured-object (JSON) adapter.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, warn};

use crate::adapter::DataAdapter;
use crate::error::{DataError, DataResult};
use crate::value::{Record, RecordSet};

/// Reads a JSON document holding either an array of objects or one object.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonAdapter;

impl JsonAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DataAdapter for JsonAdapter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn read(&self, path: &Path) -> DataResult<RecordSet> {
        debug!("Reading JSON from {:?}", path);

        let file = File::open(path).map_err(|e| DataError::source_read(path, e.to_string()))?;
        let document: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DataError::source_read(path, e.to_string()))?;

        let records = match document {
            serde_json::Value::Array(elements) => elements
                .into_iter()
                .enumerate()
                .map(|(index, element)| match element {
                    serde_json::Value::Object(map) => Ok(Record::from(map)),
                    other => Err(DataError::source_read(
                        path,
                        format!(
                            "element {} is {} but every element must be an object",
                            index,
                            json_kind(&other)
                        ),
                    )),
                })
                .collect::<DataResult<Vec<_>>>()?,
            serde_json::Value::Object(map) => vec![Record::from(map)],
            other => {
                warn!(
                    "Top-level JSON value in {:?} is {}; no records loaded",
                    path,
                    json_kind(&other)
                );
                Vec::new()
            }
        };

        debug!("Read {} record(s) from {:?}", records.len(), path);
        Ok(RecordSet::new(path, records))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::fs;
    use tempfile::tempdir;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_array_of_objects() {
        let (_temp, path) = write(r#"[{"invoice_id": "A-1"}, {"invoice_id": "A-2"}]"#);
        let set = JsonAdapter::new().read(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().get("invoice_id"), Some(&Value::text("A-2")));
    }

    #[test]
    fn test_single_object_becomes_one_record() {
        let (_temp, path) = write(r#"{"client": "ООО Ромашка", "total": 10.5}"#);
        let set = JsonAdapter::new().read(&path).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.first().unwrap().get("total"), Some(&Value::Float(10.5)));
    }

    #[test]
    fn test_scalar_top_level_is_empty_not_error() {
        let (_temp, path) = write("42");
        let set = JsonAdapter::new().read(&path).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_non_object_element_is_an_error() {
        let (_temp, path) = write(r#"[{"a": 1}, 2]"#);
        let err = JsonAdapter::new().read(&path).unwrap_err();
        assert!(err.to_string().contains("element 1 is a number"));
    }

    #[test]
    fn test_malformed_json_is_source_read_error() {
        let (_temp, path) = write("{not json");
        let err = JsonAdapter::new().read(&path).unwrap_err();
        assert!(matches!(err, DataError::SourceRead { .. }));
    }
}
