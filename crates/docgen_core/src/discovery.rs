//! Locating data and template files.

use std::path::{Path, PathBuf};

use docgen_data::AdapterResolver;
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Regular files directly inside `dir`, sorted. A missing directory is
/// treated as empty.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!("Directory does not exist: {:?}", dir);
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Files in `dir` that some adapter can read.
pub fn data_files(dir: &Path, resolver: &AdapterResolver) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = list_files(dir)
        .into_iter()
        .filter(|path| resolver.supports(path))
        .collect();
    debug!("Found {} data file(s) in {:?}", files.len(), dir);
    files
}

/// Files in `dir` whose name matches `pattern`, ignoring case.
pub fn template_files(dir: &Path, pattern: &str) -> CoreResult<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).map_err(|e| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let files: Vec<PathBuf> = list_files(dir)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .map(|name| pattern.matches_with(&name.to_string_lossy(), options))
                .unwrap_or(false)
        })
        .collect();
    debug!("Found {} template(s) in {:?}", files.len(), dir);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_data_files_filters_and_sorts() {
        let temp = tempdir().unwrap();
        for name in ["b.json", "a.CSV", "notes.txt", "c.xlsx"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        fs::create_dir(temp.path().join("nested.csv")).unwrap();
        fs::write(temp.path().join("nested.csv").join("inner.csv"), "").unwrap();

        let names: Vec<String> = data_files(temp.path(), &AdapterResolver::default())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.json", "c.xlsx"]);
    }

    #[test]
    fn test_template_pattern_is_case_insensitive() {
        let temp = tempdir().unwrap();
        for name in ["invoice.html", "ACT.HTML", "style.css"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        let files = template_files(temp.path(), "*.html").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("ACT.HTML"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("absent");
        assert!(template_files(&missing, "*.html").unwrap().is_empty());
        assert!(data_files(&missing, &AdapterResolver::default()).is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            template_files(temp.path(), "[*.html"),
            Err(CoreError::InvalidPattern { .. })
        ));
    }
}
