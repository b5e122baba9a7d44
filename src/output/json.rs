//! JSON list writer.
//!
//! Benchmark harnesses accumulate one record per run into a JSON array file.
//! Appends go through a temporary sibling file and a rename so a crash mid
//! write never leaves a truncated list behind.

use super::path::prepare_output_path;
use crate::utils::error::OutputError;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append one item to the JSON list stored at `path`
///
/// **Public** - main entry point for accumulating benchmark records
///
/// A missing file starts a new list. A file that does not parse as JSON is
/// replaced by a fresh list.
///
/// # Errors
/// * `OutputError::NotAList` - file holds valid JSON that is not a list
/// * `OutputError::WriteFailed` - I/O error during write or rename
/// * `OutputError::SerializationFailed` - item cannot be serialized
///
/// # Example
/// ```ignore
/// append_to_json_list("cache_stats.json", &json!({"hit": 5, "total_acc": 10}))?;
/// ```
pub fn append_to_json_list<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    item: &T,
) -> Result<(), OutputError> {
    let path = path.as_ref();

    prepare_output_path(path)?;

    let mut items = read_existing_list(path)?;
    items.push(serde_json::to_value(item)?);

    let tmp_path = temp_path_for(path);
    debug!("Writing {} items through {}", items.len(), tmp_path.display());

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &items)?;
        writer.flush()?;
    }

    std::fs::rename(&tmp_path, path)?;

    info!("Appended item #{} to {}", items.len(), path.display());

    Ok(())
}

/// Existing list content, or an empty list when there is none to extend
fn read_existing_list(path: &Path) -> Result<Vec<Value>, OutputError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(OutputError::NotAList(path.to_path_buf())),
        Err(e) => {
            warn!("{} is not valid JSON ({}), starting a new list", path.display(), e);
            Ok(Vec::new())
        }
    }
}

/// `<path>.tmp`, next to the target so the rename stays on one filesystem
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_creates_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.json");

        append_to_json_list(&path, &json!({"hit": 1})).unwrap();

        let content: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content, json!([{"hit": 1}]));
    }

    #[test]
    fn test_append_rejects_non_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.json");
        std::fs::write(&path, r#"{"hit": 1}"#).unwrap();

        let err = append_to_json_list(&path, &json!(2)).unwrap_err();
        assert!(matches!(err, OutputError::NotAList(_)));
    }

    #[test]
    fn test_append_replaces_corrupt_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.json");
        std::fs::write(&path, "[{\"hit\": 1},").unwrap();

        append_to_json_list(&path, &json!("fresh")).unwrap();

        let content: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content, json!(["fresh"]));
    }

    #[test]
    fn test_temp_file_removed_after_append() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.json");

        append_to_json_list(&path, &json!(1)).unwrap();

        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(temp_path_for(Path::new("a/b.json")), PathBuf::from("a/b.json.tmp"));
    }
}
