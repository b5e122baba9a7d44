//! Append command implementation.

use super::models::AppendArgs;
use crate::output::append_to_json_list;
use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

/// Execute the append command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * `item` is not valid JSON
/// * Target holds JSON that is not a list
/// * File write errors
pub fn execute_append(args: AppendArgs) -> Result<()> {
    let item: Value = serde_json::from_str(&args.item)
        .with_context(|| format!("Item is not valid JSON: {}", args.item))?;

    append_to_json_list(&args.file, &item)
        .with_context(|| format!("Failed to append to {}", args.file.display()))?;

    info!("✓ Appended item to: {}", args.file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_append_creates_list() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("runs.json");

        execute_append(AppendArgs {
            file: file.clone(),
            item: r#"{"hit": 5}"#.to_string(),
        })
        .unwrap();

        let stored: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(stored, json!([{"hit": 5}]));
    }

    #[test]
    fn test_append_rejects_invalid_item() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppendArgs {
            file: dir.path().join("runs.json"),
            item: "{not json".to_string(),
        };

        assert!(execute_append(args).is_err());
    }
}
