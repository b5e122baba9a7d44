//! Load benchmark records and walker trees from JSON files.
//!
//! Both input kinds are JSON arrays: flat objects for benchmark records,
//! nested `{node: {id}, children: [...]}` objects for walker trees.

use super::schema::{Record, WalkerNode, WalkerTreeNode};
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a file that must contain a JSON array
///
/// **Public** - shared entry point for every loader
///
/// # Errors
/// * `ParseError::MissingFile` - path does not exist
/// * `ParseError::Io` - file cannot be opened
/// * `ParseError::JsonError` - file is not valid JSON
/// * `ParseError::InvalidFormat` - top-level value is not an array
pub fn read_json_list(path: impl AsRef<Path>) -> Result<Vec<Value>, ParseError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParseError::MissingFile(path.to_path_buf()));
    }

    debug!("Reading JSON list from: {}", path.display());

    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Walker trees nest two JSON levels per step, far past serde_json's
    // default depth limit
    let mut json = serde_json::Deserializer::from_reader(BufReader::new(file));
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;

    match value {
        Value::Array(items) => {
            debug!("Loaded {} items from {}", items.len(), path.display());
            Ok(items)
        }
        _ => Err(ParseError::InvalidFormat(format!(
            "{} must contain a JSON list",
            path.display()
        ))),
    }
}

/// Turn parsed JSON items into benchmark records
///
/// # Errors
/// * `ParseError::InvalidFormat` - an item is not a JSON object
pub fn parse_records(items: Vec<Value>) -> Result<Vec<Record>, ParseError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(Record::new(index, fields)),
            other => Err(ParseError::InvalidFormat(format!(
                "record {} is not a JSON object: {}",
                index, other
            ))),
        })
        .collect()
}

/// Load a JSON list of flat benchmark records
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, ParseError> {
    parse_records(read_json_list(path)?)
}

/// Deserialize walker trees from an already parsed JSON document
///
/// # Errors
/// * `ParseError::InvalidFormat` - document is not a JSON list
/// * `ParseError::MalformedInput` - a tree node lacks `node.id`, has a
///   non-integer id, or carries `children` that are not a list
pub fn parse_walker_trees(data: &Value) -> Result<Vec<WalkerTreeNode>, ParseError> {
    let roots = data.as_array().ok_or_else(|| {
        ParseError::InvalidFormat("walker data must be a JSON list of trees".to_string())
    })?;

    roots
        .iter()
        .enumerate()
        .map(|(index, root)| {
            walker_tree_from_value(root)
                .map_err(|e| ParseError::MalformedInput(format!("tree {}: {}", index, e)))
        })
        .collect()
}

/// A tree node whose children are still being converted
struct OpenStep<'a> {
    id: i64,
    children: &'a [Value],
    next: usize,
    built: Vec<WalkerTreeNode>,
}

/// Convert one tree without recursing, so depth is bounded by the heap only
fn walker_tree_from_value(root: &Value) -> Result<WalkerTreeNode, String> {
    let mut stack = vec![open_step(root)?];
    let mut finished = None;

    while let Some(top) = stack.last_mut() {
        let children = top.children;
        if let Some(child) = children.get(top.next) {
            top.next += 1;
            let step = open_step(child)?;
            stack.push(step);
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let node = WalkerTreeNode {
            node: WalkerNode { id: done.id },
            children: done.built,
        };
        match stack.last_mut() {
            Some(parent) => parent.built.push(node),
            None => finished = Some(node),
        }
    }

    finished.ok_or_else(|| "empty tree".to_string())
}

fn open_step(value: &Value) -> Result<OpenStep<'_>, String> {
    let fields: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", value))?;

    let id = fields
        .get("node")
        .ok_or_else(|| "missing field `node`".to_string())?
        .get("id")
        .ok_or_else(|| "missing field `node.id`".to_string())?;
    let id = id
        .as_i64()
        .ok_or_else(|| format!("node id must be an integer, got {}", id))?;

    let children = match fields.get("children") {
        None => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => return Err(format!("children of node {} must be a list, got {}", id, other)),
    };

    Ok(OpenStep {
        id,
        children,
        next: 0,
        built: Vec::new(),
    })
}

/// Load walker trees from a JSON file
pub fn load_walker_trees(path: impl AsRef<Path>) -> Result<Vec<WalkerTreeNode>, ParseError> {
    let items = read_json_list(path)?;
    parse_walker_trees(&Value::Array(items))
}
