//! Input schema definitions for benchmark records and walker trees.
//!
//! Benchmark records are kept as flat JSON objects because the column set
//! differs between benchmark runs. Walker trees have a fixed shape and are
//! deserialized straight into typed nodes.

use crate::utils::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One flat benchmark record (a row of the input JSON list)
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Position of the record in its input file
    pub index: usize,

    /// Raw fields, configuration parameters and counters alike
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from its input position and fields
    pub fn new(index: usize, fields: Map<String, Value>) -> Self {
        Self { index, fields }
    }

    /// Raw value of a field
    ///
    /// # Errors
    /// * `SchemaError::MissingField` - field is absent from this record
    pub fn get(&self, field: &str) -> Result<&Value, SchemaError> {
        self.fields.get(field).ok_or_else(|| SchemaError::MissingField {
            record: self.index,
            field: field.to_string(),
        })
    }

    /// Numeric value of a field
    ///
    /// # Errors
    /// * `SchemaError::MissingField` - field is absent
    /// * `SchemaError::NotNumeric` - field holds something other than a number
    pub fn number(&self, field: &str) -> Result<f64, SchemaError> {
        self.get(field)?
            .as_f64()
            .ok_or_else(|| SchemaError::NotNumeric {
                record: self.index,
                field: field.to_string(),
            })
    }

    /// Value of a field usable as a group-by key component
    pub fn key_value(&self, field: &str) -> Result<KeyValue, SchemaError> {
        KeyValue::from_json(self.get(field)?).ok_or_else(|| SchemaError::NotScalar {
            record: self.index,
            field: field.to_string(),
        })
    }

    /// Key tuple made of several fields, in the given order
    pub fn key(&self, fields: &[&str]) -> Result<Vec<KeyValue>, SchemaError> {
        fields.iter().map(|field| self.key_value(field)).collect()
    }

    /// Append (or overwrite) a derived numeric column
    pub fn set_number(&mut self, field: &str, value: f64) {
        self.fields.insert(field.to_string(), Value::from(value));
    }
}

/// A scalar JSON value with a total order, used as a group-by key component
///
/// Integral floats are normalized to `Int` so that `10` and `10.0` land in
/// the same group.
#[derive(Debug, Clone)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl KeyValue {
    /// Convert a JSON scalar; arrays, objects and null have no key form
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(KeyValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(KeyValue::Int(i))
                } else {
                    n.as_f64().map(KeyValue::from_f64)
                }
            }
            Value::String(s) => Some(KeyValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            KeyValue::Int(value as i64)
        } else {
            KeyValue::Float(value)
        }
    }

    /// Numeric view, used for chart axes
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            KeyValue::Int(i) => Some(*i as f64),
            KeyValue::Float(f) => Some(*f),
            KeyValue::Text(_) => None,
        }
    }

    /// Flag semantics: non-zero numbers, `true` and non-empty strings are set
    pub fn is_truthy(&self) -> bool {
        match self {
            KeyValue::Bool(b) => *b,
            KeyValue::Int(i) => *i != 0,
            KeyValue::Float(f) => *f != 0.0,
            KeyValue::Text(s) => !s.is_empty(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            KeyValue::Bool(_) => 0,
            KeyValue::Int(_) | KeyValue::Float(_) => 1,
            KeyValue::Text(_) => 2,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Bool(a), KeyValue::Bool(b)) => a.cmp(b),
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Float(a), KeyValue::Float(b)) => a.total_cmp(b),
            // Mixed numbers never compare equal after normalization
            (KeyValue::Int(a), KeyValue::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (KeyValue::Float(a), KeyValue::Int(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl Hash for KeyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            KeyValue::Bool(b) => b.hash(state),
            KeyValue::Int(i) => i.hash(state),
            KeyValue::Float(f) => f.to_bits().hash(state),
            KeyValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{}", b),
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::Float(x) => write!(f, "{}", x),
            KeyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Int(value)
    }
}

/// One step of a walker traversal, with the steps it spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerTreeNode {
    /// The graph node visited at this step
    pub node: WalkerNode,

    /// Steps taken from this node, in traversal order
    #[serde(default)]
    pub children: Vec<WalkerTreeNode>,
}

/// Identity of a visited graph node; other attributes are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerNode {
    pub id: i64,
}

impl WalkerTreeNode {
    /// Total number of steps in this tree (including the root)
    pub fn step_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(step) = pending.pop() {
            count += 1;
            pending.extend(step.children.iter());
        }
        count
    }

    /// Number of parent-child links in this tree
    pub fn link_count(&self) -> usize {
        self.step_count() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(fields) => Record::new(0, fields),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_number_missing_field() {
        let rec = record(json!({"hit": 5}));
        assert_eq!(
            rec.number("total_acc"),
            Err(SchemaError::MissingField { record: 0, field: "total_acc".to_string() })
        );
    }

    #[test]
    fn test_number_not_numeric() {
        let rec = record(json!({"hit": "five"}));
        assert!(matches!(rec.number("hit"), Err(SchemaError::NotNumeric { .. })));
    }

    #[test]
    fn test_key_value_normalizes_integral_floats() {
        let a = KeyValue::from_json(&json!(10)).unwrap();
        let b = KeyValue::from_json(&json!(10.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_string(), "10");
    }

    #[test]
    fn test_key_value_ordering() {
        let mut keys = vec![
            KeyValue::Text("b".to_string()),
            KeyValue::Float(2.5),
            KeyValue::Int(3),
            KeyValue::Int(-1),
            KeyValue::Bool(true),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                KeyValue::Bool(true),
                KeyValue::Int(-1),
                KeyValue::Float(2.5),
                KeyValue::Int(3),
                KeyValue::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_key_value_rejects_null() {
        let rec = record(json!({"cache_size": null}));
        assert!(matches!(rec.key_value("cache_size"), Err(SchemaError::NotScalar { .. })));
    }

    #[test]
    fn test_truthiness() {
        assert!(!KeyValue::Int(0).is_truthy());
        assert!(KeyValue::Int(1).is_truthy());
        assert!(KeyValue::Bool(true).is_truthy());
    }

    #[test]
    fn test_walker_tree_children_default() {
        let tree: WalkerTreeNode = serde_json::from_value(json!({"node": {"id": 7}})).unwrap();
        assert_eq!(tree.node.id, 7);
        assert!(tree.children.is_empty());
        assert_eq!(tree.step_count(), 1);
        assert_eq!(tree.link_count(), 0);
    }
}
