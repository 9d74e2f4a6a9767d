use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::fields;
use crate::hash::ContentHash;

/// A node in a management operation tree.
///
/// Operations are trees of named fields whose values are scalars, byte
/// arrays, or nested lists of sub-records. `Clone` is a deep copy and
/// equality is structural, so a cloned operation can be rewritten without
/// touching the original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModelNode {
    /// No value. A field holding `Undefined` counts as not defined.
    #[default]
    Undefined,
    Bool(bool),
    Int(i64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<ModelNode>),
    Object(BTreeMap<String, ModelNode>),
}

impl ModelNode {
    /// An empty object node.
    pub fn object() -> Self {
        Self::Object(BTreeMap::new())
    }

    /// An empty list node.
    pub fn list() -> Self {
        Self::List(Vec::new())
    }

    /// Build an operation node with the given name and address.
    ///
    /// The address is a list of single-entry objects, one per path element.
    pub fn operation(name: &str, address: &[(&str, &str)]) -> Self {
        let address = address
            .iter()
            .map(|(key, value)| ModelNode::object().with(*key, *value))
            .collect::<Vec<_>>();
        ModelNode::object()
            .with(fields::OP, name)
            .with(fields::OP_ADDR, address)
    }

    /// Returns `true` unless this node is `Undefined`.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Returns `true` if this is an object holding a defined value under `key`.
    pub fn has_defined(&self, key: &str) -> bool {
        self.get_defined(key).is_some()
    }

    /// Field lookup that treats an `Undefined` value as absent.
    pub fn get_defined(&self, key: &str) -> Option<&ModelNode> {
        self.get(key).filter(|value| value.is_defined())
    }

    /// Field lookup. Returns `None` for non-object nodes and missing keys.
    pub fn get(&self, key: &str) -> Option<&ModelNode> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Mutable field lookup.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ModelNode> {
        match self {
            Self::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    /// Set `key` to `value`, returning the stored value.
    ///
    /// A node that is not already an object becomes an empty object first.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ModelNode>) -> &mut ModelNode {
        if !matches!(self, Self::Object(_)) {
            *self = Self::object();
        }
        let Self::Object(map) = self else {
            unreachable!("node was converted to an object above");
        };
        let slot = map.entry(key.into()).or_default();
        *slot = value.into();
        slot
    }

    /// Builder form of [`Self::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ModelNode>) -> Self {
        self.set(key, value);
        self
    }

    /// Append to a list node, returning the appended element.
    ///
    /// A node that is not already a list becomes an empty list first.
    pub fn push(&mut self, value: impl Into<ModelNode>) -> &mut ModelNode {
        if !matches!(self, Self::List(_)) {
            *self = Self::list();
        }
        let Self::List(items) = self else {
            unreachable!("node was converted to a list above");
        };
        items.push(value.into());
        let last = items.len() - 1;
        &mut items[last]
    }

    /// First element of a list node.
    pub fn first(&self) -> Option<&ModelNode> {
        self.as_list().and_then(|items| items.first())
    }

    /// Integer view. Strings that parse as integers are accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<ModelNode>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render as JSON for display. Byte values render as
    /// `{"bytes-value": "<hex>"}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::String(s) => Value::String(s.clone()),
            Self::Bytes(bytes) => {
                let mut map = Map::new();
                map.insert(fields::BYTES_VALUE.into(), Value::String(hex::encode(bytes)));
                Value::Object(map)
            }
            Self::List(items) => Value::Array(items.iter().map(ModelNode::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for ModelNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ModelNode {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ModelNode {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ModelNode {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ModelNode {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for ModelNode {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for ModelNode {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<ContentHash> for ModelNode {
    fn from(value: ContentHash) -> Self {
        Self::Bytes(value.as_bytes().to_vec())
    }
}

impl From<Vec<ModelNode>> for ModelNode {
    fn from(value: Vec<ModelNode>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_field_is_not_defined() {
        let node = ModelNode::object().with("a", ModelNode::Undefined).with("b", 1);
        assert!(!node.has_defined("a"));
        assert!(node.has_defined("b"));
        assert!(!node.has_defined("missing"));
    }

    #[test]
    fn scalars_have_no_fields() {
        let node = ModelNode::from(5);
        assert!(node.get("x").is_none());
        assert!(!node.has_defined("x"));
    }

    #[test]
    fn set_turns_undefined_into_object() {
        let mut node = ModelNode::Undefined;
        node.set("name", "value");
        assert_eq!(node.get("name").and_then(ModelNode::as_str), Some("value"));
    }

    #[test]
    fn push_and_first() {
        let mut node = ModelNode::Undefined;
        node.push(ModelNode::object().with("k", 1));
        node.push(ModelNode::object().with("k", 2));
        assert_eq!(node.as_list().map(<[ModelNode]>::len), Some(2));
        assert_eq!(node.first().and_then(|n| n.get("k")), Some(&ModelNode::Int(1)));
    }

    #[test]
    fn clone_is_deep() {
        let original = ModelNode::object().with(
            "content",
            vec![ModelNode::object().with("bytes", vec![1u8, 2, 3])],
        );
        let mut copy = original.clone();
        copy.set("content", ModelNode::list());
        assert_ne!(original, copy);
        assert_eq!(
            original
                .get("content")
                .and_then(ModelNode::first)
                .and_then(|c| c.get("bytes"))
                .and_then(ModelNode::as_bytes),
            Some(&[1u8, 2, 3][..])
        );
    }

    #[test]
    fn as_int_accepts_numeric_strings() {
        assert_eq!(ModelNode::from("42").as_int(), Some(42));
        assert_eq!(ModelNode::from("-1").as_int(), Some(-1));
        assert_eq!(ModelNode::from("forty").as_int(), None);
        assert_eq!(ModelNode::from(true).as_int(), None);
    }

    #[test]
    fn operation_builder_sets_name_and_address() {
        let op = ModelNode::operation("add", &[("deployment", "app.war")]);
        assert_eq!(op.get(fields::OP).and_then(ModelNode::as_str), Some("add"));
        let address = op.get(fields::OP_ADDR).and_then(ModelNode::first).unwrap();
        assert_eq!(address.get("deployment").and_then(ModelNode::as_str), Some("app.war"));
    }

    #[test]
    fn to_json_renders_bytes_as_hex() {
        let node = ModelNode::object().with("bytes", vec![0x41u8, 0x42]);
        let json = node.to_json();
        assert_eq!(json["bytes"]["bytes-value"], "4142");
    }

    #[test]
    fn hash_converts_to_bytes() {
        let node = ModelNode::from(ContentHash::from_hash([9; 32]));
        assert_eq!(node.as_bytes(), Some(&[9u8; 32][..]));
    }
}
