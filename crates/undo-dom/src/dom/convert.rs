//! Conversion between documents and `serde_json::Value`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Document, Node, NodeId, ValueRef};

impl Document {
    /// Build a document from a JSON value, keeping object member order.
    pub fn from_json(value: &Value) -> Self {
        let mut doc = Self::new();
        let root = doc.import_json(value);
        doc.replace_root(root);
        doc
    }

    /// Export the whole document.
    pub fn to_json(&self) -> Value {
        self.root_ref().to_json()
    }

    /// Allocate a detached copy of `value` in this arena.
    pub(crate) fn import_json(&mut self, value: &Value) -> NodeId {
        let node = match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => Node::Number(n.clone()),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(items) => {
                Node::Array(items.iter().map(|item| self.import_json(item)).collect())
            }
            Value::Object(members) => {
                let mut map = IndexMap::with_capacity(members.len());
                for (key, member) in members {
                    let id = self.import_json(member);
                    map.insert(key.clone(), id);
                }
                Node::Object(map)
            }
        };
        self.alloc(node)
    }
}

impl From<&Value> for Document {
    fn from(value: &Value) -> Self {
        Document::from_json(value)
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::from_json(&value)
    }
}

impl ValueRef<'_> {
    /// Export this subtree. A stale handle exports as `null`.
    pub fn to_json(&self) -> Value {
        match self.node() {
            None | Some(Node::Null) => Value::Null,
            Some(Node::Bool(b)) => Value::Bool(*b),
            Some(Node::Number(n)) => Value::Number(n.clone()),
            Some(Node::String(s)) => Value::String(s.clone()),
            Some(Node::Array(items)) => Value::Array(
                items
                    .iter()
                    .map(|&item| self.document().value(item).to_json())
                    .collect(),
            ),
            Some(Node::Object(members)) => {
                let mut map = Map::with_capacity(members.len());
                for (key, &member) in members {
                    map.insert(key.clone(), self.document().value(member).to_json());
                }
                Value::Object(map)
            }
        }
    }
}
