//! Arena-backed document model.
//!
//! A [`Document`] owns every node of its tree in a `Vec`-backed arena and
//! hands out [`NodeId`] indices into it. Handles are only meaningful for the
//! document that produced them, and any mutation may invalidate them (slots
//! of released subtrees are recycled), so callers keep paths, not handles,
//! across mutations.
//!
//! Values never move between documents by reference. Copying a value into
//! another document goes through an import that deep-clones it into the
//! destination arena.

use indexmap::IndexMap;
use serde_json::Number;
use thiserror::Error;
use undo_dom_pointer::JsonPointerError;

pub mod convert;
pub mod path;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error(transparent)]
    Pointer(#[from] JsonPointerError),
}

// ── Nodes ─────────────────────────────────────────────────────────────────

/// Index of a node inside one document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One arena slot's payload. Containers refer to their children by handle.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<NodeId>),
    /// Members in insertion order.
    Object(IndexMap<String, NodeId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
        }
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// A hierarchical value tree together with the arena that stores it.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_root(Node::Null)
    }
}

impl Document {
    /// A document whose root is `null`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose root is an empty array. Patch sets start like this.
    pub fn array() -> Self {
        Self::with_root(Node::Array(Vec::new()))
    }

    /// A document whose root is an empty object.
    pub fn object() -> Self {
        Self::with_root(Node::Object(IndexMap::new()))
    }

    /// A new document holding a deep copy of `value`.
    pub fn from_value(value: ValueRef<'_>) -> Self {
        let mut doc = Self::new();
        let root = doc.import(value);
        doc.replace_root(root);
        doc
    }

    fn with_root(node: Node) -> Self {
        Self {
            slots: vec![Some(node)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_ref(&self) -> ValueRef<'_> {
        self.value(self.root)
    }

    pub fn value(&self, id: NodeId) -> ValueRef<'_> {
        ValueRef { doc: self, id }
    }

    /// The node behind `id`, or `None` for a released or foreign handle.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    /// Whether the root is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.node(self.root), Some(Node::Array(_)))
    }

    /// Number of live nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Store a detached node and return its handle.
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Return the subtree rooted at `id` to the free list.
    pub(crate) fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) else {
                continue;
            };
            match node {
                Node::Array(items) => stack.extend(items),
                Node::Object(members) => stack.extend(members.into_values()),
                _ => {}
            }
            self.free.push(id.0);
        }
    }

    /// Deep-clone `src` (which belongs to another document) into this arena.
    /// The returned node is detached until it is placed somewhere.
    pub(crate) fn import(&mut self, src: ValueRef<'_>) -> NodeId {
        let node = match src.node() {
            None | Some(Node::Null) => Node::Null,
            Some(Node::Bool(b)) => Node::Bool(*b),
            Some(Node::Number(n)) => Node::Number(n.clone()),
            Some(Node::String(s)) => Node::String(s.clone()),
            Some(Node::Array(items)) => {
                let items = items.iter().map(|&item| self.import(src.doc.value(item))).collect();
                Node::Array(items)
            }
            Some(Node::Object(members)) => {
                let members = members
                    .iter()
                    .map(|(key, &member)| (key.clone(), self.import(src.doc.value(member))))
                    .collect();
                Node::Object(members)
            }
        };
        self.alloc(node)
    }

    /// Make the detached node `id` the root, releasing the previous tree.
    pub(crate) fn replace_root(&mut self, id: NodeId) {
        let old = std::mem::replace(&mut self.root, id);
        if old != id {
            self.release(old);
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root_ref() == other.root_ref()
    }
}

// ── Borrowed views ────────────────────────────────────────────────────────

/// A borrowed view of one node and the document that owns it.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ValueRef<'a> {
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> Option<&'a Node> {
        self.doc.node(self.id)
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.node().map(Node::kind)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.node() {
            Some(Node::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&'a [NodeId]> {
        match self.node() {
            Some(Node::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a IndexMap<String, NodeId>> {
        match self.node() {
            Some(Node::Object(members)) => Some(members),
            _ => None,
        }
    }

    /// Object member by key.
    pub fn get(&self, key: &str) -> Option<ValueRef<'a>> {
        let id = *self.as_object()?.get(key)?;
        Some(self.doc.value(id))
    }

    /// Array element by index.
    pub fn at(&self, index: usize) -> Option<ValueRef<'a>> {
        let id = *self.as_array()?.get(index)?;
        Some(self.doc.value(id))
    }

    /// Number of children of a container, zero for scalars.
    pub fn len(&self) -> usize {
        match self.node() {
            Some(Node::Array(items)) => items.len(),
            Some(Node::Object(members)) => members.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Levels of nesting below this node: zero for scalars and empty
    /// containers.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.id, 0usize)];
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            match self.doc.node(id) {
                Some(Node::Array(items)) => stack.extend(items.iter().map(|&item| (item, level + 1))),
                Some(Node::Object(members)) => {
                    stack.extend(members.values().map(|&member| (member, level + 1)))
                }
                _ => {}
            }
        }
        deepest
    }
}

/// Structural equality: arrays compare in order, objects compare as maps
/// (member order is preserved but not significant).
impl PartialEq for ValueRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (Some(Node::Null), Some(Node::Null)) => true,
            (Some(Node::Bool(a)), Some(Node::Bool(b))) => a == b,
            (Some(Node::Number(a)), Some(Node::Number(b))) => a == b,
            (Some(Node::String(a)), Some(Node::String(b))) => a == b,
            (Some(Node::Array(a)), Some(Node::Array(b))) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|(&x, &y)| self.doc.value(x) == other.doc.value(y))
            }
            (Some(Node::Object(a)), Some(Node::Object(b))) => {
                a.len() == b.len()
                    && a.iter().all(|(key, &x)| match b.get(key) {
                        Some(&y) => self.doc.value(x) == other.doc.value(y),
                        None => false,
                    })
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
