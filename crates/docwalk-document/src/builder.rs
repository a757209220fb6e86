//! Programmatic construction of a [`Document`] on top of a Rowan green tree.

use std::collections::HashMap;

use rowan::GreenNodeBuilder;

use crate::document::{Document, NodeData, NodeId};
use crate::kind::{DocKind, DocNode};

/// Builds a document tree element by element, in document order.
///
/// The root node is opened on construction; [`build`](Self::build) closes it
/// along with anything left open. Node ids are handed out in the same
/// preorder the finished tree is indexed with, so attributes recorded here
/// line up with [`Document::data`].
///
/// ```
/// use docwalk_document::{DocKind, DocumentBuilder};
///
/// let mut builder = DocumentBuilder::new();
/// builder.start(DocKind::PARAGRAPH);
/// builder.token(DocKind::TEXT, "Hello");
/// builder.finish();
/// let doc = builder.build();
///
/// assert_eq!(doc.leaves().len(), 1);
/// ```
pub struct DocumentBuilder {
    builder: GreenNodeBuilder<'static>,
    data: HashMap<NodeId, NodeData>,
    next_id: u32,
    open: usize,
}

impl DocumentBuilder {
    /// Create a builder with an open root node.
    pub fn new() -> Self {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(DocKind::ROOT.into());
        Self {
            builder,
            data: HashMap::new(),
            next_id: 1,
            open: 0,
        }
    }

    /// Open a node of the given kind. Returns its id.
    pub fn start(&mut self, kind: DocKind) -> NodeId {
        debug_assert!(kind.is_node() && kind != DocKind::ROOT);
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.open += 1;
        self.builder.start_node(kind.into());
        id
    }

    /// Open a node and attach attributes to it.
    pub fn start_with(&mut self, kind: DocKind, data: NodeData) -> NodeId {
        let id = self.start(kind);
        self.data.insert(id, data);
        id
    }

    /// Close the most recently opened node. Closing with nothing open is a
    /// no-op, the root stays open until [`build`](Self::build).
    pub fn finish(&mut self) {
        if self.open > 0 {
            self.open -= 1;
            self.builder.finish_node();
        }
    }

    /// Add a token to the current node. Empty text adds nothing.
    pub fn token(&mut self, kind: DocKind, text: &str) -> Option<NodeId> {
        debug_assert!(kind.is_token());
        if text.is_empty() {
            return None;
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.builder.token(kind.into(), text);
        Some(id)
    }

    /// Consume the builder and index the finished tree.
    pub fn build(mut self) -> Document {
        while self.open > 0 {
            self.finish();
        }
        self.builder.finish_node();
        let root = DocNode::new_root(self.builder.finish());
        let doc = Document::from_parts(root, self.data);
        debug_assert_eq!(doc.len(), self.next_id as usize);
        doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
