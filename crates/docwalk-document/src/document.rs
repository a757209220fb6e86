use std::collections::HashMap;
use std::ops::Range;

use rowan::{NodeOrToken, WalkEvent};
use uuid::Uuid;

use crate::kind::{DocElement, DocKind, DocNode};

/// Identifier of an element: its index in a preorder walk of the tree.
///
/// Ids are only meaningful together with the [`Document`] that handed them
/// out; pair them with a [`DocumentId`] when they outlive a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Preorder index of the element.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of one loaded document. Clones of a document share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Attributes that a node kind carries beyond its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Heading { level: u8 },
    /// `start` is the first number of an ordered list
    List { start: Option<u64> },
    Link { destination: String, title: String },
    Image { source: String, title: String },
    CodeBlock { language: Option<String> },
    Task { checked: bool },
}

/// A run of consecutive tokens owned directly by one block-level node.
///
/// Nested blocks own their text separately. When a nested block interrupts
/// its parent's text (a list inside a list item followed by more text), the
/// parent's text is split into two blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    node: NodeId,
    text: String,
    tokens: Vec<NodeId>,
    starts: Vec<usize>,
}

impl TextBlock {
    /// The block-level node owning this text.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Concatenated text of the block's own tokens.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tokens of the block, in document order.
    pub fn tokens(&self) -> &[NodeId] {
        &self.tokens
    }

    /// Map a block offset to the token holding the character at `pos`.
    ///
    /// `pos` must be less than the text length.
    pub fn locate_start(&self, pos: usize) -> (NodeId, usize) {
        let k = self.starts.partition_point(|&s| s <= pos).saturating_sub(1);
        (self.tokens[k], pos - self.starts[k])
    }

    /// Map a block offset to the token holding the character just before
    /// `pos`, with the offset measured past that character.
    ///
    /// `pos` must be greater than zero.
    pub fn locate_end(&self, pos: usize) -> (NodeId, usize) {
        let k = self.starts.partition_point(|&s| s < pos).saturating_sub(1);
        (self.tokens[k], pos - self.starts[k])
    }
}

#[derive(Debug, Clone)]
struct Entry {
    element: DocElement,
    range: Range<usize>,
    parent: Option<NodeId>,
    /// Preorder index just past the last descendant
    subtree_end: u32,
    /// Number of leaves with a smaller preorder index
    leaves_before: u32,
    leaf: Option<u32>,
    /// Text block index and the token's start offset within the block
    block: Option<(u32, usize)>,
}

/// An immutable, indexed document tree.
///
/// `Document` is the read-only provider every walker works against. It wraps
/// a Rowan tree and precomputes the structural queries traversal needs:
///
/// - **Identity**: every element has a stable [`NodeId`]; the document as a
///   whole has a [`DocumentId`]
/// - **Structure**: parent, children and ancestors of any element
/// - **Text**: text and global byte range of any element
/// - **Leaves**: tokens plus childless non-root nodes, in document order
/// - **Text blocks**: text grouped by innermost block-level ancestor
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    root: DocNode,
    entries: Vec<Entry>,
    leaves: Vec<NodeId>,
    blocks: Vec<TextBlock>,
    data: HashMap<NodeId, NodeData>,
}

impl Document {
    pub(crate) fn from_parts(root: DocNode, data: HashMap<NodeId, NodeData>) -> Self {
        let mut entries: Vec<Entry> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for event in root.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(element) => {
                    let index = entries.len();
                    let range = element.text_range();
                    let is_node = matches!(element, NodeOrToken::Node(_));
                    entries.push(Entry {
                        element,
                        range: usize::from(range.start())..usize::from(range.end()),
                        parent: stack.last().map(|&p| NodeId(p as u32)),
                        subtree_end: index as u32 + 1,
                        leaves_before: 0,
                        leaf: None,
                        block: None,
                    });
                    if is_node {
                        stack.push(index);
                    }
                }
                WalkEvent::Leave(NodeOrToken::Node(_)) => {
                    if let Some(index) = stack.pop() {
                        entries[index].subtree_end = entries.len() as u32;
                    }
                }
                WalkEvent::Leave(NodeOrToken::Token(_)) => {}
            }
        }

        let mut leaves = Vec::new();
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.leaves_before = leaves.len() as u32;
            let childless = entry.subtree_end as usize == index + 1;
            if index != 0 && childless {
                entry.leaf = Some(leaves.len() as u32);
                leaves.push(NodeId(index as u32));
            }
        }

        // A text block is a run of consecutive tokens sharing a block
        // ancestor, so block order always follows token order.
        let mut blocks: Vec<TextBlock> = Vec::new();
        for index in 0..entries.len() {
            let NodeOrToken::Token(token) = &entries[index].element else {
                continue;
            };
            let text = token.text().to_string();
            let owner = Self::block_ancestor(&entries, NodeId(index as u32));
            if blocks.last().is_none_or(|b| b.node != owner) {
                blocks.push(TextBlock {
                    node: owner,
                    text: String::new(),
                    tokens: Vec::new(),
                    starts: Vec::new(),
                });
            }
            let slot = blocks.len() - 1;
            let block = &mut blocks[slot];
            let start = block.text.len();
            block.text.push_str(&text);
            block.tokens.push(NodeId(index as u32));
            block.starts.push(start);
            entries[index].block = Some((slot as u32, start));
        }

        log::debug!(
            "indexed document: {} elements, {} leaves, {} text blocks",
            entries.len(),
            leaves.len(),
            blocks.len()
        );

        Self {
            id: DocumentId::new(),
            root,
            entries,
            leaves,
            blocks,
            data,
        }
    }

    fn block_ancestor(entries: &[Entry], id: NodeId) -> NodeId {
        let mut current = entries[id.index()].parent;
        while let Some(node) = current {
            if Self::kind_of(&entries[node.index()].element).is_block() {
                return node;
            }
            current = entries[node.index()].parent;
        }
        NodeId::ROOT
    }

    fn kind_of(element: &DocElement) -> DocKind {
        match element {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    fn entry(&self, id: NodeId) -> &Entry {
        &self.entries[id.index()]
    }

    /// Identity of this document.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// The underlying Rowan tree.
    pub fn syntax(&self) -> &DocNode {
        &self.root
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of elements, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    /// True if `id` addresses an element of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.entries.len()
    }

    /// Every element id, in document order.
    pub fn preorder(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        (0..self.entries.len() as u32).map(NodeId)
    }

    pub fn kind(&self, id: NodeId) -> DocKind {
        Self::kind_of(&self.entry(id).element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).parent
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let end = self.entry(id).subtree_end;
        let mut next = id.0 + 1;
        std::iter::from_fn(move || {
            if next >= end {
                return None;
            }
            let child = NodeId(next);
            next = self.entries[next as usize].subtree_end;
            Some(child)
        })
    }

    /// Proper ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Innermost ancestor-or-self of the given kind.
    pub fn nearest(&self, id: NodeId, kind: DocKind) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.kind(n) == kind)
    }

    /// Innermost block-level ancestor-or-self. Falls back to the root.
    pub fn enclosing_block(&self, id: NodeId) -> NodeId {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.kind(n).is_block())
            .unwrap_or(NodeId::ROOT)
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let entry = self.entry(ancestor);
        ancestor.0 <= id.0 && id.0 < entry.subtree_end
    }

    /// Text of the element: token text, or the concatenated text of a node.
    pub fn text(&self, id: NodeId) -> String {
        match &self.entry(id).element {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }

    /// Length in bytes of the element's text.
    pub fn text_len(&self, id: NodeId) -> usize {
        self.entry(id).range.len()
    }

    /// Byte range of the element within the whole document text.
    pub fn text_range(&self, id: NodeId) -> Range<usize> {
        self.entry(id).range.clone()
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.data.get(&id)
    }

    /// All leaves in document order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.entry(id).leaf.is_some()
    }

    /// Position of `id` in [`leaves`](Self::leaves), if it is a leaf.
    pub fn leaf_index(&self, id: NodeId) -> Option<usize> {
        self.entry(id).leaf.map(|l| l as usize)
    }

    /// Range of leaf indices inside the subtree of `id`. For a subtree with
    /// no leaves the range is empty and starts at the first leaf after it.
    pub fn leaf_span(&self, id: NodeId) -> Range<usize> {
        let entry = self.entry(id);
        let start = entry.leaves_before as usize;
        let end = self
            .entries
            .get(entry.subtree_end as usize)
            .map_or(self.leaves.len(), |after| after.leaves_before as usize);
        start..end
    }

    /// Text blocks ordered by their first token.
    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// For a token: the index of its text block and its start offset there.
    pub fn text_position(&self, id: NodeId) -> Option<(usize, usize)> {
        self.entry(id)
            .block
            .map(|(block, start)| (block as usize, start))
    }
}
