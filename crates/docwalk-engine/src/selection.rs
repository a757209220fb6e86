//! Cursor positions and selections.
//!
//! A [`CursorSelection`] is a plain value: it names elements by [`NodeId`]
//! and remembers which document handed those ids out. Nothing in it borrows
//! from the document, so a selection can be stored, copied and compared
//! freely; it never observes later changes.

use docwalk_document::{Document, DocumentId, NodeId};

/// A point inside one element: a byte offset into the element's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub node: NodeId,
    pub offset: usize,
}

impl Cursor {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Byte position of the cursor within the whole document text.
    pub fn global_offset(&self, doc: &Document) -> usize {
        let range = doc.text_range(self.node);
        range.start + self.offset.min(range.len())
    }

    /// Sort key in document order. Ties on the text position are broken by
    /// preorder, so an element precedes its descendants and later siblings.
    fn order_key(&self, doc: &Document) -> (usize, NodeId) {
        (self.global_offset(doc), self.node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Document is empty, there is nothing to select")]
    EmptyDocument,
}

/// A point or range in a document plus a traversal direction.
///
/// `start` never comes after `end` in document order. The `reversed` flag is
/// metadata for walkers: it picks the [`focus`](Self::focus) and the
/// direction of [`Walker::next`](crate::Walker::next), and never swaps the
/// two ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorSelection {
    document: DocumentId,
    start: Cursor,
    end: Cursor,
    reversed: bool,
}

impl CursorSelection {
    /// The selection at the very start of the document, or at the very end
    /// when `reversed`. Walkers sync it to their first (or last) position.
    pub fn from_document_start(doc: &Document, reversed: bool) -> Result<Self, SelectionError> {
        if doc.is_empty() {
            return Err(SelectionError::EmptyDocument);
        }
        let offset = if reversed {
            doc.text_len(doc.root())
        } else {
            0
        };
        Ok(Self::point(doc, doc.root(), offset, reversed))
    }

    /// A collapsed selection at `offset` within `node`. The offset is clamped
    /// to the element's text.
    pub fn point(doc: &Document, node: NodeId, offset: usize, reversed: bool) -> Self {
        let cursor = Cursor::new(node, offset.min(doc.text_len(node)));
        Self {
            document: doc.id(),
            start: cursor,
            end: cursor,
            reversed,
        }
    }

    /// A selection between two cursors, given in either order.
    pub fn range(doc: &Document, a: Cursor, b: Cursor, reversed: bool) -> Self {
        let a = Cursor::new(a.node, a.offset.min(doc.text_len(a.node)));
        let b = Cursor::new(b.node, b.offset.min(doc.text_len(b.node)));
        let (start, end) = if b.order_key(doc) < a.order_key(doc) {
            (b, a)
        } else {
            (a, b)
        };
        Self {
            document: doc.id(),
            start,
            end,
            reversed,
        }
    }

    /// A selection covering exactly the text of one element.
    pub fn spanning(doc: &Document, node: NodeId, reversed: bool) -> Self {
        Self {
            document: doc.id(),
            start: Cursor::new(node, 0),
            end: Cursor::new(node, doc.text_len(node)),
            reversed,
        }
    }

    /// The same selection with a new direction.
    #[must_use]
    pub fn with_reversed(self, reversed: bool) -> Self {
        Self { reversed, ..self }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn start(&self) -> Cursor {
        self.start
    }

    pub fn end(&self) -> Cursor {
        self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// The cursor traversal moves from: `start` going forward, `end` going
    /// backward.
    pub fn focus(&self) -> Cursor {
        if self.reversed { self.end } else { self.start }
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// True if the selection was made on `doc`.
    pub fn is_attached_to(&self, doc: &Document) -> bool {
        self.document == doc.id() && doc.contains(self.start.node) && doc.contains(self.end.node)
    }
}
