//! Leaf-by-leaf traversal: every token and every childless node is a stop.

use docwalk_document::{DocKind, Document, NodeData, NodeId};

use crate::action::Action;
use crate::describe::{
    BrailleDescription, Description, braille_line, element_text, entered_context,
    inline_annotation,
};
use crate::selection::CursorSelection;
use crate::walker::{Walker, resolve_focus};

/// Walks the leaves of the document in preorder.
///
/// A valid selection spans exactly one leaf, from offset 0 to the end of its
/// text. Empty leaves (separators, task markers, empty cells) are stops too,
/// so nothing the reader could act on is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeWalker;

impl NodeWalker {
    pub const LABEL: &'static str = "node";

    fn leaf_of(sel: &CursorSelection) -> NodeId {
        sel.start().node
    }
}

impl Walker for NodeWalker {
    fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        let point = resolve_focus(doc, &sel)?;
        let leaf = doc.leaves()[point.leaf];
        Some(CursorSelection::spanning(doc, leaf, sel.is_reversed()))
    }

    fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        debug_assert!(self.is_valid(doc, sel), "next() needs a valid selection");
        let index = doc.leaf_index(Self::leaf_of(&sel))?;
        let next = if sel.is_reversed() {
            index.checked_sub(1)?
        } else {
            index + 1
        };
        let &leaf = doc.leaves().get(next)?;
        Some(CursorSelection::spanning(doc, leaf, sel.is_reversed()))
    }

    fn actions(&self, doc: &Document, sel: CursorSelection) -> Vec<Action> {
        debug_assert!(self.is_valid(doc, sel), "actions() needs a valid selection");
        let leaf = Self::leaf_of(&sel);
        let mut actions = Vec::new();

        if let Some(NodeData::Link { destination, title }) = doc
            .nearest(leaf, DocKind::LINK)
            .and_then(|link| doc.data(link))
        {
            actions.push(Action::FollowLink {
                destination: destination.clone(),
                title: title.clone(),
            });
        }
        if let Some(NodeData::Image { source, .. }) = doc
            .nearest(leaf, DocKind::IMAGE)
            .and_then(|image| doc.data(image))
        {
            actions.push(Action::OpenImage {
                source: source.clone(),
            });
        }
        if let Some(NodeData::Task { checked }) = doc.data(leaf) {
            actions.push(Action::ToggleTask { checked: *checked });
        }
        actions
    }

    fn description(
        &self,
        doc: &Document,
        prev: CursorSelection,
        sel: CursorSelection,
    ) -> Vec<Description> {
        debug_assert!(self.is_valid(doc, sel), "description() needs a valid selection");
        let leaf = Self::leaf_of(&sel);
        // An empty leaf speaks its own role as text; only containers above
        // it are left for the annotation.
        let annotation = if doc.text(leaf).trim().is_empty() {
            doc.parent(leaf)
                .map(|p| inline_annotation(doc, p))
                .unwrap_or_default()
        } else {
            inline_annotation(doc, leaf)
        };
        vec![Description::new(
            entered_context(doc, &prev, leaf),
            element_text(doc, leaf),
            annotation,
        )]
    }

    fn braille(
        &self,
        doc: &Document,
        _prev: CursorSelection,
        sel: CursorSelection,
    ) -> BrailleDescription {
        debug_assert!(self.is_valid(doc, sel), "braille() needs a valid selection");
        braille_line(doc, &sel)
    }

    fn granularity_label(&self) -> &'static str {
        Self::LABEL
    }
}
