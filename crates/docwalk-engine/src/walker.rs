//! The walker contract.
//!
//! A walker defines, for one granularity, an ordered set of *valid*
//! selections and how to move between them. Walkers hold no navigation state:
//! every call gets the document and the selection it works from, and returns
//! new values without touching its inputs.
//!
//! Two operations carry the contract:
//!
//! * **`sync`** takes any selection attached to the document and returns the
//!   nearest valid one, or `None` if there is none to reach.
//!   - `sync(sel) == Some(sel)` if and only if `sel` is valid, so
//!     `sync(sync(sel)) == sync(sel)` whenever the latter is `Some`.
//!   - `sync(sel).is_reversed() == sel.is_reversed()`.
//! * **`next`** takes a valid selection and returns the following valid one
//!   in its direction, or `None` at the directed end of section.
//!   - `next(sel).is_reversed() == sel.is_reversed()`.
//!   - Going forward and then backward lands where it started:
//!     `next(next(sel).with_reversed(!r)).with_reversed(r) == sel`.
//!
//! Calling `next`, `actions`, `act`, `description` or `braille` with a
//! selection that is not valid for the walker is a programming error. Debug
//! builds catch it with an assertion; release builds return an unspecified
//! (but memory-safe) result.
//!
//! The [`contract`](crate::contract) module checks all of this for any
//! walker over any document.

use docwalk_document::Document;

use crate::action::{Action, ActionHost};
use crate::describe::{BrailleDescription, Description};
use crate::selection::CursorSelection;

pub trait Walker: Send + Sync {
    /// The nearest valid selection to `sel`, keeping its direction.
    fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection>;

    /// The next valid selection in `sel`'s direction.
    fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection>;

    /// Candidate actions at a valid selection.
    fn actions(&self, _doc: &Document, _sel: CursorSelection) -> Vec<Action> {
        Vec::new()
    }

    /// Act on a valid selection. Returns true if some action existed.
    ///
    /// One candidate is performed by the host directly; several are handed
    /// to the host to choose from. With no candidates the host is not called.
    fn act(&self, doc: &Document, sel: CursorSelection, host: &mut dyn ActionHost) -> bool {
        let mut actions = self.actions(doc, sel);
        match actions.len() {
            0 => false,
            1 => {
                host.perform(actions.remove(0));
                true
            }
            _ => {
                host.disambiguate(actions);
                true
            }
        }
    }

    /// Speech for moving from `prev` (any selection) to the valid `sel`.
    fn description(
        &self,
        doc: &Document,
        prev: CursorSelection,
        sel: CursorSelection,
    ) -> Vec<Description>;

    /// Braille for moving from `prev` (any selection) to the valid `sel`.
    fn braille(
        &self,
        doc: &Document,
        prev: CursorSelection,
        sel: CursorSelection,
    ) -> BrailleDescription;

    /// Stable name of this walker's granularity.
    fn granularity_label(&self) -> &'static str;

    /// True if `sel` is one of this walker's positions.
    fn is_valid(&self, doc: &Document, sel: CursorSelection) -> bool {
        self.sync(doc, sel) == Some(sel)
    }

    /// The first valid selection of the document, or the last one when
    /// `reversed`. `None` for documents without any position.
    fn sync_to_document_start(&self, doc: &Document, reversed: bool) -> Option<CursorSelection> {
        let start = CursorSelection::from_document_start(doc, reversed).ok()?;
        self.sync(doc, start)
    }
}

/// A position inside one leaf: an index into [`Document::leaves`] and a byte
/// offset into that leaf's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeafPoint {
    pub leaf: usize,
    pub offset: usize,
}

/// Resolve the focus of a selection to a leaf.
///
/// A focus on a leaf stays there. A focus inside a larger element lands on
/// the leaf covering it: going forward, the first leaf that ends after it;
/// going backward, the last leaf that starts before it. If the element holds
/// no such leaf the search continues with the leaf right after (forward) or
/// right before (backward) the element. Returns `None` for unattached
/// selections and when the search runs off the document.
pub(crate) fn resolve_focus(doc: &Document, sel: &CursorSelection) -> Option<LeafPoint> {
    if !sel.is_attached_to(doc) {
        return None;
    }
    let focus = sel.focus();
    let len = doc.text_len(focus.node);
    let offset = focus.offset.min(len);
    if let Some(leaf) = doc.leaf_index(focus.node) {
        return Some(LeafPoint { leaf, offset });
    }

    let position = doc.text_range(focus.node).start + offset;
    let span = doc.leaf_span(focus.node);
    let candidates = &doc.leaves()[span.clone()];

    if !sel.is_reversed() {
        // Leaf ends are monotone in document order, so the leaves that end
        // before the position form a prefix.
        let k = candidates.partition_point(|&l| {
            let r = doc.text_range(l);
            !(r.end > position || (r.is_empty() && r.start >= position))
        });
        if let Some(&leaf) = candidates.get(k) {
            let start = doc.text_range(leaf).start;
            return Some(LeafPoint {
                leaf: span.start + k,
                offset: position.saturating_sub(start),
            });
        }
        log::trace!("focus {focus:?} past its subtree, moving to next leaf");
        (span.end < doc.leaves().len()).then_some(LeafPoint {
            leaf: span.end,
            offset: 0,
        })
    } else {
        let k = candidates.partition_point(|&l| {
            let r = doc.text_range(l);
            r.start < position || (r.is_empty() && r.start <= position)
        });
        if k > 0 {
            let r = doc.text_range(candidates[k - 1]);
            return Some(LeafPoint {
                leaf: span.start + k - 1,
                offset: (position - r.start).min(r.len()),
            });
        }
        log::trace!("focus {focus:?} before its subtree, moving to previous leaf");
        let leaf = span.start.checked_sub(1)?;
        Some(LeafPoint {
            leaf,
            offset: doc.text_len(doc.leaves()[leaf]),
        })
    }
}
