//! Checks that a walker keeps the traversal contract on a given document.
//!
//! [`verify`] is the whole-document check used by tests and by
//! `docwalk check`: it walks every position in both directions and probes
//! `sync` from points all over the tree. [`check_sync`] and [`check_next`]
//! check a single call and can be used on their own.

use std::collections::HashSet;

use docwalk_document::Document;

use crate::selection::CursorSelection;
use crate::walker::Walker;

/// A broken walker invariant, with the selections that show it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("{granularity}: sync is not idempotent, {input:?} synced to {first:?} and then to {second:?}")]
    NotIdempotent {
        granularity: &'static str,
        input: CursorSelection,
        first: CursorSelection,
        second: Option<CursorSelection>,
    },

    #[error("{granularity}: {operation} changed direction, {input:?} gave {output:?}")]
    DirectionChanged {
        granularity: &'static str,
        operation: &'static str,
        input: CursorSelection,
        output: CursorSelection,
    },

    #[error("{granularity}: next from {input:?} gave invalid selection {output:?}")]
    InvalidNext {
        granularity: &'static str,
        input: CursorSelection,
        output: CursorSelection,
    },

    #[error("{granularity}: stepping back from {forward:?} gave {back:?} instead of {start:?}")]
    NotReversible {
        granularity: &'static str,
        start: CursorSelection,
        forward: CursorSelection,
        back: Option<CursorSelection>,
    },

    #[error("{granularity}: traversal revisited {repeated:?}")]
    Cycle {
        granularity: &'static str,
        repeated: CursorSelection,
    },

    #[error("{granularity}: traversal did not end within {bound} steps")]
    Unterminated {
        granularity: &'static str,
        bound: usize,
    },

    #[error("{granularity}: backward traversal differs from forward at position {index}: {forward:?} vs {backward:?}")]
    OrderMismatch {
        granularity: &'static str,
        index: usize,
        forward: Option<CursorSelection>,
        backward: Option<CursorSelection>,
    },
}

/// Summary of a successful [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReport {
    pub granularity: &'static str,
    /// Number of valid positions in the document
    pub positions: usize,
    /// Number of extra `sync` inputs probed
    pub probes: usize,
}

/// Sync `sel` once and check the result: same direction, and a fixed point
/// of `sync` itself.
pub fn check_sync<W: Walker + ?Sized>(
    walker: &W,
    doc: &Document,
    sel: CursorSelection,
) -> Result<Option<CursorSelection>, ContractViolation> {
    let granularity = walker.granularity_label();
    let Some(synced) = walker.sync(doc, sel) else {
        return Ok(None);
    };
    if synced.is_reversed() != sel.is_reversed() {
        return Err(ContractViolation::DirectionChanged {
            granularity,
            operation: "sync",
            input: sel,
            output: synced,
        });
    }
    let again = walker.sync(doc, synced);
    if again != Some(synced) {
        return Err(ContractViolation::NotIdempotent {
            granularity,
            input: sel,
            first: synced,
            second: again,
        });
    }
    Ok(Some(synced))
}

/// Step once from the valid `sel` and check the result: same direction,
/// valid, and stepping back the other way returns to `sel`.
pub fn check_next<W: Walker + ?Sized>(
    walker: &W,
    doc: &Document,
    sel: CursorSelection,
) -> Result<Option<CursorSelection>, ContractViolation> {
    let granularity = walker.granularity_label();
    let reversed = sel.is_reversed();
    let Some(next) = walker.next(doc, sel) else {
        return Ok(None);
    };
    if next.is_reversed() != reversed {
        return Err(ContractViolation::DirectionChanged {
            granularity,
            operation: "next",
            input: sel,
            output: next,
        });
    }
    if !walker.is_valid(doc, next) {
        return Err(ContractViolation::InvalidNext {
            granularity,
            input: sel,
            output: next,
        });
    }
    let back = walker
        .next(doc, next.with_reversed(!reversed))
        .map(|b| b.with_reversed(reversed));
    if back != Some(sel) {
        return Err(ContractViolation::NotReversible {
            granularity,
            start: sel,
            forward: next,
            back,
        });
    }
    Ok(Some(next))
}

/// Walk from the synced document start to the directed end, checking every
/// step.
fn walk<W: Walker + ?Sized>(
    walker: &W,
    doc: &Document,
    reversed: bool,
) -> Result<Vec<CursorSelection>, ContractViolation> {
    let granularity = walker.granularity_label();
    let Ok(start) = CursorSelection::from_document_start(doc, reversed) else {
        return Ok(Vec::new());
    };
    // No granularity has more positions than elements plus text bytes.
    let bound = doc.len() + doc.text_len(doc.root());
    let mut seen = HashSet::new();
    let mut positions = Vec::new();
    let mut current = check_sync(walker, doc, start)?;
    while let Some(sel) = current {
        if !seen.insert(sel) {
            return Err(ContractViolation::Cycle {
                granularity,
                repeated: sel,
            });
        }
        if positions.len() >= bound {
            return Err(ContractViolation::Unterminated { granularity, bound });
        }
        positions.push(sel);
        current = check_next(walker, doc, sel)?;
    }
    Ok(positions)
}

/// Check every contract invariant of `walker` on `doc`.
pub fn verify<W: Walker + ?Sized>(
    walker: &W,
    doc: &Document,
) -> Result<ContractReport, ContractViolation> {
    let granularity = walker.granularity_label();
    let forward = walk(walker, doc, false)?;
    let backward = walk(walker, doc, true)?;

    let len = forward.len().max(backward.len());
    for index in 0..len {
        let f = forward.get(index).copied();
        let b = backward
            .len()
            .checked_sub(index + 1)
            .and_then(|i| backward.get(i))
            .map(|b| b.with_reversed(false));
        if f != b {
            return Err(ContractViolation::OrderMismatch {
                granularity,
                index,
                forward: f,
                backward: b,
            });
        }
    }

    let mut probes = 0;
    for id in doc.preorder() {
        let len = doc.text_len(id);
        let mut offsets = vec![0, len / 2, len];
        offsets.dedup();
        for offset in offsets {
            for reversed in [false, true] {
                check_sync(walker, doc, CursorSelection::point(doc, id, offset, reversed))?;
                probes += 1;
            }
        }
    }

    log::debug!(
        "{granularity}: contract holds over {} positions and {probes} probes",
        forward.len()
    );
    Ok(ContractReport {
        granularity,
        positions: forward.len(),
        probes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{BrailleDescription, Description};
    use crate::walkers::NodeWalker;

    /// Stops at every other leaf going forward but at every leaf going
    /// backward.
    struct Lopsided;

    impl Walker for Lopsided {
        fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
            NodeWalker.sync(doc, sel)
        }

        fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
            let index = doc.leaf_index(sel.start().node)?;
            let next = if sel.is_reversed() {
                index.checked_sub(1)?
            } else {
                index + 2
            };
            let &leaf = doc.leaves().get(next)?;
            Some(CursorSelection::spanning(doc, leaf, sel.is_reversed()))
        }

        fn description(
            &self,
            _doc: &Document,
            _prev: CursorSelection,
            _sel: CursorSelection,
        ) -> Vec<Description> {
            Vec::new()
        }

        fn braille(
            &self,
            _doc: &Document,
            _prev: CursorSelection,
            _sel: CursorSelection,
        ) -> BrailleDescription {
            BrailleDescription::default()
        }

        fn granularity_label(&self) -> &'static str {
            "lopsided"
        }
    }

    /// Flips direction on every step.
    struct Flipper;

    impl Walker for Flipper {
        fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
            NodeWalker.sync(doc, sel)
        }

        fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
            NodeWalker
                .next(doc, sel)
                .map(|n| n.with_reversed(!sel.is_reversed()))
        }

        fn description(
            &self,
            _doc: &Document,
            _prev: CursorSelection,
            _sel: CursorSelection,
        ) -> Vec<Description> {
            Vec::new()
        }

        fn braille(
            &self,
            _doc: &Document,
            _prev: CursorSelection,
            _sel: CursorSelection,
        ) -> BrailleDescription {
            BrailleDescription::default()
        }

        fn granularity_label(&self) -> &'static str {
            "flipper"
        }
    }

    #[test]
    fn node_walker_passes() {
        let doc = Document::from_markdown("# A\n\nb [c](x)\n\n---\n");
        let report = verify(&NodeWalker, &doc).unwrap();
        assert_eq!(report.granularity, "node");
        assert_eq!(report.positions, 4);
        assert!(report.probes > 0);
    }

    #[test]
    fn empty_document_has_nothing_to_check() {
        let doc = Document::from_markdown("");
        let report = verify(&NodeWalker, &doc).unwrap();
        assert_eq!(report.positions, 0);
    }

    #[test]
    fn irreversible_steps_are_caught() {
        let doc = Document::from_markdown("a\n\nb\n\nc\n");
        let err = verify(&Lopsided, &doc).unwrap_err();
        assert!(
            matches!(err, ContractViolation::NotReversible { granularity: "lopsided", .. }),
            "{err}"
        );
    }

    #[test]
    fn direction_change_is_caught() {
        let doc = Document::from_markdown("a\n\nb\n");
        let err = verify(&Flipper, &doc).unwrap_err();
        assert!(
            matches!(
                err,
                ContractViolation::DirectionChanged {
                    operation: "next",
                    ..
                }
            ),
            "{err}"
        );
    }
}
