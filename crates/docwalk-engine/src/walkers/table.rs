//! Cell-by-cell traversal of tables.

use docwalk_document::{DocKind, Document, NodeId};

use crate::describe::{
    BrailleDescription, Description, braille_line, element_text, entered_context,
};
use crate::selection::CursorSelection;
use crate::walker::{Walker, resolve_focus};

/// Walks table cells in document order, row by row, across every table.
///
/// A valid selection spans exactly one `TABLE_CELL`. Text outside tables is
/// never a stop: syncing from there moves on to the next cell (forward) or
/// back to the previous one (reversed).
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWalker;

impl TableWalker {
    pub const LABEL: &'static str = "cell";

    fn is_cell(doc: &Document, id: NodeId) -> bool {
        doc.kind(id) == DocKind::TABLE_CELL
    }

    /// The first cell after `from` in preorder, or the last one before it.
    fn scan(doc: &Document, from: NodeId, reversed: bool) -> Option<NodeId> {
        if reversed {
            doc.preorder()
                .take(from.index())
                .rev()
                .find(|&id| Self::is_cell(doc, id))
        } else {
            doc.preorder()
                .skip(from.index() + 1)
                .find(|&id| Self::is_cell(doc, id))
        }
    }

    /// One-based row and column of a cell. The header row counts as row 1.
    pub fn coordinates(doc: &Document, cell: NodeId) -> Option<(usize, usize)> {
        let row = doc.parent(cell)?;
        let table = doc.parent(row)?;
        let r = doc
            .children(table)
            .filter(|&r| doc.kind(r).is_table_row())
            .position(|r| r == row)?;
        let c = doc.children(row).position(|c| c == cell)?;
        Some((r + 1, c + 1))
    }
}

impl Walker for TableWalker {
    fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        if !sel.is_attached_to(doc) {
            return None;
        }
        let reversed = sel.is_reversed();
        let focus = sel.focus().node;
        if Self::is_cell(doc, focus) {
            return Some(CursorSelection::spanning(doc, focus, reversed));
        }
        let point = resolve_focus(doc, &sel)?;
        let leaf = doc.leaves()[point.leaf];
        // Cells may nest in built documents. Forward takes the outermost
        // cell around the leaf, reversed the last cell opened before it, so
        // both agree with the preorder `next` walks in.
        let cell = if reversed {
            doc.preorder()
                .take(leaf.index() + 1)
                .rev()
                .find(|&id| Self::is_cell(doc, id))
        } else {
            std::iter::once(leaf)
                .chain(doc.ancestors(leaf))
                .filter(|&id| Self::is_cell(doc, id))
                .last()
                .or_else(|| Self::scan(doc, leaf, false))
        }?;
        Some(CursorSelection::spanning(doc, cell, reversed))
    }

    fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        debug_assert!(self.is_valid(doc, sel), "next() needs a valid selection");
        let reversed = sel.is_reversed();
        let cell = Self::scan(doc, sel.start().node, reversed)?;
        Some(CursorSelection::spanning(doc, cell, reversed))
    }

    fn description(
        &self,
        doc: &Document,
        prev: CursorSelection,
        sel: CursorSelection,
    ) -> Vec<Description> {
        debug_assert!(self.is_valid(doc, sel), "description() needs a valid selection");
        let cell = sel.start().node;
        let annotation = Self::coordinates(doc, cell)
            .map(|(row, column)| format!("row {row} column {column}"))
            .unwrap_or_default();
        vec![Description::new(
            entered_context(doc, &prev, cell),
            element_text(doc, cell),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::verify;
    use crate::describe::spoken;
    use docwalk_document::DocumentBuilder;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "Intro\n\n| a | b |\n|---|---|\n| 1 |   |\n\nOutro\n";

    #[test]
    fn walks_cells_in_reading_order() {
        let doc = Document::from_markdown(TABLE);
        let mut prev = CursorSelection::from_document_start(&doc, false).unwrap();
        let mut current = TableWalker.sync(&doc, prev);
        let mut lines = Vec::new();
        while let Some(sel) = current {
            lines.push(spoken(&TableWalker.description(&doc, prev, sel)));
            prev = sel;
            current = TableWalker.next(&doc, sel);
        }
        assert_eq!(
            lines,
            vec![
                "Table with 2 rows and 2 columns, a, row 1 column 1",
                "b, row 1 column 2",
                "1, row 2 column 1",
                "Blank, row 2 column 2",
            ]
        );
    }

    #[test]
    fn sync_from_outside_moves_by_direction() {
        let doc = Document::from_markdown(TABLE);
        let intro = doc.leaves()[0];
        let outro = *doc.leaves().last().unwrap();

        let forward = TableWalker
            .sync(&doc, CursorSelection::spanning(&doc, intro, false))
            .unwrap();
        assert_eq!(doc.text(forward.start().node), "a");

        let backward = TableWalker
            .sync(&doc, CursorSelection::spanning(&doc, outro, true))
            .unwrap();
        assert_eq!(doc.text(backward.start().node), "");
        assert_eq!(TableWalker::coordinates(&doc, backward.start().node), Some((2, 2)));

        assert_eq!(
            TableWalker.sync(&doc, CursorSelection::spanning(&doc, intro, true)),
            None
        );
    }

    #[test]
    fn sync_inside_a_cell_selects_it() {
        let doc = Document::from_markdown(TABLE);
        let one = doc
            .leaves()
            .iter()
            .copied()
            .find(|&l| doc.text(l) == "1")
            .unwrap();
        let cell = doc.parent(one).unwrap();
        let sel = TableWalker
            .sync(&doc, CursorSelection::point(&doc, one, 1, false))
            .unwrap();
        assert_eq!(sel, CursorSelection::spanning(&doc, cell, false));
        assert!(TableWalker.is_valid(&doc, sel));
    }

    #[test]
    fn nested_cells_walk_in_preorder_both_ways() {
        let mut b = DocumentBuilder::new();
        let outer = b.start(DocKind::TABLE_CELL);
        b.start(DocKind::PARAGRAPH);
        let inner = b.start(DocKind::TABLE_CELL);
        let doc = b.build();

        let forward = TableWalker.sync_to_document_start(&doc, false).unwrap();
        assert_eq!(forward.start().node, outer);
        let backward = TableWalker.sync_to_document_start(&doc, true).unwrap();
        assert_eq!(backward.start().node, inner);

        let report = verify(&TableWalker, &doc).unwrap();
        assert_eq!(report.positions, 2);
    }

    #[test]
    fn reversed_sync_finds_a_cell_nested_before_the_text() {
        let mut b = DocumentBuilder::new();
        let outer = b.start(DocKind::TABLE_CELL);
        let inner = b.start(DocKind::TABLE_CELL);
        b.finish();
        let text = b.token(DocKind::TEXT, "after").unwrap();
        let doc = b.build();

        let from_text = TableWalker
            .sync(&doc, CursorSelection::spanning(&doc, text, true))
            .unwrap();
        assert_eq!(from_text.start().node, inner);
        let from_text = TableWalker
            .sync(&doc, CursorSelection::spanning(&doc, text, false))
            .unwrap();
        assert_eq!(from_text.start().node, outer);
        assert!(verify(&TableWalker, &doc).is_ok());
    }

    #[test]
    fn documents_without_tables_have_no_cells() {
        let doc = Document::from_markdown("Just text\n");
        assert_eq!(TableWalker.sync_to_document_start(&doc, false), None);
        assert_eq!(TableWalker.sync_to_document_start(&doc, true), None);
    }
}
