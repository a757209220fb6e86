//! Word and sentence traversal over text blocks.
//!
//! Both granularities cut the text of each [`TextBlock`] into segments and
//! step through them block by block. Segments never cross a block boundary:
//! a heading and the paragraph after it are never read as one sentence.
//!
//! A segment is anchored canonically: its start cursor sits in the token
//! holding its first character and its end cursor in the token holding its
//! last character. Those anchored selections are the valid positions.
//!
//! [`TextBlock`]: docwalk_document::TextBlock

use std::marker::PhantomData;
use std::ops::Range;

use docwalk_document::Document;
use unicode_segmentation::UnicodeSegmentation;

use crate::describe::{
    BrailleDescription, Description, braille_line, entered_context, inline_annotation,
};
use crate::selection::{Cursor, CursorSelection};
use crate::walker::{LeafPoint, Walker, resolve_focus};

/// Cuts block text into the byte ranges a walker stops at.
///
/// Ranges must be non-empty, sorted and non-overlapping.
pub trait Segmenter: Send + Sync {
    const LABEL: &'static str;

    fn segments(text: &str) -> Vec<Range<usize>>;
}

/// Unicode word boundaries (UAX #29), words only: punctuation and spaces
/// between words are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Words;

impl Segmenter for Words {
    const LABEL: &'static str = "word";

    fn segments(text: &str) -> Vec<Range<usize>> {
        text.unicode_word_indices()
            .map(|(start, word)| start..start + word.len())
            .collect()
    }
}

/// Unicode sentence boundaries (UAX #29) with surrounding whitespace
/// trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sentences;

impl Segmenter for Sentences {
    const LABEL: &'static str = "sentence";

    fn segments(text: &str) -> Vec<Range<usize>> {
        text.split_sentence_bound_indices()
            .filter_map(|(start, sentence)| {
                let trimmed = sentence.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let lead = sentence.len() - sentence.trim_start().len();
                Some(start + lead..start + lead + trimmed.len())
            })
            .collect()
    }
}

/// Walks the segments produced by `S`.
///
/// Nothing is cached: every `sync` and `next` re-segments the current block
/// and, when it has no further stop, the blocks scanned past it. A full walk
/// over one long block is therefore quadratic in its length.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentWalker<S> {
    segmenter: PhantomData<S>,
}

pub type WordWalker = SegmentWalker<Words>;
pub type SentenceWalker = SegmentWalker<Sentences>;

impl<S: Segmenter> SegmentWalker<S> {
    pub const LABEL: &'static str = S::LABEL;

    pub fn new() -> Self {
        Self {
            segmenter: PhantomData,
        }
    }

    /// The canonical selection for segment `seg` of text block `block`.
    fn anchor(
        doc: &Document,
        block: usize,
        seg: &Range<usize>,
        reversed: bool,
    ) -> CursorSelection {
        let text_block = &doc.text_blocks()[block];
        let (start_node, start_offset) = text_block.locate_start(seg.start);
        let (end_node, end_offset) = text_block.locate_end(seg.end);
        CursorSelection::range(
            doc,
            Cursor::new(start_node, start_offset),
            Cursor::new(end_node, end_offset),
            reversed,
        )
    }

    /// First segment ending after `offset` in `block`, then the first segment
    /// of any later block.
    fn first_from(
        doc: &Document,
        block: usize,
        offset: usize,
        reversed: bool,
    ) -> Option<CursorSelection> {
        let blocks = doc.text_blocks();
        (block..blocks.len()).find_map(|b| {
            let segments = S::segments(blocks[b].text());
            let found = if b == block {
                segments.into_iter().find(|s| s.end > offset)
            } else {
                segments.into_iter().next()
            };
            found.map(|seg| Self::anchor(doc, b, &seg, reversed))
        })
    }

    /// Last segment starting before `offset` in `block`, then the last
    /// segment of any earlier block.
    fn last_before(
        doc: &Document,
        block: usize,
        offset: usize,
        reversed: bool,
    ) -> Option<CursorSelection> {
        let blocks = doc.text_blocks();
        (0..=block).rev().find_map(|b| {
            let segments = S::segments(blocks[b].text());
            let found = if b == block {
                segments.into_iter().rev().find(|s| s.start < offset)
            } else {
                segments.into_iter().next_back()
            };
            found.map(|seg| Self::anchor(doc, b, &seg, reversed))
        })
    }

    /// Map a leaf position to a text block and an offset into its text.
    ///
    /// Leaves without text (separators, empty cells) own no block; the
    /// position moves to the start of the next token going forward, or the
    /// end of the previous token going backward.
    fn text_point(doc: &Document, point: LeafPoint, reversed: bool) -> Option<(usize, usize)> {
        let leaves = doc.leaves();
        if let Some((block, start)) = doc.text_position(leaves[point.leaf]) {
            return Some((block, start + point.offset));
        }
        if reversed {
            leaves[..point.leaf].iter().rev().find_map(|&l| {
                doc.text_position(l)
                    .map(|(block, start)| (block, start + doc.text_len(l)))
            })
        } else {
            leaves[point.leaf + 1..]
                .iter()
                .find_map(|&l| doc.text_position(l))
        }
    }

    /// Block index and the segment range a valid selection covers.
    fn locate(doc: &Document, sel: &CursorSelection) -> Option<(usize, Range<usize>)> {
        let (start, end) = (sel.start(), sel.end());
        let (block, token_start) = doc.text_position(start.node)?;
        let from = token_start + start.offset;
        let to = from + end.global_offset(doc) - start.global_offset(doc);
        Some((block, from..to))
    }
}

impl<S: Segmenter> Walker for SegmentWalker<S> {
    fn sync(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        let point = resolve_focus(doc, &sel)?;
        let reversed = sel.is_reversed();
        let (block, offset) = Self::text_point(doc, point, reversed)?;
        if reversed {
            Self::last_before(doc, block, offset, reversed)
        } else {
            Self::first_from(doc, block, offset, reversed)
        }
    }

    fn next(&self, doc: &Document, sel: CursorSelection) -> Option<CursorSelection> {
        debug_assert!(self.is_valid(doc, sel), "next() needs a valid selection");
        let (block, current) = Self::locate(doc, &sel)?;
        let reversed = sel.is_reversed();
        if reversed {
            Self::last_before(doc, block, current.start, reversed)
        } else {
            Self::first_from(doc, block, current.end, reversed)
        }
    }

    fn description(
        &self,
        doc: &Document,
        prev: CursorSelection,
        sel: CursorSelection,
    ) -> Vec<Description> {
        debug_assert!(self.is_valid(doc, sel), "description() needs a valid selection");
        let node = sel.start().node;
        let text = Self::locate(doc, &sel)
            .and_then(|(block, range)| {
                doc.text_blocks()[block]
                    .text()
                    .get(range)
                    .map(str::to_string)
            })
            .unwrap_or_default();
        vec![Description::new(
            entered_context(doc, &prev, node),
            text,
            inline_annotation(doc, node),
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
        S::LABEL
    }
}
