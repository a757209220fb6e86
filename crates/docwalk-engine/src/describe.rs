//! What walkers hand to output collaborators: spoken descriptions and
//! braille lines. Rendering them is someone else's job.

use std::fmt;

use docwalk_document::{DocKind, Document, NodeData, NodeId};
use serde::Serialize;

use crate::selection::CursorSelection;

/// One unit of speech for a transition between two selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    /// Containers entered on the way, outermost first
    pub context: String,
    /// The content itself
    pub text: String,
    /// Role or position of the content
    pub annotation: String,
}

impl Description {
    pub fn new(
        context: impl Into<String>,
        text: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            text: text.into(),
            annotation: annotation.into(),
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.context, &self.text, &self.annotation];
        let mut first = true;
        for part in parts.into_iter().filter(|p| !p.is_empty()) {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

/// Speak a whole description sequence as one line.
pub fn spoken(descriptions: &[Description]) -> String {
    descriptions
        .iter()
        .map(ToString::to_string)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A line of braille with the selected part marked.
///
/// `start` and `end` are character (not byte) offsets into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrailleDescription {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl BrailleDescription {
    /// The selected slice of the line.
    pub fn selected(&self) -> String {
        self.text
            .chars()
            .skip(self.start)
            .take(self.end.saturating_sub(self.start))
            .collect()
    }
}

/// Spoken role of an element, if it has one worth announcing.
pub fn role(doc: &Document, id: NodeId) -> Option<String> {
    let role = match doc.kind(id) {
        DocKind::HEADING => match doc.data(id) {
            Some(NodeData::Heading { level }) => format!("Heading {level}"),
            _ => "Heading".to_string(),
        },
        DocKind::BLOCK_QUOTE => "Block quote".to_string(),
        DocKind::CODE_BLOCK => match doc.data(id) {
            Some(NodeData::CodeBlock {
                language: Some(language),
            }) => format!("Code block {language}"),
            _ => "Code block".to_string(),
        },
        DocKind::LIST => {
            let items = doc.children(id).count();
            let ordered = matches!(doc.data(id), Some(NodeData::List { start: Some(_) }));
            let noun = if ordered { "Ordered list" } else { "List" };
            format!("{noun} with {}", plural(items, "item"))
        }
        DocKind::TABLE => {
            let (rows, columns) = table_dimensions(doc, id);
            format!(
                "Table with {} and {}",
                plural(rows, "row"),
                plural(columns, "column")
            )
        }
        DocKind::LINK => "Link".to_string(),
        DocKind::IMAGE => "Image".to_string(),
        DocKind::CODE => "Code".to_string(),
        DocKind::STRIKETHROUGH => "Deleted".to_string(),
        DocKind::THEMATIC_BREAK => "Separator".to_string(),
        DocKind::TASK_MARKER => match doc.data(id) {
            Some(NodeData::Task { checked: true }) => "Checkbox checked".to_string(),
            _ => "Checkbox not checked".to_string(),
        },
        _ => return None,
    };
    Some(role)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Rows and the widest row's cell count of a table.
pub fn table_dimensions(doc: &Document, table: NodeId) -> (usize, usize) {
    let rows: Vec<NodeId> = doc
        .children(table)
        .filter(|&r| doc.kind(r).is_table_row())
        .collect();
    let columns = rows
        .iter()
        .map(|&r| doc.children(r).count())
        .max()
        .unwrap_or(0);
    (rows.len(), columns)
}

/// Roles of the block containers around `node` that `prev` was not already
/// inside, outermost first. A `prev` from another document counts as outside
/// everything. Inline containers are left to [`inline_annotation`].
pub fn entered_context(doc: &Document, prev: &CursorSelection, node: NodeId) -> String {
    let prev_node = prev
        .is_attached_to(doc)
        .then(|| prev.start().node);
    let mut entered: Vec<NodeId> = doc
        .ancestors(node)
        .filter(|&a| a != doc.root() && doc.kind(a).is_block())
        .filter(|&a| prev_node.is_none_or(|p| !doc.is_ancestor_or_self(a, p)))
        .collect();
    entered.reverse();
    entered
        .into_iter()
        .filter_map(|a| role(doc, a))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Role of the innermost inline container around `node` (link, code...).
pub fn inline_annotation(doc: &Document, node: NodeId) -> String {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .take_while(|&n| !doc.kind(n).is_block())
        .find_map(|n| role(doc, n))
        .unwrap_or_default()
}

/// Text to speak for an element, falling back to its role when it has no
/// text of its own.
pub fn element_text(doc: &Document, node: NodeId) -> String {
    let text = doc.text(node);
    if text.trim().is_empty() {
        role(doc, node).unwrap_or_else(|| "Blank".to_string())
    } else {
        text
    }
}

/// The braille line for a selection: the text of the innermost block around
/// its start, with the selection marked.
pub fn braille_line(doc: &Document, sel: &CursorSelection) -> BrailleDescription {
    let start_node = sel.start().node;
    let block = doc.enclosing_block(start_node);
    let text = doc.text(block);
    if text.is_empty() {
        return BrailleDescription {
            text: element_text(doc, start_node),
            start: 0,
            end: 0,
        };
    }
    let base = doc.text_range(block).start;
    let start = sel.start().global_offset(doc).saturating_sub(base);
    let end = sel.end().global_offset(doc).saturating_sub(base);
    BrailleDescription {
        start: char_offset(&text, start),
        end: char_offset(&text, end),
        text,
    }
}

fn char_offset(text: &str, byte: usize) -> usize {
    text.char_indices().take_while(|&(i, _)| i < byte).count()
}
