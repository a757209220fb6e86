//! DocKind enum for every token and node in a document tree.
//!
//! Tokens carry text and are always leaves. Nodes group other elements; a
//! childless node (a thematic break, an empty table cell) is a leaf too.

/// All element kinds of the document tree.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for kinds.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum DocKind {
    // === Tokens ===
    /// Plain text, including merged soft and hard breaks
    TEXT,
    /// Inline code span content
    CODE,
    /// Raw HTML, inline or block
    HTML,

    // === Nodes ===
    /// Document root
    ROOT,
    /// Paragraph block
    PARAGRAPH,
    /// ATX or setext heading
    HEADING,
    /// Blockquote container
    BLOCK_QUOTE,
    /// Fenced or indented code block
    CODE_BLOCK,
    /// Raw HTML block
    HTML_BLOCK,
    /// List container (ordered or unordered)
    LIST,
    /// Individual list item
    LIST_ITEM,
    /// Table container
    TABLE,
    /// Header row of a table
    TABLE_HEAD,
    /// Body row of a table
    TABLE_ROW,
    /// Single table cell
    TABLE_CELL,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,
    /// Link `[text](url)`
    LINK,
    /// Image `![alt](src)`; the alt text is its content
    IMAGE,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Task list checkbox `[ ]` / `[x]`
    TASK_MARKER,
    /// Container we keep for structure but give no meaning
    GROUP,
}

impl DocKind {
    /// Returns true if this kind is a token (carries text directly).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::HTML as u16)
    }

    /// Returns true if this kind is a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true for block-level kinds. Text is grouped into text blocks
    /// by its innermost block-level ancestor.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::ROOT
                | Self::PARAGRAPH
                | Self::HEADING
                | Self::BLOCK_QUOTE
                | Self::CODE_BLOCK
                | Self::HTML_BLOCK
                | Self::LIST
                | Self::LIST_ITEM
                | Self::TABLE
                | Self::TABLE_HEAD
                | Self::TABLE_ROW
                | Self::TABLE_CELL
                | Self::THEMATIC_BREAK
        )
    }

    /// Returns true for the two kinds that form a table row.
    pub fn is_table_row(self) -> bool {
        matches!(self, Self::TABLE_HEAD | Self::TABLE_ROW)
    }
}

impl From<DocKind> for rowan::SyntaxKind {
    fn from(kind: DocKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocLang {}

impl rowan::Language for DocLang {
    type Kind = DocKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= DocKind::GROUP as u16);
        // SAFETY: We check bounds above and DocKind is repr(u16)
        unsafe { std::mem::transmute::<u16, DocKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for document tree nodes.
pub type DocNode = rowan::SyntaxNode<DocLang>;
/// Type alias for document tree tokens.
pub type DocToken = rowan::SyntaxToken<DocLang>;
/// Type alias for document elements (node or token).
pub type DocElement = rowan::SyntaxElement<DocLang>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn token_kinds_are_tokens() {
        assert!(DocKind::TEXT.is_token());
        assert!(DocKind::CODE.is_token());
        assert!(DocKind::HTML.is_token());
    }

    #[test]
    fn node_kinds_are_nodes() {
        assert!(DocKind::ROOT.is_node());
        assert!(DocKind::TABLE_CELL.is_node());
        assert!(DocKind::GROUP.is_node());
    }

    #[test]
    fn inline_containers_are_not_blocks() {
        assert!(DocKind::PARAGRAPH.is_block());
        assert!(DocKind::TABLE_CELL.is_block());
        assert!(!DocKind::LINK.is_block());
        assert!(!DocKind::EMPHASIS.is_block());
        assert!(!DocKind::TEXT.is_block());
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        for kind in [DocKind::TEXT, DocKind::PARAGRAPH, DocKind::GROUP] {
            let raw: rowan::SyntaxKind = kind.into();
            assert_eq!(DocLang::kind_from_raw(raw), kind);
        }
    }
}
