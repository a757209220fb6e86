//! Markdown import: turns a pulldown-cmark event stream into a [`Document`].
//!
//! The event stream is already shaped like the tree (every `Start` has a
//! matching `End`), so the sink only has to open and close nodes and decide
//! how text is cut into tokens:
//!
//! ```text
//! Start(Paragraph)          PARAGRAPH
//!   Text("Hello")    →        TEXT "Hello world"
//!   SoftBreak                   (merged)
//!   Text("world")               (merged)
//! End(Paragraph)
//! ```

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::DocumentError;
use crate::builder::DocumentBuilder;
use crate::document::{Document, NodeData};
use crate::kind::DocKind;

impl Document {
    /// Parse Markdown text into a document. Never fails: malformed input
    /// still produces a tree.
    pub fn from_markdown(text: &str) -> Self {
        let options =
            Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
        let mut sink = MarkdownSink::new();
        for event in Parser::new_ext(text, options) {
            sink.event(event);
        }
        sink.finish()
    }

    /// Parse raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_markdown(text))
    }
}

/// Converts parser events into builder calls.
struct MarkdownSink {
    builder: DocumentBuilder,
    pending: String,
    pending_kind: DocKind,
}

impl MarkdownSink {
    fn new() -> Self {
        Self {
            builder: DocumentBuilder::new(),
            pending: String::new(),
            pending_kind: DocKind::TEXT,
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        self.builder.build()
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                self.flush();
                self.start(tag);
            }
            Event::End(_) => {
                self.flush();
                self.builder.finish();
            }
            Event::Text(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.push(DocKind::TEXT, &text)
            }
            Event::SoftBreak => self.push(DocKind::TEXT, " "),
            Event::HardBreak => self.push(DocKind::TEXT, "\n"),
            Event::FootnoteReference(label) => self.push(DocKind::TEXT, &format!("[^{label}]")),
            Event::Html(html) | Event::InlineHtml(html) => self.push(DocKind::HTML, &html),
            Event::Code(code) => {
                self.flush();
                self.builder.token(DocKind::CODE, &code);
            }
            Event::Rule => {
                self.flush();
                self.builder.start(DocKind::THEMATIC_BREAK);
                self.builder.finish();
            }
            Event::TaskListMarker(checked) => {
                self.flush();
                self.builder
                    .start_with(DocKind::TASK_MARKER, NodeData::Task { checked });
                self.builder.finish();
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let (kind, data) = match tag {
            Tag::Paragraph => (DocKind::PARAGRAPH, None),
            Tag::Heading { level, .. } => (
                DocKind::HEADING,
                Some(NodeData::Heading { level: level as u8 }),
            ),
            Tag::BlockQuote(_) => (DocKind::BLOCK_QUOTE, None),
            Tag::CodeBlock(block) => {
                let language = match block {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                (DocKind::CODE_BLOCK, Some(NodeData::CodeBlock { language }))
            }
            Tag::HtmlBlock => (DocKind::HTML_BLOCK, None),
            Tag::List(start) => (DocKind::LIST, Some(NodeData::List { start })),
            Tag::Item => (DocKind::LIST_ITEM, None),
            Tag::Table(_) => (DocKind::TABLE, None),
            Tag::TableHead => (DocKind::TABLE_HEAD, None),
            Tag::TableRow => (DocKind::TABLE_ROW, None),
            Tag::TableCell => (DocKind::TABLE_CELL, None),
            Tag::Emphasis => (DocKind::EMPHASIS, None),
            Tag::Strong => (DocKind::STRONG, None),
            Tag::Strikethrough => (DocKind::STRIKETHROUGH, None),
            Tag::Link {
                dest_url, title, ..
            } => (
                DocKind::LINK,
                Some(NodeData::Link {
                    destination: dest_url.to_string(),
                    title: title.to_string(),
                }),
            ),
            Tag::Image {
                dest_url, title, ..
            } => (
                DocKind::IMAGE,
                Some(NodeData::Image {
                    source: dest_url.to_string(),
                    title: title.to_string(),
                }),
            ),
            _ => (DocKind::GROUP, None),
        };
        match data {
            Some(data) => self.builder.start_with(kind, data),
            None => self.builder.start(kind),
        };
    }

    /// Buffer text so adjacent events of the same kind form one token.
    fn push(&mut self, kind: DocKind, text: &str) {
        if kind != self.pending_kind {
            self.flush();
            self.pending_kind = kind;
        }
        self.pending.push_str(text);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.builder.token(self.pending_kind, &self.pending);
            self.pending.clear();
        }
    }
}
