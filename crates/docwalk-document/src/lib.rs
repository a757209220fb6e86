//! # docwalk-document
//!
//! The read-only document tree that cursor walkers traverse, stored as a
//! [Rowan] green tree.
//!
//! [Rowan]: https://docs.rs/rowan
//!
//! ## What the tree looks like
//!
//! Every element is either a **token** (carries text, always a leaf) or a
//! **node** (groups other elements). Elements are numbered in preorder, so a
//! [`NodeId`] is both an identity and a position: comparing two ids tells
//! which one comes first in the document.
//!
//! ```text
//! ROOT
//! ├── PARAGRAPH
//! │   ├── TEXT "Hello "
//! │   └── LINK
//! │       └── TEXT "world"
//! └── THEMATIC_BREAK          ← childless node, still a leaf
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! docwalk-document/
//! ├── lib.rs       # This file - public API and error type
//! ├── kind.rs      # DocKind enum and Rowan integration
//! ├── builder.rs   # DocumentBuilder, programmatic construction
//! ├── document.rs  # Document index: identity, structure, leaves, text blocks
//! └── markdown.rs  # pulldown-cmark import
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use docwalk_document::{DocKind, Document};
//!
//! let doc = Document::from_markdown("A\n\nB\n");
//!
//! assert_eq!(doc.leaves().len(), 2);
//! let first = doc.leaves()[0];
//! assert_eq!(doc.text(first), "A");
//! assert_eq!(doc.kind(doc.parent(first).unwrap()), DocKind::PARAGRAPH);
//! ```

pub mod builder;
pub mod document;
pub mod kind;
pub mod markdown;

pub use builder::DocumentBuilder;
pub use document::{Document, DocumentId, NodeData, NodeId, TextBlock};
pub use kind::{DocElement, DocKind, DocLang, DocNode, DocToken};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
