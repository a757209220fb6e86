//! # docwalk-engine
//!
//! Directional cursor traversal: move a selection through a
//! [`Document`](docwalk_document::Document) one node, word, sentence or table
//! cell at a time, in either direction, and describe each move.
//!
//! ## Module Structure
//!
//! ```text
//! docwalk-engine/
//! ├── lib.rs        # This file - public API
//! ├── selection.rs  # Cursor and CursorSelection values
//! ├── walker.rs     # The Walker trait and focus resolution
//! ├── walkers/      # Node, word, sentence and cell walkers
//! ├── describe.rs   # Spoken and braille descriptions
//! ├── action.rs     # Actions and the ActionHost contract
//! ├── registry.rs   # Granularities: the switchable walker set
//! └── contract.rs   # Invariant checks for any walker
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use docwalk_document::Document;
//! use docwalk_engine::{Walker, WordWalker};
//!
//! let doc = Document::from_markdown("Hello brave world\n");
//! let words = WordWalker::new();
//!
//! let first = words.sync_to_document_start(&doc, false).unwrap();
//! let second = words.next(&doc, first).unwrap();
//! let description = words.description(&doc, first, second);
//! assert_eq!(description[0].text, "brave");
//!
//! // Turning around lands back on the first word.
//! let back = words.next(&doc, second.with_reversed(true)).unwrap();
//! assert_eq!(back.with_reversed(false), first);
//! ```

pub mod action;
pub mod contract;
pub mod describe;
pub mod registry;
pub mod selection;
pub mod walker;
pub mod walkers;

pub use action::{Action, ActionHost, RecordingHost};
pub use contract::{ContractReport, ContractViolation, check_next, check_sync, verify};
pub use describe::{BrailleDescription, Description, spoken};
pub use registry::{EngineError, Granularities, walker_for_label};
pub use selection::{Cursor, CursorSelection, SelectionError};
pub use walker::Walker;
pub use walkers::{NodeWalker, SegmentWalker, Segmenter, SentenceWalker, TableWalker, WordWalker};
