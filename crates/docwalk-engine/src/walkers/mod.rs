//! Walker implementations, one per granularity.
//!
//! | label      | walker           | stops at                          |
//! |------------|------------------|-----------------------------------|
//! | `node`     | [`NodeWalker`]   | every leaf of the tree            |
//! | `word`     | [`WordWalker`]   | Unicode words inside text blocks  |
//! | `sentence` | [`SentenceWalker`] | Unicode sentences inside text blocks |
//! | `cell`     | [`TableWalker`]  | table cells                       |

pub mod node;
pub mod segment;
pub mod table;

pub use node::NodeWalker;
pub use segment::{SegmentWalker, Segmenter, SentenceWalker, Sentences, WordWalker, Words};
pub use table::TableWalker;
