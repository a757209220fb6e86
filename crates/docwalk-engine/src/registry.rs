//! The set of granularities a client can switch between.

use crate::walker::Walker;
use crate::walkers::{NodeWalker, SentenceWalker, TableWalker, WordWalker};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown granularity '{0}' (expected one of: node, word, sentence, cell)")]
    UnknownGranularity(String),
    #[error("No granularities configured")]
    NoGranularities,
}

/// An ordered set of walkers, one per granularity label.
///
/// The set is a plain value owned by the client; nothing about it is global.
pub struct Granularities {
    walkers: Vec<Box<dyn Walker>>,
}

impl std::fmt::Debug for Granularities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

impl Granularities {
    /// All built-in granularities: node, word, sentence, cell.
    pub fn standard() -> Self {
        Self {
            walkers: vec![
                Box::new(NodeWalker),
                Box::new(WordWalker::new()),
                Box::new(SentenceWalker::new()),
                Box::new(TableWalker),
            ],
        }
    }

    pub fn new(walkers: Vec<Box<dyn Walker>>) -> Result<Self, EngineError> {
        if walkers.is_empty() {
            return Err(EngineError::NoGranularities);
        }
        Ok(Self { walkers })
    }

    /// Build a set from labels, keeping their order.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let walkers = labels
            .into_iter()
            .map(|label| {
                walker_for_label(label.as_ref())
                    .ok_or_else(|| EngineError::UnknownGranularity(label.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(walkers)
    }

    pub fn len(&self) -> usize {
        self.walkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkers.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&dyn Walker> {
        self.position(label).map(|i| self.walkers[i].as_ref())
    }

    pub fn at(&self, index: usize) -> Option<&dyn Walker> {
        self.walkers.get(index).map(|w| w.as_ref())
    }

    /// The walker at `index`, counted modulo the size of the set.
    pub fn cycled(&self, index: usize) -> &dyn Walker {
        self.walkers[index % self.walkers.len()].as_ref()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.walkers
            .iter()
            .position(|w| w.granularity_label() == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Walker> {
        self.walkers.iter().map(|w| w.as_ref())
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.walkers.iter().map(|w| w.granularity_label())
    }

    /// Index of the granularity after `current`, wrapping around. Goes the
    /// other way when `backwards`.
    pub fn cycle(&self, current: usize, backwards: bool) -> usize {
        let len = self.walkers.len();
        if len == 0 {
            return 0;
        }
        let next = if backwards {
            (current + len - 1) % len
        } else {
            (current + 1) % len
        };
        log::debug!(
            "granularity {} -> {}",
            self.walkers[current % len].granularity_label(),
            self.walkers[next].granularity_label()
        );
        next
    }
}

impl Default for Granularities {
    fn default() -> Self {
        Self::standard()
    }
}

/// A fresh walker for a built-in granularity label.
pub fn walker_for_label(label: &str) -> Option<Box<dyn Walker>> {
    let walker: Box<dyn Walker> = match label {
        l if l == NodeWalker::LABEL => Box::new(NodeWalker),
        l if l == WordWalker::LABEL => Box::new(WordWalker::new()),
        l if l == SentenceWalker::LABEL => Box::new(SentenceWalker::new()),
        l if l == TableWalker::LABEL => Box::new(TableWalker),
        _ => return None,
    };
    Some(walker)
}
