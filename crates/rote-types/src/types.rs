use std::fmt;

use serde::{Deserialize, Serialize};

/// A learned vocabulary card. `word` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub word: String,
    pub definition: String,
    /// Stored already normalized
    #[serde(default)]
    pub example: String,
}

impl FlashcardRecord {
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            example: example.into(),
        }
    }
}

/// Stable identity of a node in the page tree, assigned by the page session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Routines that hold a busy flag between a click and its settle delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    Flashcard,
    DefinitionToWord,
    WordToExample,
}

impl Routine {
    pub fn name(&self) -> &'static str {
        match self {
            Routine::Flashcard => "flashcard",
            Routine::DefinitionToWord => "definition-to-word",
            Routine::WordToExample => "word-to-example",
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Second half of a two-step click, fired after the debounce interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAction {
    pub routine: Routine,
    pub generation: u64,
    /// `None` when the deferred step only releases the busy flag
    pub click: Option<NodeId>,
}

/// Notifications pushed by the page session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    /// Nodes were inserted or removed somewhere in the observed subtree
    Mutated,
    /// Key pressed while the page had focus
    Key(String),
    /// The session went away
    Closed,
}

/// Everything the engine loop reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RunSolvers,
    ToggleActive,
    Collect { auto_close: bool },
    CollectorTick { epoch: u64 },
    Deferred(DeferredAction),
}
