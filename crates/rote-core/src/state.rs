use rote_types::Routine;

use crate::store::CardStore;

/// Per-routine action gates.
///
/// A raised flag remembers the generation it was raised with so that only the
/// deferred task scheduled alongside it can lower it.
#[derive(Debug, Default)]
pub struct BusyFlags {
    flashcard: Option<u64>,
    definition_to_word: Option<u64>,
    word_to_example: Option<u64>,
    collecting: bool,
    next_generation: u64,
}

impl BusyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, routine: Routine) -> bool {
        self.slot(routine).is_some()
    }

    /// Raise the flag, returning its generation, or `None` if it is already raised
    pub fn acquire(&mut self, routine: Routine) -> Option<u64> {
        if self.is_busy(routine) {
            return None;
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        *self.slot_mut(routine) = Some(generation);
        Some(generation)
    }

    /// Lower the flag if it is still held by `generation`
    pub fn release(&mut self, routine: Routine, generation: u64) -> bool {
        let slot = self.slot_mut(routine);
        if *slot == Some(generation) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Whether the flag is raised with exactly `generation`
    pub fn holds(&self, routine: Routine, generation: u64) -> bool {
        self.slot(routine) == Some(generation)
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    pub fn set_collecting(&mut self, collecting: bool) {
        self.collecting = collecting;
    }

    /// No routine flag raised and no collection running
    pub fn all_clear(&self) -> bool {
        self.flashcard.is_none()
            && self.definition_to_word.is_none()
            && self.word_to_example.is_none()
            && !self.collecting
    }

    fn slot(&self, routine: Routine) -> Option<u64> {
        match routine {
            Routine::Flashcard => self.flashcard,
            Routine::DefinitionToWord => self.definition_to_word,
            Routine::WordToExample => self.word_to_example,
        }
    }

    fn slot_mut(&mut self, routine: Routine) -> &mut Option<u64> {
        match routine {
            Routine::Flashcard => &mut self.flashcard,
            Routine::DefinitionToWord => &mut self.definition_to_word,
            Routine::WordToExample => &mut self.word_to_example,
        }
    }
}

/// Everything the routines read and mutate, owned by the engine loop
pub struct EngineContext {
    pub store: CardStore,
    pub busy: BusyFlags,
    /// Operator toggle; when off the solver pass is skipped
    pub active: bool,
}

impl EngineContext {
    pub fn new(store: CardStore, active: bool) -> Self {
        Self {
            store,
            busy: BusyFlags::new(),
            active,
        }
    }

    /// Flip the operator toggle, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}
