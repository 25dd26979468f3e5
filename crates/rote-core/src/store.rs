use std::collections::HashSet;

use rote_types::FlashcardRecord;

use crate::error::StorageError;
use crate::fuzzy::fuzzy_match;
use crate::normalize::normalize;
use crate::storage::Slot;

/// Learned cards, at most one per word, persisted after every change.
///
/// The in-memory copy is authoritative for the session; persistence is best effort.
pub struct CardStore {
    cards: Vec<FlashcardRecord>,
    seen: HashSet<String>,
    slot: Box<dyn Slot>,
}

impl CardStore {
    /// Empty store that will persist into `slot`, ignoring whatever it already holds
    pub fn empty(slot: Box<dyn Slot>) -> Self {
        Self {
            cards: Vec::new(),
            seen: HashSet::new(),
            slot,
        }
    }

    /// Restore the snapshot held in `slot`. An absent or unreadable snapshot yields an empty store.
    pub fn load(slot: Box<dyn Slot>) -> Self {
        let mut store = Self::empty(slot);

        let data = match store.slot.read() {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!("No saved cards, starting empty");
                return store;
            }
            Err(e) => {
                tracing::warn!("Failed to read saved cards: {}", e);
                return store;
            }
        };

        match serde_json::from_str::<Vec<FlashcardRecord>>(&data) {
            Ok(cards) => {
                for card in cards {
                    store.insert(card);
                }
                tracing::info!("Loaded {} cards", store.len());
            }
            Err(e) => tracing::warn!("Ignoring malformed card snapshot: {}", e),
        }

        store
    }

    pub fn has(&self, word: &str) -> bool {
        self.seen.contains(word)
    }

    /// Insert a new card and persist. Returns `false` when the word is already known.
    pub fn add(&mut self, record: FlashcardRecord) -> bool {
        if !self.insert(record) {
            return false;
        }
        self.persist_or_warn();
        true
    }

    /// Insert many cards without persisting; returns how many were new
    pub fn extend(&mut self, records: impl IntoIterator<Item = FlashcardRecord>) -> usize {
        records
            .into_iter()
            .filter_map(|record| self.insert(record).then_some(()))
            .count()
    }

    /// Write the whole sequence to the slot
    pub fn persist(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.cards)?;
        self.slot.write(&data)
    }

    pub fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist {} cards: {}", self.cards.len(), e);
        }
    }

    /// First card whose normalized definition equals `normalized_definition`
    pub fn find_by_definition(&self, normalized_definition: &str) -> Option<&FlashcardRecord> {
        self.cards
            .iter()
            .find(|card| normalize(&card.definition) == normalized_definition)
    }

    /// First card whose example is the page text with one token missing
    pub fn find_by_fuzzy_example(&self, page_text: &str) -> Option<&FlashcardRecord> {
        self.cards
            .iter()
            .find(|card| fuzzy_match(page_text, &card.example))
    }

    pub fn cards(&self) -> &[FlashcardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn insert(&mut self, record: FlashcardRecord) -> bool {
        if self.seen.contains(&record.word) {
            return false;
        }
        self.seen.insert(record.word.clone());
        self.cards.push(record);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;

    struct BrokenSlot;

    impl Slot for BrokenSlot {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn write(&self, _data: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    fn card(word: &str) -> FlashcardRecord {
        FlashcardRecord::new(word, format!("meaning of {word}"), format!("use {word} here"))
    }

    #[test]
    fn duplicate_word_is_stored_once() {
        let slot = MemorySlot::new();
        let mut store = CardStore::load(Box::new(slot.clone()));

        assert!(store.add(card("ubiquitous")));
        assert!(!store.add(FlashcardRecord::new("ubiquitous", "other", "other")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.cards()[0].definition, "meaning of ubiquitous");
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn word_identity_is_case_sensitive() {
        let mut store = CardStore::empty(Box::new(MemorySlot::new()));
        assert!(store.add(card("Lucid")));
        assert!(store.add(card("lucid")));
        assert!(store.has("Lucid"));
        assert!(!store.has("LUCID"));
    }

    #[test]
    fn reload_restores_cards_and_seen_words() {
        let slot = MemorySlot::new();
        {
            let mut store = CardStore::load(Box::new(slot.clone()));
            store.add(card("a"));
            store.add(card("b"));
        }

        let store = CardStore::load(Box::new(slot));
        assert_eq!(store.len(), 2);
        assert!(store.has("a") && store.has("b"));
    }

    #[test]
    fn duplicates_in_snapshot_are_collapsed() {
        let snapshot = serde_json::to_string(&vec![card("a"), card("a"), card("b")]).unwrap();
        let store = CardStore::load(Box::new(MemorySlot::with_value(snapshot)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn malformed_or_unreadable_snapshot_yields_empty_store() {
        let store = CardStore::load(Box::new(MemorySlot::with_value("{not json")));
        assert!(store.is_empty());

        let store = CardStore::load(Box::new(BrokenSlot));
        assert!(store.is_empty());
    }

    #[test]
    fn persistence_failure_keeps_memory_state() {
        let mut store = CardStore::load(Box::new(BrokenSlot));
        assert!(store.add(card("resilient")));
        assert!(store.has("resilient"));
        assert!(store.persist().is_err());
    }

    #[test]
    fn extend_counts_only_new_cards_and_does_not_persist() {
        let slot = MemorySlot::new();
        let mut store = CardStore::empty(Box::new(slot.clone()));
        store.add(card("a"));

        let added = store.extend(vec![card("a"), card("b"), card("c"), card("b")]);
        assert_eq!(added, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn lookups_use_normalized_text() {
        let mut store = CardStore::empty(Box::new(MemorySlot::new()));
        store.add(FlashcardRecord::new(
            "ubiquitous",
            "Present  everywhere",
            "its presence is ubiquitous",
        ));

        assert_eq!(
            store.find_by_definition("present everywhere").map(|c| c.word.as_str()),
            Some("ubiquitous")
        );
        assert!(store.find_by_definition("present").is_none());

        assert_eq!(
            store.find_by_fuzzy_example("Its presence is ___.").map(|c| c.word.as_str()),
            Some("ubiquitous")
        );
    }
}
