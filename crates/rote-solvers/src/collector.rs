//! Review-grid extraction for the bulk collector.

use rote_core::normalize::normalize_example;
use rote_core::{NodeRef, Selector, UiTree};
use rote_types::{FlashcardRecord, NodeId};

use crate::site;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("Flashcard menu toggle not found")]
    MenuToggleMissing,

    #[error("Flashcard grid did not open in time")]
    OpenTimeout,

    #[error("Page error: {0}")]
    Page(String),
}

/// Result of one collection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    Collected { added: usize, total: usize },
    Failed(CollectError),
}

/// Control that opens (and closes) the review grid
pub fn menu_toggle(tree: &UiTree) -> Option<NodeId> {
    site::menu_toggle(tree).map(|toggle| toggle.id())
}

/// Whether the review grid is rendered and visible
pub fn grid_open(tree: &UiTree) -> bool {
    site::review_grid(tree).is_some_and(|grid| grid.is_visible())
}

/// Every complete card currently rendered in the grid, in document order
pub fn extract_grid_cards(tree: &UiTree) -> Vec<FlashcardRecord> {
    let flipcard = Selector::class("flipcard");
    tree.find_all(&Selector::class("flashcards-grid"))
        .flat_map(|grid| grid.find_all(&flipcard))
        .filter_map(extract_card)
        .collect()
}

/// Word, definition and optional example of one grid card
pub fn extract_card(card: NodeRef<'_>) -> Option<FlashcardRecord> {
    let word = card
        .find(&Selector::class("item-name"))
        .map(|name| name.text())
        .filter(|word| !word.is_empty())?;
    let definition = site::text_after_header(card, site::DEFINITION_HEADER)?;
    let example = site::text_after_header(card, site::EXAMPLE_HEADER)
        .map(|raw| normalize_example(&raw))
        .unwrap_or_default();

    Some(FlashcardRecord {
        word,
        definition,
        example,
    })
}
