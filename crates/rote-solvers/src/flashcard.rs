//! The flip-card sequence: learn each revealed card, then keep flipping and advancing.

use rote_core::normalize::normalize_example;
use rote_core::{EngineContext, Selector, UiTree};
use rote_types::{FlashcardRecord, Routine};

use crate::plan::Plan;
use crate::site;

/// Learn the revealed card unless it is known or only partly rendered
pub fn harvest(tree: &UiTree, ctx: &EngineContext) -> Plan {
    let Some(card) = site::flipcard_revealed(tree) else {
        return Plan::none();
    };

    let Some(word) = tree
        .find(&Selector::class("item-name"))
        .map(|name| name.text())
        .filter(|word| !word.is_empty())
    else {
        return Plan::none();
    };

    if ctx.store.has(&word) {
        return Plan::none();
    }

    let Some(definition) = site::text_after_header(tree.root(), site::DEFINITION_HEADER) else {
        tracing::trace!(word = %word, card = %card.id(), "definition not rendered yet");
        return Plan::none();
    };
    let Some(example) = site::example_paragraph(tree)
        .map(|p| p.text())
        .filter(|text| !text.is_empty())
    else {
        tracing::trace!(word = %word, "example not rendered yet");
        return Plan::none();
    };

    Plan::learn(FlashcardRecord {
        word,
        definition,
        example: normalize_example(&example),
    })
}

/// Advance when possible, otherwise reveal the current card
pub fn step(tree: &UiTree, ctx: &EngineContext) -> Plan {
    if ctx.busy.is_busy(Routine::Flashcard) {
        return Plan::none();
    }

    let card = site::flipcard(tree);
    let next = site::arrow_next(tree);

    if let Some(next) = next {
        return Plan::held(Routine::Flashcard, vec![next.id()], None);
    }

    match card {
        Some(card) if !site::is_revealed(card) => {
            Plan::held(Routine::Flashcard, vec![card.id()], None)
        }
        // Revealed but nowhere to go yet: still wait out the settle delay
        Some(_) => Plan::held(Routine::Flashcard, Vec::new(), None),
        None => Plan::none(),
    }
}
