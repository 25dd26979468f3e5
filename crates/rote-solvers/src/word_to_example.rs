//! Word-to-example matching: each open row shows a sentence with the word blanked out.

use rote_core::normalize::normalize;
use rote_core::{EngineContext, NodeRef, Selector, UiTree};
use rote_types::Routine;

use crate::plan::Plan;
use crate::site;

/// Pair the first open row whose sentence is a known example with its word.
///
/// When no sentence matches and exactly one sentence and one word are left,
/// they are paired by elimination. A page caught mid-shuffle can show a
/// transient single pair, so this can mis-pair; it is kept for forward progress.
pub fn solve(tree: &UiTree, ctx: &EngineContext) -> Plan {
    if ctx.busy.is_busy(Routine::WordToExample) || ctx.store.is_empty() {
        return Plan::none();
    }
    let Some(root) = site::exercise_root(tree) else {
        return Plan::none();
    };
    let rows = site::open_rows(root);
    if rows.is_empty() {
        return Plan::none();
    }

    let cell_word = Selector::class("cell-word");

    for row in &rows {
        let Some(card) = site::example_card(*row) else {
            continue;
        };
        let Some(sentence) = card.find(&site::text()) else {
            continue;
        };
        let sentence = sentence.text();

        let Some(record) = ctx.store.find_by_fuzzy_example(&sentence) else {
            tracing::trace!(sentence = %sentence, "no stored example matches");
            continue;
        };

        let wanted = normalize(&record.word);
        let Some(word) = root
            .find_all(&cell_word)
            .find(|cell| site::label_of(*cell).as_deref() == Some(wanted.as_str()))
        else {
            tracing::trace!(word = %record.word, "word not on page");
            continue;
        };
        let Some(word_click) = word.find(&site::inner()) else {
            continue;
        };

        tracing::debug!(word = %record.word, "example matched");
        return Plan::held(Routine::WordToExample, vec![card.id()], Some(word_click.id()));
    }

    pair_last_remaining(root, &rows)
}

fn pair_last_remaining(root: NodeRef<'_>, rows: &[NodeRef<'_>]) -> Plan {
    let targets = remaining_targets(rows);
    let words = remaining_words(root);

    match (targets.as_slice(), words.as_slice()) {
        ([target], [word]) => {
            tracing::debug!(target = %target, word = %word, "pairing last remaining example by elimination");
            Plan::held(Routine::WordToExample, vec![*target], Some(*word))
        }
        _ => Plan::none(),
    }
}

/// Click targets of visible example cards: the dropzone if any, else the card when it shows text
fn remaining_targets(rows: &[NodeRef<'_>]) -> Vec<rote_types::NodeId> {
    rows.iter()
        .filter_map(|row| site::example_card(*row))
        .filter(|card| card.is_visible())
        .filter_map(|card| {
            if let Some(dropzone) = card.find(&Selector::class("text-dropzone")) {
                return Some(dropzone.id());
            }
            let has_text = card
                .find(&site::text())
                .is_some_and(|text| !text.text().is_empty());
            has_text.then(|| card.id())
        })
        .collect()
}

/// `.cell-word .inner` entries still available to place
fn remaining_words(root: NodeRef<'_>) -> Vec<rote_types::NodeId> {
    let cell_word = Selector::class("cell-word");
    let row = Selector::class("items-list-row");

    root.find_all(&site::inner())
        .filter(|inner| site::has_ancestor_class(*inner, "cell-word"))
        .filter(|inner| {
            let has_text = inner
                .find(&site::text())
                .is_some_and(|text| !text.text().is_empty());
            let cell = inner.closest(&cell_word);
            let disabled = inner.is_disabled() || cell.is_some_and(|c| c.is_disabled());
            let filled = cell.is_some_and(|c| c.has_class("filled"))
                || inner.closest(&row).is_some_and(|r| r.has_class("filled"));

            has_text && inner.is_visible() && !disabled && !filled
        })
        .map(|inner| inner.id())
        .collect()
}
