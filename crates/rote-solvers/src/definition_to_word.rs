//! Definition-to-word matching: each open row shows a definition, the bank holds the words.

use rote_core::normalize::normalize;
use rote_core::{EngineContext, NodeRef, Selector, UiTree};
use rote_types::Routine;

use crate::plan::Plan;
use crate::site;

/// Pair the first open row whose definition is known with its word
pub fn solve(tree: &UiTree, ctx: &EngineContext) -> Plan {
    if ctx.busy.is_busy(Routine::DefinitionToWord) || ctx.store.is_empty() {
        return Plan::none();
    }
    let Some(root) = site::exercise_root(tree) else {
        return Plan::none();
    };

    let bank = word_bank(root);

    for row in site::open_rows(root) {
        let Some(definition) = site::nested(row, "cell-ending", &site::text()) else {
            continue;
        };
        let Some(card) = ctx
            .store
            .find_by_definition(&normalize(&definition.text_content()))
        else {
            continue;
        };

        let wanted = normalize(&card.word);
        let Some(word) = bank
            .iter()
            .find(|piece| site::label_of(**piece).as_deref() == Some(wanted.as_str()))
        else {
            continue;
        };

        let definition_click = site::nested(row, "cell-ending", &site::inner());
        let word_click = word.find(&site::inner());
        let (Some(definition_click), Some(word_click)) = (definition_click, word_click) else {
            continue;
        };

        tracing::debug!(word = %card.word, "definition matched");
        return Plan::held(
            Routine::DefinitionToWord,
            vec![definition_click.id()],
            Some(word_click.id()),
        );
    }

    Plan::none()
}

/// `.cell-beginning .word-piece.beginning`
fn word_bank(root: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let piece = Selector::class("word-piece").and_class("beginning");
    root.find_all(&piece)
        .filter(|piece| site::has_ancestor_class(*piece, "cell-beginning"))
        .collect()
}

#[cfg(test)]
mod tests {
    use rote_core::CardStore;
    use rote_core::storage::MemorySlot;
    use rote_core::testing::{ElementBuilder, el};
    use rote_types::FlashcardRecord;

    use super::*;

    fn ctx_with(cards: &[(&str, &str)]) -> EngineContext {
        let mut store = CardStore::empty(Box::new(MemorySlot::new()));
        for (word, definition) in cards {
            store.add(FlashcardRecord::new(*word, *definition, ""));
        }
        EngineContext::new(store, true)
    }

    fn row(definition: &str, filled: bool) -> ElementBuilder {
        let class = if filled { "items-list-row filled" } else { "items-list-row" };
        el("div").class(class).child(
            el("div").class("cell-ending").child(
                el("div")
                    .class("inner")
                    .child(el("span").class("text").text(definition)),
            ),
        )
    }

    fn piece(word: &str) -> ElementBuilder {
        el("div").class("word-piece beginning").child(
            el("div")
                .class("inner")
                .child(el("span").class("text").text(word)),
        )
    }

    fn exercise(rows: Vec<ElementBuilder>, words: &[&str]) -> UiTree {
        el("body")
            .child(
                el("div")
                    .class("items-list")
                    .children(rows)
                    .child(el("div").class("cell-beginning").children(words.iter().map(|w| piece(w)))),
            )
            .build()
    }

    fn inner_of(tree: &UiTree, text: &str) -> rote_types::NodeId {
        tree.find_all(&Selector::class("text"))
            .find(|t| t.text() == text)
            .and_then(|t| t.parent())
            .map(|inner| inner.id())
            .unwrap()
    }

    #[test]
    fn matches_definition_despite_case_and_spacing() {
        let ctx = ctx_with(&[("ubiquitous", "present everywhere")]);
        let tree = exercise(
            vec![row("  Present   Everywhere ", false)],
            &["ephemeral", "ubiquitous"],
        );

        let plan = solve(&tree, &ctx);
        assert_eq!(
            plan,
            Plan::held(
                Routine::DefinitionToWord,
                vec![inner_of(&tree, "Present   Everywhere")],
                Some(inner_of(&tree, "ubiquitous")),
            )
        );
    }

    #[test]
    fn never_acts_with_empty_store() {
        let ctx = ctx_with(&[]);
        let tree = exercise(vec![row("present everywhere", false)], &["ubiquitous"]);
        assert!(solve(&tree, &ctx).is_empty());
    }

    #[test]
    fn skips_filled_and_unknown_rows_and_acts_once() {
        let ctx = ctx_with(&[("brief", "lasting a short time"), ("lucid", "clear")]);
        let tree = exercise(
            vec![
                row("lasting a short time", true),
                row("something unknown", false),
                row("clear", false),
                row("lasting a short time", false),
            ],
            &["brief", "lucid"],
        );

        let plan = solve(&tree, &ctx);
        assert_eq!(plan.clicks, vec![inner_of(&tree, "clear")]);
        assert_eq!(plan.hold.unwrap().then_click, Some(inner_of(&tree, "lucid")));
    }

    #[test]
    fn missing_word_in_bank_moves_to_next_row() {
        let ctx = ctx_with(&[("brief", "lasting a short time"), ("lucid", "clear")]);
        let tree = exercise(
            vec![row("lasting a short time", false), row("clear", false)],
            &["lucid"],
        );

        let plan = solve(&tree, &ctx);
        assert_eq!(plan.clicks, vec![inner_of(&tree, "clear")]);
    }

    #[test]
    fn busy_flag_blocks_action() {
        let mut ctx = ctx_with(&[("lucid", "clear")]);
        ctx.busy.acquire(Routine::DefinitionToWord);
        let tree = exercise(vec![row("clear", false)], &["lucid"]);
        assert!(solve(&tree, &ctx).is_empty());
    }
}
