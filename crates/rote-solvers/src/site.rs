//! Structure of the exercise site: where things live in the tree.

use rote_core::normalize::normalize;
use rote_core::{NodeRef, Selector, UiTree};

pub const DEFINITION_HEADER: &str = "Definition:";
pub const EXAMPLE_HEADER: &str = "Example:";

/// Texts of the primary buttons that move an exercise forward
const ADVANCE_LABELS: [&str; 2] = ["next", "submit"];

pub fn action_button() -> Selector {
    Selector::tag("a")
        .and_class("btn")
        .and_class("btn-primary")
        .and_class("btn-rounded")
}

pub fn is_advance_label(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    ADVANCE_LABELS.contains(&text.as_str())
}

/// `.item-controls a.next:not(.disabled)`
pub fn arrow_next(tree: &UiTree) -> Option<NodeRef<'_>> {
    let next = Selector::tag("a").and_class("next").not("disabled");
    tree.find_all(&Selector::class("item-controls"))
        .find_map(|controls| controls.find(&next))
}

/// `a.flipcard`
pub fn flipcard(tree: &UiTree) -> Option<NodeRef<'_>> {
    tree.find(&Selector::tag("a").and_class("flipcard"))
}

pub fn is_revealed(card: NodeRef<'_>) -> bool {
    card.has_class("flipped")
}

/// Trimmed text of the element right after the `<p>` reading `header`
pub fn text_after_header(scope: NodeRef<'_>, header: &str) -> Option<String> {
    scope
        .find_all(&Selector::tag("p"))
        .find(|p| p.text() == header)
        .and_then(|p| p.next_sibling())
        .map(|value| value.text())
        .filter(|text| !text.is_empty())
}

/// `.example p:last-of-type`
pub fn example_paragraph(tree: &UiTree) -> Option<NodeRef<'_>> {
    let paragraph = Selector::tag("p");
    tree.find_all(&Selector::class("example")).find_map(|example| {
        example
            .find_all(&paragraph)
            .find(|p| is_last_of_type(*p))
    })
}

fn is_last_of_type(node: NodeRef<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    parent
        .children()
        .filter(|sibling| sibling.tag() == node.tag())
        .last()
        .is_some_and(|last| last.id() == node.id())
}

/// The matching exercise container
pub fn exercise_root(tree: &UiTree) -> Option<NodeRef<'_>> {
    tree.find(&Selector::class("items-list"))
}

/// Rows not yet answered, in document order
pub fn open_rows(root: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    root.find_all(&Selector::class("items-list-row").not("filled"))
        .collect()
}

/// `outer inner` scoped to `scope`: first `inner` with an `outer` ancestor
pub fn nested<'a>(scope: NodeRef<'a>, outer: &str, inner: &Selector) -> Option<NodeRef<'a>> {
    scope
        .find_all(&Selector::class(outer))
        .find_map(|container| container.find(inner))
}

/// Whether `node` sits below an ancestor with `class`
pub fn has_ancestor_class(node: NodeRef<'_>, class: &str) -> bool {
    node.parent()
        .and_then(|parent| parent.closest(&Selector::class(class)))
        .is_some()
}

/// Normalized text of the `.text` child, if there is one
pub fn label_of(node: NodeRef<'_>) -> Option<String> {
    node.find(&Selector::class("text"))
        .map(|text| normalize(&text.text_content()))
}

/// The example card of a row; the site ships both spellings of the class
pub fn example_card(row: NodeRef<'_>) -> Option<NodeRef<'_>> {
    row.descendants()
        .find(|n| n.has_class("example-sentence") || n.has_class("example-sencence"))
}

pub fn inner() -> Selector {
    Selector::class("inner")
}

pub fn text() -> Selector {
    Selector::class("text")
}

pub fn menu_toggle(tree: &UiTree) -> Option<NodeRef<'_>> {
    tree.find(&Selector::class("flashcards-menu-toggle"))
}

pub fn review_grid(tree: &UiTree) -> Option<NodeRef<'_>> {
    tree.find(&Selector::class("flashcards-grid"))
}

/// `.flipcard.flipped`
pub fn flipcard_revealed(tree: &UiTree) -> Option<NodeRef<'_>> {
    tree.find(&Selector::class("flipcard").and_class("flipped"))
}
