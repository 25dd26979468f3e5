//! Engine tests against an in-memory page with tokio's paused clock

mod session_tests;

use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use rote_config::Config;
use rote_core::storage::MemorySlot;
use rote_core::testing::{ElementBuilder, FakePage, el};
use rote_core::{CardStore, EngineContext, Selector, UiTree};
use rote_types::{EngineEvent, FlashcardRecord, NodeId};
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::Engine;
use crate::schedule::Scheduler;
use crate::status::EngineStatus;

pub const MENU_TOGGLE: u64 = 900;

pub struct Harness {
    pub page: Arc<FakePage>,
    pub engine: Engine,
    /// Events the engine scheduled for itself
    pub scheduled: AsyncReceiver<EngineEvent>,
    pub status: watch::Receiver<EngineStatus>,
    pub slot: MemorySlot,
}

impl Harness {
    pub fn new(tree: UiTree, cards: Vec<FlashcardRecord>) -> Self {
        let slot = MemorySlot::new();
        let mut store = CardStore::empty(Box::new(slot.clone()));
        store.extend(cards);

        let page = Arc::new(FakePage::new(tree));
        let (tx, scheduled) = kanal::bounded_async(64);
        let (status_tx, status) = watch::channel(EngineStatus::default());
        let engine = Engine::new(
            page.clone(),
            EngineContext::new(store, true),
            Config::default(),
            Scheduler::new(tx, CancellationToken::new()),
            status_tx,
        );

        Self {
            page,
            engine,
            scheduled,
            status,
            slot,
        }
    }

    pub async fn handle(&mut self, event: EngineEvent) {
        self.engine.handle(event).await;
    }

    /// Handle scheduled events until ten idle seconds pass without one
    pub async fn settle(&mut self) {
        while let Ok(Ok(event)) = timeout(Duration::from_secs(10), self.scheduled.recv()).await {
            self.engine.handle(event).await;
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }
}

pub fn card(word: &str) -> FlashcardRecord {
    FlashcardRecord::new(word, format!("meaning of {word}"), "")
}

/// Id of the `.inner` wrapping the `.text` reading `text`
pub fn inner_of(tree: &UiTree, text: &str) -> NodeId {
    tree.find_all(&Selector::class("text"))
        .find(|t| t.text() == text)
        .and_then(|t| t.parent())
        .map(|inner| inner.id())
        .unwrap()
}

/// One open definition row and a word bank
pub fn definition_exercise(definition: &str, words: &[&str]) -> UiTree {
    let row = el("div").class("items-list-row").child(
        el("div").class("cell-ending").child(
            el("div")
                .class("inner")
                .child(el("span").class("text").text(definition)),
        ),
    );
    let bank = el("div").class("cell-beginning").children(words.iter().map(|word| {
        el("div").class("word-piece beginning").child(
            el("div")
                .class("inner")
                .child(el("span").class("text").text(word)),
        )
    }));

    el("body")
        .child(el("div").class("items-list").child(row).child(bank))
        .build()
}

pub fn grid_card(word: &str) -> ElementBuilder {
    el("div")
        .class("flipcard")
        .child(el("h3").class("item-name").text(word))
        .child(el("p").text("Definition:"))
        .child(el("p").text(&format!("meaning of {word}")))
        .child(el("p").text("Example:"))
        .child(el("p").text(&format!("Use {word} here.")))
}

/// Review page with the menu toggle; the grid is rendered only when `open`
pub fn review_page(open: bool, words: &[&str]) -> UiTree {
    let mut body = el("body").child(
        el("a")
            .class("flashcards-menu-toggle")
            .id(MENU_TOGGLE),
    );
    if open {
        body = body.child(
            el("div")
                .class("flashcards-grid")
                .children(words.iter().map(|word| grid_card(word))),
        );
    }
    body.build()
}

/// Make the menu toggle open and close the grid
pub fn wire_menu_toggle(page: &FakePage, words: &'static [&'static str]) {
    page.on_click(move |node, tree| {
        if node != NodeId(MENU_TOGGLE) {
            return None;
        }
        let open = tree.find(&Selector::class("flashcards-grid")).is_some();
        Some(review_page(!open, words))
    });
}
