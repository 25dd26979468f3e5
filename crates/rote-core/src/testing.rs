//! Fixtures for tests: a tree builder and an in-memory page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use rote_types::{NodeId, PageSignal};

use crate::error::PageError;
use crate::page::Page;
use crate::tree::{UiNode, UiTree};

/// Start building an element. Ids are assigned in document order from 1 unless set with [`ElementBuilder::id`].
pub fn el(tag: &str) -> ElementBuilder {
    ElementBuilder {
        id: None,
        tag: tag.to_string(),
        classes: Vec::new(),
        text: String::new(),
        visible: true,
        children: Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct ElementBuilder {
    id: Option<u64>,
    tag: String,
    classes: Vec<String>,
    text: String,
    visible: bool,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    /// Space separated class list, appended
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Explicit id; keep these clear of the auto-assigned range
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> UiTree {
        let mut next = 1;
        UiTree::from(self.into_node(&mut next))
    }

    fn into_node(self, next: &mut u64) -> UiNode {
        let id = self.id.unwrap_or_else(|| {
            let id = *next;
            *next += 1;
            id
        });

        UiNode {
            id: NodeId(id),
            tag: self.tag,
            classes: self.classes,
            text: self.text,
            visible: self.visible,
            children: self
                .children
                .into_iter()
                .map(|child| child.into_node(next))
                .collect(),
        }
    }
}

type ClickHook = Box<dyn FnMut(NodeId, &UiTree) -> Option<UiTree> + Send>;

/// Page held in memory. Records clicks; an optional hook may swap the tree on click.
pub struct FakePage {
    tree: Mutex<UiTree>,
    clicks: Mutex<Vec<NodeId>>,
    hook: Mutex<Option<ClickHook>>,
    fail_clicks: AtomicBool,
    signal_tx: AsyncSender<PageSignal>,
    signal_rx: AsyncReceiver<PageSignal>,
}

impl FakePage {
    pub fn new(tree: UiTree) -> Self {
        let (signal_tx, signal_rx) = kanal::unbounded_async();
        Self {
            tree: Mutex::new(tree),
            clicks: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
            fail_clicks: AtomicBool::new(false),
            signal_tx,
            signal_rx,
        }
    }

    pub fn set_tree(&self, tree: UiTree) {
        *lock(&self.tree) = tree;
    }

    pub fn tree(&self) -> UiTree {
        lock(&self.tree).clone()
    }

    /// Every click so far, oldest first
    pub fn clicks(&self) -> Vec<NodeId> {
        lock(&self.clicks).clone()
    }

    pub fn clear_clicks(&self) {
        lock(&self.clicks).clear();
    }

    pub fn on_click(&self, hook: impl FnMut(NodeId, &UiTree) -> Option<UiTree> + Send + 'static) {
        *lock(&self.hook) = Some(Box::new(hook));
    }

    pub fn fail_clicks(&self, fail: bool) {
        self.fail_clicks.store(fail, Ordering::SeqCst);
    }

    /// Push a signal as the page would
    pub fn emit(&self, signal: PageSignal) {
        let _ = self.signal_tx.try_send(signal);
    }
}

#[async_trait]
impl Page for FakePage {
    async fn snapshot(&self) -> Result<UiTree, PageError> {
        Ok(self.tree())
    }

    async fn click(&self, node: NodeId) -> Result<(), PageError> {
        if self.fail_clicks.load(Ordering::SeqCst) {
            return Err(PageError::Protocol(format!("click on {node} rejected")));
        }

        lock(&self.clicks).push(node);

        let mut hook = lock(&self.hook);
        if let Some(hook) = hook.as_mut() {
            let current = self.tree();
            if let Some(next) = hook(node, &current) {
                self.set_tree(next);
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> AsyncReceiver<PageSignal> {
        self.signal_rx.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
