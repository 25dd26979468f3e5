use async_trait::async_trait;
use kanal::AsyncReceiver;
use rote_types::{NodeId, PageSignal};

use crate::error::PageError;
use crate::tree::UiTree;

/// An already authenticated, already navigated page session.
///
/// Implementations decide how the tree is observed and how clicks reach the page;
/// the engine only ever reads snapshots and issues clicks.
#[async_trait]
pub trait Page: Send + Sync {
    /// Current state of the UI tree
    async fn snapshot(&self) -> Result<UiTree, PageError>;

    /// Invoke the click affordance of a node
    async fn click(&self, node: NodeId) -> Result<(), PageError>;

    /// Whether the literal `needle` is displayed anywhere on the page
    async fn contains_text(&self, needle: &str) -> Result<bool, PageError> {
        Ok(self.snapshot().await?.contains_text(needle))
    }

    /// Change notifications and key presses. Every call returns a receiver on the same stream.
    fn subscribe(&self) -> AsyncReceiver<PageSignal>;
}
