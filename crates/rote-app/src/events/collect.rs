//! Bulk collection as a state machine driven by [`EngineEvent::CollectorTick`].
//!
//! Every wait (grid poll, settle, close delay) is a scheduled tick carrying the
//! epoch of the collection that asked for it; ticks from older epochs are dropped.

use std::time::Duration;

use rote_solvers::collector::{self, CollectError, CollectionOutcome};
use rote_types::EngineEvent;
use tokio::time::Instant;

use super::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Opening {
        deadline: Instant,
        auto_close: bool,
    },
    Collecting {
        auto_close: bool,
    },
    Closing,
}

#[derive(Debug, Default)]
pub struct Collector {
    phase: Phase,
    epoch: u64,
}

impl Collector {
    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Engine {
    pub(super) async fn start_collection(&mut self, auto_close: bool) {
        if self.collector.phase != Phase::Idle || self.ctx.busy.is_collecting() {
            tracing::debug!("Collection already running, request dropped");
            return;
        }

        self.collector.epoch += 1;
        self.ctx.busy.set_collecting(true);
        tracing::debug!(epoch = self.collector.epoch, auto_close, "collection started");

        let tree = match self.page.snapshot().await {
            Ok(tree) => tree,
            Err(e) => return self.fail_collection(CollectError::Page(e.to_string())),
        };

        if collector::grid_open(&tree) {
            self.collector.phase = Phase::Collecting { auto_close };
            self.schedule_tick(self.config.collector.settle());
            return;
        }

        let Some(toggle) = collector::menu_toggle(&tree) else {
            return self.fail_collection(CollectError::MenuToggleMissing);
        };
        if let Err(e) = self.page.click(toggle).await {
            return self.fail_collection(CollectError::Page(e.to_string()));
        }

        self.collector.phase = Phase::Opening {
            deadline: Instant::now() + self.config.collector.open_timeout(),
            auto_close,
        };
        self.schedule_tick(self.config.collector.poll_interval());
    }

    pub(super) async fn collector_tick(&mut self, epoch: u64) {
        if epoch != self.collector.epoch {
            tracing::trace!(epoch, current = self.collector.epoch, "stale collector tick");
            return;
        }

        match self.collector.phase {
            Phase::Idle => {}
            Phase::Opening {
                deadline,
                auto_close,
            } => self.poll_grid(deadline, auto_close).await,
            Phase::Collecting { auto_close } => self.collect_grid(auto_close).await,
            Phase::Closing => self.close_grid().await,
        }
    }

    async fn poll_grid(&mut self, deadline: Instant, auto_close: bool) {
        match self.page.snapshot().await {
            Ok(tree) if collector::grid_open(&tree) => {
                self.collector.phase = Phase::Collecting { auto_close };
                self.schedule_tick(self.config.collector.settle());
            }
            Ok(_) if Instant::now() >= deadline => {
                self.fail_collection(CollectError::OpenTimeout);
            }
            Ok(_) => self.schedule_tick(self.config.collector.poll_interval()),
            Err(e) => self.fail_collection(CollectError::Page(e.to_string())),
        }
    }

    async fn collect_grid(&mut self, auto_close: bool) {
        let tree = match self.page.snapshot().await {
            Ok(tree) => tree,
            Err(e) => return self.fail_collection(CollectError::Page(e.to_string())),
        };

        let cards = collector::extract_grid_cards(&tree);
        let found = cards.len();
        let added = self.ctx.store.extend(cards);
        self.ctx.store.persist_or_warn();

        let total = self.ctx.store.len();
        tracing::info!(found, added, total, "Collected flashcards");
        self.last_collection = Some(CollectionOutcome::Collected { added, total });

        if auto_close {
            self.collector.phase = Phase::Closing;
            self.schedule_tick(self.config.collector.close_delay());
        } else {
            self.finish_collection();
        }
    }

    async fn close_grid(&mut self) {
        match self.page.snapshot().await {
            Ok(tree) if collector::grid_open(&tree) => {
                if let Some(toggle) = collector::menu_toggle(&tree)
                    && let Err(e) = self.page.click(toggle).await
                {
                    tracing::warn!("Failed to close flashcard grid: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Snapshot before closing grid failed: {}", e),
        }
        self.finish_collection();
    }

    fn fail_collection(&mut self, error: CollectError) {
        tracing::warn!("Collection failed: {}", error);
        self.last_collection = Some(CollectionOutcome::Failed(error));
        self.finish_collection();
    }

    fn finish_collection(&mut self) {
        self.collector.phase = Phase::Idle;
        self.ctx.busy.set_collecting(false);
    }

    fn schedule_tick(&self, delay: Duration) {
        let epoch = self.collector.epoch;
        self.scheduler
            .after(delay, EngineEvent::CollectorTick { epoch });
    }
}
