use std::sync::Arc;

use kanal::AsyncReceiver;
use rote_config::Config;
use rote_core::{EngineContext, Page};
use rote_solvers::collector::CollectionOutcome;
use rote_types::EngineEvent;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::controller::TaskExit;
use crate::schedule::Scheduler;
use crate::status::EngineStatus;

pub mod collect;
pub mod deferred;
pub mod run_solvers;

use collect::Collector;

/// Sole owner of the card store and busy flags.
///
/// Every trigger reaches the engine as an [`EngineEvent`]; handlers run one at a
/// time, so nothing here needs a lock.
pub struct Engine {
    page: Arc<dyn Page>,
    ctx: EngineContext,
    config: Config,
    scheduler: Scheduler,
    collector: Collector,
    last_collection: Option<CollectionOutcome>,
    cycles: u64,
    status: watch::Sender<EngineStatus>,
}

impl Engine {
    pub fn new(
        page: Arc<dyn Page>,
        ctx: EngineContext,
        config: Config,
        scheduler: Scheduler,
        status: watch::Sender<EngineStatus>,
    ) -> Self {
        let engine = Self {
            page,
            ctx,
            config,
            scheduler,
            collector: Collector::default(),
            last_collection: None,
            cycles: 0,
            status,
        };
        engine.publish_status();
        engine
    }

    #[cfg(test)]
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    #[cfg(test)]
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub async fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::RunSolvers => self.run_solvers().await,
            EngineEvent::ToggleActive => {
                let active = self.ctx.toggle();
                tracing::info!("Solvers {}", if active { "enabled" } else { "paused" });
            }
            EngineEvent::Collect { auto_close } => self.start_collection(auto_close).await,
            EngineEvent::CollectorTick { epoch } => self.collector_tick(epoch).await,
            EngineEvent::Deferred(action) => self.run_deferred(action).await,
        }

        self.publish_status();
    }

    fn publish_status(&self) {
        self.status.send_replace(EngineStatus {
            active: self.ctx.active,
            cards: self.ctx.store.len(),
            cycles: self.cycles,
            collecting: self.ctx.busy.is_collecting(),
            last_collection: self.last_collection.clone(),
        });
    }
}

/// Engine main loop
pub async fn event_loop(
    mut engine: Engine,
    events: AsyncReceiver<EngineEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<TaskExit> {
    tracing::info!(
        cards = engine.ctx.store.len(),
        active = engine.ctx.active,
        "Engine loop started"
    );

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => event?,
        };

        tracing::trace!(?event, "event received");
        engine.handle(event).await;
    }

    tracing::info!("Engine loop stopping");
    Ok(TaskExit::Cancelled)
}
