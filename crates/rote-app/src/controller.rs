use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use rote_config::Config;
use rote_core::{EngineContext, Page};
use rote_types::EngineEvent;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::events::{Engine, event_loop};
use crate::io::watch_signals;
use crate::schedule::Scheduler;
use crate::status::EngineStatus;
use crate::triggers::{auto_collect_loop, poll_loop};

/// How a spawned task ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskExit {
    Cancelled,
    /// The page session went away under the task
    PageClosed,
}

/// Engine controller for task spawning and lifecycle
pub struct EngineController {
    events: (AsyncSender<EngineEvent>, AsyncReceiver<EngineEvent>),
    status: watch::Sender<EngineStatus>,
    config: Config,
    cancel_token: CancellationToken,
}

impl EngineController {
    pub fn new(config: Config) -> Self {
        let (status, _) = watch::channel(EngineStatus::default());
        Self {
            events: kanal::bounded_async(config.engine.channel_capacity),
            status,
            config,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn status(&self) -> watch::Receiver<EngineStatus> {
        self.status.subscribe()
    }

    /// Spawn the engine loop and every trigger source, all inside the current span
    pub fn spawn_tasks(&self, page: Arc<dyn Page>, ctx: EngineContext) -> JoinSet<anyhow::Result<TaskExit>> {
        let mut tasks = JoinSet::new();
        let span = tracing::Span::current();

        let scheduler = Scheduler::new(self.events.0.clone(), self.cancel_token.child_token());
        let engine = Engine::new(
            page.clone(),
            ctx,
            self.config.clone(),
            scheduler,
            self.status.clone(),
        );

        // Engine loop
        tasks.spawn(
            event_loop(engine, self.events.1.clone(), self.cancel_token.child_token())
                .instrument(span.clone()),
        );

        // Change notifications and hotkeys
        tasks.spawn(
            watch_signals(
                page.subscribe(),
                self.config.hotkeys.clone(),
                self.cancel_token.child_token(),
                self.events.0.clone(),
            )
            .instrument(span.clone()),
        );

        // Poll timer
        tasks.spawn(
            poll_loop(
                self.config.engine.poll_interval(),
                self.cancel_token.child_token(),
                self.events.0.clone(),
            )
            .instrument(span.clone()),
        );

        // Auto-collect timer
        if self.config.collector.enabled {
            tasks.spawn(
                auto_collect_loop(
                    self.config.collector.auto_interval(),
                    self.cancel_token.child_token(),
                    self.events.0.clone(),
                )
                .instrument(span),
            );
        } else {
            tracing::info!("Auto-collect disabled");
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
