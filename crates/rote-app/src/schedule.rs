use std::time::Duration;

use kanal::AsyncSender;
use rote_types::EngineEvent;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// One-shot timers that post an event back into the engine loop
#[derive(Clone)]
pub struct Scheduler {
    tx: AsyncSender<EngineEvent>,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(tx: AsyncSender<EngineEvent>, cancel: CancellationToken) -> Self {
        Self { tx, cancel }
    }

    /// Deliver `event` after `delay` unless the engine shuts down first
    pub fn after(&self, delay: Duration, event: EngineEvent) {
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {
                        if tx.send(event).await.is_err() {
                            tracing::trace!("engine loop gone, scheduled event dropped");
                        }
                    }
                }
            }
            .in_current_span(),
        );
    }
}
