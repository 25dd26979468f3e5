use std::time::Duration;

use kanal::AsyncSender;
use rote_types::EngineEvent;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::controller::TaskExit;

/// Run the solvers every `period`, whether or not the page announced a change
pub async fn poll_loop(
    period: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<EngineEvent>,
) -> anyhow::Result<TaskExit> {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !event_tx.try_send(EngineEvent::RunSolvers)? {
                    tracing::trace!("event queue full, poll tick skipped");
                }
            }
        }
    }

    tracing::debug!("Poll timer stopping");
    Ok(TaskExit::Cancelled)
}

/// Request a self-closing bulk collection every `period`, starting one period in
pub async fn auto_collect_loop(
    period: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<EngineEvent>,
) -> anyhow::Result<TaskExit> {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if event_tx.is_full() {
                    tracing::debug!("event queue full, auto-collect waiting for room");
                }
                // Unlike poll ticks, a collection request is never dropped.
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = event_tx.send(EngineEvent::Collect { auto_close: true }) => sent?,
                }
            }
        }
    }

    tracing::debug!("Auto-collect timer stopping");
    Ok(TaskExit::Cancelled)
}
