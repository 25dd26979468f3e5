use kanal::{AsyncReceiver, AsyncSender};
use rote_config::hotkeys::HotkeyConfig;
use rote_types::{EngineEvent, PageSignal};
use tokio_util::sync::CancellationToken;

use crate::controller::TaskExit;

/// Turn page signals into engine events: mutations run the solvers, bound keys toggle or collect
pub async fn watch_signals(
    signals: AsyncReceiver<PageSignal>,
    hotkeys: HotkeyConfig,
    cancel: CancellationToken,
    event_tx: AsyncSender<EngineEvent>,
) -> anyhow::Result<TaskExit> {
    tracing::info!(
        toggle = %hotkeys.toggle,
        collect = %hotkeys.collect,
        "Watching page signals"
    );

    loop {
        let signal = tokio::select! {
            _ = cancel.cancelled() => return Ok(TaskExit::Cancelled),
            signal = signals.recv() => signal,
        };

        let event = match signal {
            Ok(PageSignal::Mutated) => {
                // Bursts of mutations collapse into whatever is already queued.
                if !event_tx.try_send(EngineEvent::RunSolvers)? {
                    tracing::trace!("event queue full, mutation dropped");
                }
                continue;
            }
            Ok(PageSignal::Key(key)) if hotkeys.is_toggle(&key) => EngineEvent::ToggleActive,
            Ok(PageSignal::Key(key)) if hotkeys.is_collect(&key) => {
                EngineEvent::Collect { auto_close: false }
            }
            Ok(PageSignal::Key(key)) => {
                tracing::trace!(key = %key, "unbound key");
                continue;
            }
            Ok(PageSignal::Closed) | Err(_) => {
                tracing::info!("Page session closed");
                return Ok(TaskExit::PageClosed);
            }
        };

        event_tx.send(event).await?;
    }
}
