use std::future::Future;

use rote_config::completion::CompletionConfig;
use rote_core::Page;
use tokio::task::JoinSet;

use crate::completion::{CompletionOutcome, wait_for_completion};
use crate::controller::TaskExit;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Shutdown was requested from outside
    Interrupted,
    Finished(CompletionOutcome),
    /// A task stopped on its own without a reason to report
    Stopped,
    TaskFailed,
}

impl RunOutcome {
    pub fn exit_code(self) -> u8 {
        match self {
            RunOutcome::Interrupted | RunOutcome::Stopped => 0,
            RunOutcome::Finished(CompletionOutcome::Completed { .. }) => 0,
            RunOutcome::Finished(CompletionOutcome::TimedOut) => 2,
            RunOutcome::Finished(CompletionOutcome::Disconnected) => 3,
            RunOutcome::TaskFailed => 1,
        }
    }
}

/// Wait for whichever comes first: `shutdown`, the completion check, or a task ending.
///
/// A task that stops because the page session closed counts as a disconnect.
pub async fn supervise<F>(
    page: &dyn Page,
    config: &CompletionConfig,
    tasks: &mut JoinSet<anyhow::Result<TaskExit>>,
    shutdown: F,
) -> RunOutcome
where
    F: Future<Output = ()>,
{
    let outcome = tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
            return RunOutcome::Interrupted;
        }
        outcome = wait_for_completion(page, config) => outcome,
        result = tasks.join_next() => match result {
            Some(Ok(Ok(TaskExit::PageClosed))) => CompletionOutcome::Disconnected,
            Some(Ok(Ok(TaskExit::Cancelled))) | None => {
                tracing::info!("Task exited, shutting down");
                return RunOutcome::Stopped;
            }
            Some(Ok(Err(e))) => {
                tracing::error!("Task failed: {:#}", e);
                return RunOutcome::TaskFailed;
            }
            Some(Err(e)) => {
                tracing::error!("Task panicked: {}", e);
                return RunOutcome::TaskFailed;
            }
        },
    };

    match outcome {
        CompletionOutcome::Completed { elapsed } => {
            tracing::info!("Homework complete after {}s", elapsed.as_secs());
        }
        CompletionOutcome::TimedOut => {
            tracing::warn!("Homework not complete after {}s", config.timeout_secs);
        }
        CompletionOutcome::Disconnected => {
            tracing::warn!("Page session ended before completion");
        }
    }
    RunOutcome::Finished(outcome)
}
