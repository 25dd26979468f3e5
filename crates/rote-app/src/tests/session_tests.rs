use std::future;

use rote_core::Page;
use rote_io::BridgePage;
use tokio::io::BufReader;

use super::*;
use crate::completion::CompletionOutcome;
use crate::controller::{EngineController, TaskExit};
use crate::supervise::{RunOutcome, supervise};

fn fresh_context() -> EngineContext {
    EngineContext::new(CardStore::load(Box::new(MemorySlot::new())), true)
}

async fn drain_tasks(
    controller: &EngineController,
    tasks: &mut tokio::task::JoinSet<anyhow::Result<TaskExit>>,
) {
    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        assert!(result.unwrap().is_ok());
    }
}

#[tokio::test]
async fn dropped_bridge_session_ends_the_run_as_disconnected() {
    let (engine_in, browser_out) = tokio::io::duplex(64 * 1024);
    let (engine_out, _browser_in) = tokio::io::duplex(64 * 1024);
    let page: Arc<dyn Page> = Arc::new(BridgePage::connect(BufReader::new(engine_in), engine_out));

    let config = Config::default();
    let controller = EngineController::new(config.clone());
    let mut tasks = controller.spawn_tasks(page.clone(), fresh_context());

    // Browser side goes away without a word.
    drop(browser_out);

    let outcome = timeout(
        Duration::from_secs(5),
        supervise(page.as_ref(), &config.completion, &mut tasks, future::pending()),
    )
    .await
    .expect("run ends well before the completion poll");

    assert_eq!(outcome, RunOutcome::Finished(CompletionOutcome::Disconnected));
    assert_eq!(outcome.exit_code(), 3);
    drain_tasks(&controller, &mut tasks).await;
}

#[tokio::test(start_paused = true)]
async fn completion_marker_finishes_the_run() {
    let config = Config::default();
    let page = Arc::new(FakePage::new(
        el("body")
            .child(el("h1").text(&config.completion.marker))
            .build(),
    ));
    let controller = EngineController::new(config.clone());
    let mut tasks = controller.spawn_tasks(page.clone(), fresh_context());

    let outcome = supervise(page.as_ref(), &config.completion, &mut tasks, future::pending()).await;

    assert!(matches!(
        outcome,
        RunOutcome::Finished(CompletionOutcome::Completed { .. })
    ));
    assert_eq!(outcome.exit_code(), 0);
    drain_tasks(&controller, &mut tasks).await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_request_interrupts_the_run() {
    let config = Config::default();
    let page = Arc::new(FakePage::new(el("body").build()));
    let controller = EngineController::new(config.clone());
    let mut tasks = controller.spawn_tasks(page.clone(), fresh_context());

    let outcome = supervise(page.as_ref(), &config.completion, &mut tasks, future::ready(())).await;

    assert_eq!(outcome, RunOutcome::Interrupted);
    assert_eq!(outcome.exit_code(), 0);
    drain_tasks(&controller, &mut tasks).await;
}

#[test]
fn failures_and_timeouts_have_their_own_exit_codes() {
    assert_eq!(RunOutcome::Finished(CompletionOutcome::TimedOut).exit_code(), 2);
    assert_eq!(RunOutcome::TaskFailed.exit_code(), 1);
    assert_eq!(RunOutcome::Stopped.exit_code(), 0);
}
