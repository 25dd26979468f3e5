use std::time::Duration;

use rote_config::completion::CompletionConfig;
use rote_core::{Page, PageError};
use tokio::time::{self, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed { elapsed: Duration },
    TimedOut,
    Disconnected,
}

/// Poll the page for the completion marker until it shows up or the timeout passes.
///
/// Transient page errors are logged and polling continues; a closed session ends the wait.
pub async fn wait_for_completion(page: &dyn Page, config: &CompletionConfig) -> CompletionOutcome {
    let start = Instant::now();
    let period = config.poll_interval();

    let watch = async {
        let mut interval = time::interval_at(start + period, period);
        loop {
            interval.tick().await;
            match page.contains_text(&config.marker).await {
                Ok(true) => {
                    return CompletionOutcome::Completed {
                        elapsed: start.elapsed(),
                    };
                }
                Ok(false) => tracing::trace!("completion marker not shown yet"),
                Err(PageError::Disconnected) => return CompletionOutcome::Disconnected,
                Err(e) => tracing::warn!("Completion check failed: {}", e),
            }
        }
    };

    match time::timeout(config.timeout(), watch).await {
        Ok(outcome) => outcome,
        Err(_) => CompletionOutcome::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rote_core::testing::{FakePage, el};

    use super::*;

    fn config() -> CompletionConfig {
        CompletionConfig {
            marker: "HOMEWORK COMPLETE".into(),
            poll_interval_secs: 5,
            timeout_secs: 60,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completes_on_the_first_poll_showing_the_marker() {
        let page = Arc::new(FakePage::new(el("body").build()));

        let waiter = {
            let page = page.clone();
            tokio::spawn(async move { wait_for_completion(page.as_ref(), &config()).await })
        };

        time::sleep(Duration::from_secs(12)).await;
        page.set_tree(el("body").child(el("h1").text("HOMEWORK COMPLETE")).build());

        let outcome = waiter.await.unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Completed {
                elapsed: Duration::from_secs(15)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_timeout() {
        let page = FakePage::new(el("body").text("still working").build());
        let outcome = wait_for_completion(&page, &config()).await;
        assert_eq!(outcome, CompletionOutcome::TimedOut);
    }
}
