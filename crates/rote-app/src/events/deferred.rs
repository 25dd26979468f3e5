use rote_types::DeferredAction;

use super::Engine;

impl Engine {
    /// Second step of a held plan: click if the target is still attached, then lower the flag
    pub(super) async fn run_deferred(&mut self, action: DeferredAction) {
        if !self.ctx.busy.holds(action.routine, action.generation) {
            tracing::debug!(
                routine = %action.routine,
                generation = action.generation,
                "stale deferred action ignored"
            );
            return;
        }

        if let Some(node) = action.click {
            match self.page.snapshot().await {
                Ok(tree) if tree.contains(node) => {
                    if let Err(e) = self.page.click(node).await {
                        tracing::warn!(routine = %action.routine, "Deferred click on {} failed: {}", node, e);
                    }
                }
                Ok(_) => {
                    tracing::debug!(routine = %action.routine, node = %node, "deferred target detached");
                }
                Err(e) => tracing::warn!("Snapshot before deferred click failed: {}", e),
            }
        }

        self.ctx.busy.release(action.routine, action.generation);
    }
}
