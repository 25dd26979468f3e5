use std::collections::HashSet;

use rote_core::PageError;
use rote_solvers::{Plan, Solver};
use rote_types::{DeferredAction, EngineEvent, NodeId};

use super::Engine;

impl Engine {
    /// One cycle: every routine decides on the same snapshot, in order
    pub(super) async fn run_solvers(&mut self) {
        self.cycles += 1;
        if !self.ctx.active {
            return;
        }

        let tree = match self.page.snapshot().await {
            Ok(tree) => tree,
            Err(PageError::NoSnapshot) => {
                tracing::trace!("no snapshot yet, cycle skipped");
                return;
            }
            Err(e) => {
                tracing::warn!("Snapshot failed: {}", e);
                return;
            }
        };

        // Routines overlap (arrow-next and the flashcard step): one click per node per cycle.
        let mut clicked = HashSet::new();

        for solver in Solver::ALL {
            let plan = solver.decide(&tree, &self.ctx);
            if plan.is_empty() {
                continue;
            }
            tracing::debug!(solver = %solver, clicks = plan.clicks.len(), "executing plan");
            self.execute(solver, plan, &mut clicked).await;
        }
    }

    async fn execute(&mut self, solver: Solver, plan: Plan, clicked: &mut HashSet<NodeId>) {
        if let Some(record) = plan.learn {
            let word = record.word.clone();
            if self.ctx.store.add(record) {
                tracing::info!(word = %word, total = self.ctx.store.len(), "Learned card");
            }
        }

        let held = match plan.hold {
            Some(hold) => match self.ctx.busy.acquire(hold.routine) {
                Some(generation) => Some((hold, generation)),
                None => {
                    tracing::debug!(routine = %hold.routine, "routine busy, plan dropped");
                    return;
                }
            },
            None => None,
        };

        let mut failed = false;
        for node in plan.clicks {
            if !clicked.insert(node) {
                continue;
            }
            if let Err(e) = self.page.click(node).await {
                tracing::warn!(solver = %solver, "Click on {} failed: {}", node, e);
                failed = true;
                break;
            }
        }

        // The flag is always released by its deferred action, even when the click failed.
        if let Some((hold, generation)) = held {
            let action = DeferredAction {
                routine: hold.routine,
                generation,
                click: hold.then_click.filter(|_| !failed),
            };
            self.scheduler
                .after(self.config.engine.click_delay(), EngineEvent::Deferred(action));
        }
    }
}
