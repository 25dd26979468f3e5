use rote_solvers::collector::CollectionOutcome;

/// Engine status, published after every handled event
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStatus {
    pub active: bool,
    pub cards: usize,
    /// Solver cycles triggered so far, including ones skipped while paused
    pub cycles: u64,
    pub collecting: bool,
    pub last_collection: Option<CollectionOutcome>,
}
