use rote_types::{FlashcardRecord, NodeId, Routine};

/// A busy flag to raise while the plan settles, and the click to make once it has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hold {
    pub routine: Routine,
    pub then_click: Option<NodeId>,
}

/// What one routine wants done this cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Clicked immediately, in order
    pub clicks: Vec<NodeId>,
    /// Card to add to the store
    pub learn: Option<FlashcardRecord>,
    pub hold: Option<Hold>,
}

impl Plan {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn click(node: NodeId) -> Self {
        Self::clicks(vec![node])
    }

    pub fn clicks(clicks: Vec<NodeId>) -> Self {
        Self {
            clicks,
            ..Self::default()
        }
    }

    pub fn learn(record: FlashcardRecord) -> Self {
        Self {
            learn: Some(record),
            ..Self::default()
        }
    }

    /// Click `clicks` now under `routine`'s flag, then `then_click` after the settle delay
    pub fn held(routine: Routine, clicks: Vec<NodeId>, then_click: Option<NodeId>) -> Self {
        Self {
            clicks,
            learn: None,
            hold: Some(Hold {
                routine,
                then_click,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty() && self.learn.is_none() && self.hold.is_none()
    }
}
