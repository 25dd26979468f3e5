use rote_types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by a page session
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Page session disconnected")]
    Disconnected,

    #[error("No UI snapshot received yet")]
    NoSnapshot,

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Snapshot node lists that do not form a single tree
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Snapshot has no nodes")]
    Empty,

    #[error("Root node {0} names a parent")]
    RootHasParent(NodeId),

    #[error("Node {0} has no parent but is not first")]
    SecondRoot(NodeId),

    #[error("Node {node} listed before its parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },

    #[error("Node {0} listed twice")]
    DuplicateId(NodeId),
}
