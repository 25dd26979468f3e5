pub mod error;
pub mod fuzzy;
pub mod normalize;
pub mod page;
pub mod state;
pub mod storage;
pub mod store;
pub mod tree;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{PageError, StorageError, TreeError};
pub use page::Page;
pub use state::{BusyFlags, EngineContext};
pub use store::CardStore;
pub use tree::{NodeRef, Selector, UiNode, UiTree, WireNode};
