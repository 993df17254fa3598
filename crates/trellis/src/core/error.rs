use std::result::Result as StdResult;

use thiserror::Error;

use super::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Structural errors are programmer errors: they are reported at the call
/// site and the tree is left exactly as it was before the call.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("{child} is already a child of {parent}")]
    /// The node being attached already has a parent.
    AlreadyAttached {
        /// Name of the node being attached.
        child: String,
        /// Name of its current parent.
        parent: String,
    },
    #[error("{child} is not a child of {parent}")]
    /// The node being removed is not owned by the given parent.
    NotAChild {
        /// Name of the node being removed.
        child: String,
        /// Name of the parent it was removed from.
        parent: String,
    },
    #[error("{parent} accepts at most {limit} children")]
    /// A fixed-slot container is already full.
    ChildLimit {
        /// Name of the container.
        parent: String,
        /// Maximum number of children.
        limit: usize,
    },
    #[error("node not found: {0:?}")]
    /// A node id does not refer to a live node.
    NodeNotFound(NodeId),
    #[error("attaching {child} to {parent} would create a cycle")]
    /// The requested parent is the node itself or one of its descendants.
    WouldCreateCycle {
        /// Name of the node being attached.
        child: String,
        /// Name of the requested parent.
        parent: String,
    },
    #[error("invalid operation: {0}")]
    /// A request that is not valid in the current state.
    InvalidOperation(String),
    #[error("widget is already borrowed: {0:?}")]
    /// A widget was requested while its slot was checked out.
    ReentrantWidgetBorrow(NodeId),
    #[error("widget type mismatch on {node:?}: expected {expected}")]
    /// Typed widget access found a different widget type.
    WidgetType {
        /// Node that was accessed.
        node: NodeId,
        /// Expected type name.
        expected: &'static str,
    },
    #[error("config: {0}")]
    /// Options or skin data could not be parsed.
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
