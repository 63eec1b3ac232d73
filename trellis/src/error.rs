//! Layout core error types.

use thiserror::Error;

use crate::tree::NodeId;

/// Contract violations surfaced synchronously by tree and panel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("node {child:?} already belongs to {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { child: NodeId, parent: NodeId },

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle { child: NodeId, parent: NodeId },

    #[error("index {index} out of range for {count} items")]
    IndexOutOfRange { index: isize, count: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors while loading a [`SceneConfig`](crate::config::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}
