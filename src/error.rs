use thiserror::Error;

use crate::nodes::NodeId;

#[derive(Debug, Error)]
pub enum TagSyncError {
    #[error("Output '{0}' already exists.")]
    DuplicateOutput(String),

    #[error("Output '{0}' does not exist.")]
    OutputNotFound(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Control '{control}' on node {node_id} not ready after {attempts} attempts")]
    ResourceNotReady {
        node_id: NodeId,
        control: String,
        attempts: u32,
    },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TagSyncError {
    /// Errors caused directly by a user action, reported back to the user
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TagSyncError::DuplicateOutput(_) | TagSyncError::OutputNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TagSyncError>;
