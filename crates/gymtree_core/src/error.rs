use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::dragdrop::DropRejection;
use crate::tree::NodeId;

/// Unified error type for gymtree operations
#[derive(Debug, Error)]
pub enum TreeError {
    // Lookup errors
    #[error("Node '{0}' not found")]
    NotFound(NodeId),

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: NodeId, reason: String },

    // Move errors
    #[error("Move not allowed: {0}")]
    Forbidden(DropRejection),

    #[error("A sibling named '{name}' already exists")]
    DuplicateName {
        parent: Option<NodeId>,
        name: String,
    },

    // Load errors
    #[error("Duplicate node id '{0}' in input")]
    DuplicateId(NodeId),

    #[error("Node '{id}' cannot be attached under '{parent}'")]
    Orphan { id: NodeId, parent: NodeId },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Consistency errors
    #[error("Tree validation failed: {}", .0.join("; "))]
    ValidationFailure(Vec<String>),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for gymtree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// A serializable representation of TreeError for IPC (e.g., Tauri, WASM)
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Node id the error is about (if applicable)
    pub id: Option<NodeId>,
}

impl From<&TreeError> for SerializableError {
    fn from(err: &TreeError) -> Self {
        let kind = match err {
            TreeError::NotFound(_) => "NotFound",
            TreeError::InvalidTarget { .. } => "InvalidTarget",
            TreeError::Forbidden(_) => "Forbidden",
            TreeError::DuplicateName { .. } => "DuplicateName",
            TreeError::DuplicateId(_) => "DuplicateId",
            TreeError::Orphan { .. } => "Orphan",
            TreeError::Json(_) => "Json",
            TreeError::ValidationFailure(_) => "ValidationFailure",
            TreeError::ConfigParse(_) => "ConfigParse",
            TreeError::ConfigSerialize(_) => "ConfigSerialize",
            TreeError::FileRead { .. } => "FileRead",
        }
        .to_string();

        let id = match err {
            TreeError::NotFound(id) => Some(id.clone()),
            TreeError::InvalidTarget { target, .. } => Some(target.clone()),
            TreeError::DuplicateId(id) => Some(id.clone()),
            TreeError::Orphan { id, .. } => Some(id.clone()),
            _ => None,
        };

        Self {
            kind,
            message: err.to_string(),
            id,
        }
    }
}

impl From<TreeError> for SerializableError {
    fn from(err: TreeError) -> Self {
        SerializableError::from(&err)
    }
}

impl TreeError {
    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }

    pub(crate) fn not_a_folder(id: &str) -> Self {
        TreeError::InvalidTarget {
            target: id.to_string(),
            reason: "not a folder".to_string(),
        }
    }
}
