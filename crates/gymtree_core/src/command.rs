//! Command pattern API for IPC callers.
//!
//! Front ends (WASM, Tauri, a server) send a serialized [`Command`] and get a
//! serialized [`Response`] back, instead of binding every `TreeStore` method.
//!
//! # Usage
//!
//! ```ignore
//! use gymtree_core::{Command, Response, TreeStore};
//!
//! let cmd = Command::GetFolderCounts { id: "folder_1".to_string() };
//! let response = store.execute(cmd)?;
//!
//! if let Response::FolderCounts(counts) = response {
//!     println!("{} items", counts.items);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::aggregate::{FolderCounts, TreeStats};
use crate::dragdrop::DropZone;
use crate::search::SearchResults;
use crate::tree::{ItemOptions, LoadSummary, Node, NodeId, Variant};
use crate::validate::ValidationReport;

// ============================================================================
// Command Types
// ============================================================================

/// All commands that can be executed against a [`TreeStore`](crate::tree::TreeStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Command {
    // === Loading ===
    /// Replace the store content with a flat node list.
    LoadData {
        /// Every node, in any order.
        nodes: Vec<Node>,
    },

    /// Get every node as a flat list for persistence.
    ExportNodes,

    // === Queries ===
    /// Get a single node.
    GetItem {
        /// Node id.
        id: NodeId,
    },

    /// Get the root list.
    GetRootItems,

    /// Get a folder's children.
    GetChildren {
        /// Folder id.
        id: NodeId,
    },

    /// Get every node regardless of depth.
    GetAllItems,

    /// Get the breadcrumb path from root to a node.
    GetItemPath {
        /// Node id.
        id: NodeId,
    },

    /// Search names, titles and variant labels.
    SearchItems {
        /// Substring to look for.
        query: String,
    },

    /// Count everything below a folder.
    GetFolderCounts {
        /// Folder id.
        id: NodeId,
    },

    /// Whole-tree statistics.
    GetStats,

    /// Run the consistency checker.
    ValidateTree,

    /// Render the tree as a text outline.
    FormatTree,

    /// Ask whether a node may be dropped on a zone.
    CanDrop {
        /// Dragged node id.
        id: NodeId,
        /// Target zone.
        zone: DropZone,
    },

    /// Suggest a sibling name that is not taken.
    UniqueChildName {
        /// Parent folder (`None` = root).
        #[serde(default)]
        parent_id: Option<NodeId>,
        /// Preferred name.
        base: String,
    },

    // === Mutations ===
    /// Create a folder.
    CreateFolder {
        /// Folder name.
        name: String,
        /// Parent folder (`None` = root).
        #[serde(default)]
        parent_id: Option<NodeId>,
        /// Icon, or the configured default.
        #[serde(default)]
        icon: Option<String>,
    },

    /// Create a workout item.
    CreateItem {
        /// Item title.
        title: String,
        /// Parent folder (`None` = root).
        #[serde(default)]
        parent_id: Option<NodeId>,
        /// Optional metadata.
        #[serde(default)]
        options: ItemOptions,
    },

    /// Rename a folder or item.
    RenameItem {
        /// Node id.
        id: NodeId,
        /// New name or title.
        name: String,
    },

    /// Change a folder's icon.
    ChangeFolderIcon {
        /// Folder id.
        id: NodeId,
        /// New icon.
        icon: String,
    },

    /// Change a folder's color.
    ChangeFolderColor {
        /// Folder id.
        id: NodeId,
        /// New color.
        color: String,
    },

    /// Update an item's metadata.
    UpdateItem {
        /// Item id.
        id: NodeId,
        /// Fields to change.
        options: ItemOptions,
    },

    /// Add a variant to an item.
    AddVariant {
        /// Item id.
        item_id: NodeId,
        /// Variant label.
        label: String,
        /// Variant description.
        #[serde(default)]
        description: String,
    },

    /// Remove a variant from an item.
    RemoveVariant {
        /// Item id.
        item_id: NodeId,
        /// Variant id.
        variant_id: String,
    },

    /// Move a node to another folder or to root.
    MoveItem {
        /// Node id.
        id: NodeId,
        /// New parent (`None` = root).
        #[serde(default)]
        parent_id: Option<NodeId>,
    },

    /// Delete a node and everything below it.
    DeleteItem {
        /// Node id.
        id: NodeId,
    },
}

// ============================================================================
// Response Types
// ============================================================================

/// Responses from command execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Response {
    /// Command completed successfully with no data.
    Ok,

    /// String response.
    String(String),

    /// Boolean response.
    Bool(bool),

    /// Single node response.
    Node(Node),

    /// Node list response.
    Nodes(Vec<Node>),

    /// Id list response (e.g. ids removed by a delete).
    Ids(Vec<NodeId>),

    /// Variant response.
    Variant(Variant),

    /// Load summary response.
    LoadSummary(LoadSummary),

    /// Search results response.
    SearchResults(SearchResults),

    /// Folder counts response.
    FolderCounts(FolderCounts),

    /// Tree statistics response.
    Stats(TreeStats),

    /// Validation report response.
    ValidationReport(ValidationReport),
}
