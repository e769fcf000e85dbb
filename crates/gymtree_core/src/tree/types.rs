//! Tree data types.
//!
//! This module contains the node types stored in a [`TreeStore`](super::TreeStore):
//! - `Node` - A folder or a workout item, as one sum type
//! - `Folder` - A container with ordered child ids
//! - `Item` - A workout plan with metadata and variants
//! - `Variant` - A labelled variation of an item (no further nesting)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a node. Unique across folders and items.
pub type NodeId = String;

/// Icon used for folders created without one
pub const DEFAULT_FOLDER_ICON: &str = "📁";

/// Color used for folders created without one
pub const DEFAULT_FOLDER_COLOR: &str = "#3B82F6";

/// Duration (minutes) used for items created without one
pub const DEFAULT_ITEM_DURATION: u32 = 60;

/// The kind of a node, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum NodeKind {
    /// A container node
    Folder,
    /// A workout plan
    Item,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::Item => write!(f, "item"),
        }
    }
}

/// Publication status of a workout item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ItemStatus {
    /// Being written, not visible to athletes
    #[default]
    Draft,
    /// Assigned and in use
    Active,
    /// Kept for reference only
    Archived,
}

/// Difficulty of a workout item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Entry level
    #[default]
    Beginner,
    /// Some training experience required
    Intermediate,
    /// Experienced athletes only
    Advanced,
}

/// A folder node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Folder {
    /// Unique id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Icon (emoji or icon name)
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Color (hex, rgb or color name)
    #[serde(default = "default_color")]
    pub color: String,
    /// Parent folder id, `None` for root
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Ids of child nodes, in display order.
    /// Rebuilt from `parent_id` on load, so stale values in input are ignored.
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// Creation time
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_FOLDER_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_FOLDER_COLOR.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_ITEM_DURATION
}

/// A workout item node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Unique id
    pub id: NodeId,
    /// Display title
    pub title: String,
    /// Parent folder id, `None` for root
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Publication status
    #[serde(default)]
    pub status: ItemStatus,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Coach who owns the plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub coach: Option<String>,
    /// Planned duration in minutes
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    /// Number of exercises in the plan
    #[serde(default)]
    pub exercises: u32,
    /// Variations of this plan
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Creation time
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// A variant of a workout item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Variant {
    /// Unique id (within the owning item)
    pub id: String,
    /// Display label
    pub label: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Creation time
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// A node of the workspace tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Node {
    /// A folder
    Folder(Folder),
    /// A workout item
    Item(Item),
}

impl Node {
    /// Node id
    pub fn id(&self) -> &str {
        match self {
            Node::Folder(f) => &f.id,
            Node::Item(i) => &i.id,
        }
    }

    /// Kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::Item(_) => NodeKind::Item,
        }
    }

    /// Folder name or item title
    pub fn display_name(&self) -> &str {
        match self {
            Node::Folder(f) => &f.name,
            Node::Item(i) => &i.title,
        }
    }

    /// Parent folder id, `None` at root
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Node::Folder(f) => f.parent_id.as_deref(),
            Node::Item(i) => i.parent_id.as_deref(),
        }
    }

    /// Child ids (always empty for items)
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Folder(f) => &f.children,
            Node::Item(_) => &[],
        }
    }

    /// Returns true if this node is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    /// Returns true if this node sits in the root list
    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }

    /// Borrow as a folder
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(f) => Some(f),
            Node::Item(_) => None,
        }
    }

    /// Borrow as an item
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Node::Item(i) => Some(i),
            Node::Folder(_) => None,
        }
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Node::Folder(f) => f.created_at,
            Node::Item(i) => i.created_at,
        }
    }

    /// Last modification time
    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Node::Folder(f) => f.updated_at,
            Node::Item(i) => i.updated_at,
        }
    }

    pub(crate) fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(f) => Some(f),
            Node::Item(_) => None,
        }
    }

    pub(crate) fn as_item_mut(&mut self) -> Option<&mut Item> {
        match self {
            Node::Item(i) => Some(i),
            Node::Folder(_) => None,
        }
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: Option<NodeId>) {
        match self {
            Node::Folder(f) => f.parent_id = parent_id,
            Node::Item(i) => i.parent_id = parent_id,
        }
    }

    pub(crate) fn set_display_name(&mut self, name: String) {
        match self {
            Node::Folder(f) => f.name = name,
            Node::Item(i) => i.title = name,
        }
    }

    /// Set `updated_at` to now
    pub(crate) fn touch(&mut self) {
        let now = Utc::now();
        match self {
            Node::Folder(f) => f.updated_at = now,
            Node::Item(i) => i.updated_at = now,
        }
    }
}

impl Folder {
    /// Create a new folder with a fresh id
    pub fn new(name: impl Into<String>, parent_id: Option<NodeId>, icon: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(NodeKind::Folder),
            name: name.into(),
            icon: icon.into(),
            color: default_color(),
            parent_id,
            children: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Item {
    /// Create a new item with a fresh id and the given options applied
    pub fn new(title: impl Into<String>, parent_id: Option<NodeId>, options: ItemOptions) -> Self {
        let now = Utc::now();
        let mut item = Self {
            id: generate_id(NodeKind::Item),
            title: title.into(),
            parent_id,
            description: String::new(),
            status: ItemStatus::default(),
            difficulty: Difficulty::default(),
            coach: None,
            duration_minutes: DEFAULT_ITEM_DURATION,
            exercises: 0,
            variants: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        options.apply_to(&mut item);
        item
    }

    /// Find a variant by id
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

impl Variant {
    /// Create a new variant with a fresh id
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("variant_{}", uuid::Uuid::new_v4().simple()),
            label: label.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional item metadata, used on creation and by `update_item`.
/// Unset fields keep their current (or default) value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ItemOptions {
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// Status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub status: Option<ItemStatus>,
    /// Difficulty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub difficulty: Option<Difficulty>,
    /// Coach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub coach: Option<String>,
    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub duration_minutes: Option<u32>,
    /// Exercise count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub exercises: Option<u32>,
}

impl ItemOptions {
    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, item: &mut Item) {
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(difficulty) = self.difficulty {
            item.difficulty = difficulty;
        }
        if let Some(coach) = self.coach {
            item.coach = Some(coach);
        }
        if let Some(duration) = self.duration_minutes {
            item.duration_minutes = duration;
        }
        if let Some(exercises) = self.exercises {
            item.exercises = exercises;
        }
    }
}

/// Generate a fresh node id, prefixed by kind (e.g. `folder_3f2a…`)
pub fn generate_id(kind: NodeKind) -> NodeId {
    format!("{}_{}", kind, uuid::Uuid::new_v4().simple())
}
