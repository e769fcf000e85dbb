//! Test utilities for gymtree_core
//!
//! Node builders with fixed ids and timestamps, so tests can load hand-written
//! trees through `TreeStore::load_data` and refer to nodes by id.

use chrono::{DateTime, TimeZone, Utc};

use crate::tree::{
    DEFAULT_FOLDER_COLOR, DEFAULT_FOLDER_ICON, DEFAULT_ITEM_DURATION, Difficulty, Folder, Item,
    ItemStatus, Node,
};

/// A fixed timestamp used for every fixture node.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A folder whose id and name are both `id`.
pub fn folder(id: &str, parent_id: Option<&str>) -> Node {
    Node::Folder(Folder {
        id: id.to_string(),
        name: id.to_string(),
        icon: DEFAULT_FOLDER_ICON.to_string(),
        color: DEFAULT_FOLDER_COLOR.to_string(),
        parent_id: parent_id.map(str::to_string),
        children: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    })
}

/// An item whose id and title are both `id`.
pub fn item(id: &str, parent_id: Option<&str>) -> Node {
    Node::Item(Item {
        id: id.to_string(),
        title: id.to_string(),
        parent_id: parent_id.map(str::to_string),
        description: String::new(),
        status: ItemStatus::Draft,
        difficulty: Difficulty::Beginner,
        coach: None,
        duration_minutes: DEFAULT_ITEM_DURATION,
        exercises: 0,
        variants: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    })
}
