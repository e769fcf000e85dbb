//! Folder navigation state: the folder being viewed and how the user got there.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Result, TreeError};
use crate::tree::{Folder, Node, NodeId, TreeStore};

/// Current folder plus a back-stack of previously viewed folders.
///
/// The navigator stores ids only and reads the tree through a `&TreeStore`
/// on each query, so it never holds stale nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FolderNavigator {
    /// Folder being viewed, `None` at root
    pub current_folder: Option<NodeId>,
    /// Previously viewed folders, most recent last. Root is never recorded.
    pub history: Vec<NodeId>,
}

impl FolderNavigator {
    /// A navigator at root with empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `folder_id` (root if `None`).
    ///
    /// Navigating to the current folder does nothing. The folder being left is
    /// pushed to history unless it is the root.
    pub fn navigate_to(&mut self, store: &TreeStore, folder_id: Option<&str>) -> Result<()> {
        if folder_id == self.current_folder.as_deref() {
            return Ok(());
        }

        if let Some(id) = folder_id {
            if !store.require(id)?.is_folder() {
                return Err(TreeError::not_a_folder(id));
            }
            if let Some(previous) = self.current_folder.take() {
                self.history.push(previous);
            }
        }

        self.current_folder = folder_id.map(str::to_string);
        Ok(())
    }

    /// Return to the most recent folder in history, or to root if there is none
    pub fn navigate_back(&mut self) {
        self.current_folder = self.history.pop();
    }

    /// The current folder, if not at root and it still exists
    pub fn current_folder<'a>(&self, store: &'a TreeStore) -> Option<&'a Folder> {
        self.current_folder
            .as_deref()
            .and_then(|id| store.get_item(id))
            .and_then(Node::as_folder)
    }

    /// Nodes shown in the current view: the root list or the folder's children
    pub fn current_items<'a>(&self, store: &'a TreeStore) -> Vec<&'a Node> {
        match self.current_folder.as_deref() {
            None => store.get_root_items(),
            Some(id) => store.get_children(id).unwrap_or_default(),
        }
    }

    /// Path from root to the current folder. Empty at root.
    pub fn breadcrumbs<'a>(&self, store: &'a TreeStore) -> Vec<&'a Node> {
        match self.current_folder.as_deref() {
            None => Vec::new(),
            Some(id) => store.get_item_path(id).unwrap_or_default(),
        }
    }

    /// Go to root and clear history
    pub fn reset(&mut self) {
        self.current_folder = None;
        self.history.clear();
    }

    /// Drop references to deleted nodes.
    ///
    /// If the current folder was deleted the navigator resets to root;
    /// otherwise deleted folders are removed from history.
    pub fn forget(&mut self, deleted: &[NodeId]) {
        let current_deleted = self
            .current_folder
            .as_ref()
            .is_some_and(|current| deleted.contains(current));

        if current_deleted {
            log::debug!("FolderNavigator: current folder deleted, back to root");
            self.reset();
        } else {
            self.history.retain(|id| !deleted.contains(id));
        }
    }
}
