//! Descendant counts and whole-tree statistics.
//!
//! Nothing is cached: every call walks the current tree with an explicit stack.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Result, TreeError};
use crate::tree::{Node, NodeId, TreeStore};

/// Transitive contents of a folder, excluding the folder itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FolderCounts {
    /// Folders anywhere below
    pub subfolders: usize,
    /// Items anywhere below
    pub items: usize,
}

/// Statistics over the whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TreeStats {
    /// Number of folders in the index
    pub total_folders: usize,
    /// Number of workout items in the index
    pub total_programs: usize,
    /// Largest edge distance from a root node to any node below it
    pub max_depth: usize,
}

impl TreeStore {
    /// Count every folder and item below `folder_id`.
    pub fn get_folder_counts(&self, folder_id: &str) -> Result<FolderCounts> {
        let node = self.require(folder_id)?;
        if !node.is_folder() {
            return Err(TreeError::not_a_folder(folder_id));
        }

        let mut counts = FolderCounts::default();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(node.id());
        let mut stack: Vec<&NodeId> = node.children().iter().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id.as_str()) {
                continue;
            }
            let Some(child) = self.get_item(id) else {
                continue;
            };
            match child {
                Node::Folder(folder) => {
                    counts.subfolders += 1;
                    stack.extend(folder.children.iter());
                }
                Node::Item(_) => counts.items += 1,
            }
        }

        Ok(counts)
    }

    /// Kind totals and maximum nesting depth.
    pub fn get_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for node in self.get_all_items() {
            match node {
                Node::Folder(_) => stats.total_folders += 1,
                Node::Item(_) => stats.total_programs += 1,
            }
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&NodeId, usize)> = self.root_ids().iter().map(|id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id.as_str()) {
                continue;
            }
            stats.max_depth = stats.max_depth.max(depth);
            if let Some(node) = self.get_item(id) {
                stack.extend(node.children().iter().map(|child| (child, depth + 1)));
            }
        }

        stats
    }
}
