//! Workspace tree module.
//!
//! This module provides the in-memory tree of folders and workout items:
//! - Loading a flat node list into a hierarchy
//! - Lookups (by id, root list, children, flattened)
//! - Mutations (create, rename, move, delete) in [`ops`]
//!
//! # Module Structure
//!
//! - `types` - Core data types (Node, Folder, Item, Variant)
//! - `ops` - Mutating operations on a [`TreeStore`]
//!
//! All nodes live in one id-keyed index. Parent and child links are ids, never
//! references, so the store owns every node exactly once.

mod ops;
mod types;

pub use types::{
    DEFAULT_FOLDER_COLOR, DEFAULT_FOLDER_ICON, DEFAULT_ITEM_DURATION, Difficulty, Folder, Item,
    ItemOptions, ItemStatus, Node, NodeId, NodeKind, Variant, generate_id,
};

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{OrphanPolicy, TreeConfig};
use crate::error::{Result, TreeError};

/// Summary of a `load_data` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    /// Number of nodes in the store after loading
    pub loaded: usize,
    /// Number of nodes in the root list
    pub roots: usize,
    /// Nodes that could not be attached where their `parent_id` said.
    /// Depending on the orphan policy they were re-rooted or dropped.
    pub orphans: Vec<NodeId>,
    /// Nodes removed because they hung below an orphan (drop policy only)
    pub dropped: Vec<NodeId>,
}

/// The authoritative in-memory tree: an id-keyed node index plus the ordered root list.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    nodes: IndexMap<NodeId, Node>,
    root_items: Vec<NodeId>,
    config: TreeConfig,
}

/// Where a node's parent chain ends up during load
#[derive(Clone, Copy, PartialEq)]
enum Reach {
    Root,
    Dropped,
}

impl TreeStore {
    /// Create an empty store with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given config
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a store and load `nodes` into it
    pub fn from_nodes(nodes: Vec<Node>, config: TreeConfig) -> Result<Self> {
        let mut store = Self::with_config(config);
        store.load_data(nodes)?;
        Ok(store)
    }

    /// The active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replace all store content with `nodes`.
    ///
    /// Folder `children` in the input are ignored and rebuilt from `parent_id`.
    /// Nodes whose parent does not resolve to a folder, or whose parent chain
    /// loops, are handled per [`OrphanPolicy`]. Duplicate ids fail the load.
    /// On error the store keeps its previous content.
    pub fn load_data(&mut self, nodes: Vec<Node>) -> Result<LoadSummary> {
        log::debug!("TreeStore: loading {} nodes", nodes.len());

        let mut index: IndexMap<NodeId, Node> = IndexMap::with_capacity(nodes.len());
        for mut node in nodes {
            if let Some(folder) = node.as_folder_mut() {
                folder.children.clear();
            }
            let id = node.id().to_string();
            if index.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }
            index.insert(id, node);
        }

        let mut summary = LoadSummary::default();
        let reach = resolve_parents(&mut index, self.config.orphan_policy, &mut summary)?;

        if self.config.orphan_policy == OrphanPolicy::Drop {
            index.retain(|id, _| {
                if reach.get(id) == Some(&Reach::Dropped) {
                    if !summary.orphans.contains(id) {
                        summary.dropped.push(id.clone());
                    }
                    false
                } else {
                    true
                }
            });
        }

        let mut root_items = Vec::new();
        let links: Vec<(NodeId, Option<NodeId>)> = index
            .values()
            .map(|n| (n.id().to_string(), n.parent_id().map(str::to_string)))
            .collect();
        for (id, parent_id) in links {
            match parent_id {
                None => root_items.push(id),
                Some(parent_id) => {
                    // resolve_parents guarantees the parent is a folder
                    if let Some(folder) = index.get_mut(&parent_id).and_then(Node::as_folder_mut) {
                        folder.children.push(id);
                    }
                }
            }
        }

        self.nodes = index;
        self.root_items = root_items;

        summary.loaded = self.nodes.len();
        summary.roots = self.root_items.len();
        log::debug!(
            "TreeStore: load complete, {} nodes, {} root items, {} orphans",
            summary.loaded,
            summary.roots,
            summary.orphans.len()
        );
        Ok(summary)
    }

    /// Parse a JSON node list and load it
    pub fn load_json(&mut self, json: &str) -> Result<LoadSummary> {
        let nodes: Vec<Node> = serde_json::from_str(json)?;
        self.load_data(nodes)
    }

    /// Serialize every node as a flat JSON list
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_nodes())?)
    }

    /// Owned copy of every node, for persistence
    pub fn export_nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }

    /// Look up a node by id
    pub fn get_item(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns true if a node with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes of the root list, in order
    pub fn get_root_items(&self) -> Vec<&Node> {
        self.resolve_ids(&self.root_items)
    }

    /// Ids of the root list, in order
    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_items
    }

    /// Children of a folder, in order
    pub fn get_children(&self, folder_id: &str) -> Result<Vec<&Node>> {
        let node = self.require(folder_id)?;
        match node {
            Node::Folder(folder) => Ok(self.resolve_ids(&folder.children)),
            Node::Item(_) => Err(TreeError::not_a_folder(folder_id)),
        }
    }

    /// Every node regardless of nesting depth, in index order
    pub fn get_all_items(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the store holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn require(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    fn resolve_ids(&self, ids: &[NodeId]) -> Vec<&Node> {
        ids.iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    #[cfg(test)]
    pub(crate) fn raw_parts_mut(&mut self) -> (&mut IndexMap<NodeId, Node>, &mut Vec<NodeId>) {
        (&mut self.nodes, &mut self.root_items)
    }
}

/// Walk each node's parent chain and decide where it ends up.
///
/// Under `AttachToRoot` a bad link is cut by clearing `parent_id` on the node
/// that carries it, under `Drop` the node and everything below it is marked
/// for removal, and under `Reject` the first bad link is returned as an error.
fn resolve_parents(
    index: &mut IndexMap<NodeId, Node>,
    policy: OrphanPolicy,
    summary: &mut LoadSummary,
) -> Result<HashMap<NodeId, Reach>> {
    let mut reach: HashMap<NodeId, Reach> = HashMap::with_capacity(index.len());
    let ids: Vec<NodeId> = index.keys().cloned().collect();

    for start in ids {
        if reach.contains_key(&start) {
            continue;
        }

        let mut path: Vec<NodeId> = Vec::new();
        let mut on_path: HashSet<NodeId> = HashSet::new();
        let mut current = start.clone();

        // Outcome of the walk: where it ended, and the node whose link is bad (if any)
        let (outcome, bad_link) = loop {
            if let Some(known) = reach.get(&current) {
                break (*known, None);
            }
            if !on_path.insert(current.clone()) {
                // Revisited: `current` is where the cycle closes
                break (Reach::Dropped, Some(current.clone()));
            }
            path.push(current.clone());

            let parent = index.get(&current).and_then(Node::parent_id).map(str::to_string);
            match parent {
                None => break (Reach::Root, None),
                Some(parent_id) => match index.get(&parent_id) {
                    Some(Node::Folder(_)) => current = parent_id,
                    _ => break (Reach::Dropped, Some(current.clone())),
                },
            }
        };

        let outcome = match bad_link {
            None => outcome,
            Some(bad_id) => {
                let parent_id = index
                    .get(&bad_id)
                    .and_then(Node::parent_id)
                    .unwrap_or_default()
                    .to_string();
                match policy {
                    OrphanPolicy::Reject => {
                        return Err(TreeError::Orphan {
                            id: bad_id,
                            parent: parent_id,
                        });
                    }
                    OrphanPolicy::AttachToRoot => {
                        log::warn!(
                            "TreeStore: parent '{}' not usable for '{}', attaching to root",
                            parent_id,
                            bad_id
                        );
                        if let Some(node) = index.get_mut(&bad_id) {
                            node.set_parent_id(None);
                        }
                        summary.orphans.push(bad_id);
                        Reach::Root
                    }
                    OrphanPolicy::Drop => {
                        log::warn!(
                            "TreeStore: parent '{}' not usable for '{}', dropping it",
                            parent_id,
                            bad_id
                        );
                        summary.orphans.push(bad_id);
                        Reach::Dropped
                    }
                }
            }
        };

        for id in path {
            reach.insert(id, outcome);
        }
    }

    Ok(reach)
}

/// Render the tree as an indented outline using box-drawing connectors.
///
/// Folders show their icon before the name. Walks iteratively and never
/// revisits a node, so malformed links cannot make it loop.
pub fn format_tree(store: &TreeStore) -> String {
    let mut result = String::new();
    let mut seen: HashSet<&str> = HashSet::new();

    // (id, prefix for this line, prefix for its children, connector)
    let mut stack: Vec<(&str, String, String, &str)> = Vec::new();
    for id in store.root_ids().iter().rev() {
        stack.push((id.as_str(), String::new(), String::new(), ""));
    }

    while let Some((id, prefix, child_prefix, connector)) = stack.pop() {
        let Some(node) = store.get_item(id) else {
            continue;
        };
        if !seen.insert(node.id()) {
            continue;
        }

        result.push_str(&prefix);
        result.push_str(connector);
        if let Node::Folder(folder) = node {
            result.push_str(&folder.icon);
            result.push(' ');
        }
        result.push_str(node.display_name());
        result.push('\n');

        let children = node.children();
        let count = children.len();
        for (i, child) in children.iter().enumerate().rev() {
            let is_last = i == count - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let next = if is_last { "    " } else { "│   " };
            stack.push((
                child.as_str(),
                child_prefix.clone(),
                format!("{}{}", child_prefix, next),
                connector,
            ));
        }
    }

    result
}
