//! Tree consistency checking.
//!
//! [`TreeStore::validate_tree`] inspects the index and reports every structural
//! problem it finds. It is a diagnostic: nothing is repaired. Operations keep
//! the tree valid on their own, so a non-empty report means the data was
//! corrupted outside the store's API.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::tree::{Node, NodeId, TreeStore};

/// A structural problem in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeIssue {
    /// A node's `parent_id` points at nothing
    DanglingParent {
        /// The node carrying the link
        id: NodeId,
        /// The missing parent
        parent: NodeId,
    },
    /// A node's `parent_id` points at an item
    ParentNotFolder {
        /// The node carrying the link
        id: NodeId,
        /// The item used as a parent
        parent: NodeId,
    },
    /// A parent chain loops back on itself
    Cycle {
        /// The nodes on the loop, in traversal order
        path: Vec<NodeId>,
    },
    /// A folder lists a child that says it lives elsewhere, or a node is
    /// missing from its parent's child list
    ChildParentMismatch {
        /// The child node
        id: NodeId,
        /// Where the node is listed (`None` = root list)
        listed_under: Option<NodeId>,
        /// What the node's own `parent_id` says
        parent: Option<NodeId>,
    },
    /// A folder lists a child id that is not in the index
    MissingChild {
        /// The folder
        folder: NodeId,
        /// The unknown child id
        child: NodeId,
    },
    /// A root list entry has a `parent_id`
    RootHasParent {
        /// The node
        id: NodeId,
        /// Its parent
        parent: NodeId,
    },
    /// A node cannot be reached from the root list, or a root entry is not indexed
    Unreachable {
        /// The node
        id: NodeId,
    },
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeIssue::DanglingParent { id, parent } => {
                write!(f, "'{}' has missing parent '{}'", id, parent)
            }
            TreeIssue::ParentNotFolder { id, parent } => {
                write!(f, "'{}' has parent '{}' which is not a folder", id, parent)
            }
            TreeIssue::Cycle { path } => write!(f, "cycle: {}", path.join(" -> ")),
            TreeIssue::ChildParentMismatch {
                id,
                listed_under,
                parent,
            } => write!(
                f,
                "'{}' is listed under {} but its parent is {}",
                id,
                describe(listed_under.as_deref()),
                describe(parent.as_deref())
            ),
            TreeIssue::MissingChild { folder, child } => {
                write!(f, "'{}' lists unknown child '{}'", folder, child)
            }
            TreeIssue::RootHasParent { id, parent } => {
                write!(f, "root entry '{}' has parent '{}'", id, parent)
            }
            TreeIssue::Unreachable { id } => write!(f, "'{}' is unreachable from root", id),
        }
    }
}

fn describe(parent: Option<&str>) -> String {
    match parent {
        Some(id) => format!("'{}'", id),
        None => "root".to_string(),
    }
}

/// Result of validating a tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Problems found, in discovery order
    pub errors: Vec<TreeIssue>,
    /// Number of nodes checked
    pub nodes_checked: usize,
}

impl ValidationReport {
    /// Returns true if no problem was found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable message for each problem
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Convert a failing report into `TreeError::ValidationFailure`
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(TreeError::ValidationFailure(self.messages()))
        }
    }
}

impl TreeStore {
    /// Check every structural invariant of the tree and report violations.
    pub fn validate_tree(&self) -> ValidationReport {
        let mut report = ValidationReport {
            errors: Vec::new(),
            nodes_checked: self.len(),
        };

        self.check_parent_links(&mut report);
        self.check_child_lists(&mut report);
        let reached = self.check_cycles_from_roots(&mut report);

        for node in self.get_all_items() {
            if !reached.contains(node.id()) {
                report.errors.push(TreeIssue::Unreachable {
                    id: node.id().to_string(),
                });
            }
        }
        self.check_detached_cycles(&reached, &mut report);

        if !report.is_valid() {
            log::warn!(
                "TreeStore: validation found {} issue(s)",
                report.errors.len()
            );
        }
        report
    }

    /// Validate and fail with `ValidationFailure` if anything is wrong
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate_tree().into_result()
    }

    fn check_parent_links(&self, report: &mut ValidationReport) {
        for node in self.get_all_items() {
            let Some(parent) = node.parent_id() else {
                continue;
            };
            match self.get_item(parent) {
                None => report.errors.push(TreeIssue::DanglingParent {
                    id: node.id().to_string(),
                    parent: parent.to_string(),
                }),
                Some(Node::Item(_)) => report.errors.push(TreeIssue::ParentNotFolder {
                    id: node.id().to_string(),
                    parent: parent.to_string(),
                }),
                Some(Node::Folder(folder)) => {
                    if !folder.children.iter().any(|c| c == node.id()) {
                        report.errors.push(TreeIssue::ChildParentMismatch {
                            id: node.id().to_string(),
                            listed_under: None,
                            parent: Some(parent.to_string()),
                        });
                    }
                }
            }
        }
    }

    fn check_child_lists(&self, report: &mut ValidationReport) {
        for id in self.root_ids() {
            let Some(node) = self.get_item(id) else {
                report.errors.push(TreeIssue::Unreachable { id: id.clone() });
                continue;
            };
            if let Some(parent) = node.parent_id() {
                report.errors.push(TreeIssue::RootHasParent {
                    id: id.clone(),
                    parent: parent.to_string(),
                });
            }
        }

        for node in self.get_all_items() {
            let Node::Folder(folder) = node else {
                continue;
            };
            for child_id in &folder.children {
                match self.get_item(child_id) {
                    None => report.errors.push(TreeIssue::MissingChild {
                        folder: folder.id.clone(),
                        child: child_id.clone(),
                    }),
                    Some(child) if child.parent_id() != Some(folder.id.as_str()) => {
                        report.errors.push(TreeIssue::ChildParentMismatch {
                            id: child_id.clone(),
                            listed_under: Some(folder.id.clone()),
                            parent: child.parent_id().map(str::to_string),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
    }

    /// Depth-first walk over `children` from every root, tracking the current
    /// path only. A diamond (two branches listing the same node) is not a cycle.
    /// Returns every node reached.
    fn check_cycles_from_roots(&self, report: &mut ValidationReport) -> HashSet<&str> {
        let mut done: HashSet<&str> = HashSet::new();

        for root in self.root_ids() {
            let Some(root_node) = self.get_item(root) else {
                continue;
            };
            if done.contains(root_node.id()) {
                continue;
            }

            let mut path: Vec<(&Node, usize)> = vec![(root_node, 0)];
            let mut on_path: HashSet<&str> = HashSet::from([root_node.id()]);

            while let Some(top) = path.last_mut() {
                let node: &Node = top.0;
                let next = top.1;
                let children = node.children();
                if next >= children.len() {
                    path.pop();
                    on_path.remove(node.id());
                    done.insert(node.id());
                    continue;
                }
                top.1 += 1;
                let child_id = children[next].as_str();

                if on_path.contains(child_id) {
                    let start = path
                        .iter()
                        .position(|(n, _)| n.id() == child_id)
                        .unwrap_or(0);
                    let cycle = path[start..]
                        .iter()
                        .map(|(n, _)| n.id().to_string())
                        .collect();
                    report.errors.push(TreeIssue::Cycle { path: cycle });
                    continue;
                }
                if done.contains(child_id) {
                    continue;
                }
                if let Some(child) = self.get_item(child_id) {
                    on_path.insert(child.id());
                    path.push((child, 0));
                }
            }
        }

        done
    }

    /// Parent-chain loops that no root leads into
    fn check_detached_cycles(&self, reached: &HashSet<&str>, report: &mut ValidationReport) {
        let mut settled: HashSet<&str> = HashSet::new();

        for node in self.get_all_items() {
            if reached.contains(node.id()) || settled.contains(node.id()) {
                continue;
            }

            let mut chain: Vec<&str> = Vec::new();
            let mut current = Some(node.id());
            while let Some(id) = current {
                if settled.contains(id) || reached.contains(id) {
                    break;
                }
                if let Some(pos) = chain.iter().position(|c| *c == id) {
                    let cycle = chain[pos..].iter().rev().map(|c| c.to_string()).collect();
                    report.errors.push(TreeIssue::Cycle { path: cycle });
                    break;
                }
                chain.push(id);
                current = self.get_item(id).and_then(Node::parent_id);
            }
            settled.extend(chain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{folder, item};

    fn store() -> TreeStore {
        let mut store = TreeStore::new();
        store
            .load_data(vec![
                folder("a", None),
                folder("b", Some("a")),
                item("i", Some("b")),
                item("j", None),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_loaded_tree_is_valid() {
        let report = store().validate_tree();
        assert!(report.is_valid(), "{:?}", report.messages());
        assert_eq!(report.nodes_checked, 4);
        assert!(store().ensure_valid().is_ok());
    }

    #[test]
    fn test_dangling_parent() {
        let mut store = store();
        let (nodes, _) = store.raw_parts_mut();
        if let Some(node) = nodes.get_mut("i") {
            node.set_parent_id(Some("ghost".to_string()));
        }
        let report = store.validate_tree();
        assert!(report.errors.contains(&TreeIssue::DanglingParent {
            id: "i".to_string(),
            parent: "ghost".to_string()
        }));
        // b still lists i
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, TreeIssue::ChildParentMismatch { id, .. } if id == "i")));
    }

    #[test]
    fn test_parent_not_folder() {
        let mut store = store();
        let (nodes, _) = store.raw_parts_mut();
        if let Some(node) = nodes.get_mut("i") {
            node.set_parent_id(Some("j".to_string()));
        }
        let report = store.validate_tree();
        assert!(report.errors.contains(&TreeIssue::ParentNotFolder {
            id: "i".to_string(),
            parent: "j".to_string()
        }));
    }

    #[test]
    fn test_cycle_through_children() {
        let mut store = store();
        let (nodes, _) = store.raw_parts_mut();
        if let Some(folder) = nodes.get_mut("b").and_then(Node::as_folder_mut) {
            folder.children.push("a".to_string());
        }
        let report = store.validate_tree();
        assert!(report.errors.contains(&TreeIssue::Cycle {
            path: vec!["a".to_string(), "b".to_string()]
        }));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut store = TreeStore::new();
        store
            .load_data(vec![
                folder("a", None),
                folder("b", None),
                item("shared", Some("a")),
            ])
            .unwrap();
        let (nodes, _) = store.raw_parts_mut();
        if let Some(folder) = nodes.get_mut("b").and_then(Node::as_folder_mut) {
            folder.children.push("shared".to_string());
        }

        let report = store.validate_tree();
        assert!(!report
            .errors
            .iter()
            .any(|e| matches!(e, TreeIssue::Cycle { .. })));
        // The extra listing is still a mismatch
        assert_eq!(
            report.errors,
            vec![TreeIssue::ChildParentMismatch {
                id: "shared".to_string(),
                listed_under: Some("b".to_string()),
                parent: Some("a".to_string()),
            }]
        );
    }

    #[test]
    fn test_detached_parent_cycle() {
        let mut store = store();
        let (nodes, roots) = store.raw_parts_mut();
        roots.retain(|r| r != "a");
        if let Some(node) = nodes.get_mut("a") {
            node.set_parent_id(Some("b".to_string()));
        }
        if let Some(folder) = nodes.get_mut("b").and_then(Node::as_folder_mut) {
            folder.children.push("a".to_string());
        }

        let report = store.validate_tree();
        assert!(report
            .errors
            .contains(&TreeIssue::Unreachable { id: "a".to_string() }));
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, TreeIssue::Cycle { path } if path.len() == 2)));
        assert!(matches!(
            store.ensure_valid(),
            Err(TreeError::ValidationFailure(_))
        ));
    }

    #[test]
    fn test_root_with_parent() {
        let mut store = store();
        let (_, roots) = store.raw_parts_mut();
        roots.push("b".to_string());
        let report = store.validate_tree();
        assert!(report.errors.contains(&TreeIssue::RootHasParent {
            id: "b".to_string(),
            parent: "a".to_string()
        }));
    }

    #[test]
    fn test_messages_are_readable() {
        let issue = TreeIssue::ChildParentMismatch {
            id: "x".to_string(),
            listed_under: None,
            parent: Some("f".to_string()),
        };
        assert_eq!(issue.to_string(), "'x' is listed under root but its parent is 'f'");
    }
}
