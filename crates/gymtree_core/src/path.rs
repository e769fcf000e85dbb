//! Ancestor-chain lookups (breadcrumbs).
//!
//! Every walk here follows `parent_id` links upward and stops on a repeated
//! node or after `max_path_depth` steps, so malformed data cannot make it loop.

use std::collections::HashSet;

use crate::error::Result;
use crate::tree::{Node, TreeStore};

impl TreeStore {
    /// The chain of nodes from the root down to `id` (inclusive).
    ///
    /// For a node three levels below root this returns four nodes, where each
    /// node's `parent_id` is the id of the one before it. The walk stops early
    /// when a parent lookup fails.
    pub fn get_item_path(&self, id: &str) -> Result<Vec<&Node>> {
        let mut current = self.require(id)?;
        let max_depth = self.config().max_path_depth.max(1);

        let mut path: Vec<&Node> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();

        loop {
            if !visited.insert(current.id()) {
                log::warn!(
                    "TreeStore: cycle at '{}' while resolving path of '{}'",
                    current.id(),
                    id
                );
                break;
            }
            path.push(current);
            if path.len() >= max_depth {
                log::warn!(
                    "TreeStore: path of '{}' exceeds {} nodes, truncating",
                    id,
                    max_depth
                );
                break;
            }

            let Some(parent_id) = current.parent_id() else {
                break;
            };
            match self.get_item(parent_id) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Returns true if `ancestor_id` appears above `id` in its parent chain
    pub fn is_descendant_of(&self, id: &str, ancestor_id: &str) -> bool {
        match self.get_item(id).and_then(Node::parent_id) {
            Some(parent_id) => self.chain_contains(parent_id, ancestor_id),
            None => false,
        }
    }

    /// Number of ancestors above `id` (0 for root nodes)
    pub fn depth_of(&self, id: &str) -> Result<usize> {
        Ok(self.get_item_path(id)?.len().saturating_sub(1))
    }

    /// Walk upward from `start` (inclusive) and report whether `needle` is on the way.
    pub(crate) fn chain_contains(&self, start: &str, needle: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if id == needle {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self.get_item(id).and_then(Node::parent_id);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TreeConfig;
    use crate::test_utils::{folder, item};
    use crate::tree::TreeStore;

    fn chain_store() -> TreeStore {
        let mut store = TreeStore::new();
        store
            .load_data(vec![
                folder("a", None),
                folder("b", Some("a")),
                folder("c", Some("b")),
                item("d", Some("c")),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_path_three_levels_down() {
        let store = chain_store();
        let path = store.get_item_path("d").unwrap();
        let ids: Vec<&str> = path.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        for pair in path.windows(2) {
            assert_eq!(pair[1].parent_id(), Some(pair[0].id()));
        }
    }

    #[test]
    fn test_path_of_root_is_itself() {
        let store = chain_store();
        let path = store.get_item_path("a").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(store.depth_of("a").unwrap(), 0);
        assert_eq!(store.depth_of("d").unwrap(), 3);
    }

    #[test]
    fn test_path_unknown_id() {
        let store = chain_store();
        assert!(store.get_item_path("zzz").is_err());
    }

    #[test]
    fn test_path_terminates_on_cycle() {
        let mut store = chain_store();
        // Corrupt the data: a's parent becomes c, closing a loop a -> c -> b -> a
        let (nodes, _) = store.raw_parts_mut();
        if let Some(node) = nodes.get_mut("a") {
            node.set_parent_id(Some("c".to_string()));
        }

        let path = store.get_item_path("d").unwrap();
        assert_eq!(path.len(), 4);
        assert!(!store.is_descendant_of("d", "zzz"));
    }

    #[test]
    fn test_path_respects_max_depth() {
        let mut store = TreeStore::with_config(TreeConfig::default().with_max_path_depth(2));
        store
            .load_data(vec![folder("a", None), folder("b", Some("a")), item("c", Some("b"))])
            .unwrap();
        let ids: Vec<&str> = store
            .get_item_path("c")
            .unwrap()
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_is_descendant_of() {
        let store = chain_store();
        assert!(store.is_descendant_of("d", "a"));
        assert!(store.is_descendant_of("c", "b"));
        assert!(!store.is_descendant_of("a", "d"));
        assert!(!store.is_descendant_of("a", "a"));
    }
}
