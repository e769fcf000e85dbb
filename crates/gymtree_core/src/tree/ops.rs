//! Mutating operations on a [`TreeStore`].
//!
//! Every operation checks all of its preconditions before touching the store,
//! so a failed call leaves the tree exactly as it was.

use std::collections::HashSet;

use super::{Folder, Item, ItemOptions, Node, NodeId, TreeStore, Variant};
use crate::dragdrop::DropRejection;
use crate::error::{Result, TreeError};

impl TreeStore {
    /// Create a folder under `parent_id` (root if `None`).
    ///
    /// Uses the configured default icon when `icon` is `None`.
    pub fn create_folder(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
        icon: Option<&str>,
    ) -> Result<&Folder> {
        self.ensure_folder_target(parent_id)?;
        self.ensure_unique_name(parent_id, name, None)?;

        let icon = icon.unwrap_or(self.config.default_folder_icon.as_str());
        let mut folder = Folder::new(name, parent_id.map(str::to_string), icon);
        folder.color = self.config.default_folder_color.clone();
        let id = folder.id.clone();

        log::debug!(
            "TreeStore: created folder '{}' ({}) under {:?}",
            name,
            id,
            parent_id
        );
        self.nodes.insert(id.clone(), Node::Folder(folder));
        self.attach(&id, parent_id);

        match self.nodes.get(&id) {
            Some(Node::Folder(folder)) => Ok(folder),
            _ => Err(TreeError::NotFound(id)),
        }
    }

    /// Create a workout item under `parent_id` (root if `None`).
    pub fn create_item(
        &mut self,
        title: &str,
        parent_id: Option<&str>,
        mut options: ItemOptions,
    ) -> Result<&Item> {
        self.ensure_folder_target(parent_id)?;
        self.ensure_unique_name(parent_id, title, None)?;

        if options.duration_minutes.is_none() {
            options.duration_minutes = Some(self.config.default_item_duration);
        }
        let item = Item::new(title, parent_id.map(str::to_string), options);
        let id = item.id.clone();

        log::debug!(
            "TreeStore: created item '{}' ({}) under {:?}",
            title,
            id,
            parent_id
        );
        self.nodes.insert(id.clone(), Node::Item(item));
        self.attach(&id, parent_id);

        match self.nodes.get(&id) {
            Some(Node::Item(item)) => Ok(item),
            _ => Err(TreeError::NotFound(id)),
        }
    }

    /// Set a folder's name or an item's title
    pub fn rename_item(&mut self, id: &str, new_name: &str) -> Result<()> {
        let parent_id = self.require(id)?.parent_id().map(str::to_string);
        self.ensure_unique_name(parent_id.as_deref(), new_name, Some(id))?;

        let node = self.node_mut(id)?;
        node.set_display_name(new_name.to_string());
        node.touch();
        log::debug!("TreeStore: renamed {} to '{}'", id, new_name);
        Ok(())
    }

    /// Change a folder's icon
    pub fn change_folder_icon(&mut self, id: &str, icon: &str) -> Result<()> {
        let folder = self.folder_mut(id)?;
        folder.icon = icon.to_string();
        folder.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Change a folder's color
    pub fn change_folder_color(&mut self, id: &str, color: &str) -> Result<()> {
        let folder = self.folder_mut(id)?;
        folder.color = color.to_string();
        folder.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Apply the set fields of `options` to an item
    pub fn update_item(&mut self, id: &str, options: ItemOptions) -> Result<()> {
        let item = self.item_mut(id)?;
        options.apply_to(item);
        item.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Add a variant to an item
    pub fn add_variant(&mut self, item_id: &str, label: &str, description: &str) -> Result<&Variant> {
        let item = self.item_mut(item_id)?;
        item.variants.push(Variant::new(label, description));
        item.updated_at = chrono::Utc::now();
        item.variants
            .last()
            .ok_or_else(|| TreeError::NotFound(item_id.to_string()))
    }

    /// Remove a variant from an item
    pub fn remove_variant(&mut self, item_id: &str, variant_id: &str) -> Result<()> {
        let item = self.item_mut(item_id)?;
        let before = item.variants.len();
        item.variants.retain(|v| v.id != variant_id);
        if item.variants.len() == before {
            return Err(TreeError::NotFound(variant_id.to_string()));
        }
        item.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Move a node under `new_parent_id` (root if `None`).
    ///
    /// The node is appended at the end of its new sibling list. Moving a folder
    /// into itself or one of its descendants is `Forbidden`.
    pub fn move_item(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<()> {
        let name = self.require(id)?.display_name().to_string();
        self.ensure_folder_target(new_parent_id)?;

        if let Some(target) = new_parent_id {
            if target == id {
                return Err(TreeError::Forbidden(DropRejection::SelfDrop));
            }
            if self.chain_contains(target, id) {
                return Err(TreeError::Forbidden(DropRejection::WouldCreateCycle));
            }
        }
        self.ensure_unique_name(new_parent_id, &name, Some(id))?;

        self.detach(id);
        let node = self.node_mut(id)?;
        node.set_parent_id(new_parent_id.map(str::to_string));
        node.touch();
        self.attach(id, new_parent_id);

        log::debug!("TreeStore: moved {} to {:?}", id, new_parent_id);
        Ok(())
    }

    /// Delete a node and everything below it.
    ///
    /// Returns the removed ids, descendants before their ancestors and `id` last.
    pub fn delete_item(&mut self, id: &str) -> Result<Vec<NodeId>> {
        let node = self.require(id)?;

        // Pre-order collection, reversed below so children precede parents
        let mut order: Vec<NodeId> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut stack: Vec<NodeId> = node.children().iter().rev().cloned().collect();
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(child) = self.nodes.get(&current) {
                stack.extend(child.children().iter().rev().cloned());
            }
            order.push(current);
        }
        order.reverse();

        for descendant in &order {
            self.nodes.shift_remove(descendant);
        }

        self.detach(id);
        self.nodes.shift_remove(id);
        order.push(id.to_string());

        log::debug!(
            "TreeStore: deleted {} ({} descendants)",
            id,
            order.len() - 1
        );
        Ok(order)
    }

    /// A name for a new child of `parent_id` that no sibling already uses.
    ///
    /// Returns `base` if free, otherwise `base (1)`, `base (2)`, ...
    pub fn unique_child_name(&self, parent_id: Option<&str>, base: &str) -> String {
        if !self.sibling_has_name(parent_id, base, None) {
            return base.to_string();
        }

        let mut counter = 1;
        loop {
            let candidate = format!("{} ({})", base, counter);
            if !self.sibling_has_name(parent_id, &candidate, None) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn ensure_folder_target(&self, parent_id: Option<&str>) -> Result<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        match self.nodes.get(parent_id) {
            Some(Node::Folder(_)) => Ok(()),
            Some(Node::Item(_)) => Err(TreeError::not_a_folder(parent_id)),
            None => Err(TreeError::InvalidTarget {
                target: parent_id.to_string(),
                reason: "does not exist".to_string(),
            }),
        }
    }

    fn ensure_unique_name(
        &self,
        parent_id: Option<&str>,
        name: &str,
        exclude: Option<&str>,
    ) -> Result<()> {
        if self.config.enforce_unique_names && self.sibling_has_name(parent_id, name, exclude) {
            return Err(TreeError::DuplicateName {
                parent: parent_id.map(str::to_string),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn sibling_has_name(&self, parent_id: Option<&str>, name: &str, exclude: Option<&str>) -> bool {
        let siblings: &[NodeId] = match parent_id {
            None => &self.root_items,
            Some(parent_id) => self
                .nodes
                .get(parent_id)
                .map(Node::children)
                .unwrap_or_default(),
        };
        let name = name.to_lowercase();
        siblings
            .iter()
            .filter(|id| Some(id.as_str()) != exclude)
            .filter_map(|id| self.nodes.get(id))
            .any(|n| n.display_name().to_lowercase() == name)
    }

    /// Append `id` to the root list or to the folder's children, touching the folder
    fn attach(&mut self, id: &str, parent_id: Option<&str>) {
        match parent_id {
            None => self.root_items.push(id.to_string()),
            Some(parent_id) => {
                if let Some(folder) = self.nodes.get_mut(parent_id).and_then(Node::as_folder_mut) {
                    folder.children.push(id.to_string());
                    folder.updated_at = chrono::Utc::now();
                }
            }
        }
    }

    /// Remove `id` from wherever its `parent_id` says it lives, touching the folder
    fn detach(&mut self, id: &str) {
        let parent_id = self
            .nodes
            .get(id)
            .and_then(Node::parent_id)
            .map(str::to_string);
        match parent_id {
            None => self.root_items.retain(|r| r != id),
            Some(parent_id) => {
                if let Some(folder) = self.nodes.get_mut(&parent_id).and_then(Node::as_folder_mut) {
                    let before = folder.children.len();
                    folder.children.retain(|c| c != id);
                    if folder.children.len() != before {
                        folder.updated_at = chrono::Utc::now();
                    }
                }
            }
        }
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    fn folder_mut(&mut self, id: &str) -> Result<&mut Folder> {
        self.node_mut(id)?
            .as_folder_mut()
            .ok_or_else(|| TreeError::not_a_folder(id))
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut Item> {
        self.node_mut(id)?
            .as_item_mut()
            .ok_or_else(|| TreeError::InvalidTarget {
                target: id.to_string(),
                reason: "not an item".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::test_utils::{self, fixed_time};
    use crate::tree::ItemStatus;

    fn ids(nodes: Vec<&Node>) -> Vec<String> {
        nodes.iter().map(|n| n.id().to_string()).collect()
    }

    #[test]
    fn test_create_folder_at_root_and_nested() {
        let mut store = TreeStore::new();
        let forza = store.create_folder("Forza", None, Some("💪")).unwrap().id.clone();
        let upper = store
            .create_folder("Upper", Some(forza.as_str()), None)
            .unwrap()
            .clone();

        assert_eq!(upper.parent_id.as_deref(), Some(forza.as_str()));
        assert_eq!(upper.icon, "📁");
        assert_eq!(ids(store.get_root_items()), vec![forza.clone()]);
        assert_eq!(store.get_item(&forza).unwrap().children(), [upper.id]);
    }

    #[test]
    fn test_create_under_missing_parent_creates_nothing() {
        let mut store = TreeStore::new();
        let err = store.create_folder("Lost", Some("nope"), None).unwrap_err();
        assert!(matches!(err, TreeError::InvalidTarget { .. }));
        assert!(store.is_empty());
        assert!(store.get_root_items().is_empty());
    }

    #[test]
    fn test_create_under_item_is_invalid() {
        let mut store = TreeStore::new();
        let item = store
            .create_item("Push Day", None, ItemOptions::default())
            .unwrap()
            .id
            .clone();
        let err = store
            .create_item("Nested", Some(item.as_str()), ItemOptions::default())
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidTarget { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_item_uses_config_duration() {
        let mut config = TreeConfig::default();
        config.default_item_duration = 45;
        let mut store = TreeStore::with_config(config);
        let item = store
            .create_item("HIIT", None, ItemOptions::default())
            .unwrap();
        assert_eq!(item.duration_minutes, 45);
    }

    #[test]
    fn test_rename_touches_updated_at() {
        let mut store = TreeStore::new();
        store
            .load_data(vec![test_utils::folder("old", None)])
            .unwrap();
        store.rename_item("old", "New").unwrap();

        let node = store.get_item("old").unwrap();
        assert_eq!(node.display_name(), "New");
        assert!(node.updated_at() > fixed_time());
        assert!(matches!(
            store.rename_item("missing", "x"),
            Err(TreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutations_touch_parents() {
        let mut store = TreeStore::new();
        store
            .load_data(vec![
                test_utils::folder("a", None),
                test_utils::folder("b", None),
                test_utils::folder("c", None),
                test_utils::folder("d", None),
                test_utils::item("x", Some("c")),
                test_utils::item("y", Some("d")),
            ])
            .unwrap();
        let stamped = fixed_time();
        let updated = |store: &TreeStore, id: &str| store.get_item(id).unwrap().updated_at();

        store
            .create_item("New", Some("a"), ItemOptions::default())
            .unwrap();
        assert!(updated(&store, "a") > stamped);
        assert_eq!(updated(&store, "b"), stamped);

        store.move_item("x", Some("b")).unwrap();
        assert!(updated(&store, "c") > stamped);
        assert!(updated(&store, "b") > stamped);
        assert!(updated(&store, "x") > stamped);

        store.delete_item("y").unwrap();
        assert!(updated(&store, "d") > stamped);
    }

    #[test]
    fn test_change_icon_only_on_folders() {
        let mut store = TreeStore::new();
        let folder = store.create_folder("F", None, None).unwrap().id.clone();
        let item = store
            .create_item("I", None, ItemOptions::default())
            .unwrap()
            .id
            .clone();

        store.change_folder_icon(&folder, "🔥").unwrap();
        store.change_folder_color(&folder, "#ff0000").unwrap();
        let f = store.get_item(&folder).unwrap().as_folder().unwrap();
        assert_eq!(f.icon, "🔥");
        assert_eq!(f.color, "#ff0000");

        assert!(matches!(
            store.change_folder_icon(&item, "🔥"),
            Err(TreeError::InvalidTarget { .. })
        ));
        assert!(matches!(
            store.change_folder_icon("missing", "🔥"),
            Err(TreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_item_and_variants() {
        let mut store = TreeStore::new();
        let id = store
            .create_item("Push Day", None, ItemOptions::default())
            .unwrap()
            .id
            .clone();

        store
            .update_item(
                &id,
                ItemOptions {
                    status: Some(ItemStatus::Active),
                    coach: Some("Marco".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let variant_id = store.add_variant(&id, "Heavy", "").unwrap().id.clone();
        let item = store.get_item(&id).unwrap().as_item().unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert_eq!(item.coach.as_deref(), Some("Marco"));
        assert_eq!(item.variant(&variant_id).unwrap().label, "Heavy");

        store.remove_variant(&id, &variant_id).unwrap();
        assert!(matches!(
            store.remove_variant(&id, &variant_id),
            Err(TreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_move_to_root_and_back() {
        let mut store = TreeStore::new();
        let folder = store.create_folder("F", None, None).unwrap().id.clone();
        let item = store
            .create_item("I", Some(folder.as_str()), ItemOptions::default())
            .unwrap()
            .id
            .clone();

        store.move_item(&item, None).unwrap();
        assert!(store.get_item(&item).unwrap().is_root());
        assert!(store.get_item(&folder).unwrap().children().is_empty());
        let occurrences = store.root_ids().iter().filter(|r| **r == item).count();
        assert_eq!(occurrences, 1);

        store.move_item(&item, Some(folder.as_str())).unwrap();
        assert_eq!(store.get_item(&folder).unwrap().children(), [item.clone()]);
        assert!(!store.root_ids().contains(&item));
    }

    #[test]
    fn test_failed_move_leaves_node_attached() {
        let mut store = TreeStore::new();
        let folder = store.create_folder("F", None, None).unwrap().id.clone();
        let item = store
            .create_item("I", Some(folder.as_str()), ItemOptions::default())
            .unwrap()
            .id
            .clone();

        let err = store.move_item(&item, Some("missing")).unwrap_err();
        assert!(matches!(err, TreeError::InvalidTarget { .. }));
        assert_eq!(store.get_item(&item).unwrap().parent_id(), Some(folder.as_str()));
        assert_eq!(store.get_item(&folder).unwrap().children(), [item]);
    }

    #[test]
    fn test_move_folder_into_descendant_is_forbidden() {
        let mut store = TreeStore::new();
        let a = store.create_folder("A", None, None).unwrap().id.clone();
        let b = store.create_folder("B", Some(a.as_str()), None).unwrap().id.clone();
        let c = store.create_folder("C", Some(b.as_str()), None).unwrap().id.clone();

        assert!(matches!(
            store.move_item(&a, Some(c.as_str())),
            Err(TreeError::Forbidden(DropRejection::WouldCreateCycle))
        ));
        assert!(matches!(
            store.move_item(&a, Some(a.as_str())),
            Err(TreeError::Forbidden(DropRejection::SelfDrop))
        ));
        assert!(store.validate_tree().is_valid());
    }

    #[test]
    fn test_delete_cascades() {
        let mut store = TreeStore::new();
        let a = store.create_folder("A", None, None).unwrap().id.clone();
        let b = store.create_folder("B", Some(a.as_str()), None).unwrap().id.clone();
        let i1 = store
            .create_item("I1", Some(b.as_str()), ItemOptions::default())
            .unwrap()
            .id
            .clone();
        let keep = store
            .create_item("Keep", None, ItemOptions::default())
            .unwrap()
            .id
            .clone();

        let removed = store.delete_item(&a).unwrap();
        assert_eq!(removed, vec![i1, b, a.clone()]);
        assert_eq!(ids(store.get_all_items()), vec![keep.clone()]);
        assert_eq!(store.root_ids(), [keep]);
        assert!(matches!(store.delete_item(&a), Err(TreeError::NotFound(_))));
    }

    #[test]
    fn test_delete_child_updates_parent() {
        let mut store = TreeStore::new();
        let a = store.create_folder("A", None, None).unwrap().id.clone();
        let i = store
            .create_item("I", Some(a.as_str()), ItemOptions::default())
            .unwrap()
            .id
            .clone();
        store.delete_item(&i).unwrap();
        assert!(store.get_item(&a).unwrap().children().is_empty());
    }

    #[test]
    fn test_unique_names_when_enforced() {
        let mut store = TreeStore::with_config(TreeConfig::default().with_unique_names(true));
        let a = store.create_folder("Legs", None, None).unwrap().id.clone();
        let err = store.create_folder("legs", None, None).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateName { .. }));

        // Renaming to its own name is fine
        store.rename_item(&a, "Legs").unwrap();
        assert_eq!(store.unique_child_name(None, "Legs"), "Legs (1)");
    }

    #[test]
    fn test_duplicate_names_allowed_by_default() {
        let mut store = TreeStore::new();
        store.create_folder("Legs", None, None).unwrap();
        store.create_folder("Legs", None, None).unwrap();
        assert_eq!(store.get_root_items().len(), 2);
        assert_eq!(store.unique_child_name(None, "Legs"), "Legs (1)");
        assert_eq!(store.unique_child_name(None, "Arms"), "Arms");
    }
}
