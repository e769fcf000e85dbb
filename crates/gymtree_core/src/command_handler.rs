//! Command execution handler.
//!
//! This module contains the implementation of the `execute()` method for
//! `TreeStore`. It dispatches every command type and returns the matching
//! response.

use crate::command::{Command, Response};
use crate::dragdrop::{DragItem, can_drop};
use crate::error::Result;
use crate::tree::{Node, TreeStore, format_tree};

fn owned(nodes: Vec<&Node>) -> Vec<Node> {
    nodes.into_iter().cloned().collect()
}

impl TreeStore {
    /// Execute a command and return the response.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use gymtree_core::{Command, Response, TreeStore};
    ///
    /// let mut store = TreeStore::new();
    /// let response = store.execute(Command::CreateFolder {
    ///     name: "Forza".to_string(),
    ///     parent_id: None,
    ///     icon: Some("💪".to_string()),
    /// })?;
    /// ```
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        match command {
            // === Loading ===
            Command::LoadData { nodes } => Ok(Response::LoadSummary(self.load_data(nodes)?)),

            Command::ExportNodes => Ok(Response::Nodes(self.export_nodes())),

            // === Queries ===
            Command::GetItem { id } => Ok(Response::Node(self.require(&id)?.clone())),

            Command::GetRootItems => Ok(Response::Nodes(owned(self.get_root_items()))),

            Command::GetChildren { id } => Ok(Response::Nodes(owned(self.get_children(&id)?))),

            Command::GetAllItems => Ok(Response::Nodes(self.export_nodes())),

            Command::GetItemPath { id } => Ok(Response::Nodes(owned(self.get_item_path(&id)?))),

            Command::SearchItems { query } => Ok(Response::SearchResults(self.search_items(&query))),

            Command::GetFolderCounts { id } => {
                Ok(Response::FolderCounts(self.get_folder_counts(&id)?))
            }

            Command::GetStats => Ok(Response::Stats(self.get_stats())),

            Command::ValidateTree => Ok(Response::ValidationReport(self.validate_tree())),

            Command::FormatTree => Ok(Response::String(format_tree(self))),

            Command::CanDrop { id, zone } => {
                let dragged = DragItem::from(self.require(&id)?);
                Ok(Response::Bool(can_drop(self, &dragged, &zone)))
            }

            Command::UniqueChildName { parent_id, base } => Ok(Response::String(
                self.unique_child_name(parent_id.as_deref(), &base),
            )),

            // === Mutations ===
            Command::CreateFolder {
                name,
                parent_id,
                icon,
            } => {
                let folder = self.create_folder(&name, parent_id.as_deref(), icon.as_deref())?;
                Ok(Response::Node(Node::Folder(folder.clone())))
            }

            Command::CreateItem {
                title,
                parent_id,
                options,
            } => {
                let item = self.create_item(&title, parent_id.as_deref(), options)?;
                Ok(Response::Node(Node::Item(item.clone())))
            }

            Command::RenameItem { id, name } => {
                self.rename_item(&id, &name)?;
                Ok(Response::Ok)
            }

            Command::ChangeFolderIcon { id, icon } => {
                self.change_folder_icon(&id, &icon)?;
                Ok(Response::Ok)
            }

            Command::ChangeFolderColor { id, color } => {
                self.change_folder_color(&id, &color)?;
                Ok(Response::Ok)
            }

            Command::UpdateItem { id, options } => {
                self.update_item(&id, options)?;
                Ok(Response::Ok)
            }

            Command::AddVariant {
                item_id,
                label,
                description,
            } => {
                let variant = self.add_variant(&item_id, &label, &description)?;
                Ok(Response::Variant(variant.clone()))
            }

            Command::RemoveVariant {
                item_id,
                variant_id,
            } => {
                self.remove_variant(&item_id, &variant_id)?;
                Ok(Response::Ok)
            }

            Command::MoveItem { id, parent_id } => {
                self.move_item(&id, parent_id.as_deref())?;
                Ok(Response::Ok)
            }

            Command::DeleteItem { id } => Ok(Response::Ids(self.delete_item(&id)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dragdrop::DropZone;
    use crate::error::TreeError;
    use crate::test_utils::{folder, item};

    fn store() -> TreeStore {
        let mut store = TreeStore::new();
        store
            .execute(Command::LoadData {
                nodes: vec![
                    folder("forza", None),
                    folder("upper", Some("forza")),
                    item("push", Some("upper")),
                ],
            })
            .unwrap();
        store
    }

    #[test]
    fn test_create_then_query() {
        let mut store = store();
        let response = store
            .execute(Command::CreateItem {
                title: "Pull Day".to_string(),
                parent_id: Some("upper".to_string()),
                options: Default::default(),
            })
            .unwrap();
        let Response::Node(Node::Item(created)) = response else {
            panic!("Wrong response type");
        };

        match store
            .execute(Command::GetFolderCounts {
                id: "forza".to_string(),
            })
            .unwrap()
        {
            Response::FolderCounts(counts) => {
                assert_eq!(counts.subfolders, 1);
                assert_eq!(counts.items, 2);
            }
            _ => panic!("Wrong response type"),
        }

        match store
            .execute(Command::GetItemPath { id: created.id })
            .unwrap()
        {
            Response::Nodes(path) => assert_eq!(path.len(), 3),
            _ => panic!("Wrong response type"),
        }
    }

    #[test]
    fn test_errors_propagate() {
        let mut store = store();
        let err = store
            .execute(Command::MoveItem {
                id: "forza".to_string(),
                parent_id: Some("upper".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, TreeError::Forbidden(_)));

        let err = store
            .execute(Command::GetItem {
                id: "ghost".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.to_serializable().kind, "NotFound");
    }

    #[test]
    fn test_can_drop_and_delete() {
        let mut store = store();
        let response = store
            .execute(Command::CanDrop {
                id: "forza".to_string(),
                zone: DropZone::folder("upper"),
            })
            .unwrap();
        assert!(matches!(response, Response::Bool(false)));

        match store
            .execute(Command::DeleteItem {
                id: "forza".to_string(),
            })
            .unwrap()
        {
            Response::Ids(ids) => assert_eq!(ids, vec!["push", "upper", "forza"]),
            _ => panic!("Wrong response type"),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_validate_and_format() {
        let mut store = store();
        match store.execute(Command::ValidateTree).unwrap() {
            Response::ValidationReport(report) => assert!(report.is_valid()),
            _ => panic!("Wrong response type"),
        }
        match store.execute(Command::FormatTree).unwrap() {
            Response::String(text) => assert!(text.contains("└── push")),
            _ => panic!("Wrong response type"),
        }
    }
}
