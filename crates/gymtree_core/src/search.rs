//! Search over folder names, item titles and variant labels.
//!
//! Matching is a case-insensitive substring test. Results are grouped folders
//! first, then items, then variants, each group in index order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::tree::{Node, NodeId, TreeStore};

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum SearchMatch {
    /// A folder whose name matched
    Folder {
        /// Folder id
        id: NodeId,
        /// Folder name
        name: String,
    },
    /// An item whose title matched
    Item {
        /// Item id
        id: NodeId,
        /// Item title
        title: String,
    },
    /// A variant whose label matched, with its owning item
    #[serde(rename_all = "camelCase")]
    Variant {
        /// Owning item id
        item_id: NodeId,
        /// Owning item title
        item_title: String,
        /// Variant id
        variant_id: String,
        /// Variant label
        label: String,
    },
}

impl SearchMatch {
    /// Id of the node to reveal for this hit (the owning item for variants)
    pub fn node_id(&self) -> &str {
        match self {
            SearchMatch::Folder { id, .. } | SearchMatch::Item { id, .. } => id,
            SearchMatch::Variant { item_id, .. } => item_id,
        }
    }

    /// Text that matched
    pub fn label(&self) -> &str {
        match self {
            SearchMatch::Folder { name, .. } => name,
            SearchMatch::Item { title, .. } => title,
            SearchMatch::Variant { label, .. } => label,
        }
    }
}

/// Aggregated search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SearchResults {
    /// Hits, grouped folders then items then variants
    pub matches: Vec<SearchMatch>,
    /// Number of nodes looked at
    pub nodes_searched: usize,
}

impl SearchResults {
    /// Returns true if nothing matched
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of hits
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Hits for folders and items only, without variants
    pub fn nodes(&self) -> impl Iterator<Item = &SearchMatch> {
        self.matches
            .iter()
            .filter(|m| !matches!(m, SearchMatch::Variant { .. }))
    }
}

impl TreeStore {
    /// Find every folder, item and variant whose text contains `query`.
    ///
    /// The query is used as-is, so an empty query matches everything.
    pub fn search_items(&self, query: &str) -> SearchResults {
        let needle = query.to_lowercase();
        let nodes = self.get_all_items();
        let mut results = SearchResults {
            matches: Vec::new(),
            nodes_searched: nodes.len(),
        };

        let contains = |text: &str| text.to_lowercase().contains(&needle);

        let mut folders = Vec::new();
        let mut items = Vec::new();
        let mut variants = Vec::new();

        for node in nodes {
            match node {
                Node::Folder(folder) => {
                    if contains(&folder.name) {
                        folders.push(SearchMatch::Folder {
                            id: folder.id.clone(),
                            name: folder.name.clone(),
                        });
                    }
                }
                Node::Item(item) => {
                    if contains(&item.title) {
                        items.push(SearchMatch::Item {
                            id: item.id.clone(),
                            title: item.title.clone(),
                        });
                    }
                    for variant in item.variants.iter().filter(|v| contains(&v.label)) {
                        variants.push(SearchMatch::Variant {
                            item_id: item.id.clone(),
                            item_title: item.title.clone(),
                            variant_id: variant.id.clone(),
                            label: variant.label.clone(),
                        });
                    }
                }
            }
        }

        results.matches.extend(folders);
        results.matches.extend(items);
        results.matches.extend(variants);
        log::debug!(
            "TreeStore: search '{}' found {} matches in {} nodes",
            query,
            results.matches.len(),
            results.nodes_searched
        );
        results
    }
}
