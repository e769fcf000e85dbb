//! Configuration types for Gymtree.
//!
//! This module provides the [`TreeConfig`] struct which controls how a
//! [`TreeStore`](crate::tree::TreeStore) treats malformed input and which
//! defaults it applies to new nodes. Configuration is persisted as TOML.
//!
//! # Key Configuration Fields
//!
//! - `orphan_policy`: What `load_data` does with nodes whose parent is missing
//! - `enforce_unique_names`: Reject duplicate sibling names on create/rename/move
//! - `max_path_depth`: Upper bound for breadcrumb resolution
//! - `default_folder_icon` / `default_folder_color` / `default_item_duration`
//!
//! # Example
//!
//! ```ignore
//! use gymtree_core::config::{OrphanPolicy, TreeConfig};
//!
//! let config = TreeConfig::from_toml_str("orphan_policy = \"drop\"")?;
//! assert_eq!(config.orphan_policy, OrphanPolicy::Drop);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::tree::{DEFAULT_FOLDER_COLOR, DEFAULT_FOLDER_ICON, DEFAULT_ITEM_DURATION};

/// Default bound on ancestor-chain length
pub const DEFAULT_MAX_PATH_DEPTH: usize = 256;

/// What to do with a node whose `parent_id` does not resolve to a folder on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Clear the node's parent and attach it to the root list
    #[default]
    AttachToRoot,
    /// Leave the node out of the store
    Drop,
    /// Fail the whole load
    Reject,
}

/// `TreeConfig` holds the parts of a tree store that the user can configure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Handling of orphans during `load_data`
    pub orphan_policy: OrphanPolicy,

    /// When true, create/rename/move fail if a sibling already has the same name.
    /// Comparison is case-insensitive.
    pub enforce_unique_names: bool,

    /// Maximum number of nodes a breadcrumb path may contain
    pub max_path_depth: usize,

    /// Icon given to folders created without one
    pub default_folder_icon: String,

    /// Color given to new folders
    pub default_folder_color: String,

    /// Duration (minutes) given to items created without one
    pub default_item_duration: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            orphan_policy: OrphanPolicy::default(),
            enforce_unique_names: false,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            default_folder_icon: DEFAULT_FOLDER_ICON.to_string(),
            default_folder_color: DEFAULT_FOLDER_COLOR.to_string(),
            default_item_duration: DEFAULT_ITEM_DURATION,
        }
    }
}

impl TreeConfig {
    /// Parse a config from TOML. Missing keys take their default value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TreeConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TreeError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builder: set the orphan policy
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Builder: enforce unique sibling names
    pub fn with_unique_names(mut self, enforce: bool) -> Self {
        self.enforce_unique_names = enforce;
        self
    }

    /// Builder: set the breadcrumb depth bound
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }
}
