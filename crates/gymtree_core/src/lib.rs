#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Configuration options
pub mod config;

/// Error (common error types)
pub mod error;

/// Tree (node types, the store, and its mutations)
pub mod tree;

/// Breadcrumb path resolution
pub mod path;

/// Drag-and-drop validation and gesture state
pub mod dragdrop;

/// Descendant counts and tree statistics
pub mod aggregate;

/// Search (names, titles and variant labels)
pub mod search;

/// Validate (check tree consistency)
pub mod validate;

/// Folder navigation state
pub mod navigation;

/// Command pattern API
pub mod command;

mod command_handler;

/// Demo data and folder icons
pub mod sample;

#[cfg(test)]
pub mod test_utils;

pub use command::{Command, Response};
pub use config::{OrphanPolicy, TreeConfig};
pub use error::{Result, SerializableError, TreeError};
pub use tree::{Folder, Item, ItemOptions, Node, NodeId, NodeKind, TreeStore, Variant};
