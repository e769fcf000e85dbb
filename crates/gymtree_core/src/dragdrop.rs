//! Drag-and-drop validation.
//!
//! [`check_drop`] is a pure predicate over a `&TreeStore`. UIs call it on every
//! pointer move of a drag gesture, so it never mutates and never allocates more
//! than a visited set. [`DragSession`] wraps it with the gesture state
//! (dragging / hovering / dropped) and is the only place a drop turns into a
//! [`TreeStore::move_item`] call.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Result, TreeError};
use crate::tree::{Node, NodeId, NodeKind, TreeStore};

/// Why a proposed drop was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum DropRejection {
    /// The node was dropped on itself
    SelfDrop,
    /// The node already lives in the target zone
    AlreadyThere,
    /// The target zone does not accept this kind of node
    KindNotAccepted,
    /// The target is the dragged folder's descendant
    WouldCreateCycle,
}

impl std::fmt::Display for DropRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropRejection::SelfDrop => write!(f, "cannot drop a node onto itself"),
            DropRejection::AlreadyThere => write!(f, "node is already in the target"),
            DropRejection::KindNotAccepted => write!(f, "target does not accept this kind"),
            DropRejection::WouldCreateCycle => {
                write!(f, "cannot move a folder into its own descendant")
            }
        }
    }
}

/// The node being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DragItem {
    /// Id of the dragged node
    pub id: NodeId,
    /// Kind of the dragged node
    pub kind: NodeKind,
    /// Parent at the time the drag started (`None` = root)
    pub parent_id: Option<NodeId>,
}

impl From<&Node> for DragItem {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            kind: node.kind(),
            parent_id: node.parent_id().map(str::to_string),
        }
    }
}

/// A place a node can be dropped: a folder, or the root (`id == None`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DropZone {
    /// Target folder id, `None` for the root zone
    pub id: Option<NodeId>,
    /// Node kinds this zone accepts
    pub accepts: Vec<NodeKind>,
}

impl DropZone {
    /// The root zone, accepting folders and items
    pub fn root() -> Self {
        Self {
            id: None,
            accepts: vec![NodeKind::Folder, NodeKind::Item],
        }
    }

    /// A folder zone, accepting folders and items
    pub fn folder(id: impl Into<NodeId>) -> Self {
        Self {
            id: Some(id.into()),
            accepts: vec![NodeKind::Folder, NodeKind::Item],
        }
    }

    /// Restrict the kinds this zone accepts
    pub fn accepting(mut self, kinds: &[NodeKind]) -> Self {
        self.accepts = kinds.to_vec();
        self
    }
}

/// Decide whether `dragged` may be dropped on `zone`.
///
/// Rules apply in order: self-drop, already there, kind not accepted, and for
/// folders, target inside the dragged subtree. The ancestor walk ends at the
/// root, on a failed lookup, or on a node it has already seen.
///
/// The zone itself is not looked up. Callers build zones only for folders and
/// the root; a zone naming an item or an unknown id can pass here and is then
/// refused by [`TreeStore::move_item`] with `InvalidTarget`.
pub fn check_drop(
    store: &TreeStore,
    dragged: &DragItem,
    zone: &DropZone,
) -> std::result::Result<(), DropRejection> {
    let target = zone.id.as_deref();

    if target == Some(dragged.id.as_str()) {
        return Err(DropRejection::SelfDrop);
    }
    if target == dragged.parent_id.as_deref() {
        return Err(DropRejection::AlreadyThere);
    }
    if !zone.accepts.contains(&dragged.kind) {
        return Err(DropRejection::KindNotAccepted);
    }

    if dragged.kind == NodeKind::Folder {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = target;
        while let Some(id) = current {
            if id == dragged.id {
                return Err(DropRejection::WouldCreateCycle);
            }
            if !visited.insert(id) {
                break;
            }
            current = store.get_item(id).and_then(Node::parent_id);
        }
    }

    Ok(())
}

/// Boolean form of [`check_drop`]
pub fn can_drop(store: &TreeStore, dragged: &DragItem, zone: &DropZone) -> bool {
    check_drop(store, dragged, zone).is_ok()
}

/// Observable state of a drag gesture
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DragState {
    /// The node being dragged, `None` when idle
    pub dragging: Option<DragItem>,
    /// The zone under the pointer
    pub hovered_zone: Option<DropZone>,
    /// Whether dropping on `hovered_zone` would be accepted
    pub can_drop: bool,
}

impl DragState {
    /// Returns true while a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }
}

/// One drag gesture: start, hover over zones, then drop or cancel.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    /// An idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Begin dragging `node`. Replaces any gesture already in progress.
    pub fn start(&mut self, node: &Node) {
        log::debug!("DragSession: start dragging {}", node.id());
        self.state = DragState {
            dragging: Some(DragItem::from(node)),
            hovered_zone: None,
            can_drop: false,
        };
    }

    /// Record that the pointer is over `zone` and return whether a drop there is allowed
    pub fn hover(&mut self, store: &TreeStore, zone: DropZone) -> bool {
        let allowed = match &self.state.dragging {
            Some(dragged) => can_drop(store, dragged, &zone),
            None => false,
        };
        self.state.hovered_zone = Some(zone);
        self.state.can_drop = allowed;
        allowed
    }

    /// The pointer left the hovered zone
    pub fn leave(&mut self) {
        self.state.hovered_zone = None;
        self.state.can_drop = false;
    }

    /// Finish the gesture on `zone`.
    ///
    /// The predicate is evaluated again against the current store. A rejected
    /// drop returns `Forbidden` and leaves the store untouched. Either way the
    /// session is idle afterwards.
    pub fn drop(&mut self, store: &mut TreeStore, zone: &DropZone) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let Some(dragged) = state.dragging else {
            return Err(TreeError::InvalidTarget {
                target: zone.id.clone().unwrap_or_default(),
                reason: "no drag in progress".to_string(),
            });
        };

        if let Err(rejection) = check_drop(store, &dragged, zone) {
            log::debug!("DragSession: drop of {} rejected: {}", dragged.id, rejection);
            return Err(TreeError::Forbidden(rejection));
        }
        store.move_item(&dragged.id, zone.id.as_deref())
    }

    /// Abort the gesture. Nothing to undo.
    pub fn cancel(&mut self) {
        self.state = DragState::default();
    }
}
