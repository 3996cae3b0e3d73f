//! Which entity the side panel is editing.
//!
//! Node and edge selection are variants of one enum, so both can never be set
//! at once. Deletions report what they removed and the controller clears a
//! selection that pointed at any of it before the next render.

use crate::store::{GraphStore, NodeRemoval};
use argmap_core::{ClaimId, EdgeId, EntityKind};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Empty,
    NodeSelected(ClaimId),
    EdgeSelected(EdgeId),
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Empty => None,
            Self::NodeSelected(_) => Some(EntityKind::Node),
            Self::EdgeSelected(_) => Some(EntityKind::Edge),
        }
    }

    pub fn node(&self) -> Option<&ClaimId> {
        match self {
            Self::NodeSelected(id) => Some(id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&EdgeId> {
        match self {
            Self::EdgeSelected(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the selected id still exists in `store`. `Empty` always resolves.
    pub fn resolves_in(&self, store: &GraphStore) -> bool {
        match self {
            Self::Empty => true,
            Self::NodeSelected(id) => store.contains_node(id),
            Self::EdgeSelected(id) => store.contains_edge(id),
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Select a node, dropping any edge selection.
    pub fn select_node(&mut self, id: ClaimId) {
        debug!(%id, "node selected");
        self.state = SelectionState::NodeSelected(id);
    }

    /// Select an edge, dropping any node selection.
    pub fn select_edge(&mut self, id: EdgeId) {
        debug!(%id, "edge selected");
        self.state = SelectionState::EdgeSelected(id);
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::Empty;
    }

    /// Clear if the selection was the deleted node or one of its cascaded
    /// edges. Returns whether the selection changed.
    pub fn on_node_removed(&mut self, removal: &NodeRemoval) -> bool {
        let hit = match &self.state {
            SelectionState::Empty => false,
            SelectionState::NodeSelected(id) => id == &removal.node.id,
            SelectionState::EdgeSelected(id) => removal.removed_edge(id),
        };
        if hit {
            debug!("selection cleared by node deletion");
            self.clear();
        }
        hit
    }

    /// Clear if the selection was the deleted edge.
    pub fn on_edge_removed(&mut self, id: &EdgeId) -> bool {
        let hit = self.state.edge() == Some(id);
        if hit {
            debug!(%id, "selection cleared by edge deletion");
            self.clear();
        }
        hit
    }
}
