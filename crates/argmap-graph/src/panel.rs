//! Side-panel editor state.
//!
//! The panel renders from a working copy seeded from the store when the
//! selection changes, then kept in step one field at a time as updates land,
//! whichever path they came through. It is never re-seeded from a full
//! snapshot per keystroke, and it is never written back to the store.

use crate::editor::{clamp_belief_percent, clamp_weight_percent};
use crate::selection::SelectionState;
use crate::store::GraphStore;
use argmap_core::{
    ClaimId, ClaimNode, ClaimType, EdgeUpdate, FieldUpdateMessage, NodeUpdate, Position,
    RelationEdge,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub enum WorkingCopy {
    Node(ClaimNode),
    Edge(RelationEdge),
}

/// A user input in the side panel. Slider inputs carry the raw percent the
/// control produced; they are clamped before reaching the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PanelInput {
    Text(String),
    ClaimType(ClaimType),
    BeliefPercent(i64),
    Author(String),
    WeightPercent(i64),
}

impl PanelInput {
    /// The store update this input means for the entity in the working copy,
    /// if the panel shows a control for it. The belief slider is not shown
    /// for a claim without a belief, so its input is ignored there.
    pub fn to_message(&self, working: &WorkingCopy) -> Option<FieldUpdateMessage> {
        match (working, self) {
            (WorkingCopy::Node(node), Self::Text(text)) => Some(FieldUpdateMessage::node(
                node.id.clone(),
                NodeUpdate::Text(text.clone()),
            )),
            (WorkingCopy::Node(node), Self::ClaimType(t)) => {
                Some(FieldUpdateMessage::node(node.id.clone(), NodeUpdate::Type(*t)))
            }
            (WorkingCopy::Node(node), Self::BeliefPercent(p)) if node.belief.is_some() => {
                Some(FieldUpdateMessage::node(
                    node.id.clone(),
                    NodeUpdate::Belief(Some(clamp_belief_percent(*p))),
                ))
            }
            (WorkingCopy::Node(node), Self::Author(author)) => Some(FieldUpdateMessage::node(
                node.id.clone(),
                NodeUpdate::Author(author.clone()),
            )),
            (WorkingCopy::Edge(edge), Self::WeightPercent(p)) => Some(FieldUpdateMessage::edge(
                edge.id.clone(),
                EdgeUpdate::Weight(clamp_weight_percent(*p)),
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PanelEditor {
    working: Option<WorkingCopy>,
}

impl PanelEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working(&self) -> Option<&WorkingCopy> {
        self.working.as_ref()
    }

    /// Copy the selected entity out of the store. An empty or unresolvable
    /// selection leaves the panel empty.
    pub fn seed(&mut self, selection: &SelectionState, store: &GraphStore) {
        self.working = match selection {
            SelectionState::Empty => None,
            SelectionState::NodeSelected(id) => store.node(id).cloned().map(WorkingCopy::Node),
            SelectionState::EdgeSelected(id) => store.edge(id).cloned().map(WorkingCopy::Edge),
        };
    }

    pub fn clear(&mut self) {
        self.working = None;
    }

    /// Mirror an update that the store has already applied. Updates for other
    /// entities are ignored. Returns whether the working copy changed.
    pub fn sync(&mut self, message: &FieldUpdateMessage) -> bool {
        match (&mut self.working, message) {
            (Some(WorkingCopy::Node(node)), FieldUpdateMessage::Node { id, update })
                if &node.id == id =>
            {
                node.apply(update);
                true
            }
            (Some(WorkingCopy::Edge(edge)), FieldUpdateMessage::Edge { id, update })
                if &edge.id == id =>
            {
                edge.apply(update);
                true
            }
            _ => false,
        }
    }

    pub fn sync_position(&mut self, id: &ClaimId, position: Position) {
        if let Some(WorkingCopy::Node(node)) = &mut self.working {
            if &node.id == id {
                node.position = position;
            }
        }
    }

    /// Replace an edge copy after the edge was overwritten under the same id.
    pub fn sync_edge(&mut self, edge: &RelationEdge) {
        if let Some(WorkingCopy::Edge(working)) = &mut self.working {
            if working.id == edge.id {
                *working = edge.clone();
            }
        }
    }
}
