//! Canonical graph state.
//!
//! The store owns the only authoritative copies of claims and relations. Every
//! other copy (panel working copy, rendered views) is a projection re-derived
//! from here. Mutations are pure set operations: values are not range-checked,
//! that is the editors' job.
//!
//! Structural invariant: every edge's `source` and `target` resolve to a live
//! node. `add_edge` refuses to create a dangling edge and `delete_node` removes
//! incident edges in the same call.

use crate::config::NodeDefaults;
use argmap_core::{
    ClaimId, ClaimNode, ClaimType, EdgeId, EdgeUpdate, Error, FieldUpdateMessage, NodeUpdate,
    Position, RelationEdge, Result,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Plain node and edge lists, as handed to or received from a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<ClaimNode>,
    #[serde(default)]
    pub edges: Vec<RelationEdge>,
}

/// Ordered claims and relations. Order is insertion order and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<ClaimNode>,
    edges: Vec<RelationEdge>,
}

/// What `delete_node` took out of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRemoval {
    pub node: ClaimNode,
    /// Incident edges removed by the cascade, in store order.
    pub edges: Vec<RelationEdge>,
}

impl NodeRemoval {
    pub fn removed_edge(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|e| &e.id == id)
    }
}

/// Result of inserting an edge under its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeInsert {
    Added(EdgeId),
    /// An edge with this id already existed and was overwritten in place.
    Replaced(EdgeId),
}

impl EdgeInsert {
    pub fn id(&self) -> &EdgeId {
        match self {
            Self::Added(id) | Self::Replaced(id) => id,
        }
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from externally supplied entities.
    ///
    /// Nodes may carry `belief: None`. Every edge must reference nodes in
    /// `nodes`; duplicate ids follow `insert_edge` (last one wins).
    pub fn seeded(
        nodes: impl IntoIterator<Item = ClaimNode>,
        edges: impl IntoIterator<Item = RelationEdge>,
    ) -> Result<Self> {
        let mut store = Self::new();
        for node in nodes {
            store.insert_node(node);
        }
        for edge in edges {
            store.insert_edge(edge)?;
        }
        Ok(store)
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        Self::seeded(snapshot.nodes, snapshot.edges)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn nodes(&self) -> &[ClaimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RelationEdge] {
        &self.edges
    }

    pub fn node(&self, id: &ClaimId) -> Option<&ClaimNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&RelationEdge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn contains_node(&self, id: &ClaimId) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    pub fn incident_edges<'a>(&'a self, id: &'a ClaimId) -> impl Iterator<Item = &'a RelationEdge> {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    fn node_mut(&mut self, id: &ClaimId) -> Option<&mut ClaimNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut RelationEdge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Create a claim with a fresh id and default fields, appended at the end.
    pub fn add_node(&mut self, claim_type: ClaimType, defaults: &NodeDefaults) -> &ClaimNode {
        let node = ClaimNode {
            id: ClaimId::generate(),
            position: defaults.spawn_position,
            text: defaults.text.clone(),
            claim_type,
            belief: Some(defaults.belief),
            author: defaults.author.clone(),
            created_at: Utc::now(),
        };
        info!(id = %node.id, claim_type = %claim_type, "claim created");
        self.nodes.push(node);
        &self.nodes[self.nodes.len() - 1]
    }

    /// Insert a fully formed node, replacing any node with the same id in place.
    pub fn insert_node(&mut self, node: ClaimNode) {
        match self.node_mut(&node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    pub fn update_node_field(&mut self, id: &ClaimId, update: &NodeUpdate) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.apply(update);
        debug!(%id, field = update.field().as_str(), "node field updated");
        Ok(())
    }

    /// Merge a position reported by the renderer. Not validated.
    pub fn move_node(&mut self, id: &ClaimId, position: Position) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.position = position;
        Ok(())
    }

    /// Remove a node together with every edge that touches it.
    ///
    /// Both removals happen inside this call, so no caller can observe the
    /// node gone while its edges remain. Returns `None` if `id` is absent.
    pub fn delete_node(&mut self, id: &ClaimId) -> Option<NodeRemoval> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        let node = self.nodes.remove(index);

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| e.touches(id));
        self.edges = kept;

        info!(%id, cascaded = removed.len(), "claim deleted");
        Some(NodeRemoval {
            node,
            edges: removed,
        })
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Connect `source` to `target` with a neutral edge under the derived id.
    ///
    /// Drawing the same ordered pair again overwrites the existing edge
    /// (weight back to 0) instead of adding a parallel one.
    pub fn add_edge(&mut self, source: &ClaimId, target: &ClaimId) -> Result<EdgeInsert> {
        self.insert_edge(RelationEdge::connect(source.clone(), target.clone()))
    }

    /// Insert a fully formed edge. Rejects edges whose endpoints are not live
    /// nodes; an existing edge with the same id is overwritten in place.
    pub fn insert_edge(&mut self, edge: RelationEdge) -> Result<EdgeInsert> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                warn!(edge = %edge.id, %endpoint, "edge rejected: endpoint does not exist");
                return Err(Error::dangling(edge.id.clone(), endpoint.clone()));
            }
        }

        let id = edge.id.clone();
        match self.edge_mut(&id) {
            Some(existing) => {
                *existing = edge;
                info!(%id, "relation replaced");
                Ok(EdgeInsert::Replaced(id))
            }
            None => {
                self.edges.push(edge);
                info!(%id, "relation added");
                Ok(EdgeInsert::Added(id))
            }
        }
    }

    pub fn update_edge_field(&mut self, id: &EdgeId, update: &EdgeUpdate) -> Result<()> {
        let edge = self
            .edge_mut(id)
            .ok_or_else(|| Error::EdgeNotFound(id.clone()))?;
        edge.apply(update);
        debug!(%id, field = update.field().as_str(), "edge field updated");
        Ok(())
    }

    /// Remove one edge. Edges have no dependents, so nothing cascades.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Option<RelationEdge> {
        let index = self.edges.iter().position(|e| &e.id == id)?;
        info!(%id, "relation deleted");
        Some(self.edges.remove(index))
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Apply a bus message as the matching field update.
    pub fn apply(&mut self, message: &FieldUpdateMessage) -> Result<()> {
        match message {
            FieldUpdateMessage::Node { id, update } => self.update_node_field(id, update),
            FieldUpdateMessage::Edge { id, update } => self.update_edge_field(id, update),
        }
    }

    /// True when no edge references a missing node.
    pub fn is_consistent(&self) -> bool {
        self.edges
            .iter()
            .all(|e| self.contains_node(&e.source) && self.contains_node(&e.target))
    }
}
