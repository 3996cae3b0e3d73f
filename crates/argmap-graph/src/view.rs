//! Render projections.
//!
//! Views are re-derived from the store (or the panel working copy) on every
//! render and never written back. Holding one past the next mutation means
//! holding stale data.

use crate::panel::WorkingCopy;
use crate::store::GraphStore;
use argmap_core::{
    belief_percent, percent_label, signed_percent_label, ClaimId, ClaimNode, ClaimType, EdgeId,
    EdgeStyle, Palette, Position, RelationEdge,
};
use serde::Serialize;

/// Integer range control with its readout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderView {
    pub min: i64,
    pub max: i64,
    pub value: i64,
    pub label: String,
}

impl SliderView {
    /// 0..=100 percent slider for a belief in [0, 1].
    pub fn belief(belief: f64) -> Self {
        let value = belief_percent(belief);
        Self {
            min: 0,
            max: 100,
            value,
            label: percent_label(value),
        }
    }

    /// -100..=100 percent slider for a weight in [-1, 1].
    pub fn weight(weight: f64) -> Self {
        let value = (weight * 100.0).round() as i64;
        Self {
            min: -100,
            max: 100,
            value,
            label: signed_percent_label(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Options for the select menu embedded in a node.
pub fn inline_type_options() -> Vec<SelectOption> {
    ClaimType::ALL
        .iter()
        .map(|t| SelectOption {
            value: t.as_str(),
            label: t.inline_label(),
        })
        .collect()
}

/// Options for the claim type select in the side panel.
pub fn panel_type_options() -> Vec<SelectOption> {
    ClaimType::ALL
        .iter()
        .map(|t| SelectOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect()
}

/// What a claim node renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: ClaimId,
    pub position: Position,
    /// Style class, one per claim type.
    pub class: &'static str,
    pub text: String,
    pub claim_type: ClaimType,
    /// Absent when the claim has no belief assigned.
    pub belief: Option<SliderView>,
    pub author: String,
    pub author_placeholder: &'static str,
    /// Creation date, `YYYY-MM-DD`.
    pub created_on: String,
}

impl NodeView {
    pub fn of(node: &ClaimNode) -> Self {
        Self {
            id: node.id.clone(),
            position: node.position,
            class: node.claim_type.as_str(),
            text: node.text.clone(),
            claim_type: node.claim_type,
            belief: node.belief.map(SliderView::belief),
            author: node.author.clone(),
            author_placeholder: "Author",
            created_on: node.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// What a relation edge renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: ClaimId,
    pub target: ClaimId,
    pub weight: f64,
    pub style: EdgeStyle,
    /// Midpoint between the endpoints' positions, where the label is drawn.
    pub label_at: Position,
}

impl EdgeView {
    pub fn of(edge: &RelationEdge, store: &GraphStore, palette: &Palette) -> Self {
        let from = store.node(&edge.source).map(|n| n.position).unwrap_or_default();
        let to = store.node(&edge.target).map(|n| n.position).unwrap_or_default();
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            weight: edge.weight,
            style: palette.edge_style(edge.weight),
            label_at: from.midpoint(&to),
        }
    }
}

/// Everything the rendering collaborator needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl Scene {
    pub fn derive(store: &GraphStore, palette: &Palette) -> Self {
        Self {
            nodes: store.nodes().iter().map(NodeView::of).collect(),
            edges: store
                .edges()
                .iter()
                .map(|e| EdgeView::of(e, store, palette))
                .collect(),
        }
    }

    pub fn node(&self, id: &ClaimId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| &e.id == id)
    }
}

/// Side panel contents, derived from the working copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PanelView {
    Node {
        id: ClaimId,
        text: String,
        claim_type: ClaimType,
        type_options: Vec<SelectOption>,
        belief: Option<SliderView>,
        author: String,
        created_on: String,
    },
    Edge {
        id: EdgeId,
        source: ClaimId,
        target: ClaimId,
        weight: SliderView,
        style: EdgeStyle,
    },
}

impl PanelView {
    pub fn of(working: &WorkingCopy, palette: &Palette) -> Self {
        match working {
            WorkingCopy::Node(node) => Self::Node {
                id: node.id.clone(),
                text: node.text.clone(),
                claim_type: node.claim_type,
                type_options: panel_type_options(),
                belief: node.belief.map(SliderView::belief),
                author: node.author.clone(),
                created_on: node.created_at.format("%Y-%m-%d").to_string(),
            },
            WorkingCopy::Edge(edge) => Self::Edge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                weight: SliderView::weight(edge.weight),
                style: palette.edge_style(edge.weight),
            },
        }
    }
}
