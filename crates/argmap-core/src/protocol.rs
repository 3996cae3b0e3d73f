//! Update protocol between canvas-embedded editors and the graph store,
//! plus the notifications the rendering collaborator hands back.
//!
//! Wire format (field-update events):
//!
//!   { "event": "nodeUpdate", "detail": { "id": "2", "field": "belief", "value": 0.3 } }
//!   { "event": "edgeUpdate", "detail": { "id": "e1-2", "field": "weight", "value": -0.5 } }
//!
//! `nodeUpdate` fields: text, type, belief, author.
//! `edgeUpdate` fields: weight.
//!
//! Canvas notifications:
//!
//!   { "type": "node_moved", "id": "1", "position": { "x": 10, "y": 20 } }
//!   { "type": "node_click", "id": "1" }
//!   { "type": "edge_click", "id": "e1-2" }
//!   { "type": "connect", "source": "1", "target": "2" }
//!   { "type": "pane_click" }

use crate::error::{Error, Result};
use crate::types::{
    ClaimId, ClaimType, EdgeField, EdgeId, EdgeUpdate, EntityKind, NodeField, NodeUpdate,
    Position,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NODE_UPDATE_EVENT: &str = "nodeUpdate";
pub const EDGE_UPDATE_EVENT: &str = "edgeUpdate";

// ---------------------------------------------------------------------------
// Typed message: what the store consumes
// ---------------------------------------------------------------------------

/// A single field update addressed to one entity.
///
/// Consumed once by the store and discarded; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldUpdateMessage {
    Node { id: ClaimId, update: NodeUpdate },
    Edge { id: EdgeId, update: EdgeUpdate },
}

impl FieldUpdateMessage {
    pub fn node(id: impl Into<ClaimId>, update: NodeUpdate) -> Self {
        Self::Node {
            id: id.into(),
            update,
        }
    }

    pub fn edge(id: impl Into<EdgeId>, update: EdgeUpdate) -> Self {
        Self::Edge {
            id: id.into(),
            update,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Node { .. } => EntityKind::Node,
            Self::Edge { .. } => EntityKind::Edge,
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            Self::Node { id, .. } => id.as_str(),
            Self::Edge { id, .. } => id.as_str(),
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Node { update, .. } => update.field().as_str(),
            Self::Edge { update, .. } => update.field().as_str(),
        }
    }

    /// Encode for the wire.
    pub fn to_wire(&self) -> WireEvent {
        let (event, value) = match self {
            Self::Node { update, .. } => (NODE_UPDATE_EVENT, node_value(update)),
            Self::Edge { update, .. } => (EDGE_UPDATE_EVENT, edge_value(update)),
        };
        WireEvent {
            event: event.to_string(),
            detail: WireDetail {
                id: self.id_str().to_string(),
                field: self.field_name().to_string(),
                value: Some(value),
            },
        }
    }

    /// Decode a wire event.
    ///
    /// Unknown event names and unknown field names come back as errors so the
    /// listener can log and drop them.
    pub fn from_wire(wire: &WireEvent) -> Result<Self> {
        let detail = &wire.detail;
        match wire.event.as_str() {
            NODE_UPDATE_EVENT => {
                let field = NodeField::parse(&detail.field)
                    .ok_or_else(|| Error::unknown_field(EntityKind::Node, &detail.field))?;
                let update = decode_node_value(field, detail.present_value()?)?;
                Ok(Self::node(detail.id.as_str(), update))
            }
            EDGE_UPDATE_EVENT => {
                let field = EdgeField::parse(&detail.field)
                    .ok_or_else(|| Error::unknown_field(EntityKind::Edge, &detail.field))?;
                let update = decode_edge_value(field, detail.present_value()?)?;
                Ok(Self::edge(detail.id.as_str(), update))
            }
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

fn node_value(update: &NodeUpdate) -> Value {
    match update {
        NodeUpdate::Text(s) | NodeUpdate::Author(s) => Value::String(s.clone()),
        NodeUpdate::Type(t) => Value::String(t.as_str().to_string()),
        NodeUpdate::Belief(b) => b.map(Value::from).unwrap_or(Value::Null),
    }
}

fn edge_value(update: &EdgeUpdate) -> Value {
    match update {
        EdgeUpdate::Weight(w) => Value::from(*w),
    }
}

fn decode_node_value(field: NodeField, value: &Value) -> Result<NodeUpdate> {
    match field {
        NodeField::Text => Ok(NodeUpdate::Text(expect_string(field.as_str(), value)?)),
        NodeField::Author => Ok(NodeUpdate::Author(expect_string(field.as_str(), value)?)),
        NodeField::Type => {
            let raw = expect_string(field.as_str(), value)?;
            Ok(NodeUpdate::Type(raw.parse::<ClaimType>()?))
        }
        NodeField::Belief => match value {
            Value::Null => Ok(NodeUpdate::Belief(None)),
            other => Ok(NodeUpdate::Belief(Some(expect_number(field.as_str(), other)?))),
        },
    }
}

fn decode_edge_value(field: EdgeField, value: &Value) -> Result<EdgeUpdate> {
    match field {
        EdgeField::Weight => Ok(EdgeUpdate::Weight(expect_number(field.as_str(), value)?)),
    }
}

fn expect_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_value(field, format!("expected string, got {}", value)))
}

fn expect_number(field: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::invalid_value(field, format!("expected number, got {}", value)))
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// Named event as broadcast by canvas-embedded editors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEvent {
    pub event: String,
    pub detail: WireDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDetail {
    pub id: String,
    pub field: String,
    /// `None` when the key is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

impl WireDetail {
    fn present_value(&self) -> Result<&Value> {
        self.value
            .as_ref()
            .ok_or_else(|| Error::invalid_value(&self.field, "missing value"))
    }
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Rendering collaborator -> core
// ---------------------------------------------------------------------------

/// Notifications the rendering collaborator delivers to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// Drag finished; merged into node state without validation.
    NodeMoved { id: ClaimId, position: Position },
    NodeClick { id: ClaimId },
    EdgeClick { id: EdgeId },
    /// Drag from a source anchor to a target anchor completed.
    Connect { source: ClaimId, target: ClaimId },
    /// Click on empty canvas space.
    PaneClick,
}
