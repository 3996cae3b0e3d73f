//! Core types for Argmap

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claim (node) identifier - cheaply cloneable
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(Arc<str>);

impl ClaimId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    /// Fresh, process-unique id for a newly created claim.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClaimId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ClaimId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Relation (edge) identifier.
///
/// Edges drawn through the canvas get an id derived from their endpoints, so
/// a second connection between the same ordered pair lands on the same id.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Arc<str>);

impl EdgeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    /// `e{source}-{target}`
    pub fn derive(source: &ClaimId, target: &ClaimId) -> Self {
        Self::new(format!("e{}-{}", source, target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Kind of claim a node asserts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Factual,
    Policy,
    Value,
}

impl ClaimType {
    pub const ALL: [ClaimType; 3] = [ClaimType::Factual, ClaimType::Policy, ClaimType::Value];

    /// Wire value, also used as the style class of the node.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Policy => "policy",
            Self::Value => "value",
        }
    }

    /// Label used by the side panel and the node-creation buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Factual => "Factual",
            Self::Policy => "Policy",
            Self::Value => "Value",
        }
    }

    /// Label used by the select menu embedded in a node.
    pub fn inline_label(&self) -> &'static str {
        match self {
            Self::Factual => "Factual",
            Self::Policy => "Policy",
            Self::Value => "Claim",
        }
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "factual" => Ok(Self::Factual),
            "policy" => Ok(Self::Policy),
            "value" => Ok(Self::Value),
            other => Err(crate::Error::invalid_value(
                "type",
                format!("unknown claim type: {}", other),
            )),
        }
    }
}

/// Canvas coordinate. Owned by the rendering collaborator; the core only
/// stores what it is told.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A claim in the argument map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNode {
    pub id: ClaimId,
    #[serde(default)]
    pub position: Position,
    pub text: String,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    /// `None` means no belief assigned; editors hide the belief slider.
    pub belief: Option<f64>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl ClaimNode {
    pub fn new(id: impl Into<ClaimId>, claim_type: ClaimType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            text: text.into(),
            claim_type,
            belief: None,
            author: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_belief(mut self, belief: Option<f64>) -> Self {
        self.belief = belief;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set a single field. `id` and `created_at` are not reachable from here.
    pub fn apply(&mut self, update: &NodeUpdate) {
        match update {
            NodeUpdate::Text(text) => self.text = text.clone(),
            NodeUpdate::Type(claim_type) => self.claim_type = *claim_type,
            NodeUpdate::Belief(belief) => self.belief = *belief,
            NodeUpdate::Author(author) => self.author = author.clone(),
        }
    }
}

/// A signed support/attack relation between two claims
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub id: EdgeId,
    pub source: ClaimId,
    pub target: ClaimId,
    /// -1.0 (attack) ..= +1.0 (support); 0.0 is neutral.
    #[serde(default)]
    pub weight: f64,
}

impl RelationEdge {
    /// New neutral edge under the derived id.
    pub fn connect(source: ClaimId, target: ClaimId) -> Self {
        Self {
            id: EdgeId::derive(&source, &target),
            source,
            target,
            weight: 0.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn touches(&self, node: &ClaimId) -> bool {
        &self.source == node || &self.target == node
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.weight)
    }

    pub fn apply(&mut self, update: &EdgeUpdate) {
        match update {
            EdgeUpdate::Weight(weight) => self.weight = *weight,
        }
    }
}

/// Semantic reading of an edge weight's sign
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Support,
    Attack,
    Neutral,
}

impl Polarity {
    pub fn of(weight: f64) -> Self {
        if weight > 0.0 {
            Self::Support
        } else if weight < 0.0 {
            Self::Attack
        } else {
            Self::Neutral
        }
    }
}

/// Which kind of entity a message or selection refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node,
    Edge,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// User-editable node fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeField {
    Text,
    Type,
    Belief,
    Author,
}

impl NodeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Type => "type",
            Self::Belief => "belief",
            Self::Author => "author",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "type" => Some(Self::Type),
            "belief" => Some(Self::Belief),
            "author" => Some(Self::Author),
            _ => None,
        }
    }
}

/// User-editable edge fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeField {
    Weight,
}

impl EdgeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "weight" => Some(Self::Weight),
            _ => None,
        }
    }
}

/// A new value for exactly one node field
#[derive(Clone, Debug, PartialEq)]
pub enum NodeUpdate {
    Text(String),
    Type(ClaimType),
    Belief(Option<f64>),
    Author(String),
}

impl NodeUpdate {
    pub fn field(&self) -> NodeField {
        match self {
            Self::Text(_) => NodeField::Text,
            Self::Type(_) => NodeField::Type,
            Self::Belief(_) => NodeField::Belief,
            Self::Author(_) => NodeField::Author,
        }
    }
}

/// A new value for exactly one edge field
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeUpdate {
    Weight(f64),
}

impl EdgeUpdate {
    pub fn field(&self) -> EdgeField {
        match self {
            Self::Weight(_) => EdgeField::Weight,
        }
    }
}
