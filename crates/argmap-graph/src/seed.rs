//! Built-in example map.

use crate::store::GraphStore;
use argmap_core::{ClaimNode, ClaimType, Position, RelationEdge, Result};

/// Two claims on climate policy joined by a strong support relation.
pub fn example_graph() -> Result<GraphStore> {
    let nodes = [
        ClaimNode::new("1", ClaimType::Factual, "Climate change is real")
            .with_belief(Some(0.9))
            .with_author("John Doe"),
        ClaimNode::new("2", ClaimType::Policy, "We should reduce carbon emissions")
            .with_position(Position::new(200.0, 100.0))
            .with_belief(Some(0.8))
            .with_author("Jane Smith"),
    ];
    let edges = [RelationEdge::connect("1".into(), "2".into()).with_weight(0.8)];
    GraphStore::seeded(nodes, edges)
}
