//! Drag-connect admission.
//!
//! The renderer only lets a drag finish on a real anchor, but tests and
//! harnesses can call this directly, so endpoints are checked again by the
//! store. Self-loops are governed by [`SelfLoopPolicy`].

use crate::store::{EdgeInsert, GraphStore};
use argmap_core::{ClaimId, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfLoopPolicy {
    /// A claim cannot support or attack itself.
    #[default]
    Reject,
    Allow,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectionAdmission {
    self_loops: SelfLoopPolicy,
}

impl ConnectionAdmission {
    pub fn new(self_loops: SelfLoopPolicy) -> Self {
        Self { self_loops }
    }

    /// Validate a completed drag and materialize the edge.
    pub fn admit(
        &self,
        store: &mut GraphStore,
        source: &ClaimId,
        target: &ClaimId,
    ) -> Result<EdgeInsert> {
        if source == target && self.self_loops == SelfLoopPolicy::Reject {
            warn!(node = %source, "connection rejected: self-loop");
            return Err(Error::SelfLoop(source.clone()));
        }
        store.add_edge(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmap_core::{ClaimNode, ClaimType};

    fn store() -> GraphStore {
        GraphStore::seeded(
            [
                ClaimNode::new("1", ClaimType::Factual, "A"),
                ClaimNode::new("2", ClaimType::Policy, "B"),
            ],
            [],
        )
        .unwrap()
    }

    #[test]
    fn rejects_self_loop_by_default() {
        let mut store = store();
        let err = ConnectionAdmission::default()
            .admit(&mut store, &"1".into(), &"1".into())
            .unwrap_err();
        assert!(matches!(err, Error::SelfLoop(_)));
        assert!(store.edges().is_empty());
    }

    #[test]
    fn allows_self_loop_when_configured() {
        let mut store = store();
        let insert = ConnectionAdmission::new(SelfLoopPolicy::Allow)
            .admit(&mut store, &"1".into(), &"1".into())
            .unwrap();
        assert_eq!(insert.id().as_str(), "e1-1");
    }

    #[test]
    fn missing_endpoint_is_refused() {
        let mut store = store();
        let err = ConnectionAdmission::default()
            .admit(&mut store, &"1".into(), &"ghost".into())
            .unwrap_err();
        assert!(matches!(err, Error::DanglingEndpoint { .. }));
    }
}
