//! Error types for Argmap

use crate::types::{ClaimId, EdgeId, EntityKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("node not found: {0}")]
    NodeNotFound(ClaimId),

    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("edge {edge} references missing node {endpoint}")]
    DanglingEndpoint { edge: EdgeId, endpoint: ClaimId },

    #[error("self-loop rejected on node {0}")]
    SelfLoop(ClaimId),

    #[error("unknown {kind} field: {field}")]
    UnknownField { kind: EntityKind, field: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn dangling(edge: EdgeId, endpoint: ClaimId) -> Self {
        Self::DanglingEndpoint { edge, endpoint }
    }

    pub fn unknown_field(kind: EntityKind, field: impl Into<String>) -> Self {
        Self::UnknownField {
            kind,
            field: field.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Reference errors are the UI racing a just-completed deletion; callers
    /// treat them as no-ops.
    pub fn is_reference_error(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::EdgeNotFound(_))
    }
}
