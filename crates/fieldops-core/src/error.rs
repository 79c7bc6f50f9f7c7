//! Error types shared by the editing core and its collaborators.

use thiserror::Error;

use crate::draft::EditPhase;
use crate::geometry::GeometryError;

/// Failure of a remote Store/Planner call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    /// The service answered with a non-success status
    #[error("service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Failure of a geometry editing operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// Operation invoked in the wrong controller state
    #[error("cannot {operation} while {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: EditPhase,
    },
    #[error("vertex index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("geometry is read-only: {reason}")]
    ReadOnly { reason: String },
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
    #[error("remote call failed: {0}")]
    RemoteCallFailed(#[from] StoreError),
}
