//! Draft/commit/cancel state machine for one editable geometry.
//!
//! The committed sequence is what every other component sees. While editing,
//! moves go to a private draft; `commit` hands a snapshot of the draft to a
//! [`CommitTarget`] and only swaps it in once the remote call succeeded.

use serde::Serialize;

use crate::error::{EditError, StoreError};
use crate::geometry::{self, GeometryKind};
use crate::models::Coordinate;
use crate::vertex::{Vertex, VertexMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditPhase {
    /// Draft equals committed, vertices are not interactive
    Viewing,
    /// Working copy is live, vertices are interactive
    Editing,
}

#[derive(Debug, Clone)]
enum State {
    Viewing,
    Editing {
        draft: Vec<Coordinate>,
        /// Revision of the last draft mutation
        revision: u64,
    },
}

/// Persistence collaborator invoked on commit.
#[allow(async_fn_in_trait)]
pub trait CommitTarget {
    type Output;

    async fn persist(&self, coordinates: &[Coordinate]) -> Result<Self::Output, StoreError>;
}

/// Snapshot of a draft handed to a persistence call.
///
/// Dropping it without calling [`GeometryDraftController::finish_commit`]
/// discards the outcome; nothing is rolled back.
#[derive(Debug)]
#[must_use = "a pending commit does nothing until finished"]
pub struct PendingCommit {
    ticket: u64,
    revision: u64,
    coordinates: Vec<Coordinate>,
}

impl PendingCommit {
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

/// Owns the committed and draft coordinates of a boundary or route.
#[derive(Debug, Clone)]
pub struct GeometryDraftController {
    kind: GeometryKind,
    committed: Vec<Coordinate>,
    state: State,
    read_only: Option<String>,
    revision: u64,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl GeometryDraftController {
    pub fn new(kind: GeometryKind, committed: Vec<Coordinate>) -> Self {
        Self {
            kind,
            committed,
            state: State::Viewing,
            read_only: None,
            revision: 0,
            next_ticket: 1,
            in_flight: None,
        }
    }

    /// Controller for a geometry that will be drawn from scratch.
    pub fn drawing(kind: GeometryKind) -> Self {
        let mut controller = Self::new(kind, Vec::new());
        controller.state = State::Editing {
            draft: Vec::new(),
            revision: 0,
        };
        controller
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn phase(&self) -> EditPhase {
        match self.state {
            State::Viewing => EditPhase::Viewing,
            State::Editing { .. } => EditPhase::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.phase() == EditPhase::Editing
    }

    /// The value visible outside the active editor.
    pub fn committed(&self) -> &[Coordinate] {
        &self.committed
    }

    pub fn draft(&self) -> Option<&[Coordinate]> {
        match &self.state {
            State::Editing { draft, .. } => Some(draft),
            State::Viewing => None,
        }
    }

    /// What the active editor should draw: the draft if editing, else committed.
    pub fn current(&self) -> &[Coordinate] {
        self.draft().unwrap_or(&self.committed)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.is_some()
    }

    pub fn read_only_reason(&self) -> Option<&str> {
        self.read_only.as_deref()
    }

    pub fn commit_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Interactive handles; empty unless editing.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.draft().map(Vertex::for_sequence).unwrap_or_default()
    }

    pub fn begin_edit(&mut self) -> Result<&[Coordinate], EditError> {
        self.ensure_writable()?;
        if self.is_editing() {
            return Err(self.invalid("begin editing"));
        }

        self.revision += 1;
        self.state = State::Editing {
            draft: self.committed.clone(),
            revision: self.revision,
        };
        tracing::debug!(kind = ?self.kind, points = self.committed.len(), "edit started");
        Ok(self.current())
    }

    pub fn move_vertex(
        &mut self,
        index: usize,
        position: Coordinate,
    ) -> Result<&[Coordinate], EditError> {
        self.ensure_writable()?;
        let next_revision = self.revision + 1;
        let State::Editing { draft, revision } = &mut self.state else {
            return Err(self.invalid("move a vertex"));
        };

        let len = draft.len();
        let slot = draft
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        *slot = position;
        *revision = next_revision;
        self.revision = next_revision;
        Ok(self.current())
    }

    /// Apply the outcome of a vertex drag.
    pub fn apply(&mut self, moved: VertexMove) -> Result<&[Coordinate], EditError> {
        self.move_vertex(moved.index, moved.position)
    }

    /// Add a point at the end of the draft.
    pub fn append_vertex(&mut self, position: Coordinate) -> Result<&[Coordinate], EditError> {
        self.ensure_writable()?;
        let next_revision = self.revision + 1;
        let State::Editing { draft, revision } = &mut self.state else {
            return Err(self.invalid("add a vertex"));
        };

        draft.push(position);
        *revision = next_revision;
        self.revision = next_revision;
        Ok(self.current())
    }

    /// Discard the draft and restore the committed value. No remote call.
    pub fn cancel(&mut self) -> Result<&[Coordinate], EditError> {
        if !self.is_editing() {
            return Err(self.invalid("cancel"));
        }
        self.state = State::Viewing;
        tracing::debug!(kind = ?self.kind, "edit cancelled");
        Ok(&self.committed)
    }

    /// Snapshot the draft for persistence.
    ///
    /// Moves made after this call belong to the next draft. Starting a new
    /// commit supersedes one still outstanding.
    pub fn begin_commit(&mut self) -> Result<PendingCommit, EditError> {
        self.ensure_writable()?;
        let State::Editing { draft, revision } = &self.state else {
            return Err(self.invalid("commit"));
        };
        geometry::validate(self.kind, draft)?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        if let Some(previous) = self.in_flight.replace(ticket) {
            tracing::debug!(kind = ?self.kind, previous, ticket, "superseding outstanding commit");
        }

        Ok(PendingCommit {
            ticket,
            revision: *revision,
            coordinates: draft.clone(),
        })
    }

    /// Apply the result of the persistence call started by `begin_commit`.
    pub fn finish_commit<T>(
        &mut self,
        pending: PendingCommit,
        result: Result<T, StoreError>,
    ) -> Result<T, EditError> {
        if self.in_flight != Some(pending.ticket) {
            tracing::debug!(kind = ?self.kind, ticket = pending.ticket, "discarding superseded commit result");
            return Err(self.invalid("finish a superseded commit"));
        }
        self.in_flight = None;

        match result {
            Ok(output) => {
                let points = pending.coordinates.len();
                let settled = matches!(
                    &self.state,
                    State::Editing { revision, .. } if *revision == pending.revision
                );
                self.committed = pending.coordinates;
                if settled {
                    self.state = State::Viewing;
                }
                tracing::info!(kind = ?self.kind, points, "geometry committed");
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(kind = ?self.kind, error = %err, "commit failed, draft kept");
                Err(EditError::RemoteCallFailed(err))
            }
        }
    }

    /// Persist the draft through `target`; on failure the draft is kept.
    pub async fn commit<T: CommitTarget>(&mut self, target: &T) -> Result<T::Output, EditError> {
        let pending = self.begin_commit()?;
        let result = target.persist(pending.coordinates()).await;
        self.finish_commit(pending, result)
    }

    /// Forbid editing; an open draft is discarded.
    pub fn lock(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.is_editing() {
            tracing::warn!(kind = ?self.kind, %reason, "discarding draft of locked geometry");
            self.state = State::Viewing;
        }
        self.read_only = Some(reason);
    }

    pub fn unlock(&mut self) {
        self.read_only = None;
    }

    /// Replace the committed value with a freshly loaded one.
    pub fn refresh(&mut self, committed: Vec<Coordinate>) {
        self.committed = committed;
    }

    fn ensure_writable(&self) -> Result<(), EditError> {
        match &self.read_only {
            Some(reason) => Err(EditError::ReadOnly {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn invalid(&self, operation: &'static str) -> EditError {
        tracing::warn!(kind = ?self.kind, operation, phase = ?self.phase(), "invalid edit transition");
        EditError::InvalidTransition {
            operation,
            phase: self.phase(),
        }
    }
}
