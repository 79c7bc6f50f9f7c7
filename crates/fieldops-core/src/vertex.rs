//! Draggable vertex handles.
//!
//! A [`Vertex`] mirrors one coordinate of a draft by index. Dragging it never
//! touches the draft: the drag ends with a [`VertexMove`] that the owning
//! controller applies, so two handles can never race on the shared sequence.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position of the mirrored coordinate in the owning sequence
    pub index: usize,
    pub position: Coordinate,
}

/// Position reported by a vertex at drag end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexMove {
    pub index: usize,
    pub position: Coordinate,
}

impl Vertex {
    pub fn new(index: usize, position: Coordinate) -> Self {
        Self { index, position }
    }

    /// Build handles for every coordinate of a sequence.
    pub fn for_sequence(coordinates: &[Coordinate]) -> Vec<Vertex> {
        coordinates
            .iter()
            .enumerate()
            .map(|(index, &position)| Vertex::new(index, position))
            .collect()
    }

    /// Finish a drag at an absolute position.
    pub fn drag_end(&self, position: Coordinate) -> VertexMove {
        VertexMove {
            index: self.index,
            position,
        }
    }
}
