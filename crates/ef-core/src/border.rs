use serde::{Deserialize, Serialize};

use crate::line::Axis;

/// One side of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Processing order of both fixers.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Lines cut along this edge: rows for top/bottom, columns for left/right.
    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Row,
            Edge::Left | Edge::Right => Axis::Col,
        }
    }

    /// Index of the line `depth` lines in from this edge, out of `extent`
    /// lines along [`Edge::axis`].
    pub fn line_index(self, depth: usize, extent: usize) -> usize {
        debug_assert!(depth < extent);
        match self {
            Edge::Top | Edge::Left => depth,
            Edge::Bottom | Edge::Right => extent - 1 - depth,
        }
    }
}

/// Number of bad lines to reconstruct on each side of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Borders {
    pub const NONE: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        (self.left | self.top | self.right | self.bottom) == 0
    }

    pub fn get(&self, edge: Edge) -> usize {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Total bad lines across the width (`left + right`).
    pub fn horizontal(&self) -> usize {
        self.left.saturating_add(self.right)
    }

    /// Total bad lines across the height (`top + bottom`).
    pub fn vertical(&self) -> usize {
        self.top.saturating_add(self.bottom)
    }
}
