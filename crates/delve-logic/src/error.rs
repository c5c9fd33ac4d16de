//! Errors raised by dungeon generation and grid queries.

/// Errors that can occur while generating or querying a dungeon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A generation parameter was non-positive, or `min_leaf > max_leaf`.
    InvalidDimension {
        field: &'static str,
        value: i32,
        reason: &'static str,
    },
    /// `uniform_int` was asked for an empty range.
    InvalidRange { low: i32, high: i32 },
    /// A leaf too small to hold a 3×3 room with a 1-tile margin.
    DegenerateLeaf { x: i32, y: i32, w: i32, h: i32 },
    /// A tile query outside the grid.
    IndexOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::InvalidDimension {
                field,
                value,
                reason,
            } => write!(f, "Invalid dimension: {} = {} {}", field, value, reason),
            GenError::InvalidRange { low, high } => {
                write!(f, "Invalid range: [{}, {}] is empty", low, high)
            }
            GenError::DegenerateLeaf { x, y, w, h } => write!(
                f,
                "Degenerate leaf at ({}, {}) size {}×{}: too small for a room",
                x, y, w, h
            ),
            GenError::IndexOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Tile ({}, {}) is outside the {}×{} grid",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for GenError {}
