use std::fmt;

use crate::mod_types::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
    Layer,
}

impl fmt::Display for Axis {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "col"),
            Axis::Layer => write!(f, "layer"),
        }
    }
}

/// Everything that can go wrong while feeding or querying a
/// [`StackedSparseScores`](super::StackedSparseScores).
///
/// All of these are raised before any shared array is touched, so a
/// matrix that returned an error is still in the state it was before
/// the call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoresError {
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    LengthMismatch {
        rows: usize,
        cols: usize,
        values: usize,
    },
    DuplicateLayer(String),
    UnknownLayer(String),
    NoLayers,
    IndexOutOfBounds {
        axis: Axis,
        index: isize,
        limit: usize,
    },
    DuplicateCoordinate {
        row: usize,
        col: usize,
    },
    InvalidRange {
        low: Float,
        high: Float,
    },
}

impl fmt::Display for ScoresError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ScoresError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch. Expected: {}x{}, Found: {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            ScoresError::LengthMismatch { rows, cols, values } => write!(
                f,
                "Coordinate and value lengths differ. rows: {}, cols: {}, values: {}",
                rows, cols, values
            ),
            ScoresError::DuplicateLayer(name) => {
                write!(f, "Score layer '{}' already exists", name)
            },
            ScoresError::UnknownLayer(name) => write!(f, "Unknown score layer '{}'", name),
            ScoresError::NoLayers => write!(f, "No score layers have been added yet"),
            ScoresError::IndexOutOfBounds { axis, index, limit } => write!(
                f,
                "{} index out of bounds. Requested: {}, Limit: {}",
                axis, index, limit
            ),
            ScoresError::DuplicateCoordinate { row, col } => {
                write!(f, "Coordinate ({}, {}) given more than once", row, col)
            },
            ScoresError::InvalidRange { low, high } => {
                write!(f, "Invalid range ({}, {}), bounds must be ordered and not NaN", low, high)
            },
        }
    }
}

impl std::error::Error for ScoresError {}
