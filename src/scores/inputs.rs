use num_traits::AsPrimitive;

use super::errors::{
    Axis,
    ScoresError,
};
use crate::mod_types::Float;
use crate::sorting::{
    ArgSortExt,
    PermuteExt,
};

/// Row-major dense grid of scores, as produced by an all-vs-all
/// similarity computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseScores {
    n_row: usize,
    n_col: usize,
    values: Vec<Float>,
}

impl DenseScores {
    pub fn new(
        n_row: usize,
        n_col: usize,
        values: Vec<Float>,
    ) -> Result<Self, ScoresError> {
        if n_row * n_col != values.len() {
            // Report the shape the values would have with `n_col` columns.
            let found_rows = if n_col == 0 { 0 } else { values.len() / n_col };
            return Err(ScoresError::ShapeMismatch {
                expected: (n_row, n_col),
                found: (found_rows, n_col),
            });
        }
        Ok(DenseScores {
            n_row,
            n_col,
            values,
        })
    }

    pub fn zeros(
        n_row: usize,
        n_col: usize,
    ) -> Self {
        DenseScores {
            n_row,
            n_col,
            values: vec![0.; n_row * n_col],
        }
    }

    pub fn from_fn<F>(
        n_row: usize,
        n_col: usize,
        mut func: F,
    ) -> Self
    where
        F: FnMut(usize, usize) -> Float,
    {
        let values = (0..n_row)
            .flat_map(|i| (0..n_col).map(move |j| (i, j)))
            .map(|(i, j)| func(i, j))
            .collect();
        DenseScores {
            n_row,
            n_col,
            values,
        }
    }

    /// Builds a grid from nested rows of any primitive numeric type.
    ///
    /// All rows need the same length, a ragged input is reported as a
    /// shape mismatch against the first row.
    pub fn from_rows<T>(rows: &[Vec<T>]) -> Result<Self, ScoresError>
    where
        T: AsPrimitive<Float>,
    {
        let n_row = rows.len();
        let n_col = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut values = Vec::with_capacity(n_row * n_col);
        for row in rows.iter() {
            if row.len() != n_col {
                return Err(ScoresError::ShapeMismatch {
                    expected: (n_row, n_col),
                    found: (n_row, row.len()),
                });
            }
            values.extend(row.iter().map(|x| x.as_()));
        }
        Ok(DenseScores {
            n_row,
            n_col,
            values,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_row, self.n_col)
    }

    #[inline]
    pub fn get(
        &self,
        i: usize,
        j: usize,
    ) -> Float {
        debug_assert!(i < self.n_row && j < self.n_col);
        self.values[i * self.n_col + j]
    }

    #[inline]
    pub fn set(
        &mut self,
        i: usize,
        j: usize,
        value: Float,
    ) {
        debug_assert!(i < self.n_row && j < self.n_col);
        self.values[i * self.n_col + j] = value;
    }

    pub fn values(&self) -> &[Float] {
        &self.values
    }

    /// Nonzero entries in row-major order, which is already canonical.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, Float)> + '_ {
        let n_col = self.n_col;
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.)
            .map(move |(k, v)| (k / n_col, k % n_col, *v))
    }
}

/// Explicit coordinate list for an `n_row x n_col` grid.
///
/// Construction validates the batch and sorts it into canonical
/// (row, then col) order, so anything holding a `CooScores` can rely on:
/// 1. `row`, `col` and `values` have the same length.
/// 2. Every coordinate is inside the grid.
/// 3. No coordinate appears twice.
/// 4. Entries are sorted by row, then by col.
#[derive(Debug, Clone, PartialEq)]
pub struct CooScores {
    n_row: usize,
    n_col: usize,
    row: Vec<usize>,
    col: Vec<usize>,
    values: Vec<Float>,
}

impl CooScores {
    pub fn new(
        n_row: usize,
        n_col: usize,
        mut row: Vec<usize>,
        mut col: Vec<usize>,
        mut values: Vec<Float>,
    ) -> Result<Self, ScoresError> {
        if row.len() != col.len() || row.len() != values.len() {
            return Err(ScoresError::LengthMismatch {
                rows: row.len(),
                cols: col.len(),
                values: values.len(),
            });
        }
        if let Some(&r) = row.iter().find(|&&r| r >= n_row) {
            return Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Row,
                index: r as isize,
                limit: n_row,
            });
        }
        if let Some(&c) = col.iter().find(|&&c| c >= n_col) {
            return Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Col,
                index: c as isize,
                limit: n_col,
            });
        }

        let coords = row
            .iter()
            .zip(col.iter())
            .map(|(r, c)| (*r, *c))
            .collect::<Vec<_>>();
        let order = coords.argsort();
        if let Some(pair) = order
            .windows(2)
            .find(|w| coords[w[0]] == coords[w[1]])
        {
            let (row, col) = coords[pair[0]];
            return Err(ScoresError::DuplicateCoordinate { row, col });
        }

        let already_sorted = order.iter().enumerate().all(|(k, i)| k == *i);
        if !already_sorted {
            row.sort_by_indices(&mut order.clone());
            col.sort_by_indices(&mut order.clone());
            values.sort_by_indices(&mut order.clone());
        }

        Ok(CooScores {
            n_row,
            n_col,
            row,
            col,
            values,
        })
    }

    /// Keeps the nonzero entries of a dense grid.
    pub fn from_dense(dense: &DenseScores) -> Self {
        let mut row = Vec::new();
        let mut col = Vec::new();
        let mut values = Vec::new();
        for (i, j, v) in dense.nonzero() {
            row.push(i);
            col.push(j);
            values.push(v);
        }
        CooScores {
            n_row: dense.n_row,
            n_col: dense.n_col,
            row,
            col,
            values,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_row, self.n_col)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub fn col(&self) -> &[usize] {
        &self.col
    }

    pub fn values(&self) -> &[Float] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Float)> + '_ {
        self.row
            .iter()
            .zip(self.col.iter())
            .zip(self.values.iter())
            .map(|((r, c), v)| (*r, *c, *v))
    }
}

/// Result of a slice query: parallel row, col and value arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTriples {
    pub row: Vec<usize>,
    pub col: Vec<usize>,
    pub values: Vec<Float>,
}

impl ScoreTriples {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
