use std::collections::HashMap;

use log::{
    debug,
    warn,
};

use super::coordinates::{
    retain_by_mask,
    CoordinateIndex,
};
use super::errors::{
    Axis,
    ScoresError,
};
use super::inputs::{
    CooScores,
    DenseScores,
    ScoreTriples,
};
use crate::mod_types::Float;

/// Which score layer a query reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSelector<'a> {
    /// The first layer that was added.
    First,
    Name(&'a str),
    Position(usize),
}

impl<'a> From<&'a str> for LayerSelector<'a> {
    fn from(name: &'a str) -> Self {
        LayerSelector::Name(name)
    }
}

impl From<usize> for LayerSelector<'_> {
    fn from(position: usize) -> Self {
        LayerSelector::Position(position)
    }
}

/// One axis of a slice query, either a single (possibly negative)
/// index or the whole axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisIndex {
    All,
    At(isize),
}

fn normalize_index(
    index: isize,
    limit: usize,
    axis: Axis,
) -> Result<usize, ScoresError> {
    let normalized = if index < 0 {
        index + limit as isize
    } else {
        index
    };
    if normalized < 0 || normalized as usize >= limit {
        return Err(ScoresError::IndexOutOfBounds { axis, index, limit });
    }
    Ok(normalized as usize)
}

/// Several score layers sharing one sparse `n_row x n_col` pattern.
///
/// The first layer added decides which coordinates are present, every
/// later layer is projected onto that pattern (values outside it are
/// discarded, pattern coordinates missing from the input read as `0`).
/// [`filter_by_range`](Self::filter_by_range) is the only way the pattern
/// changes afterwards, and it only removes coordinates, from all layers
/// at once.
///
/// ```rust
/// use sparsestack::scores::{DenseScores, StackedSparseScores};
///
/// let scores = DenseScores::from_fn(3, 3, |i, j| if i == j { 0. } else { 0.5 });
/// let mut matrix = StackedSparseScores::new(3, 3);
/// matrix.add_dense("cosine", &scores).unwrap();
/// assert_eq!(matrix.shape(), (3, 3, 1));
/// assert_eq!(matrix.nnz(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct StackedSparseScores {
    n_row: usize,
    n_col: usize,
    index: CoordinateIndex,
    score_names: Vec<String>,
    layers: HashMap<String, Vec<Float>>,
}

impl StackedSparseScores {
    pub fn new(
        n_row: usize,
        n_col: usize,
    ) -> Self {
        StackedSparseScores {
            n_row,
            n_col,
            index: CoordinateIndex::default(),
            score_names: Vec::new(),
            layers: HashMap::new(),
        }
    }

    /// `(n_row, n_col, number of layers)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_row, self.n_col, self.score_names.len())
    }

    pub fn nnz(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn row(&self) -> &[usize] {
        self.index.row()
    }

    pub fn col(&self) -> &[usize] {
        self.index.col()
    }

    pub fn score_names(&self) -> &[String] {
        &self.score_names
    }

    pub fn data(
        &self,
        name: &str,
    ) -> Option<&[Float]> {
        self.layers.get(name).map(|x| x.as_slice())
    }

    fn check_new_layer(
        &self,
        name: &str,
        shape: (usize, usize),
    ) -> Result<(), ScoresError> {
        if shape != (self.n_row, self.n_col) {
            return Err(ScoresError::ShapeMismatch {
                expected: (self.n_row, self.n_col),
                found: shape,
            });
        }
        if self.layers.contains_key(name) {
            return Err(ScoresError::DuplicateLayer(name.to_string()));
        }
        Ok(())
    }

    fn pattern_is_established(&self) -> bool {
        // A first layer that was all zeros still fixes the (empty) pattern.
        !self.score_names.is_empty()
    }

    fn push_layer(
        &mut self,
        name: &str,
        values: Vec<Float>,
    ) {
        debug_assert_eq!(values.len(), self.index.len());
        debug!(
            "Added score layer '{}' over {} coordinates",
            name,
            values.len()
        );
        self.score_names.push(name.to_string());
        self.layers.insert(name.to_string(), values);
    }

    /// Adds a layer from a full `n_row x n_col` grid.
    ///
    /// On an empty matrix the nonzero cells become the pattern. Otherwise
    /// the grid is read at the existing coordinates, zeros included.
    pub fn add_dense(
        &mut self,
        name: &str,
        scores: &DenseScores,
    ) -> Result<(), ScoresError> {
        self.check_new_layer(name, scores.shape())?;

        let values = if self.pattern_is_established() {
            self.index.project_dense(scores)
        } else {
            let values = self.index.establish(&CooScores::from_dense(scores));
            if values.is_empty() {
                warn!("Score layer '{}' has no nonzero entries, matrix stays empty", name);
            }
            values
        };
        self.push_layer(name, values);
        Ok(())
    }

    /// Adds a layer from an explicit coordinate list.
    ///
    /// Same establish-or-project rule as [`add_dense`](Self::add_dense).
    /// When projecting, pattern coordinates the batch does not mention
    /// are filled with `0`.
    pub fn add_sparse(
        &mut self,
        name: &str,
        scores: &CooScores,
    ) -> Result<(), ScoresError> {
        self.check_new_layer(name, scores.shape())?;

        let values = if self.pattern_is_established() {
            self.index.project(scores)
        } else {
            let values = self.index.establish(scores);
            if values.is_empty() {
                warn!("Score layer '{}' has no nonzero entries, matrix stays empty", name);
            }
            values
        };
        self.push_layer(name, values);
        Ok(())
    }

    /// Removes every coordinate whose value in layer `name` is not
    /// strictly between `low` and `high`. A missing bound is unbounded on
    /// that side, a missing name means the first layer. A NaN bound or
    /// `low > high` is an [`InvalidRange`](ScoresError::InvalidRange).
    ///
    /// Returns the number of coordinates that were removed.
    pub fn filter_by_range(
        &mut self,
        name: Option<&str>,
        low: Option<Float>,
        high: Option<Float>,
    ) -> Result<usize, ScoresError> {
        let lower = low.unwrap_or(Float::NEG_INFINITY);
        let upper = high.unwrap_or(Float::INFINITY);
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ScoresError::InvalidRange {
                low: lower,
                high: upper,
            });
        }
        let selector = match name {
            Some(name) => LayerSelector::Name(name),
            None => LayerSelector::First,
        };
        let values = self.layer_values(selector)?;

        let keep_mask = values
            .iter()
            .map(|v| low.map_or(true, |l| *v > l) && high.map_or(true, |h| *v < h))
            .collect::<Vec<_>>();
        let nnz_before = self.nnz();

        self.index.shrink(&keep_mask);
        for layer in self.layers.values_mut() {
            retain_by_mask(layer, &keep_mask);
        }

        let removed = nnz_before - self.nnz();
        debug!(
            "Filtered {:?} on ({:?}, {:?}): {} -> {} coordinates",
            selector,
            low,
            high,
            nnz_before,
            self.nnz()
        );
        Ok(removed)
    }

    fn layer_name(
        &self,
        selector: LayerSelector,
    ) -> Result<&str, ScoresError> {
        match selector {
            LayerSelector::First => self
                .score_names
                .first()
                .map(|x| x.as_str())
                .ok_or(ScoresError::NoLayers),
            LayerSelector::Name(name) => self
                .score_names
                .iter()
                .find(|x| x.as_str() == name)
                .map(|x| x.as_str())
                .ok_or_else(|| ScoresError::UnknownLayer(name.to_string())),
            LayerSelector::Position(position) => {
                if self.score_names.is_empty() {
                    return Err(ScoresError::NoLayers);
                }
                self.score_names
                    .get(position)
                    .map(|x| x.as_str())
                    .ok_or(ScoresError::IndexOutOfBounds {
                        axis: Axis::Layer,
                        index: position as isize,
                        limit: self.score_names.len(),
                    })
            },
        }
    }

    /// All values of one layer, aligned with [`row`](Self::row) and
    /// [`col`](Self::col).
    pub fn layer_values(
        &self,
        selector: LayerSelector,
    ) -> Result<&[Float], ScoresError> {
        let name = self.layer_name(selector)?;
        Ok(self.layers[name].as_slice())
    }

    fn collect_triples(
        &self,
        values: &[Float],
        positions: impl Iterator<Item = usize>,
    ) -> ScoreTriples {
        let mut out = ScoreTriples::default();
        for k in positions {
            out.row.push(self.index.row()[k]);
            out.col.push(self.index.col()[k]);
            out.values.push(values[k]);
        }
        out
    }

    /// Value of the first layer at `(i, j)`, `0` if the coordinate is not
    /// part of the pattern. Negative indices count from the end.
    pub fn get(
        &self,
        i: isize,
        j: isize,
    ) -> Result<Float, ScoresError> {
        self.get_layer(i, j, LayerSelector::First)
    }

    pub fn get_layer(
        &self,
        i: isize,
        j: isize,
        selector: LayerSelector,
    ) -> Result<Float, ScoresError> {
        let i = normalize_index(i, self.n_row, Axis::Row)?;
        let j = normalize_index(j, self.n_col, Axis::Col)?;
        let values = self.layer_values(selector)?;
        Ok(self.index.position(i, j).map_or(0., |k| values[k]))
    }

    /// Entries of row `i`, in column order.
    pub fn row_slice(
        &self,
        i: isize,
        selector: LayerSelector,
    ) -> Result<ScoreTriples, ScoresError> {
        let i = normalize_index(i, self.n_row, Axis::Row)?;
        let values = self.layer_values(selector)?;
        let (start, end) = self.index.row_range(i);
        Ok(self.collect_triples(values, start..end))
    }

    /// Entries of column `j`, in row order.
    pub fn col_slice(
        &self,
        j: isize,
        selector: LayerSelector,
    ) -> Result<ScoreTriples, ScoresError> {
        let j = normalize_index(j, self.n_col, Axis::Col)?;
        let values = self.layer_values(selector)?;
        let positions = self.index.col_positions(j);
        Ok(self.collect_triples(values, positions.into_iter()))
    }

    /// Every entry of one layer.
    pub fn layer(
        &self,
        selector: LayerSelector,
    ) -> Result<ScoreTriples, ScoresError> {
        let values = self.layer_values(selector)?;
        Ok(ScoreTriples {
            row: self.index.row().to_vec(),
            col: self.index.col().to_vec(),
            values: values.to_vec(),
        })
    }

    /// General form of the slice queries.
    ///
    /// With both axes fixed the result holds the single entry at that
    /// coordinate, or nothing if it is not part of the pattern.
    pub fn slice(
        &self,
        row: AxisIndex,
        col: AxisIndex,
        selector: LayerSelector,
    ) -> Result<ScoreTriples, ScoresError> {
        match (row, col) {
            (AxisIndex::All, AxisIndex::All) => self.layer(selector),
            (AxisIndex::At(i), AxisIndex::All) => self.row_slice(i, selector),
            (AxisIndex::All, AxisIndex::At(j)) => self.col_slice(j, selector),
            (AxisIndex::At(i), AxisIndex::At(j)) => {
                let i = normalize_index(i, self.n_row, Axis::Row)?;
                let j = normalize_index(j, self.n_col, Axis::Col)?;
                let values = self.layer_values(selector)?;
                Ok(self.collect_triples(values, self.index.position(i, j).into_iter()))
            },
        }
    }

    /// Writes one layer back into a dense grid, zeros off the pattern.
    pub fn to_dense(
        &self,
        selector: LayerSelector,
    ) -> Result<DenseScores, ScoresError> {
        let values = self.layer_values(selector)?;
        let mut out = DenseScores::zeros(self.n_row, self.n_col);
        for ((r, c), v) in self
            .index
            .row()
            .iter()
            .zip(self.index.col().iter())
            .zip(values.iter())
        {
            out.set(*r, *c, *v);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test_stacked {
    use super::*;

    fn arange_matrix() -> StackedSparseScores {
        let dense = DenseScores::from_fn(12, 10, |i, j| (i * 10 + j) as Float);
        let mut matrix = StackedSparseScores::new(12, 10);
        matrix.add_dense("test_score", &dense).unwrap();
        matrix
    }

    #[test]
    fn test_shape_mismatch() {
        let mut matrix = StackedSparseScores::new(12, 10);
        let dense = DenseScores::from_fn(10, 12, |_, _| 1.);
        let err = matrix.add_dense("wrong", &dense).unwrap_err();
        assert_eq!(
            err,
            ScoresError::ShapeMismatch {
                expected: (12, 10),
                found: (10, 12)
            }
        );
        assert_eq!(matrix.shape(), (12, 10, 0));

        let coo = CooScores::new(3, 3, vec![0], vec![0], vec![1.]).unwrap();
        assert!(matches!(
            matrix.add_sparse("wrong", &coo),
            Err(ScoresError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_layer_leaves_matrix_untouched() {
        let mut matrix = arange_matrix();
        let dense = DenseScores::from_fn(12, 10, |_, _| 3.);
        let err = matrix.add_dense("test_score", &dense).unwrap_err();
        assert_eq!(err, ScoresError::DuplicateLayer("test_score".into()));
        assert_eq!(matrix.shape(), (12, 10, 1));
        assert_eq!(matrix.get(1, 1).unwrap(), 11.);
    }

    #[test]
    fn test_all_zero_first_layer() {
        let mut matrix = StackedSparseScores::new(4, 4);
        matrix
            .add_dense("empty", &DenseScores::zeros(4, 4))
            .unwrap();
        assert_eq!(matrix.shape(), (4, 4, 1));
        assert!(matrix.is_empty());

        // Later layers cannot re-open the pattern.
        let ones = DenseScores::from_fn(4, 4, |_, _| 1.);
        matrix.add_dense("ones", &ones).unwrap();
        assert_eq!(matrix.nnz(), 0);
        assert_eq!(matrix.data("ones"), Some(&[][..]));
        assert_eq!(matrix.get_layer(2, 2, "ones".into()).unwrap(), 0.);
    }

    #[test]
    fn test_layer_selection_errors() {
        let empty = StackedSparseScores::new(3, 3);
        assert_eq!(empty.get(0, 0).unwrap_err(), ScoresError::NoLayers);

        let matrix = arange_matrix();
        assert_eq!(
            matrix.get_layer(0, 1, "missing".into()).unwrap_err(),
            ScoresError::UnknownLayer("missing".into())
        );
        assert!(matches!(
            matrix.get_layer(0, 1, LayerSelector::Position(1)),
            Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Layer,
                ..
            })
        ));
        assert!(matches!(
            matrix.get(12, 0),
            Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Row,
                index: 12,
                limit: 12
            })
        ));
        assert!(matches!(
            matrix.get(0, -11),
            Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Col,
                ..
            })
        ));
    }

    #[test]
    fn test_filter_errors() {
        let mut matrix = StackedSparseScores::new(3, 3);
        assert_eq!(
            matrix.filter_by_range(None, Some(1.), None).unwrap_err(),
            ScoresError::NoLayers
        );
        assert_eq!(
            matrix
                .filter_by_range(Some("cosine"), Some(0.1), None)
                .unwrap_err(),
            ScoresError::UnknownLayer("cosine".into())
        );
        assert_eq!(
            matrix.get_layer(0, 0, "cosine".into()).unwrap_err(),
            ScoresError::UnknownLayer("cosine".into())
        );
        assert_eq!(
            matrix
                .get_layer(0, 0, LayerSelector::Position(0))
                .unwrap_err(),
            ScoresError::NoLayers
        );

        let mut matrix = arange_matrix();
        assert_eq!(
            matrix
                .filter_by_range(Some("nope"), Some(1.), None)
                .unwrap_err(),
            ScoresError::UnknownLayer("nope".into())
        );
        assert_eq!(
            matrix.filter_by_range(None, Some(5.), Some(1.)).unwrap_err(),
            ScoresError::InvalidRange { low: 5., high: 1. }
        );
        assert_eq!(matrix.nnz(), 119);
    }

    #[test]
    fn test_filter_rejects_nan_bounds() {
        let mut matrix = arange_matrix();
        for (low, high) in [
            (Some(Float::NAN), None),
            (None, Some(Float::NAN)),
            (Some(1.), Some(Float::NAN)),
        ] {
            let err = matrix.filter_by_range(None, low, high).unwrap_err();
            assert!(matches!(err, ScoresError::InvalidRange { .. }));
        }
        assert_eq!(matrix.nnz(), 119);
    }

    #[test]
    fn test_out_of_grid_batch_is_rejected() {
        let coo = CooScores::new(5, 5, vec![4], vec![4], vec![1.]).unwrap();
        let mut matrix = StackedSparseScores::new(2, 2);
        assert_eq!(
            matrix.add_sparse("big", &coo).unwrap_err(),
            ScoresError::ShapeMismatch {
                expected: (2, 2),
                found: (5, 5)
            }
        );
        assert_eq!(matrix.shape(), (2, 2, 0));
        assert!(matrix.is_empty());

        let outside = CooScores::new(2, 2, vec![4], vec![4], vec![1.]);
        assert!(matches!(
            outside,
            Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Row,
                ..
            })
        ));
    }

    #[test]
    fn test_filter_one_sided() {
        let mut matrix = arange_matrix();
        let removed = matrix.filter_by_range(None, None, Some(10.)).unwrap();
        assert_eq!(removed, 110);
        assert_eq!(matrix.data("test_score").unwrap(), &[
            1., 2., 3., 4., 5., 6., 7., 8., 9.
        ]);

        // A wider range cannot bring anything back.
        let removed = matrix.filter_by_range(None, None, Some(100.)).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(matrix.nnz(), 9);
    }

    #[test]
    fn test_point_slice_and_dense_export() {
        let matrix = arange_matrix();
        let hit = matrix
            .slice(AxisIndex::At(3), AxisIndex::At(-2), LayerSelector::First)
            .unwrap();
        assert_eq!(hit.row, vec![3]);
        assert_eq!(hit.col, vec![8]);
        assert_eq!(hit.values, vec![38.]);

        let miss = matrix
            .slice(AxisIndex::At(0), AxisIndex::At(0), LayerSelector::First)
            .unwrap();
        assert!(miss.is_empty());

        let dense = matrix.to_dense(LayerSelector::First).unwrap();
        assert_eq!(dense.shape(), (12, 10));
        assert_eq!(dense.get(11, 9), 119.);
        assert_eq!(dense.get(0, 0), 0.);
    }
}
