use std::cmp::Ordering;

use log::trace;

use super::inputs::{
    CooScores,
    DenseScores,
};
use crate::mod_types::Float;
use crate::utils::binary_search_slice;

/// The shared sparsity pattern of a stacked score matrix.
///
/// 1. `row` and `col` always have the same length.
/// 2. Pairs are unique and sorted by row, then by col.
/// 3. Once established the pattern only ever shrinks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateIndex {
    row: Vec<usize>,
    col: Vec<usize>,
}

fn is_canonical(
    row: &[usize],
    col: &[usize],
) -> bool {
    row.iter()
        .zip(col.iter())
        .zip(row.iter().zip(col.iter()).skip(1))
        .all(|(a, b)| a < b)
}

impl CoordinateIndex {
    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub fn col(&self) -> &[usize] {
        &self.col
    }

    /// Sets the pattern from the nonzero entries of `coo` and returns
    /// their values in pattern order.
    ///
    /// Only called on an empty index. Explicit zeros in the batch mean
    /// "no entry" and do not become part of the pattern.
    pub fn establish(
        &mut self,
        coo: &CooScores,
    ) -> Vec<Float> {
        debug_assert!(self.is_empty(), "Pattern can only be established once");

        let mut row = Vec::with_capacity(coo.len());
        let mut col = Vec::with_capacity(coo.len());
        let mut values = Vec::with_capacity(coo.len());
        for (r, c, v) in coo.iter().filter(|(_, _, v)| *v != 0.) {
            row.push(r);
            col.push(c);
            values.push(v);
        }

        // `CooScores` is canonical by construction, filtering keeps the order.
        debug_assert!(is_canonical(&row, &col));

        trace!("Established pattern with {} coordinates", row.len());
        self.row = row;
        self.col = col;
        values
    }

    /// Reads the dense grid at every coordinate of the pattern.
    pub fn project_dense(
        &self,
        dense: &DenseScores,
    ) -> Vec<Float> {
        self.row
            .iter()
            .zip(self.col.iter())
            .map(|(r, c)| dense.get(*r, *c))
            .collect()
    }

    /// Aligns the batch values to the pattern.
    ///
    /// Pattern coordinates missing from the batch get `0.`, batch
    /// coordinates outside the pattern are dropped. Both sides are in
    /// canonical order, so this is a single merge pass.
    pub fn project(
        &self,
        coo: &CooScores,
    ) -> Vec<Float> {
        let mut out = vec![0.; self.len()];
        let mut candidates = coo.iter().peekable();
        let mut num_matched = 0;

        for (i, (pr, pc)) in self.row.iter().zip(self.col.iter()).enumerate() {
            let key = (*pr, *pc);
            while let Some(&(r, c, v)) = candidates.peek() {
                match (r, c).cmp(&key) {
                    Ordering::Less => {
                        candidates.next();
                    },
                    Ordering::Equal => {
                        out[i] = v;
                        num_matched += 1;
                        candidates.next();
                        break;
                    },
                    Ordering::Greater => break,
                }
            }
        }

        trace!(
            "Projected {} of {} batch entries onto {} coordinates",
            num_matched,
            coo.len(),
            self.len()
        );
        out
    }

    /// Drops every coordinate whose mask entry is false.
    pub fn shrink(
        &mut self,
        keep_mask: &[bool],
    ) {
        retain_by_mask(&mut self.row, keep_mask);
        retain_by_mask(&mut self.col, keep_mask);
    }

    /// Positions `[start, end)` of the entries in row `i`.
    pub fn row_range(
        &self,
        i: usize,
    ) -> (usize, usize) {
        binary_search_slice(&self.row, |a, b| a.cmp(b), i, i)
    }

    pub fn col_positions(
        &self,
        j: usize,
    ) -> Vec<usize> {
        self.col
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == j)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn position(
        &self,
        i: usize,
        j: usize,
    ) -> Option<usize> {
        let (start, end) = self.row_range(i);
        self.col[start..end]
            .binary_search(&j)
            .ok()
            .map(|k| k + start)
    }
}

/// Keeps, in order, the elements whose mask entry is true.
pub fn retain_by_mask<T>(
    values: &mut Vec<T>,
    keep_mask: &[bool],
) {
    debug_assert_eq!(values.len(), keep_mask.len());
    let mut keep = keep_mask.iter();
    values.retain(|_| *keep.next().unwrap_or(&false));
}

#[cfg(test)]
mod test_coordinates {
    use super::*;

    fn sample_index() -> (CoordinateIndex, Vec<Float>) {
        let coo = CooScores::new(
            4,
            4,
            vec![2, 0, 0, 1, 3, 2],
            vec![1, 3, 0, 2, 3, 3],
            vec![5., 2., 1., 0., 6., 7.],
        )
        .unwrap();
        let mut index = CoordinateIndex::default();
        let values = index.establish(&coo);
        (index, values)
    }

    #[test]
    fn test_establish_skips_zeros() {
        let (index, values) = sample_index();
        assert_eq!(index.row(), &[0, 0, 2, 2, 3]);
        assert_eq!(index.col(), &[0, 3, 1, 3, 3]);
        assert_eq!(values, vec![1., 2., 5., 7., 6.]);
        assert!(is_canonical(index.row(), index.col()));
        assert!(!is_canonical(&[1, 0], &[0, 0]));
        assert!(!is_canonical(&[0, 0], &[2, 2]));
    }

    #[test]
    fn test_project_fills_missing_with_zero() {
        let (index, _) = sample_index();
        let other = CooScores::new(4, 4, vec![0, 1, 2, 3], vec![3, 1, 3, 0], vec![
            0.5, 0.9, 0.7, 0.1,
        ])
        .unwrap();
        let projected = index.project(&other);
        assert_eq!(projected, vec![0., 0.5, 0., 0.7, 0.]);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_project_dense() {
        let (index, _) = sample_index();
        let dense = DenseScores::from_fn(4, 4, |i, j| (i * 10 + j) as Float);
        assert_eq!(index.project_dense(&dense), vec![0., 3., 21., 23., 33.]);
    }

    #[test]
    fn test_shrink_and_lookup() {
        let (mut index, _) = sample_index();
        assert_eq!(index.row_range(2), (2, 4));
        assert_eq!(index.row_range(1), (2, 2));
        assert_eq!(index.position(2, 3), Some(3));
        assert_eq!(index.position(2, 2), None);
        assert_eq!(index.col_positions(3), vec![1, 3, 4]);

        index.shrink(&[true, false, true, false, true]);
        assert_eq!(index.row(), &[0, 2, 3]);
        assert_eq!(index.col(), &[0, 1, 3]);
        assert_eq!(index.position(3, 3), Some(2));
    }
}
