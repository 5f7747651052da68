pub mod cosine_greedy;
pub mod precursor_mz_match;
pub use cosine_greedy::{
    CosineGreedy,
    CosineOutput,
};
pub use precursor_mz_match::{
    PrecursorMzMatch,
    ToleranceType,
};

use indicatif::ParallelProgressIterator;
use log::debug;
use rayon::prelude::*;

use crate::mod_types::Float;
use crate::scores::{
    Axis,
    CooScores,
    DenseScores,
    ScoresError,
};
use crate::spectrum::Spectrum;

/// A pairwise score between spectra.
///
/// Only [`pair`](Similarity::pair) is required, the matrix methods fall
/// back to scoring every requested pair (rows in parallel).
pub trait Similarity: Send + Sync {
    /// Name used for the score layer this similarity produces.
    fn name(&self) -> &str;

    /// Whether `pair(a, b) == pair(b, a)`.
    fn is_commutative(&self) -> bool {
        true
    }

    fn pair(
        &self,
        reference: &Spectrum,
        query: &Spectrum,
    ) -> Float;

    /// All-vs-all scores, references as rows and queries as columns.
    ///
    /// With `is_symmetric` (references and queries are the same list) only
    /// the upper triangle is computed for commutative scores.
    fn matrix(
        &self,
        references: &[Spectrum],
        queries: &[Spectrum],
        is_symmetric: bool,
    ) -> Result<DenseScores, ScoresError> {
        let n_row = references.len();
        let n_col = queries.len();
        if is_symmetric && n_row != n_col {
            return Err(ScoresError::ShapeMismatch {
                expected: (n_row, n_row),
                found: (n_row, n_col),
            });
        }
        let symmetric = is_symmetric && self.is_commutative();
        debug!(
            "Computing {} for {}x{} spectra (symmetric: {})",
            self.name(),
            n_row,
            n_col,
            symmetric
        );

        let progbar = indicatif::ProgressBar::new(n_row as u64);
        let rows = references
            .par_iter()
            .enumerate()
            .progress_with(progbar)
            .map(|(i, reference)| {
                let start = if symmetric { i } else { 0 };
                queries[start..]
                    .iter()
                    .map(|query| self.pair(reference, query))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut out = DenseScores::zeros(n_row, n_col);
        for (i, row) in rows.into_iter().enumerate() {
            let start = if symmetric { i } else { 0 };
            for (k, score) in row.into_iter().enumerate() {
                out.set(i, start + k, score);
                if symmetric {
                    out.set(start + k, i, score);
                }
            }
        }
        Ok(out)
    }

    /// Scores only the pairs `(idx_row[k], idx_col[k])`.
    ///
    /// Pairs that score zero are kept in the output, so the result can be
    /// projected onto an existing pattern as-is.
    fn sparse_matrix(
        &self,
        references: &[Spectrum],
        queries: &[Spectrum],
        idx_row: &[usize],
        idx_col: &[usize],
    ) -> Result<CooScores, ScoresError> {
        if idx_row.len() != idx_col.len() {
            return Err(ScoresError::LengthMismatch {
                rows: idx_row.len(),
                cols: idx_col.len(),
                values: idx_row.len(),
            });
        }
        if let Some(&i) = idx_row.iter().find(|&&i| i >= references.len()) {
            return Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Row,
                index: i as isize,
                limit: references.len(),
            });
        }
        if let Some(&j) = idx_col.iter().find(|&&j| j >= queries.len()) {
            return Err(ScoresError::IndexOutOfBounds {
                axis: Axis::Col,
                index: j as isize,
                limit: queries.len(),
            });
        }

        debug!("Computing {} for {} pairs", self.name(), idx_row.len());
        let progbar = indicatif::ProgressBar::new(idx_row.len() as u64);
        let values = idx_row
            .par_iter()
            .zip(idx_col.par_iter())
            .progress_with(progbar)
            .map(|(i, j)| self.pair(&references[*i], &queries[*j]))
            .collect::<Vec<_>>();

        CooScores::new(
            references.len(),
            queries.len(),
            idx_row.to_vec(),
            idx_col.to_vec(),
            values,
        )
    }

    /// Indices of `scores` from best to worst.
    fn sort(
        &self,
        scores: &[Float],
    ) -> Vec<usize> {
        let mut indices = (0..scores.len()).collect::<Vec<_>>();
        indices.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
        indices
    }
}
