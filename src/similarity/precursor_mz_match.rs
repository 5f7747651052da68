use log::debug;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::Similarity;
use crate::mod_types::Float;
use crate::scores::{
    CooScores,
    ScoresError,
};
use crate::spectrum::Spectrum;
use crate::utils::binary_search_slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToleranceType {
    Dalton,
    Ppm,
}

/// Scores `1` when two precursors are within tolerance, `0` otherwise.
///
/// In ppm mode the difference is taken relative to the mean of both
/// precursor m/z values. Spectra without a precursor never match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecursorMzMatch {
    pub tolerance: Float,
    pub tolerance_type: ToleranceType,
}

impl Default for PrecursorMzMatch {
    fn default() -> Self {
        PrecursorMzMatch {
            tolerance: 0.1,
            tolerance_type: ToleranceType::Dalton,
        }
    }
}

impl PrecursorMzMatch {
    fn within_tolerance(
        &self,
        a: Float,
        b: Float,
    ) -> bool {
        let diff = (a - b).abs();
        match self.tolerance_type {
            ToleranceType::Dalton => diff <= self.tolerance,
            ToleranceType::Ppm => {
                let mean = (a + b) / 2.;
                diff / mean * 1e6 <= self.tolerance
            },
        }
    }

    /// Range of m/z values that could match `mz`, slightly widened so
    /// rounding never hides a match. Candidates from this range still go
    /// through `within_tolerance`.
    fn search_window(
        &self,
        mz: Float,
    ) -> (Float, Float) {
        let tolerance = self.tolerance * 1.01;
        match self.tolerance_type {
            ToleranceType::Dalton => (mz - tolerance, mz + tolerance),
            ToleranceType::Ppm => {
                let k = tolerance * 1e-6 / 2.;
                (mz * (1. - k) / (1. + k), mz * (1. + k) / (1. - k))
            },
        }
    }

    /// Every (reference, query) pair whose precursors match, as a sparse
    /// batch of ones.
    ///
    /// Queries are sorted once by precursor m/z, so this avoids scoring
    /// the full grid when seeding a sparse pattern.
    pub fn matching_pairs(
        &self,
        references: &[Spectrum],
        queries: &[Spectrum],
    ) -> Result<CooScores, ScoresError> {
        let mut sorted_queries = queries
            .iter()
            .enumerate()
            .filter_map(|(j, q)| q.metadata.precursor_mz.map(|mz| (mz, j)))
            .filter(|(mz, _)| !mz.is_nan())
            .collect::<Vec<_>>();
        sorted_queries.sort_by(|a, b| a.0.total_cmp(&b.0));
        let sorted_queries = &sorted_queries;

        let pairs = references
            .par_iter()
            .enumerate()
            .filter_map(|(i, r)| r.metadata.precursor_mz.map(|mz| (i, mz)))
            .flat_map_iter(move |(i, mz)| {
                let (low, high) = self.search_window(mz);
                let (start, end) =
                    binary_search_slice(sorted_queries, |a, b| a.0.total_cmp(b), low, high);
                sorted_queries[start..end]
                    .iter()
                    .filter(move |(qmz, _)| self.within_tolerance(mz, *qmz))
                    .map(move |(_, j)| (i, *j))
            })
            .collect::<Vec<_>>();

        debug!(
            "Found {} precursor matches among {}x{} spectra",
            pairs.len(),
            references.len(),
            queries.len()
        );

        let (row, col): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
        let values = vec![1.; row.len()];
        CooScores::new(references.len(), queries.len(), row, col, values)
    }
}

impl Similarity for PrecursorMzMatch {
    fn name(&self) -> &str {
        "precursor_mz_match"
    }

    fn pair(
        &self,
        reference: &Spectrum,
        query: &Spectrum,
    ) -> Float {
        match (reference.metadata.precursor_mz, query.metadata.precursor_mz) {
            (Some(a), Some(b)) if self.within_tolerance(a, b) => 1.,
            _ => 0.,
        }
    }
}
