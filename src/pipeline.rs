use log::info;
use serde::{
    Deserialize,
    Serialize,
};

use crate::filtering::{
    correct_charge,
    derive_ionmode,
    KnownAdducts,
};
use crate::mod_types::Float;
use crate::scores::{
    ScoresError,
    StackedSparseScores,
};
use crate::similarity::{
    CosineGreedy,
    CosineOutput,
    PrecursorMzMatch,
    Similarity,
};
use crate::spectrum::Spectrum;
use crate::utils::{
    ContextTimer,
    LogLevel,
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct CosineConfig {
    pub tolerance: Float,
    pub mz_power: Float,
    pub intensity_power: Float,
}

impl Default for CosineConfig {
    fn default() -> Self {
        CosineConfig {
            tolerance: 0.1,
            mz_power: 0.,
            intensity_power: 1.,
        }
    }
}

impl From<CosineConfig> for CosineGreedy {
    fn from(value: CosineConfig) -> Self {
        CosineGreedy {
            tolerance: value.tolerance,
            mz_power: value.mz_power,
            intensity_power: value.intensity_power,
            output: CosineOutput::Score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ScoringConfig {
    /// Only score pairs whose precursors match, instead of all pairs.
    pub prefilter_precursor: bool,
    pub precursor_match: PrecursorMzMatch,
    pub cosine: CosineConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            prefilter_precursor: true,
            precursor_match: PrecursorMzMatch::default(),
            cosine: CosineConfig::default(),
        }
    }
}

/// Thresholds are exclusive, a pair survives when its score is strictly
/// above the given value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ScoreFilterConfig {
    pub cosine_above: Option<Float>,
    pub matches_above: Option<Float>,
}

impl Default for ScoreFilterConfig {
    fn default() -> Self {
        ScoreFilterConfig {
            cosine_above: Some(0.6),
            matches_above: Some(2.),
        }
    }
}

pub fn clean_metadata(
    spectra: Vec<Spectrum>,
    known_adducts: &KnownAdducts,
) -> Vec<Spectrum> {
    spectra
        .into_iter()
        .map(|x| derive_ionmode(x, known_adducts))
        .map(correct_charge)
        .collect()
}

/// Builds the stacked score matrix for `references` x `queries`.
///
/// The first layer sets the pattern: precursor matches when prefiltering,
/// otherwise every pair with a nonzero cosine. Cosine score and number of
/// matched peaks are then computed only for the pattern coordinates, and
/// the configured thresholds prune it.
pub fn compute_scores(
    references: &[Spectrum],
    queries: &[Spectrum],
    is_symmetric: bool,
    scoring: &ScoringConfig,
    filters: &ScoreFilterConfig,
) -> Result<StackedSparseScores, ScoresError> {
    let mut timer = ContextTimer::new("compute_scores", true, LogLevel::INFO);
    let mut scores = StackedSparseScores::new(references.len(), queries.len());
    let cosine = CosineGreedy::from(scoring.cosine);
    let matches = cosine.with_output(CosineOutput::Matches);

    let mut pattern_timer = timer.start_sub_timer("pattern");
    if scoring.prefilter_precursor {
        let precursor = scoring.precursor_match;
        let pairs = precursor.matching_pairs(references, queries)?;
        scores.add_sparse(precursor.name(), &pairs)?;
        let cosine_scores = cosine.sparse_matrix(references, queries, scores.row(), scores.col())?;
        scores.add_sparse(cosine.name(), &cosine_scores)?;
    } else {
        let cosine_scores = cosine.matrix(references, queries, is_symmetric)?;
        scores.add_dense(cosine.name(), &cosine_scores)?;
    }
    pattern_timer.stop(true);

    let num_matches = matches.sparse_matrix(references, queries, scores.row(), scores.col())?;
    scores.add_sparse(matches.name(), &num_matches)?;
    info!(
        "Scored {} of {} possible pairs",
        scores.nnz(),
        references.len() * queries.len()
    );

    if let Some(low) = filters.cosine_above {
        scores.filter_by_range(Some(cosine.name()), Some(low), None)?;
    }
    if let Some(low) = filters.matches_above {
        scores.filter_by_range(Some(matches.name()), Some(low), None)?;
    }
    info!("{} pairs left after filtering", scores.nnz());

    timer.stop(true);
    Ok(scores)
}
