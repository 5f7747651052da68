use serde::{
    Deserialize,
    Serialize,
};

use super::Similarity;
use crate::mod_types::Float;
use crate::spectrum::Spectrum;
use crate::utils::binary_search_slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CosineOutput {
    Score,
    Matches,
}

/// Cosine score with greedy peak matching.
///
/// Every pair of peaks within `tolerance` is a candidate, candidates are
/// taken from the highest to lowest product of weighted intensities and
/// each peak is used at most once. Peak weights are
/// `mz ^ mz_power * intensity ^ intensity_power`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosineGreedy {
    pub tolerance: Float,
    pub mz_power: Float,
    pub intensity_power: Float,
    pub output: CosineOutput,
}

impl Default for CosineGreedy {
    fn default() -> Self {
        CosineGreedy {
            tolerance: 0.1,
            mz_power: 0.,
            intensity_power: 1.,
            output: CosineOutput::Score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineScore {
    pub score: Float,
    pub matches: usize,
}

impl CosineGreedy {
    pub fn with_output(
        self,
        output: CosineOutput,
    ) -> Self {
        CosineGreedy { output, ..self }
    }

    fn weights(
        &self,
        spectrum: &Spectrum,
    ) -> Vec<Float> {
        spectrum
            .mz()
            .iter()
            .zip(spectrum.intensities().iter())
            .map(|(mz, int)| mz.powf(self.mz_power) * int.powf(self.intensity_power))
            .collect()
    }

    pub fn score(
        &self,
        reference: &Spectrum,
        query: &Spectrum,
    ) -> CosineScore {
        let ref_weights = self.weights(reference);
        let query_weights = self.weights(query);

        // (product, reference peak, query peak)
        let mut candidates = Vec::new();
        for (i, mz) in reference.mz().iter().enumerate() {
            let (start, end) = binary_search_slice(
                query.mz(),
                |a: &Float, b| a.total_cmp(b),
                mz - self.tolerance,
                mz + self.tolerance,
            );
            for j in start..end {
                candidates.push((ref_weights[i] * query_weights[j], i, j));
            }
        }
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut used_ref = vec![false; reference.len()];
        let mut used_query = vec![false; query.len()];
        let mut dot = 0.;
        let mut matches = 0;
        for (product, i, j) in candidates {
            if used_ref[i] || used_query[j] {
                continue;
            }
            used_ref[i] = true;
            used_query[j] = true;
            dot += product;
            matches += 1;
        }

        let norm_ref = ref_weights.iter().map(|x| x * x).sum::<Float>().sqrt();
        let norm_query = query_weights.iter().map(|x| x * x).sum::<Float>().sqrt();
        let score = if norm_ref > 0. && norm_query > 0. {
            dot / (norm_ref * norm_query)
        } else {
            0.
        };

        CosineScore { score, matches }
    }
}

impl Similarity for CosineGreedy {
    fn name(&self) -> &str {
        match self.output {
            CosineOutput::Score => "cosine_score",
            CosineOutput::Matches => "cosine_matches",
        }
    }

    fn pair(
        &self,
        reference: &Spectrum,
        query: &Spectrum,
    ) -> Float {
        let out = self.score(reference, query);
        match self.output {
            CosineOutput::Score => out.score,
            CosineOutput::Matches => out.matches as Float,
        }
    }
}
