use serde::{
    Deserialize,
    Serialize,
};

use crate::mod_types::Float;
use crate::sorting::PermuteExt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumMetadata {
    pub id: Option<String>,
    pub precursor_mz: Option<Float>,
    pub charge: Option<i32>,
    pub ionmode: Option<String>,
    pub adduct: Option<String>,
}

/// Centroided MS/MS spectrum.
///
/// Peaks are always sorted by m/z, both when built with [`Spectrum::new`]
/// and when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpectrumRecord")]
pub struct Spectrum {
    mz: Vec<Float>,
    intensities: Vec<Float>,
    pub metadata: SpectrumMetadata,
}

// Unchecked shape of a spectrum as it shows up in json.
#[derive(Deserialize)]
struct SpectrumRecord {
    mz: Vec<Float>,
    intensities: Vec<Float>,
    #[serde(default)]
    metadata: SpectrumMetadata,
}

impl TryFrom<SpectrumRecord> for Spectrum {
    type Error = &'static str;

    fn try_from(value: SpectrumRecord) -> Result<Self, Self::Error> {
        Spectrum::new(value.mz, value.intensities, value.metadata)
    }
}

impl Spectrum {
    pub fn new(
        mut mz: Vec<Float>,
        mut intensities: Vec<Float>,
        metadata: SpectrumMetadata,
    ) -> Result<Self, &'static str> {
        if mz.len() != intensities.len() {
            return Err("mz and intensities need to have the same length");
        }
        if mz.iter().any(|x| x.is_nan()) {
            return Err("mz values cannot be NaN");
        }
        if mz.windows(2).any(|w| w[0] > w[1]) {
            let mut order = (0..mz.len()).collect::<Vec<_>>();
            order.sort_by(|a, b| mz[*a].total_cmp(&mz[*b]));
            mz.sort_by_indices(&mut order.clone());
            intensities.sort_by_indices(&mut order);
        }
        Ok(Spectrum {
            mz,
            intensities,
            metadata,
        })
    }

    pub fn mz(&self) -> &[Float] {
        &self.mz
    }

    pub fn intensities(&self) -> &[Float] {
        &self.intensities
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }
}
