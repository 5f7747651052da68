use log::info;

use super::adducts::KnownAdducts;
use super::{
    NEGATIVE,
    POSITIVE,
    UNKNOWN_IONMODE,
};
use crate::spectrum::Spectrum;

/// Fills in a missing (or unrecognized) ion mode from the adduct.
///
/// An ionmode that is already exactly `"positive"` or `"negative"` is left
/// alone. Otherwise it becomes whatever the adduct implies, or `"n/a"` if
/// the adduct is missing or not in `known_adducts`.
pub fn derive_ionmode(
    mut spectrum: Spectrum,
    known_adducts: &KnownAdducts,
) -> Spectrum {
    let ionmode = spectrum.metadata.ionmode.as_deref();
    if matches!(ionmode, Some(POSITIVE) | Some(NEGATIVE)) {
        return spectrum;
    }

    let adduct = spectrum.metadata.adduct.as_deref().unwrap_or("");
    let derived = if known_adducts.is_positive(adduct) {
        POSITIVE
    } else if known_adducts.is_negative(adduct) {
        NEGATIVE
    } else {
        UNKNOWN_IONMODE
    };
    if derived != UNKNOWN_IONMODE {
        info!("Added ionmode '{}' based on adduct: {}", derived, adduct);
    }

    spectrum.metadata.ionmode = Some(derived.to_string());
    spectrum
}
