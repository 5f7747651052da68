use super::{
    NEGATIVE,
    POSITIVE,
};
use crate::spectrum::Spectrum;

/// Makes the charge agree with the ion mode.
///
/// A missing charge becomes 0, a zero charge becomes +/-1 when the ion
/// mode is known, and a charge whose sign contradicts the ion mode is
/// flipped (the ion mode is trusted over the charge).
pub fn correct_charge(mut spectrum: Spectrum) -> Spectrum {
    let ionmode = spectrum.metadata.ionmode.as_deref();
    let mut charge = match (spectrum.metadata.charge, ionmode) {
        (None, _) => 0,
        (Some(0), Some(POSITIVE)) => 1,
        (Some(0), Some(NEGATIVE)) => -1,
        (Some(x), _) => x,
    };

    match (charge.signum(), ionmode) {
        (1, Some(NEGATIVE)) | (-1, Some(POSITIVE)) => charge = -charge,
        _ => {},
    }

    spectrum.metadata.charge = Some(charge);
    spectrum
}
