use serde::{
    Deserialize,
    Serialize,
};

const DEFAULT_POSITIVE: [&str; 24] = [
    "[M+H]+",
    "[M+Na]+",
    "[M+K]+",
    "[M+NH4]+",
    "[M+Li]+",
    "[M+2H]2+",
    "[M+3H]3+",
    "[M+H+Na]2+",
    "[M+2Na]2+",
    "[M+H-H2O]+",
    "[M+H-2H2O]+",
    "[M+H-NH3]+",
    "[M-H2O+H]+",
    "[M+CH3OH+H]+",
    "[M+ACN+H]+",
    "[M+ACN+Na]+",
    "[M+2Na-H]+",
    "[M+2K-H]+",
    "[M+IsoProp+H]+",
    "[M+DMSO+H]+",
    "[2M+H]+",
    "[2M+Na]+",
    "[2M+NH4]+",
    "[M]+",
];

const DEFAULT_NEGATIVE: [&str; 16] = [
    "[M-H]-",
    "[M-2H]2-",
    "[M-3H]3-",
    "[M+Cl]-",
    "[M+Br]-",
    "[M-H2O-H]-",
    "[M+Na-2H]-",
    "[M+K-2H]-",
    "[M+FA-H]-",
    "[M+Hac-H]-",
    "[M+HCOO]-",
    "[M+CH3COO]-",
    "[M+TFA-H]-",
    "[2M-H]-",
    "[2M+FA-H]-",
    "[M]-",
];

/// Adduct notations that unambiguously imply an ion mode.
///
/// The built-in table covers the common notations, extra entries can be
/// added through the `[adducts]` section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownAdducts {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for KnownAdducts {
    fn default() -> Self {
        KnownAdducts {
            positive: DEFAULT_POSITIVE.iter().map(|x| x.to_string()).collect(),
            negative: DEFAULT_NEGATIVE.iter().map(|x| x.to_string()).collect(),
        }
    }
}

impl KnownAdducts {
    pub fn is_positive(
        &self,
        adduct: &str,
    ) -> bool {
        self.positive.iter().any(|x| x == adduct)
    }

    pub fn is_negative(
        &self,
        adduct: &str,
    ) -> bool {
        self.negative.iter().any(|x| x == adduct)
    }
}
