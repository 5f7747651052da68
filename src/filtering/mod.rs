pub mod adducts;
pub mod correct_charge;
pub mod derive_ionmode;
pub use adducts::KnownAdducts;
pub use correct_charge::correct_charge;
pub use derive_ionmode::derive_ionmode;

pub const POSITIVE: &str = "positive";
pub const NEGATIVE: &str = "negative";
pub const UNKNOWN_IONMODE: &str = "n/a";
