// Score precision is configured here.
// Every layer of a stacked matrix stores this type, regardless of what
// the producing similarity function computed internally.
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f32")]
pub use std::f32 as floats;
#[cfg(not(feature = "f32"))]
pub type Float = f64;
#[cfg(not(feature = "f32"))]
pub use std::f64 as floats;
