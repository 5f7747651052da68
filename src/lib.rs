pub mod filtering;
pub mod mod_types;
pub mod pipeline;
pub mod scores;
pub mod similarity;
pub mod sorting;
pub mod spectrum;
pub mod utils;
