pub mod coordinates;
pub mod errors;
pub mod inputs;
pub mod stacked;
pub use errors::{
    Axis,
    ScoresError,
};
pub use inputs::{
    CooScores,
    DenseScores,
    ScoreTriples,
};
pub use stacked::{
    AxisIndex,
    LayerSelector,
    StackedSparseScores,
};
