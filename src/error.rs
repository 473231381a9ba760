//! Error types.

use thiserror::Error;

/// Errors raised while building a network, a dataset or a trainer.
///
/// Once a `Trainer` exists, training itself cannot fail.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("a network needs at least one input feature")]
    NoFeatures,

    #[error("a network needs at least one weight layer")]
    NoLayers,

    #[error("hidden layers need a trainable neuron besides the bias, got width {0}")]
    HiddenLayerTooNarrow(usize),

    #[error("{inputs} input rows but {targets} targets")]
    SampleCountMismatch { inputs: usize, targets: usize },

    #[error("expected {expected} input features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("the {0} set is empty")]
    EmptyDataset(&'static str),

    #[error("invalid split: validation ratio {validation}, test ratio {test}")]
    InvalidSplit { validation: f64, test: f64 },

    #[error("learning rate must be finite and non-negative, got {0}")]
    InvalidLearningRate(f64),

    #[error("max_epoch must be at least 1")]
    ZeroMaxEpoch,
}

pub type Result<T> = std::result::Result<T, Error>;
