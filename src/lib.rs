//! Fits a small multilayer perceptron to a scalar function of real inputs
//! using online backpropagation and validation-based early stopping.

pub mod activator;
pub mod data;
pub mod error;
pub mod layer;
pub mod network;
pub mod trainer;

mod utils;

pub use error::{Error, Result};
