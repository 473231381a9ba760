//! Labelled samples and the helpers that produce them.

use std::f64::consts::PI;

use ndarray::{s, Array1, Array2, ArrayView1};
use rand::Rng;

use crate::error::{Error, Result};

/// A set of input rows with one scalar target per row.
///
/// The default dataset is empty, with no features.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    inputs: Array2<f64>,
    targets: Array1<f64>,
}

impl Dataset {
    /// Pairs `inputs` (one sample per row) with `targets`.
    pub fn new(inputs: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        if inputs.nrows() != targets.len() {
            return Err(Error::SampleCountMismatch {
                inputs: inputs.nrows(),
                targets: targets.len(),
            });
        }
        Ok(Dataset { inputs, targets })
    }

    /// Samples `count` inputs uniformly from `[0, 1)^feature_count` and
    /// labels each one with `f`.
    pub fn generate<R, F>(rng: &mut R, count: usize, feature_count: usize, f: F) -> Self
    where
        R: Rng,
        F: Fn(ArrayView1<'_, f64>) -> f64,
    {
        let inputs = Array2::from_shape_simple_fn((count, feature_count), || rng.gen::<f64>());
        let targets = inputs.rows().into_iter().map(f).collect();
        Dataset { inputs, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn inputs(&self) -> &Array2<f64> {
        &self.inputs
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    /// Iterates over `(input, target)` pairs in their original order.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, f64)> + '_ {
        self.inputs.rows().into_iter().zip(self.targets.iter().copied())
    }

    /// Partitions the samples without shuffling.
    ///
    /// The first `floor(len * validation_ratio)` rows become the validation
    /// set, the next `floor(len * test_ratio)` rows the test set, and the
    /// rest the training set.
    pub fn split(&self, validation_ratio: f64, test_ratio: f64) -> Result<Split> {
        let invalid = Error::InvalidSplit {
            validation: validation_ratio,
            test: test_ratio,
        };
        let ratio_ok = |r: f64| (0.0..1.0).contains(&r);
        if !ratio_ok(validation_ratio) || !ratio_ok(test_ratio) {
            return Err(invalid);
        }

        let n = self.len();
        let validation = (n as f64 * validation_ratio) as usize;
        let test = (n as f64 * test_ratio) as usize;
        if validation == 0 || validation + test >= n {
            return Err(invalid);
        }

        Ok(Split {
            validation: self.rows(0, validation),
            test: self.rows(validation, validation + test),
            training: self.rows(validation + test, n),
        })
    }

    fn rows(&self, start: usize, end: usize) -> Dataset {
        Dataset {
            inputs: self.inputs.slice(s![start..end, ..]).to_owned(),
            targets: self.targets.slice(s![start..end]).to_owned(),
        }
    }
}

/// The three partitions produced by `Dataset::split`.
#[derive(Clone, Debug)]
pub struct Split {
    pub training: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
}

/// `sin(2πx₁) · sin(2πx₂) · …`, the surface the network is fit to.
pub fn sin_product(x: ArrayView1<'_, f64>) -> f64 {
    x.iter().map(|&xi| (2.0 * PI * xi).sin()).product()
}
