//! Online backpropagation with validation-based early stopping.
//!
//! # Example
//!
//! ```
//! # use curve_fit::data::{sin_product, Dataset};
//! # use curve_fit::network::Network;
//! # use curve_fit::trainer::*;
//! # use rand::{rngs::StdRng, SeedableRng};
//! let mut rng = StdRng::seed_from_u64(0);
//! let data = Dataset::generate(&mut rng, 200, 2, sin_product);
//! let split = data.split(0.15, 0.15).unwrap();
//!
//! let config = TrainerConfig::default()
//!     .learning_rate(0.05)
//!     .max_epoch(20)
//!     .seed(1)
//!     .logging(Logging::Silent);
//! let network = Network::new(2, 4, 2).unwrap();
//! let mut trainer = Trainer::new(network, split.training, split.validation, config).unwrap();
//!
//! let summary = trainer.train();
//! assert!(summary.epoch_count <= 20);
//! let prediction = trainer.predict(&[0.25, 0.25]);
//! assert!(prediction.is_finite());
//! ```

use std::time::Instant;

use itertools::multizip;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::utils::{outer_into, squared_error};

/// Hyperparameters for a `Trainer`.
///
/// The defaults are:
///
/// * A learning rate of 0.1.
/// * Stops after 1000 epochs.
/// * Stops once the validation error has grown on 40 epochs.
/// * Stops once the validation MSE drops to 1.0e-3.
/// * Weights seeded from entropy.
/// * Logs on training completion.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    pub max_epoch: usize,
    pub max_validation_checks: usize,
    pub error_threshold: f64,
    pub seed: Option<u64>,
    pub logging: Logging,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            learning_rate: 0.1,
            max_epoch: 1000,
            max_validation_checks: 40,
            error_threshold: 1.0e-3,
            seed: None,
            logging: Logging::Completion,
        }
    }
}

impl TrainerConfig {
    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the number of epochs after which training always stops.
    pub fn max_epoch(mut self, epochs: usize) -> Self {
        self.max_epoch = epochs;
        self
    }

    /// Sets how many epochs may end with a worse validation error than the
    /// one before before training stops.
    pub fn max_validation_checks(mut self, checks: usize) -> Self {
        self.max_validation_checks = checks;
        self
    }

    /// Sets the validation MSE at or below which training stops.
    pub fn error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Seeds the weight initialization.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logging {
    /// Nothing is logged above debug level
    Silent,
    /// A summary is logged at completion
    Completion,
    /// A summary is logged after every `n` epochs
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the end of `epoch`.
    fn epoch(&self, epoch: usize, mse: f64, validation_checks: usize) {
        debug!(epoch, mse, validation_checks, "validation sweep");
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                info!("Epoch {}:\tvalidation MSE={}\tchecks={}", epoch, mse, validation_checks);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, summary: &TrainingSummary, start_time: Instant) {
        if let Logging::Silent = self {
            return;
        }
        info!(
            "Stopped by {:?} after {} epochs in {:.2} seconds.",
            summary.stop_reason,
            summary.epoch_count,
            start_time.elapsed().as_secs_f64()
        );
        info!(
            "Validation checks: {}, last MSE: {}, final MSE: {}",
            summary.validation_check_count, summary.last_mse, summary.final_mse
        );
    }
}

/// Why training stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The epoch limit was reached.
    MaxEpoch,
    /// The validation error grew on too many epochs.
    ValidationChecks,
    /// The validation error dropped to the threshold.
    ErrorThreshold,
}

/// The outcome of `Trainer::train`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub epoch_count: usize,
    pub validation_check_count: usize,
    /// Validation MSE recorded by the last epoch that did not stop training.
    pub last_mse: f64,
    /// Validation MSE of the sweep that stopped training.
    pub final_mse: f64,
    pub stop_reason: StopReason,
}

/// Trains a `Network` one sample at a time.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    training: Dataset,
    validation: Dataset,
    config: TrainerConfig,
    /// Pending weight changes for the current sample, shaped like the
    /// network's weight matrices.
    adjustments: Vec<Array2<f64>>,
    /// Backpropagated error signal per neuron for the current sample.
    deltas: Vec<Array1<f64>>,
    epoch: usize,
    validation_checks: usize,
    last_mse: f64,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// Returns an error if either dataset is empty, if the data does not
    /// match the network's input width, or if the configuration can't
    /// terminate sensibly.
    pub fn new(
        network: Network,
        training: Dataset,
        validation: Dataset,
        config: TrainerConfig,
    ) -> Result<Self> {
        if training.is_empty() {
            return Err(Error::EmptyDataset("training"));
        }
        if validation.is_empty() {
            return Err(Error::EmptyDataset("validation"));
        }
        for data in [&training, &validation] {
            if data.feature_count() != network.feature_count() {
                return Err(Error::FeatureCountMismatch {
                    expected: network.feature_count(),
                    actual: data.feature_count(),
                });
            }
        }
        if !config.learning_rate.is_finite() || config.learning_rate < 0.0 {
            return Err(Error::InvalidLearningRate(config.learning_rate));
        }
        if config.max_epoch == 0 {
            return Err(Error::ZeroMaxEpoch);
        }

        let adjustments = network.weights().iter().map(|w| Array2::zeros(w.dim())).collect();
        let deltas = network.layers().iter().map(|l| Array1::zeros(l.len())).collect();
        Ok(Trainer {
            network,
            training,
            validation,
            config,
            adjustments,
            deltas,
            epoch: 0,
            validation_checks: 0,
            last_mse: 0.0,
        })
    }

    /// Randomizes the network's weights, then trains until the stopping
    /// policy fires.
    ///
    /// Each epoch feeds every training sample forward and backward in order,
    /// applying its weight changes immediately, and then measures the mean
    /// squared error over the validation set.
    pub fn train(&mut self) -> TrainingSummary {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.network.randomize_weights(&mut rng);
        self.epoch = 0;
        self.validation_checks = 0;
        self.last_mse = 0.0;

        let start_time = Instant::now();
        loop {
            self.epoch += 1;
            // Moved out so samples can be borrowed while the network updates.
            let training = std::mem::take(&mut self.training);
            for (input, target) in training.iter() {
                self.backpropagate(input, target);
                self.apply_adjustments();
            }
            self.training = training;

            let mse = mean_squared_error(&mut self.network, &self.validation);
            let stop = self.check_stop_condition(mse);
            self.config.logging.epoch(self.epoch, mse, self.validation_checks);
            if let Some(stop_reason) = stop {
                let summary = TrainingSummary {
                    epoch_count: self.epoch,
                    validation_check_count: self.validation_checks,
                    last_mse: self.last_mse,
                    final_mse: mse,
                    stop_reason,
                };
                self.config.logging.completion(&summary, start_time);
                return summary;
            }
        }
    }

    /// Runs the trained network on a single sample.
    pub fn predict(&mut self, input: &[f64]) -> f64 {
        self.network.test(input)
    }

    /// Returns the mean squared error of the network's predictions on `data`.
    pub fn mean_squared_error(&mut self, data: &Dataset) -> f64 {
        mean_squared_error(&mut self.network, data)
    }

    pub fn epoch_count(&self) -> usize {
        self.epoch
    }

    pub fn validation_check_count(&self) -> usize {
        self.validation_checks
    }

    pub fn last_mse(&self) -> f64 {
        self.last_mse
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Decides whether the epoch that produced `mse` ends training.
    ///
    /// The check counter only ever grows: an epoch whose error is worse than
    /// the previous epoch's bumps it, and an improvement leaves it alone.
    fn check_stop_condition(&mut self, mse: f64) -> Option<StopReason> {
        if self.epoch >= self.config.max_epoch {
            return Some(StopReason::MaxEpoch);
        }
        if self.validation_checks >= self.config.max_validation_checks {
            return Some(StopReason::ValidationChecks);
        }
        if mse <= self.config.error_threshold {
            return Some(StopReason::ErrorThreshold);
        }
        if mse > self.last_mse {
            self.validation_checks += 1;
        }
        self.last_mse = mse;
        None
    }

    /// Feeds `input` forward, then pushes the error against `target` back
    /// through the network, filling `deltas` and `adjustments`.
    ///
    /// The network's weights are only read here, so every delta is computed
    /// from the weights as they were before this sample.
    fn backpropagate(&mut self, input: ArrayView1<'_, f64>, target: f64) {
        let output_layer = self.network.layer_count();
        let prediction = self.network.forward(input);
        let output_net = self.network.layer(output_layer).neurons()[0].net_input;
        self.deltas[output_layer][0] =
            (target - prediction) * self.network.activator(output_layer).fprime(output_net);

        for i in (1..=output_layer).rev() {
            if i < output_layer {
                let propagated = self.network.weights()[i].dot(&self.deltas[i + 1]);
                let activator = self.network.activator(i);
                for (delta, &p, neuron) in multizip((
                    self.deltas[i].iter_mut(),
                    propagated.iter(),
                    self.network.layer(i).neurons(),
                )) {
                    *delta = p * activator.fprime(neuron.net_input);
                }
            }
            let inputs = self.network.layer(i - 1).activations();
            outer_into(
                &mut self.adjustments[i - 1],
                self.config.learning_rate,
                inputs.view(),
                self.deltas[i].view(),
            );
        }
    }

    fn apply_adjustments(&mut self) {
        self.network.apply_adjustments(&self.adjustments);
    }
}

/// Averages the squared prediction error over every sample in `data`.
fn mean_squared_error(network: &mut Network, data: &Dataset) -> f64 {
    assert!(!data.is_empty());
    let total: f64 = data
        .iter()
        .map(|(input, target)| squared_error(target, network.forward(input)))
        .sum();
    total / data.len() as f64
}
