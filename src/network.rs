//! A layered [feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) for scalar
//! regression.
//!
//! The network keeps every neuron's state in place, addressed by layer and
//! neuron index. Layer 0 holds the inputs, layers `1..L` are ReLU hidden
//! layers and layer `L` is a single linear output neuron. Every layer except
//! the output ends with a bias neuron.
//!
//! # Example
//!
//! ```
//! # use curve_fit::network::Network;
//! # use rand::{rngs::StdRng, SeedableRng};
//! let mut network = Network::new(2, 4, 2).unwrap();
//! network.randomize_weights(&mut StdRng::seed_from_u64(7));
//! let prediction = network.test(&[0.25, 0.75]);
//! assert!(prediction.is_finite());
//! ```

use ndarray::{s, Array2, ArrayView1};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::utils::{Back, Front};

/// A feedforward network with one output neuron.
#[derive(Clone, Debug)]
pub struct Network {
    /// Neuron state for each layer, input first.
    layers: Vec<Layer>,
    /// `weights[i]` maps the activations of layer `i` onto the net inputs of
    /// layer `i + 1`, indexed `[source, target]`.
    weights: Vec<Array2<f64>>,
    /// Transfer function of the hidden neurons.
    hidden: Activator,
    /// Transfer function of the output neuron.
    output: Activator,
}

impl Network {
    /// Creates a new, untrained network with all weights set to zero.
    ///
    /// Arguments:
    ///  * `feature_count` - the number of inputs per sample.
    ///  * `hidden_width` - the number of neurons in each hidden layer,
    ///                     counting its bias neuron.
    ///  * `layer_count` - the number of weight matrices, i.e. one more than
    ///                    the number of hidden layers.
    pub fn new(feature_count: usize, hidden_width: usize, layer_count: usize) -> Result<Self> {
        if feature_count == 0 {
            return Err(Error::NoFeatures);
        }
        if layer_count == 0 {
            return Err(Error::NoLayers);
        }
        if layer_count > 1 && hidden_width < 2 {
            return Err(Error::HiddenLayerTooNarrow(hidden_width));
        }

        let mut layers = Vec::with_capacity(layer_count + 1);
        layers.push(Layer::new(feature_count, true));
        for _ in 1..layer_count {
            layers.push(Layer::new(hidden_width - 1, true));
        }
        layers.push(Layer::new(1, false));

        let weights = layers
            .windows(2)
            .map(|pair| Array2::zeros((pair[0].len(), pair[1].len())))
            .collect();

        Ok(Network {
            layers,
            weights,
            hidden: Activator::ReLU,
            output: Activator::Identity,
        })
    }

    /// Returns the number of input features the network expects.
    pub fn feature_count(&self) -> usize {
        self.layers.front().trainable_len()
    }

    /// Returns the number of weight matrices.
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Returns layer `index`, where 0 is the input layer.
    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn weights(&self) -> &[Array2<f64>] {
        &self.weights
    }

    #[cfg(test)]
    pub(crate) fn weights_mut(&mut self) -> &mut [Array2<f64>] {
        &mut self.weights
    }

    /// Returns the activation function used by the neurons of layer `index`.
    pub fn activator(&self, index: usize) -> Activator {
        if index == self.layer_count() {
            self.output
        } else {
            self.hidden
        }
    }

    /// Returns the current activation of the output neuron.
    pub fn output(&self) -> f64 {
        self.layers.back().neurons()[0].activation
    }

    /// Draws every trainable weight uniformly from `[-0.5, 0.5)`.
    ///
    /// Columns that lead into a bias neuron stay zero: nothing feeds a bias
    /// neuron, so those weights are never read.
    pub fn randomize_weights<R: Rng>(&mut self, rng: &mut R) {
        let range = Uniform::new(-0.5, 0.5);
        for (i, weights) in self.weights.iter_mut().enumerate() {
            let targets = self.layers[i + 1].trainable_len();
            for w in weights.slice_mut(s![.., ..targets]).iter_mut() {
                *w = range.sample(rng);
            }
        }
    }

    /// Feeds `input` forward through the network and returns the output.
    ///
    /// Every neuron's `net_input` and `activation` is left in place for a
    /// following backward pass. Bias neurons are never written.
    pub fn forward(&mut self, input: ArrayView1<'_, f64>) -> f64 {
        assert_eq!(input.len(), self.feature_count());
        for (neuron, &x) in self.layers.mut_front().trainable_mut().iter_mut().zip(input) {
            neuron.activation = x;
        }

        for i in 1..self.layers.len() {
            let activator = self.activator(i);
            let (below, above) = self.layers.split_at_mut(i);
            let inputs = below.back().activations();
            let weights = &self.weights[i - 1];
            for (j, neuron) in above[0].trainable_mut().iter_mut().enumerate() {
                let net = inputs.dot(&weights.column(j));
                neuron.net_input = net;
                neuron.activation = activator.f(net);
            }
        }
        self.output()
    }

    /// Runs the network on a single sample and returns its prediction.
    ///
    /// Inputs outside the range the network was trained on are extrapolated,
    /// not rejected.
    pub fn test(&mut self, input: &[f64]) -> f64 {
        self.forward(ArrayView1::from(input))
    }

    /// Adds `adjustments[i]` into `weights[i]` for every trainable weight.
    ///
    /// Columns leading into bias neurons are left untouched.
    pub(crate) fn apply_adjustments(&mut self, adjustments: &[Array2<f64>]) {
        assert_eq!(adjustments.len(), self.weights.len());
        for (i, (weights, adjustment)) in self.weights.iter_mut().zip(adjustments).enumerate() {
            let targets = self.layers[i + 1].trainable_len();
            let mut trainable = weights.slice_mut(s![.., ..targets]);
            trainable += &adjustment.slice(s![.., ..targets]);
        }
    }
}
