use ndarray::Array1;

/// The state a single neuron carries between a forward and a backward pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Neuron {
    /// Output of the neuron after its transfer function.
    pub activation: f64,
    /// Weighted sum of the previous layer, kept for the derivative.
    pub net_input: f64,
}

impl Neuron {
    fn bias() -> Self {
        Neuron {
            activation: 1.0,
            net_input: 0.0,
        }
    }
}

/// A single layer of neurons in the network.
///
/// When `has_bias` is set, the last neuron is the bias neuron: its activation
/// is pinned to 1.0 and it never receives input from the layer below.
#[derive(Clone, Debug)]
pub struct Layer {
    neurons: Vec<Neuron>,
    has_bias: bool,
}

impl Layer {
    /// Creates a layer of `trainable` zeroed neurons, followed by a bias
    /// neuron if `has_bias` is set.
    pub fn new(trainable: usize, has_bias: bool) -> Self {
        let mut neurons = vec![Neuron::default(); trainable];
        if has_bias {
            neurons.push(Neuron::bias());
        }
        Layer { neurons, has_bias }
    }

    /// Returns the number of neurons, bias included.
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Returns the number of neurons that are fed by the previous layer.
    pub fn trainable_len(&self) -> usize {
        if self.has_bias {
            self.neurons.len() - 1
        } else {
            self.neurons.len()
        }
    }

    pub fn has_bias(&self) -> bool {
        self.has_bias
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Returns the neurons fed by the previous layer, leaving the bias out.
    pub fn trainable_mut(&mut self) -> &mut [Neuron] {
        let n = self.trainable_len();
        &mut self.neurons[..n]
    }

    /// Collects every activation in the layer, bias included.
    pub fn activations(&self) -> Array1<f64> {
        self.neurons.iter().map(|n| n.activation).collect()
    }
}
