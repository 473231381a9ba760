//! Transfer functions.

use serde::{Deserialize, Serialize};

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
///
/// Hidden neurons use `ReLU`; the single output neuron is linear so the
/// network can regress any real value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Passes the net input through unchanged
    Identity,
}

impl Activator {
    /// Evaluates `f(x)` for the selected activation function.
    pub fn f(&self, x: f64) -> f64 {
        match self {
            Activator::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activator::Identity => x,
        }
    }

    /// Evaluates the derivative `f'(x)`.
    ///
    /// Unlike the output-based shortcut some networks use, this takes the
    /// *net input* `x`, which every neuron keeps around after a forward pass.
    /// The ReLU derivative at exactly zero is taken to be zero.
    pub fn fprime(&self, x: f64) -> f64 {
        match self {
            Activator::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::Identity => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_clamps_negative_inputs() {
        assert_eq!(Activator::ReLU.f(-3.0), 0.0);
        assert_eq!(Activator::ReLU.f(0.0), 0.0);
        assert_eq!(Activator::ReLU.f(2.5), 2.5);
    }

    #[test]
    fn relu_derivative_is_a_step() {
        assert_eq!(Activator::ReLU.fprime(-1.0), 0.0);
        assert_eq!(Activator::ReLU.fprime(0.0), 0.0);
        assert_eq!(Activator::ReLU.fprime(1e-9), 1.0);
    }

    #[test]
    fn identity_is_linear() {
        assert_eq!(Activator::Identity.f(-0.75), -0.75);
        assert_eq!(Activator::Identity.fprime(-0.75), 1.0);
        assert_eq!(Activator::Identity.fprime(12.0), 1.0);
    }
}
