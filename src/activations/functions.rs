use serde::{Deserialize, Serialize};

/// An enumeration of the activation functions a network layer can use.
///
/// The set is closed; `Sigmoid` is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Sigmoid,
    Step,
    Tanh,
    Relu,
    LeakyRelu,
    Identity,
}

impl Activation {
    /// Apply the activation function to a single value.
    ///
    /// Pure and total: no input produces an error.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let k = x.exp();
                k / (1.0 + k)
            }
            Activation::Step => {
                if x < 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Activation::Tanh => 2.0 / (1.0 + (-2.0 * x).exp()) - 1.0,
            Activation::Relu => {
                if x < 0.0 {
                    0.0
                } else {
                    x
                }
            }
            Activation::LeakyRelu => {
                if x < 0.0 {
                    0.01 * x
                } else {
                    x
                }
            }
            Activation::Identity => x,
        }
    }
}
