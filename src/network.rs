use ndarray::{Array1, ArrayView1};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::activations::Activation;
use crate::error::{QBrainError, Result};

/// Configuration for a [`NeuralNetwork`]: topology, learning rate and
/// activation functions. Rebuilding a network from the same configuration
/// re-randomizes every weight and bias.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_hidden_layers: usize,
    pub neurons_per_hidden: usize,
    /// Learning rate, in [0, 1]
    pub alpha: f64,
    pub hidden_activation: Activation,
    pub output_activation: Activation,
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_inputs == 0 {
            return Err(QBrainError::invalid_parameter(
                "num_inputs",
                "must be at least 1",
            ));
        }
        if self.num_outputs == 0 {
            return Err(QBrainError::invalid_parameter(
                "num_outputs",
                "must be at least 1",
            ));
        }
        if self.num_hidden_layers > 0 && self.neurons_per_hidden == 0 {
            return Err(QBrainError::invalid_parameter(
                "neurons_per_hidden",
                "must be at least 1 when hidden layers are present",
            ));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(QBrainError::invalid_parameter(
                "alpha",
                "learning rate must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// A single neuron: one weight per input, a bias, and the values cached by
/// the last forward pass for use in the backward pass.
///
/// Weights and bias are initialized uniformly in [-1, 1].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Neuron {
    pub weights: Array1<f64>,
    pub bias: f64,
    output: f64,
    error_gradient: f64,
    inputs: Option<Array1<f64>>,
}

impl Neuron {
    fn new(num_inputs: usize) -> Self {
        Neuron {
            weights: Array1::random(num_inputs, Uniform::new(-1.0, 1.0)),
            bias: rand::thread_rng().gen_range(-1.0..1.0),
            output: 0.0,
            error_gradient: 0.0,
            inputs: None,
        }
    }

    /// Output cached by the most recent forward pass.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Error gradient cached by the most recent backward pass.
    pub fn error_gradient(&self) -> f64 {
        self.error_gradient
    }
}

/// An ordered group of neurons sharing the same input width.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    fn new(num_neurons: usize, num_inputs: usize) -> Self {
        Layer {
            neurons: (0..num_neurons).map(|_| Neuron::new(num_inputs)).collect(),
        }
    }
}

/// A feedforward neural network trained one sample at a time by
/// backpropagation.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use qbrain::activations::Activation;
/// use qbrain::network::{NetworkConfig, NeuralNetwork};
///
/// let config = NetworkConfig {
///     num_inputs: 3,
///     num_outputs: 2,
///     num_hidden_layers: 1,
///     neurons_per_hidden: 4,
///     alpha: 0.5,
///     hidden_activation: Activation::Sigmoid,
///     output_activation: Activation::Sigmoid,
/// };
/// let mut network = NeuralNetwork::new(config).unwrap();
///
/// let input = array![0.1, -0.2, 0.3];
/// let output = network.forward(input.view()).unwrap();
/// assert_eq!(output.len(), 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NeuralNetwork {
    pub config: NetworkConfig,
    pub layers: Vec<Layer>,
}

impl NeuralNetwork {
    /// Create a network from a validated configuration. All weights and
    /// biases start at independent uniform random values in [-1, 1].
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        let mut network = NeuralNetwork {
            config,
            layers: Vec::new(),
        };
        network.rebuild();
        Ok(network)
    }

    /// Rebuild the layer sequence from the configuration, re-randomizing
    /// every weight and bias.
    pub fn rebuild(&mut self) {
        let config = self.config;
        let mut layers = Vec::with_capacity(config.num_hidden_layers + 1);
        if config.num_hidden_layers > 0 {
            layers.push(Layer::new(config.neurons_per_hidden, config.num_inputs));
            for _ in 1..config.num_hidden_layers {
                layers.push(Layer::new(
                    config.neurons_per_hidden,
                    config.neurons_per_hidden,
                ));
            }
            layers.push(Layer::new(config.num_outputs, config.neurons_per_hidden));
        } else {
            layers.push(Layer::new(config.num_outputs, config.num_inputs));
        }
        self.layers = layers;
    }

    /// Run one forward pass and return the output layer's values.
    ///
    /// Every neuron's cached output and input vector are overwritten; the
    /// backward pass reads them.
    pub fn forward(&mut self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        if input.len() != self.config.num_inputs {
            return Err(QBrainError::dimension_mismatch(
                format!("{} inputs", self.config.num_inputs),
                format!("{} inputs", input.len()),
            ));
        }

        let config = self.config;
        let last = self.layers.len() - 1;
        let mut current = input.to_owned();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let activation = if i == last {
                config.output_activation
            } else {
                config.hidden_activation
            };
            let mut outputs = Array1::zeros(layer.neurons.len());
            for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                let n = neuron.weights.dot(&current) - neuron.bias;
                neuron.inputs = Some(current.clone());
                neuron.output = activation.apply(n);
                outputs[j] = neuron.output;
            }
            current = outputs;
        }
        Ok(current)
    }

    /// Run a forward pass, backpropagate towards `desired`, and return the
    /// forward result.
    pub fn train(
        &mut self,
        input: ArrayView1<f64>,
        desired: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        if desired.len() != self.config.num_outputs {
            return Err(QBrainError::dimension_mismatch(
                format!("{} outputs", self.config.num_outputs),
                format!("{} outputs", desired.len()),
            ));
        }
        let outputs = self.forward(input)?;
        self.backpropagate(&outputs, desired);
        Ok(outputs)
    }

    /// Backpropagation, processing layers from last to first and updating
    /// weights in place as it goes, so an earlier layer's gradient sum reads
    /// the later layer's already-updated weights.
    ///
    /// Two deliberate quirks carried from the original learning rule: the
    /// output layer's gradient always uses the sigmoid-derivative form
    /// `output * (1 - output)` whatever the configured output activation,
    /// and its weight update uses the raw error while hidden layers use the
    /// propagated gradient.
    fn backpropagate(&mut self, outputs: &Array1<f64>, desired: ArrayView1<f64>) {
        let alpha = self.config.alpha;
        let last = self.layers.len() - 1;

        for i in (0..=last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let layer = &mut head[i];

            if i == last {
                for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                    let error = desired[j] - outputs[j];
                    neuron.error_gradient = outputs[j] * (1.0 - outputs[j]) * error;
                    let inputs = neuron
                        .inputs
                        .as_ref()
                        .expect("no cached inputs; forward() must run before backpropagation");
                    for k in 0..neuron.weights.len() {
                        neuron.weights[k] += alpha * inputs[k] * error;
                    }
                    neuron.bias += alpha * -1.0 * neuron.error_gradient;
                }
            } else {
                let next = &tail[0];
                for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                    let gradient_sum: f64 = next
                        .neurons
                        .iter()
                        .map(|n| n.error_gradient * n.weights[j])
                        .sum();
                    neuron.error_gradient = neuron.output * (1.0 - neuron.output) * gradient_sum;
                    let inputs = neuron
                        .inputs
                        .as_ref()
                        .expect("no cached inputs; forward() must run before backpropagation");
                    for k in 0..neuron.weights.len() {
                        neuron.weights[k] += alpha * inputs[k] * neuron.error_gradient;
                    }
                    neuron.bias += alpha * -1.0 * neuron.error_gradient;
                }
            }
        }
    }

    /// Flatten every weight (biases excluded) layer by layer, neuron by
    /// neuron, input by input, into a comma-joined decimal string.
    pub fn serialize_weights(&self) -> String {
        let mut tokens = Vec::new();
        for layer in &self.layers {
            for neuron in &layer.neurons {
                for w in neuron.weights.iter() {
                    tokens.push(w.to_string());
                }
            }
        }
        tokens.join(",")
    }

    /// Load a flat weight sequence produced by [`serialize_weights`].
    ///
    /// An empty payload is a no-op. The token count is checked against the
    /// live topology before any weight is mutated.
    ///
    /// [`serialize_weights`]: NeuralNetwork::serialize_weights
    pub fn load_weights(&mut self, weights: &str) -> Result<()> {
        if weights.is_empty() {
            return Ok(());
        }

        let values = weights
            .split(',')
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    QBrainError::SerializationError(format!("invalid weight token '{}'", token))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let expected: usize = self
            .layers
            .iter()
            .flat_map(|l| l.neurons.iter())
            .map(|n| n.weights.len())
            .sum();
        if values.len() != expected {
            return Err(QBrainError::dimension_mismatch(
                format!("{} weights", expected),
                format!("{} weights", values.len()),
            ));
        }

        let mut values = values.into_iter();
        for layer in &mut self.layers {
            for neuron in &mut layer.neurons {
                for k in 0..neuron.weights.len() {
                    if let Some(w) = values.next() {
                        neuron.weights[k] = w;
                    }
                }
            }
        }
        Ok(())
    }

    /// Save the network's state to a file as a binary snapshot.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a network from a binary snapshot written by [`save`].
    ///
    /// [`save`]: NeuralNetwork::save
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let deserialized: Self = bincode::deserialize(&buffer)?;
        Ok(deserialized)
    }
}
