//! Builder patterns for convenient object construction.

use crate::activations::Activation;
use crate::agent::{Exploration, QAgent};
use crate::error::{QBrainError, Result};
use crate::memory::Memory;
use crate::network::{NetworkConfig, NeuralNetwork};

/// Builder for [`QAgent`] with a fluent API.
///
/// Topology and learning rate are required; everything else falls back to
/// the original defaults (sigmoid activations, memory capacity 1000,
/// discount 0.99, exploration enabled from 100%).
pub struct QAgentBuilder {
    topology: Option<(usize, usize, usize, usize)>,
    learning_rate: Option<f64>,
    hidden_activation: Activation,
    output_activation: Activation,
    memory_capacity: usize,
    discount: f64,
    exploration: Exploration,
    can_train: bool,
}

impl QAgentBuilder {
    pub fn new() -> Self {
        QAgentBuilder {
            topology: None,
            learning_rate: None,
            hidden_activation: Activation::default(),
            output_activation: Activation::default(),
            memory_capacity: 1000,
            discount: 0.99,
            exploration: Exploration::default(),
            can_train: true,
        }
    }

    /// Set inputs, outputs, hidden layer count and neurons per hidden layer.
    pub fn topology(
        mut self,
        num_inputs: usize,
        num_outputs: usize,
        num_hidden_layers: usize,
        neurons_per_hidden: usize,
    ) -> Self {
        self.topology = Some((num_inputs, num_outputs, num_hidden_layers, neurons_per_hidden));
        self
    }

    pub fn learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = Some(alpha);
        self
    }

    pub fn hidden_activation(mut self, activation: Activation) -> Self {
        self.hidden_activation = activation;
        self
    }

    pub fn output_activation(mut self, activation: Activation) -> Self {
        self.output_activation = activation;
        self
    }

    pub fn memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Replace the exploration settings wholesale. The rate is reset to
    /// `max_rate` when the agent is built.
    pub fn exploration(mut self, exploration: Exploration) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn disable_exploration(mut self) -> Self {
        self.exploration.enabled = false;
        self
    }

    pub fn can_train(mut self, can_train: bool) -> Self {
        self.can_train = can_train;
        self
    }

    pub fn build(self) -> Result<QAgent> {
        let (num_inputs, num_outputs, num_hidden_layers, neurons_per_hidden) =
            self.topology.ok_or_else(|| {
                QBrainError::invalid_parameter("topology", "topology must be specified")
            })?;
        let alpha = self.learning_rate.ok_or_else(|| {
            QBrainError::invalid_parameter("learning_rate", "learning rate must be specified")
        })?;

        if !self.discount.is_finite() || !(0.0..=1.0).contains(&self.discount) {
            return Err(QBrainError::invalid_parameter(
                "discount",
                "must be in [0, 1]",
            ));
        }

        let e = &self.exploration;
        if e.min_rate > e.max_rate {
            return Err(QBrainError::invalid_parameter(
                "exploration",
                "min_rate must not exceed max_rate",
            ));
        }
        if !(0.0..=100.0).contains(&e.min_rate) || !(0.0..=100.0).contains(&e.max_rate) {
            return Err(QBrainError::invalid_parameter(
                "exploration",
                "rates must be in [0, 100]",
            ));
        }
        if !e.decay.is_finite() || e.decay < 0.0 {
            return Err(QBrainError::invalid_parameter(
                "exploration",
                "decay must be finite and non-negative",
            ));
        }

        let config = NetworkConfig {
            num_inputs,
            num_outputs,
            num_hidden_layers,
            neurons_per_hidden,
            alpha,
            hidden_activation: self.hidden_activation,
            output_activation: self.output_activation,
        };
        let network = NeuralNetwork::new(config)?;
        let memory = Memory::new(self.memory_capacity);

        let mut agent = QAgent::new(network, memory);
        agent.discount = self.discount;
        agent.can_train = self.can_train;
        agent.exploration = self.exploration;
        agent.exploration.rate = agent.exploration.max_rate;
        Ok(agent)
    }
}

impl Default for QAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
