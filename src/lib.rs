//! # qbrain - Embedded Q-Learning for Interactive Agents
//!
//! qbrain pairs a small feedforward neural network with a single-step
//! Q-learning loop so an interactive agent can learn a control policy online
//! from immediate rewards. The host environment supplies state vectors and
//! executes chosen actions each tick; qbrain decides, records experience and
//! periodically retrains the network from its bounded replay memory.
//!
//! ## Key Pieces
//!
//! - **Network Engine**: layered per-neuron network with forward inference,
//!   backpropagation training and flat weight (de)serialization
//! - **Memory**: bounded FIFO experience buffer persisted to one JSON file
//!   together with the network's weights
//! - **Agent Loop**: epsilon-greedy action selection with a decaying explore
//!   rate, and full-buffer reverse-replay temporal-difference training
//! - **Driver Seam**: a capability trait the host implements; the loop is
//!   generic over it and a startup self-check validates it before running
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qbrain::builders::QAgentBuilder;
//! use qbrain::activations::Activation;
//!
//! let mut agent = QAgentBuilder::new()
//!     .topology(3, 2, 1, 4)       // inputs, outputs, hidden layers, neurons per hidden
//!     .learning_rate(0.5)
//!     .hidden_activation(Activation::Sigmoid)
//!     .output_activation(Activation::Sigmoid)
//!     .memory_capacity(1000)
//!     .discount(0.9)
//!     .build()
//!     .unwrap();
//!
//! // let mut driver = ...;        // your AgentDriver implementation
//! // agent.validate(&mut driver).unwrap();
//! // loop { agent.run(&mut driver).unwrap(); }
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Scalar activation functions (Sigmoid, Step, Tanh, ...)
//! - [`agent`] - The Q-learning agent, driver trait and softmax helpers
//! - [`builders`] - Builder patterns for convenient object construction
//! - [`error`] - Error types and result handling
//! - [`memory`] - Bounded experience buffer and its persistence format
//! - [`network`] - Core neural network implementation

pub mod activations;
pub mod agent;
pub mod builders;
pub mod error;
pub mod memory;
pub mod network;

#[cfg(test)]
mod tests;
