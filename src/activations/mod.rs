//! # Activation Functions Module
//!
//! Scalar activation functions applied neuron by neuron during the forward
//! pass. Hidden layers and the output layer each get their own function,
//! chosen in the [`crate::network::NetworkConfig`].
//!
//! ## Available Activations
//!
//! - **Sigmoid**: `e^x / (1 + e^x)` - Outputs between 0 and 1 (the default)
//! - **Step**: `0` below zero, `1` otherwise - Hard threshold
//! - **Tanh**: `2 / (1 + e^(-2x)) - 1` - Outputs between -1 and 1
//! - **ReLU**: `max(0, x)` - Rectified linear unit
//! - **LeakyReLU**: `0.01x` below zero, `x` otherwise - Prevents dead neurons
//! - **Identity**: No transformation
//!
//! ## Usage Example
//!
//! ```rust
//! use qbrain::activations::Activation;
//!
//! let sigmoid = Activation::Sigmoid;
//! assert!((sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
//!
//! let relu = Activation::Relu;
//! assert_eq!(relu.apply(-2.0), 0.0);
//! ```

pub mod functions;

pub use functions::Activation;
