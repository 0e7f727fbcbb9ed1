use ndarray::Array1;

use crate::error::Result;

/// Capability set an agent's host environment must provide.
///
/// Replaces inheritance with a seam: the decision loop is generic over this
/// trait and calls it once per tick.
pub trait AgentDriver {
    /// Current state vector. Its length must equal the network's input
    /// count; [`QAgent::validate`] checks this once at startup.
    ///
    /// [`QAgent::validate`]: crate::agent::QAgent::validate
    fn states(&self) -> Array1<f64>;

    /// Execute the chosen action. `action` is in `[0, num_outputs)`;
    /// `confidence` is the softmax value of the chosen output. A driver that
    /// cannot handle an index returns [`QBrainError::InvalidAction`].
    ///
    /// [`QBrainError::InvalidAction`]: crate::error::QBrainError::InvalidAction
    fn perform_action(&mut self, action: usize, confidence: f64) -> Result<()>;

    /// Reward for the current state, in [-1, 1] by convention. The value
    /// [`TERMINAL_REWARD`] marks the end of an episode.
    ///
    /// [`TERMINAL_REWARD`]: crate::agent::TERMINAL_REWARD
    fn reward(&self) -> f64;

    /// Whether a training pass should run this tick.
    fn should_train(&self) -> bool;

    /// Return the environment to its default state. Invoked by the host, not
    /// by the decision loop.
    fn reset_to_default(&mut self);

    /// Called after each training pass, e.g. to reset episode state.
    fn post_training(&mut self) {}
}
