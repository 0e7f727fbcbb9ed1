//! Q-learning agent loop: epsilon-greedy action selection, reward
//! bookkeeping and single-step temporal-difference training over the full
//! experience buffer.

mod driver;

pub use driver::AgentDriver;

use ndarray::{Array1, ArrayView1};
use rand::{rngs::ThreadRng, Rng};

use crate::error::{QBrainError, Result};
use crate::memory::{Experience, Memory};
use crate::network::NeuralNetwork;

/// Reward value interpreted as an episode-ending failure during replay.
pub const TERMINAL_REWARD: f64 = -1.0;

/// Normalize raw network outputs into a probability-like distribution.
///
/// The maximum is subtracted before exponentiation for numeric stability; a
/// zero normalizer is treated as 1 to avoid division by zero.
pub fn softmax(values: ArrayView1<f64>) -> Array1<f64> {
    let max = values.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let exps = values.mapv(|v| (v - max).exp());
    let mut scale = exps.sum();
    if scale == 0.0 {
        scale = 1.0;
    }
    exps / scale
}

/// Index of the maximum value, ties broken by first occurrence.
pub fn argmax(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Epsilon-greedy exploration settings. The rate is a percentage in
/// `[min_rate, max_rate]` and decays by `decay` on every decision while
/// enabled, never dropping below `min_rate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exploration {
    pub enabled: bool,
    pub rate: f64,
    pub max_rate: f64,
    pub min_rate: f64,
    pub decay: f64,
}

impl Default for Exploration {
    fn default() -> Self {
        Exploration {
            enabled: true,
            rate: 100.0,
            max_rate: 100.0,
            min_rate: 0.01,
            decay: 0.001,
        }
    }
}

/// A Q-learning agent: one network, one experience memory, and the
/// decision/training cycle run once per external tick.
///
/// # Example
///
/// ```rust,no_run
/// use qbrain::builders::QAgentBuilder;
///
/// let mut agent = QAgentBuilder::new()
///     .topology(3, 2, 1, 4)
///     .learning_rate(0.5)
///     .memory_capacity(1000)
///     .discount(0.9)
///     .build()
///     .unwrap();
///
/// // validate(&mut driver) once at startup, then run(&mut driver) each tick
/// ```
pub struct QAgent {
    pub network: NeuralNetwork,
    pub memory: Memory,
    /// Discount applied to the next state's estimated value, in [0, 1]
    pub discount: f64,
    /// When false, run() decides and acts but never records or trains
    pub can_train: bool,
    pub exploration: Exploration,
    validated: bool,
    rng: ThreadRng,
}

impl QAgent {
    /// Create an agent with the original quality defaults: discount 0.99,
    /// training enabled, exploration enabled starting at 100%.
    pub fn new(network: NeuralNetwork, memory: Memory) -> Self {
        QAgent {
            network,
            memory,
            discount: 0.99,
            can_train: true,
            exploration: Exploration::default(),
            validated: false,
            rng: rand::thread_rng(),
        }
    }

    /// Select an action for the given state vector.
    ///
    /// Returns the chosen index and its softmax value. While exploration is
    /// enabled the explore rate decays on every call, and with probability
    /// `rate / 100` a uniformly random index replaces the greedy one.
    pub fn decide(&mut self, states: ArrayView1<f64>) -> Result<(usize, f64)> {
        let raw = self.network.forward(states)?;
        let q_values = softmax(raw.view());
        let mut index = argmax(q_values.view());

        if self.exploration.enabled {
            let decayed = self.exploration.rate - self.exploration.decay;
            self.exploration.rate = decayed
                .max(self.exploration.min_rate)
                .min(self.exploration.max_rate);

            if self.rng.gen_range(0.0..100.0) < self.exploration.rate {
                index = self.rng.gen_range(0..q_values.len());
            }
        }

        Ok((index, q_values[index]))
    }

    /// Append an experience and, when `train_now` is set, replay the whole
    /// buffer through the network and fire the driver's post-training hook.
    pub fn record_and_maybe_train<D: AgentDriver>(
        &mut self,
        states: Array1<f64>,
        reward: f64,
        train_now: bool,
        driver: &mut D,
    ) -> Result<()> {
        self.memory.add(Experience::new(reward, states));
        if train_now {
            self.train_from_replay()?;
            driver.post_training();
        }
        Ok(())
    }

    /// Replay every recorded experience, newest to oldest, training the
    /// network on a temporal-difference target for each.
    ///
    /// The newest experience and any experience whose reward equals
    /// [`TERMINAL_REWARD`] are treated as terminal: their target is the raw
    /// reward. Every other target is `reward + discount * max(Q(next))`
    /// where `next` is the chronologically following experience.
    pub fn train_from_replay(&mut self) -> Result<()> {
        let count = self.memory.len();
        log::debug!("training from replay over {} experience(s)", count);

        for i in (0..count).rev() {
            let Some(experience) = self.memory.get(i) else {
                break;
            };

            let mut outputs_old = softmax(self.network.forward(experience.states.view())?.view());
            let action = argmax(outputs_old.view());

            let terminal = i == count - 1 || experience.reward == TERMINAL_REWARD;
            let feedback = if terminal {
                experience.reward
            } else {
                let Some(next) = self.memory.get(i + 1) else {
                    break;
                };
                let outputs_next = softmax(self.network.forward(next.states.view())?.view());
                let max_q = outputs_next.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                experience.reward + self.discount * max_q
            };

            outputs_old[action] = feedback;
            self.network.train(experience.states.view(), outputs_old.view())?;
        }
        Ok(())
    }

    /// Run one tick of the decision loop: read states, decide, act, and
    /// (when training is enabled) record the reward and train when the
    /// driver says so.
    ///
    /// Refuses to run until [`validate`] has passed.
    ///
    /// [`validate`]: QAgent::validate
    pub fn run<D: AgentDriver>(&mut self, driver: &mut D) -> Result<()> {
        if !self.validated {
            return Err(QBrainError::NotValidated);
        }

        let states = driver.states();
        let (action, confidence) = self.decide(states.view())?;
        driver.perform_action(action, confidence)?;

        if self.can_train {
            let reward = driver.reward();
            let train_now = driver.should_train();
            self.record_and_maybe_train(states, reward, train_now, driver)?;
        }
        Ok(())
    }

    /// Startup self-check: verifies the driver's state arity against the
    /// network and probes `perform_action` across the whole index range.
    ///
    /// All detected issues are aggregated into one error rather than failing
    /// on the first; the decision loop stays locked until a check passes.
    pub fn validate<D: AgentDriver>(&mut self, driver: &mut D) -> Result<()> {
        let mut errors = Vec::new();

        let state_count = driver.states().len();
        if state_count != self.network.config.num_inputs {
            errors.push(format!(
                "states() should return as many values as the network has inputs \
                 ({} returned for {} inputs)",
                state_count, self.network.config.num_inputs
            ));
        }

        for action in 0..self.network.config.num_outputs {
            if let Err(err) = driver.perform_action(action, 0.0) {
                errors.push(format!(
                    "perform_action() failed for index {} of {}: {}",
                    action, self.network.config.num_outputs, err
                ));
            }
        }

        if errors.is_empty() {
            self.validated = true;
            Ok(())
        } else {
            self.validated = false;
            for error in &errors {
                log::warn!("agent self-check: {}", error);
            }
            Err(QBrainError::InvalidAgent { errors })
        }
    }

    /// Whether the startup self-check has passed.
    pub fn is_validated(&self) -> bool {
        self.validated
    }
}
