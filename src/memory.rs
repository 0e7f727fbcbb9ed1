use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::error::{QBrainError, Result};
use crate::network::NeuralNetwork;

/// One recorded (state, reward) sample used for later training.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub states: Array1<f64>,
    pub reward: f64,
}

impl Experience {
    pub fn new(reward: f64, states: Array1<f64>) -> Self {
        Experience { states, reward }
    }
}

/// Bounded FIFO buffer of experiences, persisted together with the network's
/// weights as one memory file per agent.
#[derive(Clone, Debug)]
pub struct Memory {
    experiences: VecDeque<Experience>,
    capacity: usize,
}

// On-disk document: { "layers": [...], "experiences": [...] }. Biases are not
// persisted; load assumes an already-initialized network of matching topology.
#[derive(Serialize, Deserialize)]
struct MemoryFile {
    layers: Vec<LayerRecord>,
    experiences: Vec<ExperienceRecord>,
}

#[derive(Serialize, Deserialize)]
struct LayerRecord {
    neurons: Vec<NeuronRecord>,
}

#[derive(Serialize, Deserialize)]
struct NeuronRecord {
    weights: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct ExperienceRecord {
    reward: f64,
    states: Vec<f64>,
}

impl Memory {
    /// Create an empty memory with a fixed capacity. The capacity cannot be
    /// changed afterwards.
    pub fn new(capacity: usize) -> Self {
        Memory {
            experiences: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an experience, evicting the oldest entry when at capacity.
    pub fn add(&mut self, experience: Experience) {
        if self.experiences.len() >= self.capacity {
            self.experiences.pop_front();
        }
        self.experiences.push_back(experience);
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Experience> {
        self.experiences.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.experiences.iter()
    }

    pub fn clear(&mut self) {
        self.experiences.clear();
    }

    /// Write the network's weights and the experience buffer to one JSON
    /// document. A missing directory surfaces as an IO error; there is no
    /// retry or fallback.
    pub fn save<P: AsRef<Path>>(&self, path: P, network: &NeuralNetwork) -> Result<()> {
        let file = MemoryFile {
            layers: network
                .layers
                .iter()
                .map(|layer| LayerRecord {
                    neurons: layer
                        .neurons
                        .iter()
                        .map(|neuron| NeuronRecord {
                            weights: neuron.weights.to_vec(),
                        })
                        .collect(),
                })
                .collect(),
            experiences: self
                .experiences
                .iter()
                .map(|e| ExperienceRecord {
                    reward: e.reward,
                    states: e.states.to_vec(),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path.as_ref(), json)?;
        log::info!(
            "saved {} experience(s) and network weights to {}",
            file.experiences.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Load a memory file, restoring the network's weights and replacing the
    /// experience buffer wholesale.
    ///
    /// Layer, neuron and weight counts are checked against the live network
    /// before anything is mutated; a mismatch is a dimension error, not
    /// undefined behavior. An experience list longer than this memory's
    /// capacity is truncated to the most recent entries.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, network: &mut NeuralNetwork) -> Result<()> {
        let json = fs::read_to_string(path.as_ref())?;
        let file: MemoryFile = serde_json::from_str(&json)?;

        if file.layers.len() != network.layers.len() {
            return Err(QBrainError::dimension_mismatch(
                format!("{} layers", network.layers.len()),
                format!("{} layers", file.layers.len()),
            ));
        }
        for (l, (layer, record)) in network.layers.iter().zip(file.layers.iter()).enumerate() {
            if record.neurons.len() != layer.neurons.len() {
                return Err(QBrainError::dimension_mismatch(
                    format!("{} neurons in layer {}", layer.neurons.len(), l),
                    format!("{} neurons in layer {}", record.neurons.len(), l),
                ));
            }
            for (n, (neuron, neuron_record)) in
                layer.neurons.iter().zip(record.neurons.iter()).enumerate()
            {
                if neuron_record.weights.len() != neuron.weights.len() {
                    return Err(QBrainError::dimension_mismatch(
                        format!("{} weights in layer {} neuron {}", neuron.weights.len(), l, n),
                        format!(
                            "{} weights in layer {} neuron {}",
                            neuron_record.weights.len(),
                            l,
                            n
                        ),
                    ));
                }
            }
        }

        for (layer, record) in network.layers.iter_mut().zip(file.layers.iter()) {
            for (neuron, neuron_record) in layer.neurons.iter_mut().zip(record.neurons.iter()) {
                for (k, &w) in neuron_record.weights.iter().enumerate() {
                    neuron.weights[k] = w;
                }
            }
        }

        let total = file.experiences.len();
        let skip = total.saturating_sub(self.capacity);
        if skip > 0 {
            log::warn!(
                "memory file holds {} experience(s) but capacity is {}; keeping the {} most recent",
                total,
                self.capacity,
                self.capacity
            );
        }
        self.experiences = file
            .experiences
            .into_iter()
            .skip(skip)
            .map(|record| Experience {
                reward: record.reward,
                states: Array1::from(record.states),
            })
            .collect();

        log::info!(
            "loaded {} experience(s) and network weights from {}",
            self.experiences.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
