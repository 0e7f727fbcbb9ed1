#[cfg(test)]
mod property_tests {
    use ndarray::Array1;
    use proptest::prelude::*;

    use qbrain::activations::Activation;
    use qbrain::agent::{softmax, Exploration};
    use qbrain::builders::QAgentBuilder;
    use qbrain::memory::{Experience, Memory};
    use qbrain::network::{NetworkConfig, NeuralNetwork};

    // Strategy for finite input vectors of modest magnitude
    fn finite_vec_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1000.0f64..1000.0, 1..32)
    }

    fn sigmoid_config(
        num_inputs: usize,
        num_outputs: usize,
        num_hidden_layers: usize,
        neurons_per_hidden: usize,
    ) -> NetworkConfig {
        NetworkConfig {
            num_inputs,
            num_outputs,
            num_hidden_layers,
            neurons_per_hidden,
            alpha: 0.5,
            hidden_activation: Activation::Sigmoid,
            output_activation: Activation::Sigmoid,
        }
    }

    proptest! {
        #[test]
        fn softmax_sums_to_one(values in finite_vec_strategy()) {
            let q = softmax(Array1::from(values).view());
            prop_assert!((q.sum() - 1.0).abs() < 1e-9);
            for &v in q.iter() {
                prop_assert!(v >= 0.0 && v <= 1.0);
            }
        }

        #[test]
        fn softmax_shift_invariant(
            values in finite_vec_strategy(),
            shift in -100.0f64..100.0,
        ) {
            let base = softmax(Array1::from(values.clone()).view());
            let shifted_input: Vec<f64> = values.iter().map(|v| v + shift).collect();
            let shifted = softmax(Array1::from(shifted_input).view());
            for (a, b) in base.iter().zip(shifted.iter()) {
                prop_assert!((a - b).abs() < 1e-9);
            }
        }

        #[test]
        fn forward_output_length_matches_topology(
            num_inputs in 1usize..6,
            num_outputs in 1usize..6,
            num_hidden_layers in 0usize..4,
            neurons_per_hidden in 1usize..6,
        ) {
            let config = sigmoid_config(
                num_inputs,
                num_outputs,
                num_hidden_layers,
                neurons_per_hidden,
            );
            let mut network = NeuralNetwork::new(config).unwrap();

            let input = Array1::zeros(num_inputs);
            let output = network.forward(input.view()).unwrap();
            prop_assert_eq!(output.len(), num_outputs);

            let expected_layers = if num_hidden_layers > 0 {
                num_hidden_layers + 1
            } else {
                1
            };
            prop_assert_eq!(network.layers.len(), expected_layers);
        }

        #[test]
        fn forward_outputs_are_finite(values in prop::collection::vec(-100.0f64..100.0, 4)) {
            let mut network = NeuralNetwork::new(sigmoid_config(4, 3, 2, 5)).unwrap();
            let output = network.forward(Array1::from(values).view()).unwrap();
            for &v in output.iter() {
                prop_assert!(v.is_finite());
            }
        }

        #[test]
        fn memory_never_exceeds_capacity(
            capacity in 1usize..16,
            appends in 0usize..64,
        ) {
            let mut memory = Memory::new(capacity);
            for i in 0..appends {
                memory.add(Experience::new(i as f64, Array1::from(vec![i as f64])));
                prop_assert!(memory.len() <= capacity);
            }
            if appends > capacity {
                // the oldest surviving entry is the one appended right after
                // the evictions stopped
                prop_assert_eq!(memory.get(0).unwrap().reward, (appends - capacity) as f64);
            }
        }

        #[test]
        fn weight_string_round_trips(
            num_inputs in 1usize..5,
            num_outputs in 1usize..5,
            neurons_per_hidden in 1usize..5,
        ) {
            let config = sigmoid_config(num_inputs, num_outputs, 1, neurons_per_hidden);
            let source = NeuralNetwork::new(config).unwrap();
            let mut target = NeuralNetwork::new(config).unwrap();

            let serialized = source.serialize_weights();
            target.load_weights(&serialized).unwrap();
            prop_assert_eq!(target.serialize_weights(), serialized);
        }

        #[test]
        fn explore_rate_never_breaks_floor(
            decay in 0.0f64..50.0,
            decisions in 0usize..64,
        ) {
            let mut agent = QAgentBuilder::new()
                .topology(1, 2, 0, 0)
                .learning_rate(0.5)
                .exploration(Exploration {
                    enabled: true,
                    rate: 100.0,
                    max_rate: 100.0,
                    min_rate: 1.0,
                    decay,
                })
                .build()
                .unwrap();

            for _ in 0..decisions {
                agent.decide(Array1::zeros(1).view()).unwrap();
            }
            prop_assert!(agent.exploration.rate >= 1.0);
            prop_assert!(agent.exploration.rate <= 100.0);
        }
    }
}
