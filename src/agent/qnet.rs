use log::trace;
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::path::Path;

use super::features::FEATURE_LEN;
use super::traits::PolicyModel;
use crate::config::AgentConfig;
use crate::env::RelativeAction;
use crate::error::{Result, DroneError};
use crate::network::{Activation, NeuralNetwork};
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::Transition;

/// Action-value network trained toward one-step Bellman targets.
///
/// The network bootstraps from its own estimates; there is no separate
/// target network.
///
/// # Example
///
/// ```rust
/// use dronegrid::agent::{PolicyModel, QNetwork};
/// use dronegrid::config::AgentConfig;
/// use ndarray::Array1;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut model = QNetwork::from_config(&AgentConfig::default(), &mut rng).unwrap();
/// let values = model.predict(Array1::zeros(12).view()).unwrap();
/// assert_eq!(values.len(), 4);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QNetwork {
    pub network: NeuralNetwork,
    pub gamma: f32,
    pub learning_rate: f32,

    /// Number of training steps performed
    pub train_steps: usize,
}

impl QNetwork {
    pub fn new(network: NeuralNetwork, gamma: f32, learning_rate: f32) -> Result<Self> {
        if network.output_size() != RelativeAction::COUNT {
            return Err(DroneError::dimension_mismatch(
                format!("{} action values", RelativeAction::COUNT),
                format!("{} action values", network.output_size()),
            ));
        }
        Ok(QNetwork {
            network,
            gamma,
            learning_rate,
            train_steps: 0,
        })
    }

    /// Feature vector -> one ReLU hidden layer -> four linear action values,
    /// optimized with Adam.
    pub fn from_config<R: Rng + ?Sized>(config: &AgentConfig, rng: &mut R) -> Result<Self> {
        let network = NeuralNetwork::new(
            &[FEATURE_LEN, config.hidden_size, RelativeAction::COUNT],
            &[Activation::Relu, Activation::Linear],
            OptimizerWrapper::Adam(Adam::default()),
            rng,
        )?;
        Self::new(network, config.gamma, config.learning_rate)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }
}

impl PolicyModel for QNetwork {
    fn predict(&mut self, features: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.network.forward(features)
    }

    fn train_step(&mut self, batch: &[&Transition]) -> Result<f32> {
        let first = batch
            .first()
            .ok_or_else(|| DroneError::EmptyBuffer("No transitions to train on".to_string()))?;

        let batch_size = batch.len();
        let state_size = first.state.len();

        let mut states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        for (i, transition) in batch.iter().enumerate() {
            if transition.state.len() != state_size || transition.next_state.len() != state_size {
                return Err(DroneError::dimension_mismatch(
                    format!("{} features", state_size),
                    format!("{}/{} features", transition.state.len(), transition.next_state.len()),
                ));
            }
            states.row_mut(i).assign(&transition.state);
            next_states.row_mut(i).assign(&transition.next_state);
        }

        let mut targets = self.network.forward_batch(states.view())?;
        let next_q_values = self.network.forward_batch(next_states.view())?;

        for (i, transition) in batch.iter().enumerate() {
            let target = if transition.done {
                transition.reward
            } else {
                let max_next_q = next_q_values.row(i).iter()
                    .fold(f32::NEG_INFINITY, |max, &val| max.max(val));
                transition.reward + self.gamma * max_next_q
            };
            targets[[i, transition.action.index()]] = target;
        }

        let loss = self.network.train_minibatch(states.view(), targets.view(), self.learning_rate)?;
        if !loss.is_finite() {
            return Err(DroneError::Numerical(format!(
                "training step {} produced non-finite loss {}",
                self.train_steps, loss
            )));
        }
        self.train_steps += 1;
        trace!("train step {} on {} transitions, loss {:.4}", self.train_steps, batch_size, loss);
        Ok(loss)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::SGD;
    use ndarray::{array, Array2};
    use rand::{rngs::StdRng, SeedableRng};

    fn linear_model(gamma: f32) -> QNetwork {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = NeuralNetwork::new(
            &[2, 4],
            &[Activation::Linear],
            OptimizerWrapper::SGD(SGD::new()),
            &mut rng,
        )
        .unwrap();
        network.layers[0].weights = Array2::zeros((2, 4));
        network.layers[0].biases = array![1.0, 2.0, 3.0, 4.0];
        QNetwork::new(network, gamma, 0.1).unwrap()
    }

    fn transition(action: RelativeAction, reward: f32, done: bool) -> Transition {
        Transition {
            state: array![0.0, 0.0],
            action,
            reward,
            next_state: array![0.0, 0.0],
            done,
        }
    }

    #[test]
    fn test_terminal_target_is_reward() {
        let mut model = linear_model(0.9);
        let t = transition(RelativeAction::Straight, 1.0, true);
        // prediction for action 0 is 1.0, target is 1.0: no error
        let loss = model.train_step(&[&t]).unwrap();
        assert!(loss.abs() < 1e-6);
    }

    #[test]
    fn test_bootstrapped_target() {
        let mut model = linear_model(0.5);
        // target = 0 + 0.5 * max(1,2,3,4) = 2.0 against prediction 1.0
        let t = transition(RelativeAction::Straight, 0.0, false);
        let loss = model.train_step(&[&t]).unwrap();
        assert!((loss - 0.25).abs() < 1e-5);
        // bias for action 0 moved toward the target
        assert!(model.network.layers[0].biases[0] > 1.0);
        assert_eq!(model.network.layers[0].biases[1], 2.0);
        assert_eq!(model.train_steps, 1);
    }

    #[test]
    fn test_empty_batch_is_error() {
        let mut model = linear_model(0.9);
        assert!(matches!(model.train_step(&[]), Err(DroneError::EmptyBuffer(_))));
    }

    #[test]
    fn test_rejects_wrong_output_size() {
        let mut rng = StdRng::seed_from_u64(0);
        let optimizer = OptimizerWrapper::SGD(SGD::new());
        let network =
            NeuralNetwork::new(&[2, 3], &[Activation::Linear], optimizer, &mut rng).unwrap();
        assert!(QNetwork::new(network, 0.9, 0.1).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.bin");
        let mut model = linear_model(0.9);
        model.save(&path).unwrap();
        let mut loaded = QNetwork::load(&path).unwrap();
        let input = array![0.3, -0.7];
        assert_eq!(model.predict(input.view()).unwrap(), loaded.predict(input.view()).unwrap());
        assert_eq!(loaded.gamma, 0.9);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = QNetwork::load(dir.path().join("missing.bin"));
        assert!(matches!(result, Err(DroneError::Io(_))));
    }
}
