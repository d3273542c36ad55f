use ndarray::{Array1, ArrayView1};
use std::path::Path;

use crate::error::{Result, DroneError};
use crate::replay_buffer::Transition;

/// Trainable action-value estimator driven by the training loop.
pub trait PolicyModel {
    /// Per-action value estimates for one feature vector.
    fn predict(&mut self, features: ArrayView1<f32>) -> Result<Array1<f32>>;

    /// One update toward `reward + gamma * max_a Q(next_state, a)`, using the
    /// bare reward for terminal transitions. Returns the batch loss.
    fn train_step(&mut self, batch: &[&Transition]) -> Result<f32>;

    /// Persist the parameters.
    fn save(&self, path: &Path) -> Result<()>;
}

impl<M: PolicyModel + ?Sized> PolicyModel for Box<M> {
    fn predict(&mut self, features: ArrayView1<f32>) -> Result<Array1<f32>> {
        (**self).predict(features)
    }

    fn train_step(&mut self, batch: &[&Transition]) -> Result<f32> {
        (**self).train_step(batch)
    }

    fn save(&self, path: &Path) -> Result<()> {
        (**self).save(path)
    }
}

/// Index of the largest value, lowest index on ties. Non-finite values are
/// rejected.
pub fn argmax(values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(DroneError::Numerical(format!(
                "non-finite action value {} at index {}",
                value, idx
            )));
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| DroneError::Numerical("No valid Q-values".to_string()))
}
