pub mod test_features;
pub mod test_metrics;
pub mod test_replay_buffer;

use ndarray::{Array1, ArrayView1};
use std::path::Path;

use crate::agent::PolicyModel;
use crate::config::EnvConfig;
use crate::error::Result;
use crate::replay_buffer::Transition;

/// Policy model returning fixed action values and counting predictions.
pub struct ConstantModel {
    pub values: Array1<f32>,
    pub predictions: usize,
}

impl ConstantModel {
    pub fn new(values: [f32; 4]) -> Self {
        ConstantModel {
            values: Array1::from_vec(values.to_vec()),
            predictions: 0,
        }
    }
}

impl PolicyModel for ConstantModel {
    fn predict(&mut self, _features: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.predictions += 1;
        Ok(self.values.clone())
    }

    fn train_step(&mut self, _batch: &[&Transition]) -> Result<f32> {
        Ok(0.0)
    }

    fn save(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Default grid without obstacles, so scenarios are fully scripted.
pub fn open_grid() -> EnvConfig {
    EnvConfig {
        num_obstacles: 0,
        ..EnvConfig::default()
    }
}
