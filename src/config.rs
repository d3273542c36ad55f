//! Configuration for the grid world, the agent and the training run.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it overrides:
//!
//! ```rust,no_run
//! use dronegrid::config::TrainingConfig;
//!
//! let config = TrainingConfig::from_file("train.json").unwrap();
//! config.validate().unwrap();
//! ```

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use crate::env::footprint::Footprint;
use crate::env::geometry::{Heading, Point};
use crate::error::{Result, DroneError};

/// Grid geometry, obstacle count, episode budget and reward shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub num_obstacles: usize,

    /// Episode stalls once `steps > stall_steps_per_point * (score + stall_grace_points)`.
    pub stall_steps_per_point: usize,
    pub stall_grace_points: usize,

    pub collision_reward: f32,
    pub stall_reward: f32,
    pub target_reward: f32,

    /// Upper bound on rejection-sampling draws for a single placement.
    pub max_placement_attempts: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            width: 640,
            height: 480,
            block_size: 20,
            num_obstacles: 5,
            stall_steps_per_point: 100,
            stall_grace_points: 3,
            collision_reward: -50.0,
            stall_reward: -30.0,
            target_reward: 100.0,
            max_placement_attempts: 100_000,
        }
    }
}

impl EnvConfig {
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Grid center snapped down to the lattice.
    pub fn spawn_point(&self) -> (i32, i32) {
        let b = self.block_size;
        ((self.width / 2) / b * b, (self.height / 2) / b * b)
    }

    /// Inclusive cell ranges `(x_lo, x_hi, y_lo, y_hi)` where the gripper can
    /// sit with the whole footprint in bounds.
    pub fn target_cell_range(&self) -> (i32, i32, i32, i32) {
        let (min_dx, max_dx, min_dy, max_dy) = Footprint::extent();
        let (gx, gy) = Footprint::gripper_offset();
        (
            -min_dx + gx,
            self.columns() - 1 - max_dx + gx,
            -min_dy + gy,
            self.rows() - 1 - max_dy + gy,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size <= 0 {
            return Err(DroneError::invalid_parameter("block_size", "must be positive"));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(DroneError::invalid_parameter("width/height", "must be positive"));
        }
        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(DroneError::invalid_parameter(
                "width/height",
                "must be multiples of block_size",
            ));
        }

        let b = self.block_size;
        let (min_dx, max_dx, min_dy, max_dy) = Footprint::extent();
        let (sx, sy) = self.spawn_point();
        let (cx, cy) = (sx / b, sy / b);
        if cx + min_dx < 0
            || cx + max_dx >= self.columns()
            || cy + min_dy < 0
            || cy + max_dy >= self.rows()
        {
            return Err(DroneError::invalid_parameter(
                "width/height",
                "grid too small for the drone footprint at the spawn point",
            ));
        }

        let spawn = Footprint::new(Point::new(sx, sy), Heading::Right, b);
        let (x_lo, x_hi, y_lo, y_hi) = self.target_cell_range();
        let open_targets = (x_lo..=x_hi)
            .flat_map(|x| (y_lo..=y_hi).map(move |y| Point::new(x * b, y * b)))
            .filter(|cell| !spawn.contains(cell))
            .count();
        if open_targets == 0 {
            return Err(DroneError::invalid_parameter(
                "width/height",
                "every target cell is covered by the drone at the spawn point",
            ));
        }

        // one cell stays free for the target
        let free_cells = (self.columns() * self.rows()) as usize - Footprint::LEN;
        if self.num_obstacles >= free_cells {
            return Err(DroneError::InvalidParameter {
                name: "num_obstacles".to_string(),
                reason: format!(
                    "{} obstacles leave no room for a target on a grid with {} free cells",
                    self.num_obstacles, free_cells
                ),
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(DroneError::invalid_parameter("max_placement_attempts", "must be positive"));
        }
        Ok(())
    }
}

/// Replay, learning and exploration hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_memory: usize,
    pub batch_size: usize,
    pub gamma: f32,
    pub learning_rate: f32,
    pub hidden_size: usize,

    /// Epsilon is `max(0, epsilon_start - games_played)`.
    pub epsilon_start: u32,
    /// Exploration draws are uniform in `[0, epsilon_range)`.
    pub epsilon_range: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            max_memory: 100_000,
            batch_size: 1000,
            gamma: 0.9,
            learning_rate: 0.001,
            hidden_size: 256,
            epsilon_start: 500,
            epsilon_range: 200,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_memory == 0 {
            return Err(DroneError::invalid_parameter("max_memory", "must be positive"));
        }
        if self.batch_size == 0 {
            return Err(DroneError::invalid_parameter("batch_size", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DroneError::invalid_parameter("gamma", "must be in [0, 1]"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(DroneError::invalid_parameter("learning_rate", "must be positive"));
        }
        if self.hidden_size == 0 {
            return Err(DroneError::invalid_parameter("hidden_size", "must be positive"));
        }
        if self.epsilon_range == 0 {
            return Err(DroneError::invalid_parameter("epsilon_range", "must be positive"));
        }
        Ok(())
    }
}

/// Top-level configuration of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub env: EnvConfig,
    pub agent: AgentConfig,

    /// `None` trains until interrupted.
    pub max_episodes: Option<usize>,
    pub seed: u64,

    /// Where the model is written on every new record.
    pub model_path: PathBuf,

    /// Score history and chart are written here when set.
    pub diagnostics_dir: Option<PathBuf>,
    pub diagnostics_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            env: EnvConfig::default(),
            agent: AgentConfig::default(),
            max_episodes: Some(10_000),
            seed: 42,
            model_path: PathBuf::from("model/model.bin"),
            diagnostics_dir: None,
            diagnostics_interval: 100,
        }
    }
}

impl TrainingConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.env.validate()?;
        self.agent.validate()?;
        if self.diagnostics_interval == 0 {
            return Err(DroneError::invalid_parameter("diagnostics_interval", "must be positive"));
        }
        Ok(())
    }
}
