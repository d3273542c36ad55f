//! # dronegrid - Reinforcement learning for a grid-world drone
//!
//! A multi-cell drone learns to fly across a bounded 2-D grid to randomly
//! placed targets while avoiding static obstacles and walls. The crate holds
//! the simulator and the online learning loop around it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dronegrid::agent::QNetwork;
//! use dronegrid::config::TrainingConfig;
//! use dronegrid::trainer::Trainer;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = TrainingConfig::default();
//! let mut rng = StdRng::seed_from_u64(config.seed);
//! let model = QNetwork::from_config(&config.agent, &mut rng).unwrap();
//!
//! let mut trainer = Trainer::with_rng(config, model, rng).unwrap();
//! let history = trainer.run().unwrap();
//! println!("record: {}", history.record());
//! ```
//!
//! ## Module Organization
//!
//! - [`env`] - Grid world simulator, geometry and collision rules
//! - [`agent`] - Feature extraction, exploration and the policy model seam
//! - [`replay_buffer`] - Bounded FIFO experience replay
//! - [`trainer`] - The training loop
//! - [`network`] / [`optimizer`] - Dense network backing the bundled Q-network
//! - [`config`] - Serializable configuration
//! - [`metrics`] / [`visualization`] - Score history, text charts, exports
//! - [`error`] - Error types and result handling

pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod trainer;
pub mod visualization;

#[cfg(test)]
mod tests;
