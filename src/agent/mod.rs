//! # Learning Agent Module
//!
//! Everything the training loop needs to turn observations into actions and
//! actions into learning:
//!
//! - [`FeatureExtractor`]: 12 binary features (danger probes, heading,
//!   target direction) computed from the current world state
//! - [`ExplorationPolicy`]: epsilon-greedy selection with epsilon decaying
//!   linearly in games played, reaching zero after 500 games
//! - [`PolicyModel`]: the seam to the trainable action-value estimator
//! - [`QNetwork`]: the bundled estimator, a small MLP fitted to one-step
//!   Bellman targets
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dronegrid::agent::{ExplorationPolicy, FeatureExtractor, QNetwork};
//! use dronegrid::config::{AgentConfig, EnvConfig};
//! use dronegrid::env::GridWorld;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let world = GridWorld::new(EnvConfig::default(), &mut rng).unwrap();
//! let mut model = QNetwork::from_config(&AgentConfig::default(), &mut rng).unwrap();
//!
//! let features = FeatureExtractor::new().extract(&world);
//! let action = ExplorationPolicy::default()
//!     .select(0, features.view(), &mut model, &mut rng)
//!     .unwrap();
//! ```

pub mod exploration;
pub mod features;
pub mod traits;

mod qnet;

pub use exploration::ExplorationPolicy;
pub use features::{FeatureExtractor, FEATURE_LEN};
pub use qnet::QNetwork;
pub use traits::PolicyModel;
