use ndarray::ArrayView1;
use rand::Rng;

use super::traits::{argmax, PolicyModel};
use crate::config::AgentConfig;
use crate::env::RelativeAction;
use crate::error::{DroneError, Result};

/// Epsilon-greedy selection with epsilon falling linearly in games played.
///
/// Epsilon is `max(0, epsilon_start - games)` and each decision draws a
/// uniform integer in `[0, epsilon_range)`; a draw below epsilon explores.
/// Once `games >= epsilon_start` no draw can explore, so the policy is fully
/// greedy from then on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplorationPolicy {
    pub epsilon_start: u32,
    pub epsilon_range: u32,
}

impl ExplorationPolicy {
    pub fn new(epsilon_start: u32, epsilon_range: u32) -> Self {
        ExplorationPolicy { epsilon_start, epsilon_range }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.epsilon_start, config.epsilon_range)
    }

    pub fn epsilon(&self, games: usize) -> u32 {
        let games = u32::try_from(games).unwrap_or(u32::MAX);
        self.epsilon_start.saturating_sub(games)
    }

    /// Whether a decision taken after `games` episodes may still be random.
    pub fn is_exploring(&self, games: usize) -> bool {
        self.epsilon(games) > 0
    }

    /// Pick an action for a decision taken after `games` episodes.
    pub fn select<M, R>(
        &self,
        games: usize,
        features: ArrayView1<f32>,
        model: &mut M,
        rng: &mut R,
    ) -> Result<RelativeAction>
    where
        M: PolicyModel + ?Sized,
        R: Rng + ?Sized,
    {
        if self.epsilon_range == 0 {
            return Err(DroneError::invalid_parameter("epsilon_range", "must be positive"));
        }
        if rng.gen_range(0..self.epsilon_range) < self.epsilon(games) {
            return RelativeAction::from_index(rng.gen_range(0..RelativeAction::COUNT));
        }
        let values = model.predict(features)?;
        RelativeAction::from_index(argmax(values.view())?)
    }
}

impl Default for ExplorationPolicy {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}
