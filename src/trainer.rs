//! The online learning loop.
//!
//! Each tick observes the world, picks an action, steps the simulator,
//! trains on the single new transition and stores it for replay. When an
//! episode ends the world is reset, a batch sampled from replay memory is
//! trained on, and the model is persisted if the score is a new record.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::{ExplorationPolicy, FeatureExtractor, PolicyModel};
use crate::config::TrainingConfig;
use crate::env::{render, GridWorld, RelativeAction, Termination};
use crate::error::Result;
use crate::metrics::{MetricsTracker, ScoreHistory};
use crate::replay_buffer::{ReplayMemory, Transition};
use crate::visualization::{training_progress, write_diagnostics};

/// What happened at the end of an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    /// Number of completed games, this one included
    pub episode: usize,
    pub score: usize,
    pub record: usize,
    pub new_record: bool,
    pub steps: usize,
    pub termination: Option<Termination>,
    /// Loss of the long-memory update
    pub loss: f32,
    pub mean_score: f32,
}

/// Result of a single training tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub action: RelativeAction,
    pub reward: f32,
    pub done: bool,
    pub score: usize,
    pub episode: Option<EpisodeSummary>,
}

/// Drives the simulator, the exploration policy, replay memory and the
/// policy model with a single seeded generator.
pub struct Trainer<M: PolicyModel> {
    config: TrainingConfig,
    world: GridWorld,
    extractor: FeatureExtractor,
    exploration: ExplorationPolicy,
    memory: ReplayMemory,
    model: M,
    rng: StdRng,
    num_games: usize,
    metrics: MetricsTracker,
    render: bool,
}

impl<M: PolicyModel> Trainer<M> {
    /// Build a trainer whose generator is seeded from `config.seed`.
    pub fn new(config: TrainingConfig, model: M) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, model, rng)
    }

    /// Build a trainer around an existing generator, e.g. one that already
    /// initialized the model.
    pub fn with_rng(config: TrainingConfig, model: M, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        let world = GridWorld::new(config.env.clone(), &mut rng)?;
        let exploration = ExplorationPolicy::from_config(&config.agent);
        let memory = ReplayMemory::new(config.agent.max_memory);

        Ok(Trainer {
            config,
            world,
            extractor: FeatureExtractor::new(),
            exploration,
            memory,
            model,
            rng,
            num_games: 0,
            metrics: MetricsTracker::default(),
            render: false,
        })
    }

    /// Emit a text frame of the world at `trace` level after every tick.
    pub fn set_render(&mut self, render: bool) {
        self.render = render;
    }

    /// Run one step of the learning loop.
    pub fn tick(&mut self) -> Result<TickReport> {
        let state = self.extractor.extract(&self.world);
        let action = self.exploration.select(
            self.num_games,
            state.view(),
            &mut self.model,
            &mut self.rng,
        )?;

        let outcome = self.world.step(action, &mut self.rng)?;
        let next_state = self.extractor.extract(&self.world);
        trace!(
            "step {}: {:?} -> reward {}, done {}, score {}",
            self.world.steps(), action, outcome.reward, outcome.done, outcome.score
        );
        if self.render {
            trace!("\n{}", render(&self.world));
        }

        let transition = Transition {
            state,
            action,
            reward: outcome.reward,
            next_state,
            done: outcome.done,
        };
        self.model.train_step(&[&transition])?;
        self.memory.append(transition);
        self.metrics.step(outcome.reward);

        let episode = if outcome.done {
            Some(self.finish_episode(outcome.score)?)
        } else {
            None
        };

        Ok(TickReport {
            action,
            reward: outcome.reward,
            done: outcome.done,
            score: outcome.score,
            episode,
        })
    }

    fn finish_episode(&mut self, score: usize) -> Result<EpisodeSummary> {
        let steps = self.world.steps();
        let termination = self.world.termination();

        self.world.reset(&mut self.rng)?;
        self.num_games += 1;

        let loss = self.train_long_memory()?;
        self.metrics.record_loss(loss);

        let new_record = self.metrics.end_episode(score);
        let history = self.metrics.history();
        let record = history.record();
        let mean_score = history.mean_score().unwrap_or(0.0);

        if new_record {
            self.model.save(&self.config.model_path)?;
            debug!("new record {}, model saved to {}", record, self.config.model_path.display());
        }

        info!("Game {} Score {} Record: {}", self.num_games, score, record);
        debug!(
            "{}",
            training_progress(
                self.num_games,
                self.config.max_episodes,
                score,
                record,
                mean_score,
                self.exploration.epsilon(self.num_games),
            )
        );

        if let (Some(reward), Some(length)) =
            (self.metrics.last_episode_reward(), self.metrics.last_episode_length())
        {
            debug!("episode reward {:.1} over {} steps", reward, length);
        }

        if self.num_games % self.config.diagnostics_interval == 0 {
            let window = self.config.diagnostics_interval;
            if let Some(avg_loss) = self.metrics.avg_loss(window) {
                debug!("average long-memory loss over the last {} games: {:.4}", window, avg_loss);
            }
            if let Some(avg_reward) = self.metrics.avg_episode_reward(window) {
                debug!("average episode reward over the last {} games: {:.2}", window, avg_reward);
            }
            self.write_diagnostics()?;
        }

        Ok(EpisodeSummary {
            episode: self.num_games,
            score,
            record,
            new_record,
            steps,
            termination,
            loss,
            mean_score,
        })
    }

    /// Train on a batch sampled from replay memory, or on the whole memory
    /// when it holds no more than one batch.
    pub fn train_long_memory(&mut self) -> Result<f32> {
        let batch = self.memory.sample(self.config.agent.batch_size, &mut self.rng);
        let loss = self.model.train_step(&batch)?;
        debug!("long memory update on {} transitions, loss {:.4}", batch.len(), loss);
        Ok(loss)
    }

    /// Train until the configured number of episodes has completed, or
    /// forever when there is no limit.
    pub fn run(&mut self) -> Result<&ScoreHistory> {
        while self.config.max_episodes.map_or(true, |max| self.num_games < max) {
            self.tick()?;
        }
        self.write_diagnostics()?;
        Ok(self.metrics.history())
    }

    fn write_diagnostics(&self) -> Result<()> {
        match &self.config.diagnostics_dir {
            Some(dir) => write_diagnostics(&self.metrics, dir),
            None => Ok(()),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn num_games(&self) -> usize {
        self.num_games
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn history(&self) -> &ScoreHistory {
        self.metrics.history()
    }

    pub fn into_model(self) -> M {
        self.model
    }
}
