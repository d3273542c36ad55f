use log::trace;
use rand::Rng;
use std::collections::HashSet;

use super::collision::CollisionOracle;
use super::footprint::Footprint;
use super::geometry::{Heading, Point, RelativeAction};
use crate::config::EnvConfig;
use crate::error::{Result, DroneError};

/// Result of a single simulator step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub reward: f32,
    pub done: bool,
    pub score: usize,
}

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Collision,
    Stalled,
}

/// Grid world the drone flies in.
///
/// The world owns its geometry, obstacles, target and episode counters but
/// not its randomness: every operation that draws a placement takes the
/// caller's generator, so one seeded generator reproduces a whole run.
#[derive(Clone, Debug)]
pub struct GridWorld {
    config: EnvConfig,
    footprint: Footprint,
    oracle: CollisionOracle,
    target: Point,
    score: usize,
    steps: usize,
    termination: Option<Termination>,
}

impl GridWorld {
    pub fn new<R: Rng + ?Sized>(config: EnvConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let (sx, sy) = config.spawn_point();
        let footprint = Footprint::new(Point::new(sx, sy), Heading::Right, config.block_size);
        let oracle =
            CollisionOracle::new(config.width, config.height, config.block_size, HashSet::new());
        let mut world = GridWorld {
            config,
            footprint,
            oracle,
            target: Point::new(0, 0),
            score: 0,
            steps: 0,
            termination: None,
        };
        world.reset(rng)?;
        Ok(world)
    }

    /// Start a new episode: drone back at the center heading right, fresh
    /// obstacles and target, counters cleared.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (sx, sy) = self.config.spawn_point();
        self.footprint = Footprint::new(Point::new(sx, sy), Heading::Right, self.config.block_size);
        self.score = 0;
        self.steps = 0;
        self.termination = None;

        let obstacles = self.sample_obstacles(rng)?;
        let EnvConfig { width, height, block_size, .. } = self.config;
        self.oracle = CollisionOracle::new(width, height, block_size, obstacles);
        self.target = self.sample_target(rng)?;
        trace!("reset: target at {}, {} obstacles", self.target, self.oracle.obstacles().len());
        Ok(())
    }

    /// Apply one relative action and advance the episode.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        action: RelativeAction,
        rng: &mut R,
    ) -> Result<StepOutcome> {
        self.steps += 1;

        let heading = self.footprint.heading().turn(action);
        let midpoint = self.footprint.midpoint().step(heading, self.config.block_size);
        self.footprint = Footprint::new(midpoint, heading, self.config.block_size);

        if self.oracle.collides_any(self.footprint.cells()) {
            self.termination = Some(Termination::Collision);
            return Ok(self.outcome(self.config.collision_reward, true));
        }
        if self.steps > self.step_budget() {
            self.termination = Some(Termination::Stalled);
            return Ok(self.outcome(self.config.stall_reward, true));
        }

        if self.footprint.gripper() == self.target {
            let next = self.sample_target(rng)?;
            self.score += 1;
            self.target = next;
            trace!("target acquired, score {}, next target at {}", self.score, self.target);
            return Ok(self.outcome(self.config.target_reward, false));
        }

        Ok(self.outcome(0.0, false))
    }

    fn outcome(&self, reward: f32, done: bool) -> StepOutcome {
        StepOutcome { reward, done, score: self.score }
    }

    /// Steps allowed before the episode counts as stalled.
    pub fn step_budget(&self) -> usize {
        self.config.stall_steps_per_point * (self.score + self.config.stall_grace_points)
    }

    /// Boundary or obstacle test for any cell, independent of the drone.
    pub fn collides(&self, point: &Point) -> bool {
        self.oracle.collides(point)
    }

    fn sample_obstacles<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HashSet<Point>> {
        let b = self.config.block_size;
        let (cols, rows) = (self.config.columns(), self.config.rows());
        let mut obstacles = HashSet::with_capacity(self.config.num_obstacles);
        let mut attempts = 0;
        while obstacles.len() < self.config.num_obstacles {
            if attempts == self.config.max_placement_attempts {
                return Err(DroneError::PlacementFailed { what: "obstacle", attempts });
            }
            attempts += 1;
            let candidate = Point::new(rng.gen_range(0..cols) * b, rng.gen_range(0..rows) * b);
            if !self.footprint.contains(&candidate) {
                obstacles.insert(candidate);
            }
        }
        Ok(obstacles)
    }

    fn sample_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point> {
        let b = self.config.block_size;
        let (x_lo, x_hi, y_lo, y_hi) = self.config.target_cell_range();
        for _ in 0..self.config.max_placement_attempts {
            let candidate =
                Point::new(rng.gen_range(x_lo..=x_hi) * b, rng.gen_range(y_lo..=y_hi) * b);
            if !self.footprint.contains(&candidate) && !self.oracle.is_obstacle(&candidate) {
                return Ok(candidate);
            }
        }
        Err(DroneError::PlacementFailed {
            what: "target",
            attempts: self.config.max_placement_attempts,
        })
    }

    /// Move the drone to an arbitrary pose without stepping. Used to build
    /// deterministic scenarios.
    pub fn place_at(&mut self, midpoint: Point, heading: Heading) {
        self.footprint = Footprint::new(midpoint, heading, self.config.block_size);
    }

    /// Replace the obstacle set.
    pub fn set_obstacles<I: IntoIterator<Item = Point>>(&mut self, obstacles: I) {
        self.oracle = CollisionOracle::new(
            self.config.width,
            self.config.height,
            self.config.block_size,
            obstacles.into_iter().collect(),
        );
    }

    pub fn set_target(&mut self, target: Point) {
        self.target = target;
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn heading(&self) -> Heading {
        self.footprint.heading()
    }

    pub fn midpoint(&self) -> Point {
        self.footprint.midpoint()
    }

    pub fn gripper(&self) -> Point {
        self.footprint.gripper()
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn obstacles(&self) -> &HashSet<Point> {
        self.oracle.obstacles()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// How the last episode ended, if it has.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }
}
