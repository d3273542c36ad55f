//! # Grid World Module
//!
//! The simulator the drone is trained in. A [`GridWorld`] holds the grid
//! bounds, the drone [`Footprint`], a set of static obstacles and a target
//! cell. Each [`GridWorld::step`] takes a [`RelativeAction`], turns the drone
//! relative to its heading along the clockwise order `[Right, Down, Left, Up]`,
//! moves it one block and scores the result:
//!
//! | outcome | reward | ends episode |
//! |---------|--------|--------------|
//! | footprint leaves the grid or hits an obstacle | -50 | yes |
//! | more than `100 * (score + 3)` steps | -30 | yes |
//! | gripper reaches the target | +100 | no |
//! | anything else | 0 | no |
//!
//! ```rust
//! use dronegrid::config::EnvConfig;
//! use dronegrid::env::{GridWorld, RelativeAction};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut world = GridWorld::new(EnvConfig::default(), &mut rng).unwrap();
//! let outcome = world.step(RelativeAction::Straight, &mut rng).unwrap();
//! assert_eq!(outcome.score, 0);
//! ```

pub mod collision;
pub mod footprint;
pub mod geometry;
pub mod render;

mod grid_world;

pub use collision::CollisionOracle;
pub use footprint::Footprint;
pub use geometry::{Heading, Point, RelativeAction};
pub use grid_world::{GridWorld, StepOutcome, Termination};
pub use render::render;
