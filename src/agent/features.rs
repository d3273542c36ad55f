use ndarray::Array1;

use crate::env::{GridWorld, Heading, RelativeAction};

/// Length of the feature vector. The layout is part of the model contract:
/// reordering invalidates trained parameters.
pub const FEATURE_LEN: usize = 12;

/// Relative directions probed for danger, in feature order.
const PROBES: [RelativeAction; 4] = [
    RelativeAction::Straight,
    RelativeAction::TurnRight,
    RelativeAction::TurnLeft,
    RelativeAction::Reverse,
];

/// Turns the simulator state into the model's input vector.
///
/// | index | feature |
/// |-------|---------|
/// | 0..4  | danger straight, right, left, behind |
/// | 4..8  | heading is left, right, up, down |
/// | 8..12 | target is left of, right of, above, below the gripper |
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        FeatureExtractor
    }

    pub fn extract(&self, world: &GridWorld) -> Array1<f32> {
        let mut features = Array1::zeros(FEATURE_LEN);
        let heading = world.heading();

        for (i, action) in PROBES.iter().enumerate() {
            features[i] = flag(self.danger(world, heading.turn(*action)));
        }

        features[4] = flag(heading == Heading::Left);
        features[5] = flag(heading == Heading::Right);
        features[6] = flag(heading == Heading::Up);
        features[7] = flag(heading == Heading::Down);

        let target = world.target();
        let gripper = world.gripper();
        features[8] = flag(target.x < gripper.x);
        features[9] = flag(target.x > gripper.x);
        features[10] = flag(target.y < gripper.y);
        features[11] = flag(target.y > gripper.y);

        features
    }

    /// Whether shifting the whole footprint one block along `direction`
    /// would touch a wall or an obstacle.
    fn danger(&self, world: &GridWorld, direction: Heading) -> bool {
        let block = world.config().block_size;
        world
            .footprint()
            .cells()
            .iter()
            .any(|cell| world.collides(&cell.step(direction, block)))
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
