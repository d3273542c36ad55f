use ndarray::Array1;
use rand::{rngs::StdRng, SeedableRng};

use super::open_grid;
use crate::agent::{FeatureExtractor, FEATURE_LEN};
use crate::env::{GridWorld, Heading, Point};

fn world_at(midpoint: Point, heading: Heading, target: Point) -> GridWorld {
    let mut rng = StdRng::seed_from_u64(0);
    let mut world = GridWorld::new(open_grid(), &mut rng).unwrap();
    world.place_at(midpoint, heading);
    world.set_target(target);
    world
}

fn dangers(features: &Array1<f32>) -> [f32; 4] {
    [features[0], features[1], features[2], features[3]]
}

#[test]
fn test_layout_at_spawn() {
    let world = world_at(Point::new(320, 240), Heading::Right, Point::new(60, 60));
    let features = FeatureExtractor::new().extract(&world);

    assert_eq!(features.len(), FEATURE_LEN);
    let expected = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0];
    assert_eq!(features.to_vec(), expected.to_vec());
}

#[test]
fn test_features_are_binary() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut world = GridWorld::new(Default::default(), &mut rng).unwrap();
    let extractor = FeatureExtractor::new();
    for _ in 0..50 {
        let features = extractor.extract(&world);
        assert!(features.iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(features.slice(ndarray::s![4..8]).sum(), 1.0);
        world.reset(&mut rng).unwrap();
    }
}

#[test]
fn test_wall_ahead() {
    let world = world_at(Point::new(560, 240), Heading::Right, Point::new(60, 60));
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(dangers(&features), [1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_wall_ahead_when_heading_up() {
    let world = world_at(Point::new(320, 20), Heading::Up, Point::new(60, 460));
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(dangers(&features), [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(features[6], 1.0);
    // target below and left of the gripper at (320, 60)
    assert_eq!(features.slice(ndarray::s![8..12]).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_obstacle_to_the_right() {
    let mut world = world_at(Point::new(320, 240), Heading::Right, Point::new(60, 60));
    // directly below the gripper; heading right, so right means down
    world.set_obstacles([Point::new(320, 300)]);
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(dangers(&features), [0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_obstacle_behind() {
    let mut world = world_at(Point::new(320, 240), Heading::Right, Point::new(60, 60));
    // one block left of the wing tip at (260, 220)
    world.set_obstacles([Point::new(240, 220)]);
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(dangers(&features), [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_obstacle_to_the_left() {
    let mut world = world_at(Point::new(320, 240), Heading::Right, Point::new(60, 60));
    // above the wing row at y = 220
    world.set_obstacles([Point::new(380, 200)]);
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(dangers(&features), [0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_target_on_gripper_sets_no_direction() {
    let world = world_at(Point::new(320, 240), Heading::Down, Point::new(320, 280));
    let features = FeatureExtractor::new().extract(&world);
    assert_eq!(features[7], 1.0);
    assert_eq!(features.slice(ndarray::s![8..12]).sum(), 0.0);
}
