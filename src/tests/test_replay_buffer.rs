use ndarray::Array1;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;

use crate::agent::FEATURE_LEN;
use crate::env::RelativeAction;
use crate::replay_buffer::{ReplayMemory, Transition};

/// Transition tagged by its reward so it can be identified after sampling.
fn transition(tag: usize) -> Transition {
    Transition {
        state: Array1::zeros(FEATURE_LEN),
        action: RelativeAction::from_index(tag % RelativeAction::COUNT).unwrap(),
        reward: tag as f32,
        next_state: Array1::ones(FEATURE_LEN),
        done: tag % 7 == 0,
    }
}

fn filled(capacity: usize, count: usize) -> ReplayMemory {
    let mut memory = ReplayMemory::new(capacity);
    for tag in 0..count {
        memory.append(transition(tag));
    }
    memory
}

#[test]
fn test_append_and_len() {
    let mut memory = ReplayMemory::new(10);
    assert!(memory.is_empty());
    memory.append(transition(0));
    memory.append(transition(1));
    assert_eq!(memory.len(), 2);
    assert_eq!(memory.capacity(), 10);
}

#[test]
fn test_fifo_eviction() {
    let memory = filled(5, 8);
    assert_eq!(memory.len(), 5);
    let rewards: Vec<f32> = memory.iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
}

#[test]
fn test_sample_small_buffer_returns_everything_in_order() {
    let memory = filled(100, 6);
    let mut rng = StdRng::seed_from_u64(0);
    let batch = memory.sample(1000, &mut rng);
    let rewards: Vec<f32> = batch.iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

    let batch = memory.sample(6, &mut rng);
    assert_eq!(batch.len(), 6);
}

#[test]
fn test_sample_is_distinct() {
    let memory = filled(500, 500);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let batch = memory.sample(100, &mut rng);
        assert_eq!(batch.len(), 100);
        let tags: HashSet<u32> = batch.iter().map(|t| t.reward as u32).collect();
        assert_eq!(tags.len(), 100);
    }
}

#[test]
fn test_sample_covers_buffer() {
    let memory = filled(50, 50);
    let mut rng = StdRng::seed_from_u64(2);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        for t in memory.sample(10, &mut rng) {
            seen.insert(t.reward as u32);
        }
    }
    assert_eq!(seen.len(), 50);
}

#[test]
fn test_sample_empty() {
    let memory = ReplayMemory::new(10);
    let mut rng = StdRng::seed_from_u64(3);
    assert!(memory.sample(4, &mut rng).is_empty());
}

#[test]
fn test_sample_is_deterministic_per_seed() {
    let memory = filled(300, 300);
    let draw = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        memory.sample(32, &mut rng).iter().map(|t| t.reward).collect::<Vec<_>>()
    };
    assert_eq!(draw(9), draw(9));
    assert_ne!(draw(9), draw(10));
}

#[test]
fn test_clear() {
    let mut memory = filled(10, 10);
    memory.clear();
    assert!(memory.is_empty());
    memory.append(transition(3));
    assert_eq!(memory.len(), 1);
}
