use ndarray::Array1;
use rand::Rng;
use std::collections::VecDeque;

use crate::env::RelativeAction;

/// One observed step: features before, action taken, reward, features after.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: RelativeAction,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Bounded FIFO of transitions for long-memory updates.
#[derive(Clone, Debug)]
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        ReplayMemory {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    /// Push a transition, evicting the oldest one when full.
    pub fn append(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Uniformly sample `batch_size` distinct transitions. A buffer holding
    /// no more than `batch_size` entries is returned whole, oldest first.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&Transition> {
        if self.buffer.len() <= batch_size {
            return self.buffer.iter().collect();
        }
        rand::seq::index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|i| &self.buffer[i])
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
