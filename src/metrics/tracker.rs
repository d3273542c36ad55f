use serde::{Serialize, Deserialize};
use std::collections::VecDeque;
use std::path::Path;

/// Per-episode scores with their running mean, plus the best score seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub scores: Vec<usize>,
    pub mean_scores: Vec<f32>,
    total_score: usize,
    record: usize,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished episode. Returns true when it beats the record.
    pub fn push(&mut self, score: usize) -> bool {
        self.scores.push(score);
        self.total_score += score;
        self.mean_scores.push(self.total_score as f32 / self.scores.len() as f32);
        let is_record = score > self.record;
        if is_record {
            self.record = score;
        }
        is_record
    }

    pub fn games(&self) -> usize {
        self.scores.len()
    }

    pub fn record(&self) -> usize {
        self.record
    }

    pub fn mean_score(&self) -> Option<f32> {
        self.mean_scores.last().copied()
    }

    /// Text chart of scores and running mean.
    pub fn plot(&self, width: usize, height: usize) -> String {
        crate::visualization::plot_scores(self, width, height)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Tracks scores, rewards, episode lengths and learning losses during
/// training.
pub struct MetricsTracker {
    history: ScoreHistory,
    losses: VecDeque<f32>,
    episode_rewards: VecDeque<f32>,
    episode_lengths: VecDeque<usize>,
    history_size: usize,

    // Episode tracking
    current_episode_reward: f32,
    current_episode_length: usize,

    // Step tracking
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            history: ScoreHistory::new(),
            losses: VecDeque::with_capacity(history_size),
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            history_size,
            current_episode_reward: 0.0,
            current_episode_length: 0,
            total_steps: 0,
        }
    }

    /// Record a step within an episode
    pub fn step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// Close the current episode. Returns true on a new record score.
    pub fn end_episode(&mut self, score: usize) -> bool {
        let (reward, length) = (self.current_episode_reward, self.current_episode_length);
        push_bounded(&mut self.episode_rewards, reward, self.history_size);
        push_bounded(&mut self.episode_lengths, length, self.history_size);
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        self.history.push(score)
    }

    /// Record a long-memory training loss
    pub fn record_loss(&mut self, loss: f32) {
        push_bounded(&mut self.losses, loss, self.history_size);
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    /// Retained losses, oldest first.
    pub fn losses(&self) -> Vec<f32> {
        self.losses.iter().copied().collect()
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn last_episode_reward(&self) -> Option<f32> {
        self.episode_rewards.back().copied()
    }

    pub fn last_episode_length(&self) -> Option<usize> {
        self.episode_lengths.back().copied()
    }

    /// Get recent average loss
    pub fn avg_loss(&self, window: usize) -> Option<f32> {
        average(self.losses.iter().copied(), window)
    }

    /// Get recent average episode reward
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        average(self.episode_rewards.iter().copied(), window)
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
    if queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(value);
}

fn average<I>(values: I, window: usize) -> Option<f32>
where
    I: DoubleEndedIterator<Item = f32> + ExactSizeIterator,
{
    let n = window.min(values.len());
    if n == 0 {
        return None;
    }
    let sum: f32 = values.rev().take(n).sum();
    Some(sum / n as f32)
}
