use rand::{rngs::StdRng, SeedableRng};

use super::open_grid;
use crate::env::{render, GridWorld, Point};
use crate::metrics::{MetricsTracker, ScoreHistory};
use crate::visualization::{
    export_scores_csv, plot_metrics, plot_scores, training_progress, write_diagnostics,
};

fn history(scores: &[usize]) -> ScoreHistory {
    let mut history = ScoreHistory::new();
    for &score in scores {
        history.push(score);
    }
    history
}

#[test]
fn test_score_history_running_mean() {
    let history = history(&[0, 2, 1, 5]);
    assert_eq!(history.games(), 4);
    assert_eq!(history.mean_scores, vec![0.0, 1.0, 1.0, 2.0]);
    assert_eq!(history.mean_score(), Some(2.0));
    assert_eq!(history.record(), 5);
}

#[test]
fn test_record_requires_strict_improvement() {
    let mut history = ScoreHistory::new();
    // a zero score never beats the initial record of zero
    assert!(!history.push(0));
    assert!(history.push(3));
    assert!(!history.push(3));
    assert!(!history.push(1));
    assert!(history.push(4));
    assert_eq!(history.record(), 4);
}

#[test]
fn test_empty_history() {
    let history = ScoreHistory::new();
    assert_eq!(history.mean_score(), None);
    assert_eq!(history.record(), 0);
    assert_eq!(plot_scores(&history, 40, 10), "No score data available");
}

#[test]
fn test_history_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let history = history(&[1, 0, 4]);
    history.save_json(&path).unwrap();
    assert_eq!(ScoreHistory::load_json(&path).unwrap(), history);
}

#[test]
fn test_tracker_episode_accounting() {
    let mut tracker = MetricsTracker::new(3);
    tracker.step(0.0);
    tracker.step(100.0);
    tracker.step(-50.0);
    assert!(tracker.end_episode(1));
    assert_eq!(tracker.last_episode_reward(), Some(50.0));
    assert_eq!(tracker.last_episode_length(), Some(3));

    tracker.step(-30.0);
    assert!(!tracker.end_episode(0));
    assert_eq!(tracker.last_episode_length(), Some(1));
    assert_eq!(tracker.total_steps(), 4);
    assert_eq!(tracker.avg_episode_reward(2), Some(10.0));
    assert_eq!(tracker.history().games(), 2);
}

#[test]
fn test_tracker_loss_window() {
    let mut tracker = MetricsTracker::new(2);
    assert_eq!(tracker.avg_loss(10), None);
    tracker.record_loss(4.0);
    tracker.record_loss(2.0);
    tracker.record_loss(1.0);
    // capacity 2 keeps the last two
    assert_eq!(tracker.avg_loss(10), Some(1.5));
    assert_eq!(tracker.avg_loss(1), Some(1.0));
    assert_eq!(tracker.losses(), vec![2.0, 1.0]);
}

#[test]
fn test_plot_scores() {
    let plot = plot_scores(&history(&[0, 1, 3, 2, 6]), 40, 10);
    assert!(plot.starts_with("Objects Found per Simulation\n"));
    assert!(plot.contains('*'));
    assert!(plot.contains('o'));
    assert!(plot.contains("Points: 5"));
    assert!(plot.contains("Record: 6"));
    assert_eq!(history(&[0, 1, 3, 2, 6]).plot(40, 10), plot);
}

#[test]
fn test_plot_metrics_rejects_tiny_canvas() {
    let plot = plot_metrics(&[1.0, 2.0], "Loss", 5, 5);
    assert_eq!(plot, "Loss: Invalid data or dimensions");
}

#[test]
fn test_training_progress() {
    let line = training_progress(50, Some(100), 2, 7, 1.25, 450);
    assert!(line.starts_with("Game 50/100"));
    assert!(line.contains("50.0%"));
    assert!(line.contains("Record: 7"));
    assert!(line.contains("eps: 450"));

    let line = training_progress(50, None, 2, 7, 1.25, 0);
    assert!(line.starts_with("Game 50 |"));
}

#[test]
fn test_export_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    export_scores_csv(&history(&[2, 0]), &path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "game,score,mean_score\n1,2,2\n2,0,1\n");
}

#[test]
fn test_write_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("diag");
    let mut tracker = MetricsTracker::new(10);
    for (score, loss) in [(1, 3.0), (2, 1.5)] {
        tracker.step(100.0);
        tracker.end_episode(score);
        tracker.record_loss(loss);
    }
    write_diagnostics(&tracker, &target).unwrap();
    for name in ["scores.json", "scores.csv", "scores.txt", "loss.txt"] {
        assert!(target.join(name).exists(), "{} missing", name);
    }
    let loss = std::fs::read_to_string(target.join("loss.txt")).unwrap();
    assert!(loss.starts_with("Long Memory Loss\n"));
    assert!(loss.contains('*'));
    assert_eq!(ScoreHistory::load_json(target.join("scores.json")).unwrap().scores, vec![1, 2]);
}

#[test]
fn test_diagnostics_without_losses() {
    let dir = tempfile::tempdir().unwrap();
    write_diagnostics(&MetricsTracker::new(10), dir.path()).unwrap();
    let loss = std::fs::read_to_string(dir.path().join("loss.txt")).unwrap();
    assert_eq!(loss, "Long Memory Loss: Invalid data or dimensions");
}

#[test]
fn test_render_frame() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut world = GridWorld::new(open_grid(), &mut rng).unwrap();
    world.set_obstacles([Point::new(0, 0), Point::new(20, 0)]);
    world.set_target(Point::new(60, 60));

    let frame = render(&world);
    let mut lines = frame.lines();
    assert_eq!(lines.next(), Some("Score: 0  Steps: 0"));
    let grid: Vec<&str> = lines.collect();
    assert_eq!(grid.len(), 24);
    assert!(grid.iter().all(|row| row.len() == 32));

    let count = |c: char| frame.chars().filter(|&x| x == c).count();
    assert_eq!(count('G'), 1);
    assert_eq!(count('D'), 12);
    assert_eq!(count('T'), 1);
    assert_eq!(count('#'), 2);
    assert_eq!(&grid[0][..2], "##");
    assert_eq!(grid[3].as_bytes()[3], b'T');
}
