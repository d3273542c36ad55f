use log::debug;
use std::io::Write;
use std::path::Path;

use super::text_plots::{plot_metrics, plot_scores};
use crate::error::Result;
use crate::metrics::{MetricsTracker, ScoreHistory};

/// Export score history to CSV format
pub fn export_scores_csv<P: AsRef<Path>>(history: &ScoreHistory, path: P) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "game,score,mean_score")?;
    for (i, (score, mean)) in history.scores.iter().zip(&history.mean_scores).enumerate() {
        writeln!(file, "{},{},{}", i + 1, score, mean)?;
    }
    Ok(())
}

/// Write `scores.json`, `scores.csv`, the `scores.txt` chart and the
/// `loss.txt` chart of recent long-memory losses into `dir`.
pub fn write_diagnostics<P: AsRef<Path>>(metrics: &MetricsTracker, dir: P) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let history = metrics.history();
    history.save_json(dir.join("scores.json"))?;
    export_scores_csv(history, dir.join("scores.csv"))?;
    std::fs::write(dir.join("scores.txt"), plot_scores(history, 80, 20))?;
    std::fs::write(
        dir.join("loss.txt"),
        plot_metrics(&metrics.losses(), "Long Memory Loss", 80, 20),
    )?;
    debug!("wrote diagnostics for {} games to {}", history.games(), dir.display());
    Ok(())
}
