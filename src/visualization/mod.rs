pub mod text_plots;
pub mod export;

pub use text_plots::{plot_scores, plot_metrics, training_progress};
pub use export::{export_scores_csv, write_diagnostics};
