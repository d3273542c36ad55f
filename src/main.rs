use anyhow::{Context, Result};
use clap::Parser;
use log::{info, log_enabled, warn, Level};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use dronegrid::agent::QNetwork;
use dronegrid::config::TrainingConfig;
use dronegrid::trainer::Trainer;

/// Train a drone to reach targets in a grid world.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of episodes to train for
    #[arg(short, long, conflicts_with = "forever")]
    episodes: Option<usize>,

    /// Train until interrupted
    #[arg(long)]
    forever: bool,

    /// Seed for every random draw of the run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where to save the model on a new record
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Directory for score history and charts
    #[arg(long)]
    diagnostics_dir: Option<PathBuf>,

    /// Log a text frame of the grid after every step (trace level)
    #[arg(long)]
    render: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config.max_episodes = Some(episodes);
    }
    if args.forever {
        config.max_episodes = None;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(path) = &args.model_path {
        config.model_path = path.clone();
    }
    if let Some(dir) = &args.diagnostics_dir {
        config.diagnostics_dir = Some(dir.clone());
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        "training on a {}x{} grid with {} obstacles, seed {}",
        config.env.width, config.env.height, config.env.num_obstacles, config.seed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let model = QNetwork::from_config(&config.agent, &mut rng).context("failed to build model")?;
    let mut trainer = Trainer::with_rng(config, model, rng).context("failed to build trainer")?;
    if args.render && !log_enabled!(Level::Trace) {
        warn!("--render only shows frames with RUST_LOG=trace");
    }
    trainer.set_render(args.render);

    let start_time = std::time::Instant::now();
    let history = trainer.run().context("training failed")?;

    info!("training completed in {:?}", start_time.elapsed());
    println!("{}", history.plot(80, 20));
    Ok(())
}
