use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square field
    #[arg(long)]
    size: Option<usize>,

    /// Tick period in milliseconds before any fruit is eaten
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for fruit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal belongs to the game
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(size) = self.size {
            config.field_size = size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.initial_tick_interval_ms = tick_ms;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting grid_snake with {:?}", config);

    let mut human_mode = HumanMode::new(config, cli.seed)?;
    human_mode.run().await?;

    Ok(())
}
