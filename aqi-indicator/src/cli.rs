use clap::{Args, Parser, Subcommand};
use tracing::info;

use aqi_core::{Config, Poller, PurpleAirProvider};

use crate::console::ConsoleIndicator;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aqi", version, about = "PurpleAir AQI indicator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the configured sensor and keep the indicator updated.
    Run(RunArgs),

    /// Write sensor id and intervals to the config file.
    Configure(ConfigureArgs),
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// PurpleAir sensor id; overrides the config file.
    #[arg(long)]
    pub sensor_id: Option<u32>,

    /// Seconds between network fetches; overrides the config file.
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Seconds between freshness checks; overrides the config file.
    #[arg(long)]
    pub tick_interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// PurpleAir sensor id to watch.
    #[arg(long)]
    pub sensor_id: u32,

    /// Seconds between network fetches.
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Seconds between freshness checks.
    #[arg(long)]
    pub tick_interval: Option<u64>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure(args)) => configure(args),
            Some(Command::Run(args)) => run(args).await,
            None => run(RunArgs::default()).await,
        }
    }
}

fn configure(args: ConfigureArgs) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    cfg.sensor_id = args.sensor_id;
    if let Some(secs) = args.refresh_interval {
        cfg.refresh_interval_secs = secs;
    }
    if let Some(secs) = args.tick_interval {
        cfg.tick_interval_secs = secs;
    }
    cfg.save()?;

    println!(
        "Watching sensor {} (refresh every {}s), saved to {}",
        cfg.sensor_id,
        cfg.refresh_interval_secs,
        Config::config_file_path()?.display()
    );

    Ok(())
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    if let Some(id) = args.sensor_id {
        cfg.sensor_id = id;
    }
    if let Some(secs) = args.refresh_interval {
        cfg.refresh_interval_secs = secs;
    }
    if let Some(secs) = args.tick_interval {
        cfg.tick_interval_secs = secs;
    }

    info!(
        sensor_id = cfg.sensor_id,
        refresh_secs = cfg.refresh_interval_secs,
        tick_secs = cfg.tick_interval_secs,
        "starting poller"
    );

    let provider = PurpleAirProvider::new(cfg.sensor_id);
    let sink = ConsoleIndicator::default();
    let poller = Poller::new(provider, sink, cfg.refresh_interval());

    poller.run(cfg.tick_interval()).await;

    Ok(())
}
