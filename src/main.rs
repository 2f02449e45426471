use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roomplan::RoomPlanConfig;

#[derive(Parser, Debug)]
#[command(name = "roomplan", version, about = "Place furniture in a 3D room")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = RoomPlanConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    roomplan::run(config).context("Room planner exited with an error")?;
    Ok(())
}
