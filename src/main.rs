use anyhow::{Context, Result};
use clap::Parser;
use murmuration_lib::app::App;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// RNG seed; makes the run deterministic
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the final render snapshot as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    #[cfg(not(target_arch = "wasm32"))]
    murmuration_core::init_logging(&args.log_level);

    let (mut config, config_path) = App::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut app = App::new(config)?;
    app.config_path = config_path;
    let report = app.run(args.ticks);

    if let Some(path) = &args.snapshot {
        app.write_snapshot(path)?;
    }

    let json = serde_json::to_string_pretty(&report).context("serializing run report")?;
    println!("{json}");
    Ok(())
}
