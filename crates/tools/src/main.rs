use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tools::{AssetDirResolver, replay};
use tracing_subscriber::EnvFilter;

/// Replay polyline host calls against an in-memory map surface.
#[derive(Debug, Parser)]
#[command(name = "polyline-replay")]
struct Args {
    /// JSON-lines script of host calls and surface actions.
    script: PathBuf,

    /// Directory `fromAsset` stamp images are loaded from.
    #[arg(long, env = "POLYLINE_ASSETS", default_value = ".")]
    assets: PathBuf,

    /// Continue after a failing step instead of stopping.
    #[arg(long)]
    keep_going: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let script =
        fs::read_to_string(&args.script).map_err(|e| format!("read {:?}: {e}", args.script))?;

    let report = replay(&script, AssetDirResolver::new(args.assets), args.keep_going)?;
    for event in &report.events {
        println!("{event}");
    }

    if report.failures > 0 {
        return Err(format!(
            "{} of {} steps failed",
            report.failures, report.steps
        ));
    }
    Ok(())
}
