//! Driver Fatigue Monitor - Main Entry Point
//!
//! Usage: `driver-monitor [--config <file>] [frames.jsonl]`
//! Reads frames from stdin when no input file is given.

use alerting::AlertDispatcher;
use anyhow::{bail, Context};
use dms::DmsModule;
use pipeline::{init_logging, replay, Settings};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut cli = CliArgs::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    cli.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') && flag != "-" => bail!("Unknown option {}", flag),
                "-" => cli.input = None,
                path => cli.input = Some(PathBuf::from(path)),
            }
        }
        Ok(cli)
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    let settings = Settings::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(&settings.log)?;

    info!("=== Driver Fatigue Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let dispatcher = AlertDispatcher::from_config(&settings.alert);
    let mut module = DmsModule::new(settings.monitor.clone(), dispatcher)?;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            info!("Replaying frames from {}", path.display());
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            info!("Reading frames from stdin");
            Box::new(io::stdin().lock())
        }
    };
    let output = BufWriter::new(io::stdout().lock());

    let mut summary = replay(input, output, &mut module)?;
    summary.set_alert_stats(module.sink().stats());
    summary.log();

    Ok(())
}
