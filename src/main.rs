mod analysis;
mod config;

use crate::analysis::{Analyzer, CircularReport, GeometricReport, Summary, read_samples};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use circstat::circular;
use clap::{Parser, Subcommand};
use glob::glob;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file (library defaults if absent).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Circular statistics of files with one angle per line.
    Circular {
        #[arg(long)]
        input: String,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Geometric median statistics of files with one point per line.
    Geometric {
        #[arg(long)]
        input: String,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Unwrap a sequence of wrapped angles.
    Unwrap {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    log::info!("{cfg:#?}");

    match args.command {
        Command::Circular { input, output } => {
            run_analysis::<CircularReport>(cfg, &input, output).context("failed to run analysis")?
        }
        Command::Geometric { input, output } => {
            run_analysis::<GeometricReport>(cfg, &input, output)
                .context("failed to run analysis")?
        }
        Command::Unwrap { input } => {
            let samples = read_samples(&input)?;
            let unwrapped =
                circular::unwrap(&samples, &cfg.unwrap).context("failed to unwrap samples")?;
            for val in unwrapped {
                println!("{val}");
            }
        }
    }

    Ok(())
}

fn run_analysis<S: Summary>(cfg: Config, pattern: &str, output: Option<PathBuf>) -> Result<()> {
    let files = glob(pattern)
        .context("failed to glob input files")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read input path")?;
    if files.is_empty() {
        bail!("no input files match {pattern:?}");
    }

    let mut analyzer = Analyzer::<S>::new(cfg);
    for file in files {
        analyzer
            .add_file(&file)
            .with_context(|| format!("failed to add {file:?}"))?;
        log::info!("analyzed {file:?}");
    }

    print!("{}", analyzer.to_toml()?);

    if let Some(output) = output {
        analyzer
            .save_results(&output)
            .with_context(|| format!("failed to save {output:?}"))?;
        log::info!("saved {output:?}");
    }

    Ok(())
}
