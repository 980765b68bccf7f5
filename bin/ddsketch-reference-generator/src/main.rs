//! Generates reference quantile data by feeding samples into a DDSketch and sampling its quantile function over a fixed
//! grid of ranks.

#![deny(warnings)]
#![deny(missing_docs)]

use anyhow::{Context as _, Error as GenericError};
use clap::Parser as _;
use ddsketch_reference::generate;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

mod config;
use self::config::Cli;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .init();

    match run(cli) {
        Ok(()) => info!("ddsketch-reference-generator stopped."),
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), GenericError> {
    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        alpha = cli.alpha,
        max_bins = cli.max_bins,
        "ddsketch-reference-generator starting..."
    );

    let config = cli.reference_config();
    let summary = generate(&config)
        .with_context(|| format!("Failed to generate reference output from '{}'.", config.input.display()))?;

    info!(
        "Generated {} reference quantiles from {} samples.",
        summary.records, summary.samples
    );

    Ok(())
}
