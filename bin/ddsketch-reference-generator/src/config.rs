use std::path::PathBuf;

use clap::Parser;
use ddsketch_reference::{
    sketch::{DEFAULT_BIN_LIMIT, DEFAULT_RELATIVE_ACCURACY},
    ReferenceConfig, SketchConfig,
};

#[derive(Clone, Debug, Parser)]
#[command(about, version)]
pub struct Cli {
    /// Path to the input file.
    ///
    /// Each line should contain a comma-separated list of floating-point numbers. Empty values are ignored.
    pub input: PathBuf,

    /// Path to write the reference output to.
    ///
    /// The file is created if it does not exist, and truncated if it does. Each line holds a rank and the estimated
    /// value at that rank, separated by a comma.
    pub output: PathBuf,

    /// Relative accuracy of the sketch.
    #[arg(default_value_t = DEFAULT_RELATIVE_ACCURACY)]
    pub alpha: f64,

    /// Maximum number of bins the sketch keeps before collapsing the lowest bins.
    #[arg(default_value_t = DEFAULT_BIN_LIMIT)]
    pub max_bins: u32,
}

impl Cli {
    pub fn reference_config(&self) -> ReferenceConfig {
        ReferenceConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            sketch: SketchConfig {
                relative_accuracy: self.alpha,
                bin_limit: self.max_bins,
            },
        }
    }
}
