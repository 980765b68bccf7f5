//! Reference-data generation for DDSketch implementations.
//!
//! This crate reads a list of samples, feeds them into a DDSketch (logarithmic mapping, collapsing-lowest dense store),
//! and samples the sketch's quantile function over a fixed grid of 1000 ranks. The resulting `rank,value` pairs are
//! written out as golden data that other sketch implementations can be compared against.
#![deny(missing_docs)]

use std::path::PathBuf;

use snafu::{ResultExt as _, Snafu};
use tracing::{debug, info};

mod format;
pub use self::format::format_significant;

pub mod grid;
pub use self::grid::{sample_quantiles, QuantileRecord, QUANTILE_GRID_POINTS};

pub mod input;
pub use self::input::{parse_samples, read_samples, InputError};

pub mod output;
pub use self::output::{parse_records, read_records, write_records, write_records_to_file, OutputError};

pub mod sketch;
pub use self::sketch::{populate, CollapsingLowestDenseSketch, QuantileSketch, SketchConfig, SketchError};

/// Generation error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum GenerateError {
    /// Failed to read samples from the input file.
    #[snafu(display("failed to read samples: {}", source))]
    ReadInput {
        /// Source of the error.
        source: InputError,
    },

    /// Failed to construct or query the sketch.
    #[snafu(display("sketch error: {}", source))]
    Sketch {
        /// Source of the error.
        source: SketchError,
    },

    /// Failed to write the reference output.
    #[snafu(display("failed to write reference output: {}", source))]
    WriteOutput {
        /// Source of the error.
        source: OutputError,
    },
}

/// Reference generation configuration.
#[derive(Clone, Debug)]
pub struct ReferenceConfig {
    /// Path to the input file containing comma-separated samples.
    pub input: PathBuf,

    /// Path to write the reference output to.
    pub output: PathBuf,

    /// Sketch parameters.
    pub sketch: SketchConfig,
}

/// Summary of a completed generation run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GenerateSummary {
    /// Number of samples read from the input file.
    pub samples: usize,

    /// Number of records written to the output file.
    pub records: usize,
}

/// Generates reference quantile data based on the given configuration.
///
/// Samples are read from the input file in full, added to a freshly-constructed sketch in file order, and the sketch is
/// then queried at every rank in the quantile grid. The output file is only created once every rank has been queried
/// successfully, and is synced to stable storage before returning.
///
/// # Errors
///
/// If the input cannot be read or contains a malformed sample, if the sketch cannot be constructed or queried, or if
/// the output cannot be written and synced, an error is returned. No retries are attempted.
pub fn generate(config: &ReferenceConfig) -> Result<GenerateSummary, GenerateError> {
    let samples = read_samples(&config.input).context(ReadInput)?;
    debug!(path = %config.input.display(), samples = samples.len(), "Read samples from input file.");

    let mut sketch = CollapsingLowestDenseSketch::new(&config.sketch).context(Sketch)?;
    populate(&mut sketch, &samples);

    let records = sample_quantiles(&mut sketch).context(Sketch)?;
    write_records_to_file(&config.output, &records).context(WriteOutput)?;

    info!(
        samples = samples.len(),
        records = records.len(),
        relative_accuracy = config.sketch.relative_accuracy,
        bin_limit = config.sketch.bin_limit,
        "Wrote reference quantiles to {}.",
        config.output.display()
    );

    Ok(GenerateSummary {
        samples: samples.len(),
        records: records.len(),
    })
}

