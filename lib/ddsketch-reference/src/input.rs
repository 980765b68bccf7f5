//! Sample input.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use snafu::{ResultExt as _, Snafu};

/// Input error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum InputError {
    /// Failed to open the input file.
    #[snafu(display("failed to open input file '{}': {}", path.display(), source))]
    Open {
        /// Path to the input file.
        path: PathBuf,

        /// Source of the error.
        source: io::Error,
    },

    /// Failed to read a line from the input.
    #[snafu(display("failed to read line {}: {}", line, source))]
    ReadLine {
        /// Line number (1-based).
        line: usize,

        /// Source of the error.
        source: io::Error,
    },

    /// A token could not be parsed as a floating-point number.
    #[snafu(display("invalid sample '{}' on line {}: {}", token, line, source))]
    InvalidSample {
        /// Line number (1-based).
        line: usize,

        /// The offending token, with surrounding whitespace trimmed.
        token: String,

        /// Source of the error.
        source: ParseFloatError,
    },
}

/// Reads all samples from the file at the given path.
///
/// # Errors
///
/// If the file cannot be opened or read, or contains a malformed sample, an error is returned.
pub fn read_samples<P>(path: P) -> Result<Vec<f64>, InputError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).context(Open { path })?;

    parse_samples(BufReader::new(file))
}

/// Parses samples from the given reader.
///
/// Every line is split on commas, and each token is trimmed of surrounding whitespace. Empty tokens are skipped, and
/// all other tokens must parse as `f64`. Samples are returned in the order they appear.
///
/// # Errors
///
/// If a line cannot be read, or any token fails to parse, an error is returned and no samples are returned.
pub fn parse_samples<R>(reader: R) -> Result<Vec<f64>, InputError>
where
    R: BufRead,
{
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.context(ReadLine { line: line_number })?;

        for token in line.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            let sample = token.parse::<f64>().context(InvalidSample {
                line: line_number,
                token,
            })?;
            samples.push(sample);
        }
    }

    Ok(samples)
}
