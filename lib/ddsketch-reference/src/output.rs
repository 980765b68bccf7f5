//! Reference output.
//!
//! Reference output is plain text, with one `<rank>,<value>` line per record. Ranks are written with 3 significant
//! digits and values with 9 significant digits.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use snafu::{ResultExt as _, Snafu};

use crate::{format::format_significant, grid::QuantileRecord};

const RANK_SIGNIFICANT_DIGITS: usize = 3;
const VALUE_SIGNIFICANT_DIGITS: usize = 9;

/// Output error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum OutputError {
    /// Failed to create the output file.
    #[snafu(display("failed to create output file '{}': {}", path.display(), source))]
    Create {
        /// Path to the output file.
        path: PathBuf,

        /// Source of the error.
        source: io::Error,
    },

    /// Failed to open a reference output file for reading.
    #[snafu(display("failed to open reference file '{}': {}", path.display(), source))]
    Open {
        /// Path to the reference file.
        path: PathBuf,

        /// Source of the error.
        source: io::Error,
    },

    /// Failed to write records.
    #[snafu(display("failed to write records: {}", source))]
    WriteRecords {
        /// Source of the error.
        source: io::Error,
    },

    /// Failed to flush and sync the output file to stable storage.
    #[snafu(display("failed to sync output file '{}': {}", path.display(), source))]
    SyncFile {
        /// Path to the output file.
        path: PathBuf,

        /// Source of the error.
        source: io::Error,
    },

    /// Failed to read a line of reference output.
    #[snafu(display("failed to read line {}: {}", line, source))]
    ReadLine {
        /// Line number (1-based).
        line: usize,

        /// Source of the error.
        source: io::Error,
    },

    /// A line of reference output was not a valid `<rank>,<value>` pair.
    #[snafu(display("invalid record on line {}: '{}'", line, data))]
    InvalidRecord {
        /// Line number (1-based).
        line: usize,

        /// The offending line.
        data: String,
    },
}

/// Writes the records to the given writer, one `<rank>,<value>` line per record.
///
/// The writer is flushed before returning.
///
/// # Errors
///
/// If an error occurs while writing or flushing, it will be returned.
pub fn write_records<W>(mut writer: W, records: &[QuantileRecord]) -> Result<(), OutputError>
where
    W: Write,
{
    for record in records {
        writeln!(
            writer,
            "{},{}",
            format_significant(record.rank, RANK_SIGNIFICANT_DIGITS),
            format_significant(record.value, VALUE_SIGNIFICANT_DIGITS)
        )
        .context(WriteRecords)?;
    }

    writer.flush().context(WriteRecords)
}

/// Writes the records to the file at the given path, and syncs it to stable storage.
///
/// The file is created (or truncated) and held open until all records are written, buffered writes are flushed, and the
/// file contents have been synced. Once this function returns successfully, the records are durably on disk.
///
/// # Errors
///
/// If the file cannot be created, written to, or synced, an error is returned.
pub fn write_records_to_file<P>(path: P, records: &[QuantileRecord]) -> Result<(), OutputError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).context(Create { path })?;

    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records)?;

    let file = writer.into_inner().map_err(|e| e.into_error()).context(SyncFile { path })?;
    file.sync_all().context(SyncFile { path })
}

/// Reads reference output from the file at the given path.
///
/// # Errors
///
/// If the file cannot be opened or read, or contains an invalid record, an error is returned.
pub fn read_records<P>(path: P) -> Result<Vec<QuantileRecord>, OutputError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).context(Open { path })?;

    parse_records(BufReader::new(file))
}

/// Parses reference output from the given reader.
///
/// Each non-empty line must contain a rank and a value, separated by a single comma.
///
/// # Errors
///
/// If a line cannot be read, or is not a valid record, an error is returned.
pub fn parse_records<R>(reader: R) -> Result<Vec<QuantileRecord>, OutputError>
where
    R: BufRead,
{
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.context(ReadLine { line: line_number })?;
        if line.trim().is_empty() {
            continue;
        }

        let record = line
            .split_once(',')
            .and_then(|(rank, value)| {
                let rank = rank.trim().parse::<f64>().ok()?;
                let value = value.trim().parse::<f64>().ok()?;
                Some(QuantileRecord { rank, value })
            })
            .ok_or_else(|| OutputError::InvalidRecord {
                line: line_number,
                data: line.clone(),
            })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{quantile_grid, sample_quantiles, tests::ExactSketch};

    fn render(records: &[QuantileRecord]) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn record_line_format() {
        let records = [
            QuantileRecord { rank: 0.0, value: 1.0 },
            QuantileRecord {
                rank: 500.0 / 999.0,
                value: 5.000_499_87,
            },
            QuantileRecord {
                rank: 1.0,
                value: -12_345.678_9,
            },
        ];

        assert_eq!(
            render(&records),
            "0.00,1.00000000\n0.501,5.00049987\n1.00,-12345.6789\n"
        );
    }

    #[test]
    fn full_grid_output() {
        let mut sketch = ExactSketch::default();
        crate::sketch::populate(&mut sketch, &[2.0, 4.0, 8.0]);
        let records = sample_quantiles(&mut sketch).unwrap();

        let rendered = render(&records);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1000);
        assert_eq!(lines[0], "0.00,2.00000000");
        assert_eq!(lines[999], "1.00,8.00000000");
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn parse_written_records() {
        let mut sketch = ExactSketch::default();
        crate::sketch::populate(&mut sketch, &[0.25, 1.5, 1_000_000.0]);
        let records = sample_quantiles(&mut sketch).unwrap();

        let parsed = parse_records(render(&records).as_bytes()).unwrap();
        assert_eq!(parsed.len(), records.len());
        for (parsed, (original, rank)) in parsed.iter().zip(records.iter().zip(quantile_grid())) {
            assert!((parsed.rank - rank).abs() <= 0.005);
            assert_eq!(parsed.value, original.value);
        }
    }

    #[test]
    fn parse_invalid_record() {
        match parse_records("0.00,1.0\n0.5;2.0\n".as_bytes()) {
            Err(OutputError::InvalidRecord { line, data }) => {
                assert_eq!(line, 2);
                assert_eq!(data, "0.5;2.0");
            }
            other => panic!("expected invalid record error, got {:?}", other),
        }

        assert!(parse_records("0.00,abc\n".as_bytes()).is_err());
    }

    #[test]
    fn write_to_file_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let records = quantile_grid()
            .map(|rank| QuantileRecord { rank, value: rank * 10.0 })
            .collect::<Vec<_>>();

        write_records_to_file(&path, &records).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, render(&records));
        assert_eq!(read_records(&path).unwrap().len(), 1000);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output.csv");
        let records = [QuantileRecord { rank: 0.0, value: 0.0 }];

        assert!(matches!(
            write_records_to_file(&path, &records),
            Err(OutputError::Create { .. })
        ));
    }
}
