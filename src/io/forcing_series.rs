//! Reader for forcing records stored as text columns.
//!
//! Field-station and reanalysis records are tab or whitespace separated
//! tables with one row per sample:
//!
//! ```text
//! # BRW09 thermistor record
//! # day  ...  air(°C) ...
//! 0.0    ...  -20.3   ...
//! 0.25   ...  9999    ...
//! ```
//!
//! Missing samples are stored as large sentinels (9999) or left empty; any
//! value with |x| above the missing-value threshold, or that does not parse,
//! is dropped together with its time. Times are shifted so the first row is
//! time zero and must increase strictly after filtering.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Values with a larger magnitude are treated as missing.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 100.0;

/// Error reading a forcing record.
#[derive(Debug, Error)]
pub enum ForcingSeriesError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Forcing record contains no valid samples")]
    Empty,

    #[error("Non-monotonic time at line {line}")]
    NonMonotonic { line: usize },
}

/// Lookup outside the time range covered by a forcing record.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("Forcing requested at time {time} outside record [{start}, {end}]")]
pub struct ForcingLookupError {
    pub time: f64,
    pub start: f64,
    pub end: f64,
}

/// Scalar forcing record with linear interpolation.
#[derive(Clone, Debug, PartialEq)]
pub struct ForcingSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl ForcingSeries {
    /// Series from matching time and value samples.
    ///
    /// # Errors
    /// - `Empty` if no samples are given
    /// - `NonMonotonic` if times do not increase strictly
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, ForcingSeriesError> {
        assert_eq!(times.len(), values.len(), "Time and value lengths differ");
        if times.is_empty() {
            return Err(ForcingSeriesError::Empty);
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ForcingSeriesError::NonMonotonic { line: i + 2 });
        }
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First and last sample time.
    pub fn time_range(&self) -> (f64, f64) {
        match (self.times.first(), self.times.last()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => (0.0, 0.0),
        }
    }

    pub fn contains_time(&self, t: f64) -> bool {
        let (start, end) = self.time_range();
        t >= start && t <= end
    }

    /// Linearly interpolated value at time `t`.
    pub fn value_at(&self, t: f64) -> Result<f64, ForcingLookupError> {
        let (start, end) = self.time_range();
        if !self.contains_time(t) {
            return Err(ForcingLookupError {
                time: t,
                start,
                end,
            });
        }

        // Index of the first sample strictly after t
        let upper = self.times.partition_point(|&s| s <= t);
        if upper == self.times.len() {
            return Ok(self.values[upper - 1]);
        }
        let lower = upper - 1;

        let t0 = self.times[lower];
        let t1 = self.times[upper];
        let alpha = (t - t0) / (t1 - t0);
        Ok(self.values[lower] + alpha * (self.values[upper] - self.values[lower]))
    }
}

/// Read one value column against a time column from a forcing record.
///
/// Times are made relative to the first data row.
pub fn read_forcing_series(
    path: &Path,
    time_column: usize,
    value_column: usize,
    missing_threshold: f64,
) -> Result<ForcingSeries, ForcingSeriesError> {
    let file = File::open(path).map_err(|source| ForcingSeriesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_forcing_series(BufReader::new(file), time_column, value_column, missing_threshold)
        .map_err(|err| match err {
            ForcingSeriesError::Io { source, .. } => ForcingSeriesError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
}

/// Parse a forcing record from any buffered reader.
pub fn parse_forcing_series<R: BufRead>(
    reader: R,
    time_column: usize,
    value_column: usize,
    missing_threshold: f64,
) -> Result<ForcingSeries, ForcingSeriesError> {
    let mut first_time: Option<f64> = None;
    let mut times = Vec::new();
    let mut values = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| ForcingSeriesError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = if line.contains('\t') {
            line.split('\t').map(str::trim).collect()
        } else {
            line.split_whitespace().collect()
        };

        let time: f64 = columns
            .get(time_column)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ForcingSeriesError::Parse {
                line: line_num + 1,
                message: format!("Invalid time in column {}", time_column),
            })?;
        let origin = *first_time.get_or_insert(time);

        let value = columns
            .get(value_column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && v.abs() <= missing_threshold);
        let Some(value) = value else {
            continue;
        };

        let time = time - origin;
        if let Some(&prev) = times.last() {
            if time <= prev {
                return Err(ForcingSeriesError::NonMonotonic { line: line_num + 1 });
            }
        }
        times.push(time);
        values.push(value);
    }

    ForcingSeries::new(times, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_filters_missing_values() {
        let data = "# header\n10.0\t-20.0\t1.0\n10.5\t9999\t2.0\n11.0\t-10.0\t3.0\n11.5\t\t4.0\n";
        let series = parse_forcing_series(Cursor::new(data), 0, 1, 100.0).unwrap();
        assert_eq!(series.times(), &[0.0, 1.0]);
        assert_eq!(series.values(), &[-20.0, -10.0]);

        let other = parse_forcing_series(Cursor::new(data), 0, 2, 100.0).unwrap();
        assert_eq!(other.len(), 4);
    }

    #[test]
    fn test_whitespace_columns() {
        let data = "0 1.0\n1   3.0\n";
        let series = parse_forcing_series(Cursor::new(data), 0, 1, 100.0).unwrap();
        assert!((series.value_at(0.5).unwrap() - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_interpolation_and_bounds() {
        let series = ForcingSeries::new(vec![0.0, 1.0, 3.0], vec![0.0, 2.0, -2.0]).unwrap();
        assert!((series.value_at(0.25).unwrap() - 0.5).abs() < 1e-14);
        assert!((series.value_at(2.0).unwrap() - 0.0).abs() < 1e-14);
        assert!((series.value_at(3.0).unwrap() + 2.0).abs() < 1e-14);
        assert!((series.value_at(1.0).unwrap() - 2.0).abs() < 1e-14);

        let err = series.value_at(3.5).unwrap_err();
        assert_eq!(err.start, 0.0);
        assert_eq!(err.end, 3.0);
        assert!(series.value_at(-0.1).is_err());
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let data = "0 1.0\n2 1.0\n1 1.0\n";
        assert!(matches!(
            parse_forcing_series(Cursor::new(data), 0, 1, 100.0),
            Err(ForcingSeriesError::NonMonotonic { line: 3 })
        ));
    }

    #[test]
    fn test_empty_record() {
        let data = "# nothing\n0 9999\n";
        assert!(matches!(
            parse_forcing_series(Cursor::new(data), 0, 1, 100.0),
            Err(ForcingSeriesError::Empty)
        ));
    }

    #[test]
    fn test_read_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "5.0\t-1.0").unwrap();
        writeln!(file, "6.0\t-3.0").unwrap();
        let series =
            read_forcing_series(file.path(), 0, 1, DEFAULT_MISSING_THRESHOLD).unwrap();
        assert_eq!(series.time_range(), (0.0, 1.0));

        let missing = read_forcing_series(Path::new("/nonexistent/forcing.txt"), 0, 1, 100.0);
        assert!(matches!(missing, Err(ForcingSeriesError::Io { .. })));
    }
}
