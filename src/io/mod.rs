//! I/O utilities for reading and writing data files.
//!
//! This module provides:
//! - **Forcing records**: field-station and reanalysis temperature series
//!   read from text columns, interpolated linearly in time
//! - **Solution archives**: the saved prime variables of a run as text
//!   columns, written after a run and read back for analysis
//!
//! # Example
//!
//! ```no_run
//! use mushy_rs::io::{read_forcing_series, read_solution, DEFAULT_MISSING_THRESHOLD};
//!
//! let path = std::path::Path::new("BRW09.txt");
//! let series = read_forcing_series(path, 0, 5, DEFAULT_MISSING_THRESHOLD).unwrap();
//! let air = series.value_at(12.5).unwrap();
//!
//! let solution = read_solution("out/growth.sol").unwrap();
//! println!("{} saves, air temperature {}", solution.n_times(), air);
//! ```

mod forcing_series;
mod solution_writer;

pub use forcing_series::{
    DEFAULT_MISSING_THRESHOLD, ForcingLookupError, ForcingSeries, ForcingSeriesError,
    parse_forcing_series, read_forcing_series,
};
pub use solution_writer::{
    SOLUTION_EXTENSION, SolutionFileError, parse_solution, read_solution, write_solution,
    write_solution_to,
};
