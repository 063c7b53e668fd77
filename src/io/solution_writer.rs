//! Text-column archive of a [`Solution`].
//!
//! # File Format
//!
//! ```text
//! # mushy solution: growth
//! # model: EQM
//! # cells: 3
//! # fields: enthalpy salt gas
//! 0e0 1e-1 1e-1 1e-1 0e0 0e0 0e0 2.9e-2 2.9e-2 2.9e-2
//! 1e-2 ...
//! ```
//!
//! Each data row holds the save time followed by the profile of every
//! field, bottom cell first. Values are written in shortest round-trip
//! form so a solution read back is bit-identical.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ModelChoice;
use crate::solver::{FieldTable, Solution};

/// Extension of solution files.
pub const SOLUTION_EXTENSION: &str = "sol";

/// Error writing or reading a solution file.
#[derive(Debug, Error)]
pub enum SolutionFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing header entry '{0}'")]
    MissingHeader(&'static str),
}

/// Write `solution` to `<directory>/<name>.sol`, creating the directory.
pub fn write_solution(
    solution: &Solution,
    name: &str,
    directory: impl AsRef<Path>,
) -> Result<PathBuf, SolutionFileError> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    let path = directory.join(format!("{}.{}", name, SOLUTION_EXTENSION));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_solution_to(&mut writer, solution, name)?;
    writer.flush()?;
    Ok(path)
}

/// Write `solution` in text-column form.
pub fn write_solution_to<W: Write>(
    writer: &mut W,
    solution: &Solution,
    name: &str,
) -> Result<(), SolutionFileError> {
    let tables = solution.tables();
    writeln!(writer, "# mushy solution: {}", name)?;
    writeln!(writer, "# model: {}", model_label(solution.model))?;
    writeln!(writer, "# cells: {}", solution.n_cells())?;
    let names: Vec<&str> = tables.iter().map(|(name, _)| *name).collect();
    writeln!(writer, "# fields: {}", names.join(" "))?;

    for (k, time) in solution.times.iter().enumerate() {
        write!(writer, "{:e}", time)?;
        for (_, table) in &tables {
            for value in table.row(k) {
                write!(writer, " {:e}", value)?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn model_label(model: ModelChoice) -> &'static str {
    match model {
        ModelChoice::Eqm => "EQM",
        ModelChoice::Diseq => "DISEQ",
    }
}

/// Read a solution file written by [`write_solution`].
pub fn read_solution(path: impl AsRef<Path>) -> Result<Solution, SolutionFileError> {
    let file = File::open(path)?;
    parse_solution(BufReader::new(file))
}

/// Parse a solution from text-column form.
pub fn parse_solution<R: BufRead>(reader: R) -> Result<Solution, SolutionFileError> {
    let mut model = None;
    let mut n_cells = None;
    let mut times = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once(':') {
                let value = value.trim();
                match key.trim() {
                    "model" => {
                        model = Some(match value {
                            "EQM" => ModelChoice::Eqm,
                            "DISEQ" => ModelChoice::Diseq,
                            other => {
                                return Err(parse_error(line_no, format!("unknown model {}", other)));
                            }
                        })
                    }
                    "cells" => {
                        n_cells = Some(value.parse::<usize>().map_err(|e| {
                            parse_error(line_no, format!("invalid cell count: {}", e))
                        })?)
                    }
                    _ => {}
                }
            }
            continue;
        }

        let model = model.ok_or(SolutionFileError::MissingHeader("model"))?;
        let n_cells = n_cells.ok_or(SolutionFileError::MissingHeader("cells"))?;
        let values = trimmed
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|e| parse_error(line_no, format!("'{}': {}", token, e)))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        let expected = 1 + n_fields(model) * n_cells;
        if values.len() != expected {
            return Err(parse_error(
                line_no,
                format!("expected {} values, found {}", expected, values.len()),
            ));
        }
        times.push(values[0]);
        rows.push(values[1..].to_vec());
    }

    let model = model.ok_or(SolutionFileError::MissingHeader("model"))?;
    let n_cells = n_cells.ok_or(SolutionFileError::MissingHeader("cells"))?;
    let n_times = times.len();
    let table = |field: usize| {
        let mut table = FieldTable::new(n_times, n_cells);
        for (k, row) in rows.iter().enumerate() {
            table
                .row_mut(k)
                .copy_from_slice(&row[field * n_cells..(field + 1) * n_cells]);
        }
        table
    };

    Ok(Solution {
        model,
        times,
        enthalpy: table(0),
        salt: table(1),
        gas: table(2),
        gas_fraction: (model == ModelChoice::Diseq).then(|| table(3)),
    })
}

fn n_fields(model: ModelChoice) -> usize {
    match model {
        ModelChoice::Eqm => 3,
        ModelChoice::Diseq => 4,
    }
}

fn parse_error(line: usize, message: String) -> SolutionFileError {
    SolutionFileError::Parse { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{SolutionRecorder, State};

    fn diseq_solution() -> Solution {
        let mut recorder = SolutionRecorder::new(ModelChoice::Diseq, 2, vec![0.0, 0.5]);
        recorder.record(&State::diseq(
            0.0,
            vec![0.1, -2.5],
            vec![0.0, -0.3],
            vec![0.029, 0.01],
            vec![0.0, 1e-7],
        ));
        recorder.record(&State::diseq(
            0.5,
            vec![0.2, -2.75],
            vec![0.0, -0.31],
            vec![0.028, 0.011],
            vec![0.0, 3.3e-5],
        ));
        recorder.finish()
    }

    #[test]
    fn test_write_then_parse_is_exact() {
        let solution = diseq_solution();
        let mut buffer = Vec::new();
        write_solution_to(&mut buffer, &solution, "test").unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("# fields: enthalpy salt dissolved_gas gas_fraction"));

        let parsed = parse_solution(buffer.as_slice()).unwrap();
        assert_eq!(parsed, solution);
    }

    #[test]
    fn test_row_length_checked() {
        let text = "# model: EQM\n# cells: 2\n0.0 1 2 3 4 5\n";
        assert!(matches!(
            parse_solution(text.as_bytes()),
            Err(SolutionFileError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_header() {
        let text = "# cells: 1\n0.0 1 2 3\n";
        assert!(matches!(
            parse_solution(text.as_bytes()),
            Err(SolutionFileError::MissingHeader("model"))
        ));
    }
}
