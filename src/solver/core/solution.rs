//! Archive of the prime variables at the save times of a run.
//!
//! A [`SolutionRecorder`] is preallocated for the save times
//! `k * savefreq` (k = 0..=N) and receives states in time order. Once the
//! run ends it is finalized into an immutable [`Solution`].

use crate::config::ModelChoice;
use crate::solver::State;

/// One prime variable stored as a (time × space) table.
///
/// Row-major layout: `data[k * n_cells + i]` for save index k and cell i.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldTable {
    pub data: Vec<f64>,
    pub n_times: usize,
    pub n_cells: usize,
}

impl FieldTable {
    /// Table initialized to NaN so unfilled rows are detectable.
    pub fn new(n_times: usize, n_cells: usize) -> Self {
        Self {
            data: vec![f64::NAN; n_times * n_cells],
            n_times,
            n_cells,
        }
    }

    /// Profile at save index k.
    pub fn row(&self, k: usize) -> &[f64] {
        let start = k * self.n_cells;
        &self.data[start..start + self.n_cells]
    }

    pub fn row_mut(&mut self, k: usize) -> &mut [f64] {
        let start = k * self.n_cells;
        &mut self.data[start..start + self.n_cells]
    }

    /// Time series of cell i.
    pub fn column(&self, i: usize) -> Vec<f64> {
        (0..self.n_times).map(|k| self.data[k * self.n_cells + i]).collect()
    }

    fn truncate(&mut self, n_times: usize) {
        self.n_times = n_times;
        self.data.truncate(n_times * self.n_cells);
    }
}

/// Final archive of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub model: ModelChoice,
    pub times: Vec<f64>,
    pub enthalpy: FieldTable,
    pub salt: FieldTable,
    /// Bulk gas G (EQM) or bulk dissolved gas D (DISEQ)
    pub gas: FieldTable,
    /// Gas fraction, DISEQ only
    pub gas_fraction: Option<FieldTable>,
}

impl Solution {
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    pub fn n_cells(&self) -> usize {
        self.enthalpy.n_cells
    }

    /// Prime state at save index k.
    pub fn state(&self, k: usize) -> State {
        let time = self.times[k];
        let enthalpy = self.enthalpy.row(k).to_vec();
        let salt = self.salt.row(k).to_vec();
        let gas = self.gas.row(k).to_vec();
        match &self.gas_fraction {
            Some(fraction) => State::diseq(time, enthalpy, salt, gas, fraction.row(k).to_vec()),
            None => State::eqm(time, enthalpy, salt, gas),
        }
    }

    /// Last archived state.
    pub fn last_state(&self) -> Option<State> {
        self.n_times().checked_sub(1).map(|k| self.state(k))
    }

    /// Named tables, in the order they are written to disk.
    pub fn tables(&self) -> Vec<(&'static str, &FieldTable)> {
        let gas_name = match self.model {
            ModelChoice::Eqm => "gas",
            ModelChoice::Diseq => "dissolved_gas",
        };
        let mut tables = vec![
            ("enthalpy", &self.enthalpy),
            ("salt", &self.salt),
            (gas_name, &self.gas),
        ];
        if let Some(fraction) = &self.gas_fraction {
            tables.push(("gas_fraction", fraction));
        }
        tables
    }
}

/// Append-only writer of a [`Solution`].
#[derive(Clone, Debug)]
pub struct SolutionRecorder {
    save_times: Vec<f64>,
    recorded: usize,
    solution: Solution,
}

impl SolutionRecorder {
    pub fn new(model: ModelChoice, n_cells: usize, save_times: Vec<f64>) -> Self {
        let n_times = save_times.len();
        let gas_fraction = match model {
            ModelChoice::Eqm => None,
            ModelChoice::Diseq => Some(FieldTable::new(n_times, n_cells)),
        };
        Self {
            recorded: 0,
            solution: Solution {
                model,
                times: Vec::with_capacity(n_times),
                enthalpy: FieldTable::new(n_times, n_cells),
                salt: FieldTable::new(n_times, n_cells),
                gas: FieldTable::new(n_times, n_cells),
                gas_fraction,
            },
            save_times,
        }
    }

    /// Time of the next state to archive.
    pub fn next_save_time(&self) -> Option<f64> {
        self.save_times.get(self.recorded).copied()
    }

    pub fn save_times(&self) -> &[f64] {
        &self.save_times
    }

    pub fn n_recorded(&self) -> usize {
        self.recorded
    }

    pub fn is_complete(&self) -> bool {
        self.recorded == self.save_times.len()
    }

    /// Archive `state` under the next save time.
    ///
    /// The state's own time may differ from the save time by the round-off
    /// of the stepping loop; the nominal save time is stored.
    pub fn record(&mut self, state: &State) {
        let Some(time) = self.next_save_time() else {
            return;
        };
        let k = self.recorded;
        let solution = &mut self.solution;
        solution.times.push(time);
        solution.enthalpy.row_mut(k).copy_from_slice(&state.enthalpy);
        solution.salt.row_mut(k).copy_from_slice(&state.salt);
        solution.gas.row_mut(k).copy_from_slice(&state.gas);
        if let Some(fraction) = &mut solution.gas_fraction {
            fraction.row_mut(k).copy_from_slice(&state.gas_fraction);
        }
        self.recorded += 1;
    }

    /// Freeze the archive. Rows never recorded (a failed run) are dropped.
    pub fn finish(self) -> Solution {
        let mut solution = self.solution;
        let n = self.recorded;
        solution.enthalpy.truncate(n);
        solution.salt.truncate(n);
        solution.gas.truncate(n);
        if let Some(fraction) = &mut solution.gas_fraction {
            fraction.truncate(n);
        }
        solution
    }
}
