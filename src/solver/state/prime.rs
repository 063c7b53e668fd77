//! Prime variables advanced by the time integrators.
//!
//! Every model carries enthalpy H and bulk salinity S. The gas variables
//! depend on the model:
//! - EQM: bulk gas G (dissolved plus bubbles)
//! - DISEQ: bulk dissolved gas D and gas fraction φg, exchanged by nucleation

use crate::config::ModelChoice;

/// Prime variables of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrimeCell {
    pub enthalpy: f64,
    pub salt: f64,
    /// Bulk gas G (EQM) or bulk dissolved gas D (DISEQ)
    pub gas: f64,
    /// Gas fraction φg (DISEQ only, zero for EQM)
    pub gas_fraction: f64,
}

/// Prime variables on cell centers at one time.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub time: f64,
    pub enthalpy: Vec<f64>,
    pub salt: Vec<f64>,
    /// Bulk gas G (EQM) or bulk dissolved gas D (DISEQ)
    pub gas: Vec<f64>,
    /// Gas fraction φg; empty for EQM
    pub gas_fraction: Vec<f64>,
}

impl State {
    /// EQM state from enthalpy, salinity and bulk gas.
    pub fn eqm(time: f64, enthalpy: Vec<f64>, salt: Vec<f64>, gas: Vec<f64>) -> Self {
        assert_eq!(enthalpy.len(), salt.len(), "Salt length mismatch");
        assert_eq!(enthalpy.len(), gas.len(), "Gas length mismatch");
        Self {
            time,
            enthalpy,
            salt,
            gas,
            gas_fraction: Vec::new(),
        }
    }

    /// DISEQ state from enthalpy, salinity, dissolved gas and gas fraction.
    pub fn diseq(
        time: f64,
        enthalpy: Vec<f64>,
        salt: Vec<f64>,
        dissolved_gas: Vec<f64>,
        gas_fraction: Vec<f64>,
    ) -> Self {
        assert_eq!(enthalpy.len(), salt.len(), "Salt length mismatch");
        assert_eq!(enthalpy.len(), dissolved_gas.len(), "Gas length mismatch");
        assert_eq!(
            enthalpy.len(),
            gas_fraction.len(),
            "Gas fraction length mismatch"
        );
        Self {
            time,
            enthalpy,
            salt,
            gas: dissolved_gas,
            gas_fraction,
        }
    }

    /// Uniform state in `n_cells` cells.
    pub fn uniform(model: ModelChoice, n_cells: usize, cell: PrimeCell) -> Self {
        match model {
            ModelChoice::Eqm => Self::eqm(
                0.0,
                vec![cell.enthalpy; n_cells],
                vec![cell.salt; n_cells],
                vec![cell.gas; n_cells],
            ),
            ModelChoice::Diseq => Self::diseq(
                0.0,
                vec![cell.enthalpy; n_cells],
                vec![cell.salt; n_cells],
                vec![cell.gas; n_cells],
                vec![cell.gas_fraction; n_cells],
            ),
        }
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.enthalpy.len()
    }

    #[inline]
    pub fn model(&self) -> ModelChoice {
        if self.gas_fraction.is_empty() {
            ModelChoice::Eqm
        } else {
            ModelChoice::Diseq
        }
    }

    #[inline]
    pub fn cell(&self, i: usize) -> PrimeCell {
        PrimeCell {
            enthalpy: self.enthalpy[i],
            salt: self.salt[i],
            gas: self.gas[i],
            gas_fraction: self.gas_fraction.get(i).copied().unwrap_or(0.0),
        }
    }

    /// Same shape with every variable zero, at the same time.
    pub fn zeros_with_shape(&self) -> Self {
        Self {
            time: self.time,
            enthalpy: vec![0.0; self.enthalpy.len()],
            salt: vec![0.0; self.salt.len()],
            gas: vec![0.0; self.gas.len()],
            gas_fraction: vec![0.0; self.gas_fraction.len()],
        }
    }

    /// Named fields for iteration, writing and finiteness checks.
    pub fn fields(&self) -> Vec<(&'static str, &[f64])> {
        let mut fields = vec![
            ("enthalpy", self.enthalpy.as_slice()),
            ("salt", self.salt.as_slice()),
        ];
        match self.model() {
            ModelChoice::Eqm => fields.push(("gas", self.gas.as_slice())),
            ModelChoice::Diseq => {
                fields.push(("dissolved_gas", self.gas.as_slice()));
                fields.push(("gas_fraction", self.gas_fraction.as_slice()));
            }
        }
        fields
    }

    /// First non-finite value as `(field, cell)`, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, usize)> {
        self.fields().into_iter().find_map(|(name, values)| {
            values
                .iter()
                .position(|v| !v.is_finite())
                .map(|cell| (name, cell))
        })
    }

    fn for_each_field_mut(&mut self, mut f: impl FnMut(&mut Vec<f64>)) {
        f(&mut self.enthalpy);
        f(&mut self.salt);
        f(&mut self.gas);
        f(&mut self.gas_fraction);
    }

    /// self <- c * self
    pub fn scale(&mut self, c: f64) {
        self.for_each_field_mut(|values| values.iter_mut().for_each(|v| *v *= c));
    }

    /// self <- self + c * other
    pub fn axpy(&mut self, c: f64, other: &State) {
        debug_assert_eq!(self.n_cells(), other.n_cells());
        debug_assert_eq!(self.gas_fraction.len(), other.gas_fraction.len());
        axpy_slice(&mut self.enthalpy, c, &other.enthalpy);
        axpy_slice(&mut self.salt, c, &other.salt);
        axpy_slice(&mut self.gas, c, &other.gas);
        axpy_slice(&mut self.gas_fraction, c, &other.gas_fraction);
    }

    /// Largest component-wise absolute value over all fields.
    pub fn max_abs(&self) -> f64 {
        self.fields()
            .iter()
            .flat_map(|(_, values)| values.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

fn axpy_slice(x: &mut [f64], c: f64, y: &[f64]) {
    for (xi, yi) in x.iter_mut().zip(y) {
        *xi += c * yi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> State {
        State::diseq(
            0.5,
            vec![1.0, 2.0],
            vec![0.1, 0.2],
            vec![0.01, 0.02],
            vec![0.0, 0.05],
        )
    }

    #[test]
    fn test_model_from_shape() {
        let eqm = State::eqm(0.0, vec![0.0], vec![0.0], vec![0.0]);
        assert_eq!(eqm.model(), ModelChoice::Eqm);
        assert_eq!(sample().model(), ModelChoice::Diseq);
        assert_eq!(sample().fields().len(), 4);
        assert_eq!(eqm.fields().len(), 3);
    }

    #[test]
    fn test_scale_and_axpy() {
        let mut a = sample();
        let b = sample();
        a.scale(2.0);
        a.axpy(-1.0, &b);
        assert_eq!(a.enthalpy, b.enthalpy);
        assert_eq!(a.gas_fraction, b.gas_fraction);
        // time is not a prime variable
        assert_eq!(a.time, 0.5);
    }

    #[test]
    fn test_first_non_finite() {
        let mut state = sample();
        assert!(state.first_non_finite().is_none());
        state.salt[1] = f64::NAN;
        assert_eq!(state.first_non_finite(), Some(("salt", 1)));
    }

    #[test]
    fn test_cell_access() {
        let eqm = State::eqm(0.0, vec![0.3], vec![0.1], vec![0.02]);
        let cell = eqm.cell(0);
        assert_eq!(cell.gas_fraction, 0.0);
        assert_eq!(cell.gas, 0.02);
    }
}
