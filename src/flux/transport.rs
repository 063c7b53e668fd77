//! Edge fluxes of heat, salt and gas.
//!
//! All fluxes live on the I+1 cell edges and are assembled from the
//! ghost-padded [`StateBCs`] and the [`EdgeVelocities`]:
//!
//! ```text
//! heat        -k_e ∂T/∂z               + up(T, Wl)      + up(H, V)
//! salt        -φl (1/Le_S + ε) ∂Θl/∂z  + up(Θl + C, Wl) + up(S, V)
//! gas (EQM)   -φl χ/Le_G ∂ω/∂z         + up(χω, Wl)     + up(G, V) + up(φg, Vg)
//! D (DISEQ)   -φl χ/Le_G ∂ω/∂z         + up(χω, Wl)     + up(D, V)
//! φg (DISEQ)                                              up(φg, V) + up(φg, Vg)
//! ```
//!
//! with ε the turbulent diffusivity, `k_e` the effective conductivity and
//! `φl` the geometric edge mean of the liquid fraction.

use crate::closures::{EdgeVelocities, eddy_diffusivity, edge_conductivity};
use crate::config::{ModelChoice, PhysicalParams};
use crate::mesh::{Grid, geometric, upwind};
use crate::solver::StateBCs;

/// Fluxes of every prime variable on edges.
///
/// `gas` holds the bulk gas flux for EQM and the bulk dissolved gas flux
/// for DISEQ; `gas_fraction` is empty for EQM.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeFluxes {
    pub heat: Vec<f64>,
    pub salt: Vec<f64>,
    pub gas: Vec<f64>,
    pub gas_fraction: Vec<f64>,
}

impl EdgeFluxes {
    /// Flux through the bottom and top of the column for every field,
    /// in the order (heat, salt, gas, gas fraction).
    pub fn boundary_fluxes(&self) -> [(f64, f64); 4] {
        let ends = |v: &[f64]| match (v.first(), v.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 0.0),
        };
        [
            ends(&self.heat),
            ends(&self.salt),
            ends(&self.gas),
            ends(&self.gas_fraction),
        ]
    }
}

/// Flux assembly for one run.
#[derive(Clone, Debug)]
pub struct TransportFluxes {
    params: PhysicalParams,
}

impl TransportFluxes {
    pub fn new(params: &PhysicalParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// Turbulent diffusivity on edges.
    fn edge_eddy(&self, edge_liquid: &[f64]) -> Vec<f64> {
        edge_liquid
            .iter()
            .map(|&phi| eddy_diffusivity(phi, self.params.eddy_diffusivity_ratio))
            .collect()
    }

    /// Effective conductivity `k_e` on edges: phase-averaged conductivity
    /// plus turbulent diffusivity.
    pub fn effective_conductivity(&self, bcs: &StateBCs) -> Vec<f64> {
        let edge_liquid = geometric(&bcs.liquid_fraction);
        let eddy = self.edge_eddy(&edge_liquid);
        edge_conductivity(&bcs.liquid_fraction, &bcs.solid_fraction, &self.params)
            .into_iter()
            .zip(eddy)
            .map(|(k, e)| k + e)
            .collect()
    }

    /// Conductive part of the heat flux, `-k_e ∂T/∂z`.
    pub fn conductive_heat_flux(&self, grid: &Grid, bcs: &StateBCs) -> Vec<f64> {
        let gradient = grid.diff_ghosts(&bcs.temperature);
        self.effective_conductivity(bcs)
            .into_iter()
            .zip(gradient)
            .map(|(k, dt)| -k * dt)
            .collect()
    }

    /// Advective part of the heat flux, brine plus frame advection.
    pub fn advective_heat_flux(&self, bcs: &StateBCs, velocities: &EdgeVelocities) -> Vec<f64> {
        let brine = upwind(&bcs.temperature, &velocities.liquid);
        let frame = upwind(&bcs.enthalpy, &velocities.frame);
        brine.into_iter().zip(frame).map(|(b, f)| b + f).collect()
    }

    pub fn heat_flux(
        &self,
        grid: &Grid,
        bcs: &StateBCs,
        velocities: &EdgeVelocities,
    ) -> Vec<f64> {
        let mut flux = self.conductive_heat_flux(grid, bcs);
        for (f, a) in flux.iter_mut().zip(self.advective_heat_flux(bcs, velocities)) {
            *f += a;
        }
        flux
    }

    pub fn salt_flux(&self, grid: &Grid, bcs: &StateBCs, velocities: &EdgeVelocities) -> Vec<f64> {
        let edge_liquid = geometric(&bcs.liquid_fraction);
        let eddy = self.edge_eddy(&edge_liquid);
        let gradient = grid.diff_ghosts(&bcs.liquid_salinity);
        let c = self.params.concentration_ratio;
        let shifted: Vec<f64> = bcs.liquid_salinity.iter().map(|&s| s + c).collect();
        let brine = upwind(&shifted, &velocities.liquid);
        let frame = upwind(&bcs.salt, &velocities.frame);
        let molecular = self.params.salt_diffusivity();

        (0..edge_liquid.len())
            .map(|j| {
                -edge_liquid[j] * (molecular + eddy[j]) * gradient[j] + brine[j] + frame[j]
            })
            .collect()
    }

    /// Diffusion and brine advection of dissolved gas, common to both
    /// models.
    fn dissolved_gas_transport(
        &self,
        grid: &Grid,
        bcs: &StateBCs,
        velocities: &EdgeVelocities,
    ) -> Vec<f64> {
        let edge_liquid = geometric(&bcs.liquid_fraction);
        let chi = self.params.expansion_coefficient;
        let gradient = grid.diff_ghosts(&bcs.dissolved_gas);
        let mut diffusivity = vec![self.params.gas_diffusivity(); edge_liquid.len()];
        if self.params.eddy_diffuse_gas {
            for (d, e) in diffusivity.iter_mut().zip(self.edge_eddy(&edge_liquid)) {
                *d += e;
            }
        }
        let concentration: Vec<f64> = bcs.dissolved_gas.iter().map(|&w| chi * w).collect();
        let brine = upwind(&concentration, &velocities.liquid);

        (0..edge_liquid.len())
            .map(|j| -chi * diffusivity[j] * edge_liquid[j] * gradient[j] + brine[j])
            .collect()
    }

    /// Bulk gas flux of the EQM model.
    pub fn gas_flux(&self, grid: &Grid, bcs: &StateBCs, velocities: &EdgeVelocities) -> Vec<f64> {
        let mut flux = self.dissolved_gas_transport(grid, bcs, velocities);
        let frame = upwind(&bcs.gas, &velocities.frame);
        let bubbles = upwind(&bcs.gas_fraction, &velocities.gas);
        for ((f, a), b) in flux.iter_mut().zip(frame).zip(bubbles) {
            *f += a + b;
        }
        flux
    }

    /// Bulk dissolved gas flux of the DISEQ model.
    pub fn dissolved_gas_flux(
        &self,
        grid: &Grid,
        bcs: &StateBCs,
        velocities: &EdgeVelocities,
    ) -> Vec<f64> {
        let mut flux = self.dissolved_gas_transport(grid, bcs, velocities);
        for (f, a) in flux.iter_mut().zip(upwind(&bcs.gas, &velocities.frame)) {
            *f += a;
        }
        flux
    }

    /// Gas fraction flux of the DISEQ model.
    pub fn gas_fraction_flux(&self, bcs: &StateBCs, velocities: &EdgeVelocities) -> Vec<f64> {
        upwind(&bcs.gas_fraction, &velocities.frame)
            .into_iter()
            .zip(upwind(&bcs.gas_fraction, &velocities.gas))
            .map(|(a, b)| a + b)
            .collect()
    }

    /// All fluxes of the given model.
    pub fn compute(
        &self,
        model: ModelChoice,
        grid: &Grid,
        bcs: &StateBCs,
        velocities: &EdgeVelocities,
    ) -> EdgeFluxes {
        let heat = self.heat_flux(grid, bcs, velocities);
        let salt = self.salt_flux(grid, bcs, velocities);
        match model {
            ModelChoice::Eqm => EdgeFluxes {
                heat,
                salt,
                gas: self.gas_flux(grid, bcs, velocities),
                gas_fraction: Vec::new(),
            },
            ModelChoice::Diseq => EdgeFluxes {
                heat,
                salt,
                gas: self.dissolved_gas_flux(grid, bcs, velocities),
                gas_fraction: self.gas_fraction_flux(bcs, velocities),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_bcs(n: usize, temperature: f64) -> StateBCs {
        let m = n + 2;
        StateBCs {
            time: 0.0,
            enthalpy: vec![temperature; m],
            salt: vec![0.0; m],
            gas: vec![0.029; m],
            temperature: vec![temperature; m],
            liquid_salinity: vec![0.0; m],
            dissolved_gas: vec![1.0; m],
            solid_fraction: vec![0.0; m],
            liquid_fraction: vec![1.0; m],
            gas_fraction: vec![0.0; m],
        }
    }

    fn still(n_edges: usize) -> EdgeVelocities {
        EdgeVelocities {
            gas: vec![0.0; n_edges],
            liquid: vec![0.0; n_edges],
            frame: vec![0.0; n_edges],
        }
    }

    #[test]
    fn test_uniform_state_has_no_diffusive_flux() {
        let grid = Grid::new(5);
        let bcs = uniform_bcs(5, 0.3);
        let fluxes = TransportFluxes::new(&PhysicalParams::default()).compute(
            ModelChoice::Eqm,
            &grid,
            &bcs,
            &still(6),
        );
        assert!(fluxes.heat.iter().all(|&f| f.abs() < 1e-14));
        assert!(fluxes.salt.iter().all(|&f| f.abs() < 1e-14));
        assert!(fluxes.gas.iter().all(|&f| f.abs() < 1e-14));
        assert!(fluxes.gas_fraction.is_empty());
    }

    #[test]
    fn test_linear_temperature_gives_constant_conduction() {
        let grid = Grid::new(4);
        let mut bcs = uniform_bcs(4, 0.0);
        bcs.temperature = grid.ghosts().iter().map(|&z| -2.0 * z).collect();
        let flux = TransportFluxes::new(&PhysicalParams::default()).conductive_heat_flux(&grid, &bcs);
        assert!(flux.iter().all(|&f| (f - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_eddy_enhances_conduction_in_liquid() {
        let grid = Grid::new(4);
        let mut bcs = uniform_bcs(4, 0.0);
        bcs.temperature = grid.ghosts().to_vec();
        let params = PhysicalParams {
            eddy_diffusivity_ratio: 10.0,
            ..Default::default()
        };
        let flux = TransportFluxes::new(&params).conductive_heat_flux(&grid, &bcs);
        assert!(flux.iter().all(|&f| (f + 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_salt_diffuses_only_with_finite_lewis() {
        let grid = Grid::new(4);
        let mut bcs = uniform_bcs(4, 0.0);
        bcs.liquid_salinity = grid.ghosts().to_vec();
        let v = still(5);

        let flux = TransportFluxes::new(&PhysicalParams::default()).salt_flux(&grid, &bcs, &v);
        assert!(flux.iter().all(|&f| f.abs() < 1e-14));

        let params = PhysicalParams {
            lewis_salt: 2.0,
            ..Default::default()
        };
        let flux = TransportFluxes::new(&params).salt_flux(&grid, &bcs, &v);
        assert!(flux.iter().all(|&f| (f + 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_bubble_flux_upwinds_gas_fraction() {
        let grid = Grid::new(3);
        let mut bcs = uniform_bcs(3, 0.0);
        bcs.gas_fraction = vec![0.0, 0.1, 0.2, 0.3, 0.0];
        let mut v = still(4);
        v.gas = vec![1.0; 4];
        let fluxes = TransportFluxes::new(&PhysicalParams::default()).compute(
            ModelChoice::Diseq,
            &grid,
            &bcs,
            &v,
        );
        let expected = [0.0, 0.1, 0.2, 0.3];
        for (f, e) in fluxes.gas_fraction.iter().zip(expected) {
            assert!((f - e).abs() < 1e-14);
        }
        let (bottom, top) = fluxes.boundary_fluxes()[3];
        assert_eq!(bottom, 0.0);
        assert!((top - 0.3).abs() < 1e-14);
    }
}
