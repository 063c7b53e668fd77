//! Permeability of the mushy layer as a function of liquid fraction.

/// Kozeny-Carman style permeability `Π(φl) = φl³`.
///
/// With a percolation threshold φc the permeability vanishes below the
/// threshold: `Π(φl) = φl² (φl - φc) H(φl - φc)`.
#[inline]
pub fn permeability(liquid_fraction: f64, threshold: Option<f64>) -> f64 {
    match threshold {
        None => liquid_fraction.powi(3),
        Some(cutoff) => {
            if liquid_fraction > cutoff {
                liquid_fraction.powi(2) * (liquid_fraction - cutoff)
            } else {
                0.0
            }
        }
    }
}

/// Ratio of the thresholded permeability to `φl³`.
///
/// Equals `(φl - φc) / φl` above the threshold and zero below it, so it is
/// continuous at the cutoff and tends to one in open pore space.
#[inline]
pub fn percolation_factor(liquid_fraction: f64, cutoff: f64) -> f64 {
    if liquid_fraction > cutoff && liquid_fraction > 0.0 {
        (liquid_fraction - cutoff) / liquid_fraction
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_permeability() {
        assert!((permeability(0.5, None) - 0.125).abs() < 1e-14);
        assert_eq!(permeability(0.0, None), 0.0);
    }

    #[test]
    fn test_threshold_permeability() {
        let cutoff = 0.024;
        assert_eq!(permeability(0.02, Some(cutoff)), 0.0);
        assert_eq!(permeability(cutoff, Some(cutoff)), 0.0);
        let phi = 0.5;
        let expected = phi * phi * (phi - cutoff);
        assert!((permeability(phi, Some(cutoff)) - expected).abs() < 1e-14);
        assert!(
            (permeability(phi, Some(cutoff)) - permeability(phi, None) * percolation_factor(phi, cutoff))
                .abs()
                < 1e-14
        );
    }

    #[test]
    fn test_percolation_factor_continuous() {
        let cutoff = 0.05;
        let below = percolation_factor(cutoff - 1e-9, cutoff);
        let above = percolation_factor(cutoff + 1e-9, cutoff);
        assert_eq!(below, 0.0);
        assert!(above < 1e-6);
        assert!((percolation_factor(1.0, cutoff) - 0.95).abs() < 1e-14);
    }
}
