//! Evaluation of the r-eNRTL model.
//!
//! Every contribution is a pure function of the solution state and the
//! parameters and is generic over dual numbers, so that derivatives with
//! respect to temperature, flows or the total hydration number are obtained
//! exactly.
use crate::parameters::RenrtlParameters;
use ndarray::Array1;
use quantity::{Density, Length, Pressure, Volume, METER, MOL};
use renrtl_core::SolutionState;
use typenum::P3;

pub(crate) mod composition;
pub(crate) mod interaction;
pub(crate) mod local_composition;
pub(crate) mod long_range;
mod multi;
mod single;

pub use composition::Composition;
pub use interaction::InteractionTables;
pub use local_composition::LocalComposition;
pub use long_range::{LongRange, Volumes};
pub use multi::MultiElectrolyte;
pub use single::SingleElectrolyte;

/// Avogadro constant in 1/mol
pub(crate) const AVOGADRO: f64 = 6.02214076e23;
/// Faraday constant in C/mol
pub(crate) const FARADAY: f64 = 96485.33212;
/// Ideal gas constant in J/(mol K)
pub(crate) const RGAS: f64 = 8.314462618;
/// Vacuum permittivity in F/m
pub(crate) const EPSILON_0: f64 = 8.8541878128e-12;

/// Screening functions of the multi-electrolyte model.
#[derive(Clone, Copy, Debug)]
pub struct Screening<D> {
    /// Debye screening parameter in 1/m
    pub kappa: D,
    /// `sigma(kappa a)`
    pub sigma: D,
    /// `tau(kappa a)`
    pub tau: D,
}

/// All intermediate and final results of one model evaluation.
#[derive(Clone, Debug)]
pub struct Evaluation<D> {
    pub composition: Composition<D>,
    pub volumes: Volumes<D>,
    pub long_range: LongRange<D>,
    pub tables: InteractionTables<D>,
    pub local: LocalComposition<D>,
    /// Logarithmic activity coefficients of the true species
    pub ln_gamma: Array1<D>,
    /// Logarithmic mean activity coefficients of the electrolytes (mole fraction scale)
    pub ln_gamma_apparent: Array1<D>,
    /// Logarithmic molal mean ionic activity coefficients of the electrolytes
    pub ln_gamma_molal: Array1<D>,
    /// Hydration number of every electrolyte
    pub electrolyte_hydration: Array1<D>,
    /// Residual of the stepwise hydration equation
    pub hydration_residual: Option<D>,
    pub screening: Option<Screening<D>>,
}

/// Diagnostic quantities of an evaluation.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    pub ionic_strength: Density,
    pub closest_approach: Length,
    pub solution_volume: Volume,
    pub permittivity: f64,
    pub debye_parameter: f64,
    pub debye_huckel: f64,
}

impl Evaluation<f64> {
    pub fn diagnostics(&self) -> Diagnostics {
        let lr = &self.long_range;
        Diagnostics {
            ionic_strength: lr.ionic_strength * MOL / METER.powi::<P3>(),
            closest_approach: lr.closest_approach * METER,
            solution_volume: self.volumes.solution * METER.powi::<P3>(),
            permittivity: lr.permittivity,
            debye_parameter: lr.debye_parameter,
            debye_huckel: lr.debye_huckel,
        }
    }

    /// Osmotic pressure `-R T ln(a_s) / v_s` with the molar volume of the pure solvent.
    pub fn osmotic_pressure(
        &self,
        parameters: &RenrtlParameters,
        state: &SolutionState,
    ) -> Pressure {
        let s = parameters.solvent();
        let ln_activity = state.molefracs()[s].ln() + self.ln_gamma[s];
        let density: Density = self.volumes.solvent_molar_density * MOL / METER.powi::<P3>();
        -ln_activity * quantity::RGAS * state.temperature() * density
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quantity::{COULOMB, FARAD, JOULE, KELVIN, NAV, QE};
    use std::f64::consts::PI;

    #[test]
    fn constants() {
        assert_relative_eq!(AVOGADRO, (NAV * MOL).into_value(), max_relative = 1e-15);
        assert_relative_eq!(
            FARADAY,
            (QE * NAV * MOL).convert_into(COULOMB),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            RGAS,
            quantity::RGAS.convert_into(JOULE / MOL / KELVIN),
            max_relative = 1e-9
        );
    }

    #[test]
    fn dimensionless_debye_huckel_terms() {
        let faraday = QE * NAV;
        let eps0 = EPSILON_0 * FARAD / METER;
        let (eps, t) = (78.54, 298.15 * KELVIN);
        let ionic_strength = 100.0 * MOL / METER.powi::<P3>();
        let ar = 4.288e-10 * METER;

        // (b sqrt(I))^2
        let b2i = (2.0 * faraday * faraday * ar * ar * ionic_strength
            / (eps0 * eps * quantity::RGAS * t))
            .into_value();
        let scale = long_range::inverse_length_scale(298.15, eps);
        assert_relative_eq!(b2i, (scale * 4.288e-10).powi(2) * 100.0, max_relative = 1e-9);

        // (A sqrt(I))^2
        let s2 = 2.0 * faraday * faraday / (eps0 * eps * quantity::RGAS * t);
        let a2i = (s2 * s2 * s2 * ionic_strength / (16.0 * PI * NAV).powi::<typenum::P2>())
            .into_value();
        let a = scale.powi(3) / (16.0 * PI * AVOGADRO);
        assert_relative_eq!(a2i, a.powi(2) * 100.0, max_relative = 1e-9);
    }
}
