//! Pitzer-Debye-Hückel (long-range) contribution and the volumetric
//! properties of the solution it depends on.
use super::composition::sum;
use super::{AVOGADRO, EPSILON_0, FARADAY, RGAS};
use crate::parameters::RenrtlParameters;
use crate::solvent::{mean_relative_permittivity, relative_permittivities};
use ndarray::Array1;
use num_dual::DualNum;
use renrtl_core::{RenrtlError, RenrtlResult};
use std::f64::consts::PI;

/// Increment of the ionic radius used for the intrinsic ion volume in Å.
const RADIUS_INCREMENT: f64 = 0.55;

/// Intrinsic molar volume of an ion in m³/mol.
pub(crate) fn intrinsic_volume(ionic_radius: f64) -> f64 {
    4.0 / 3.0 * PI * AVOGADRO * ((ionic_radius + RADIUS_INCREMENT) * 1e-10).powi(3)
}

/// Volumes of the solution.
///
/// Volumes are given per unit of the flows, i.e., in m³ if the flows are
/// amounts in mol.
#[derive(Clone, Debug)]
pub struct Volumes<D> {
    /// Molar density of the pure solvent in mol/m³
    pub solvent_molar_density: D,
    /// Volume of the solution
    pub solution: D,
    /// Partial molar volumes of the true species in m³/mol
    pub partial_molar: Array1<D>,
}

impl<D: DualNum<f64> + Copy> Volumes<D> {
    /// Calculate the volumes from the hydrated moles and the mole fractions
    /// of the ions on the unhydrated basis.
    ///
    /// The correction of the solvent partial molar volume by the ions is
    /// scaled with `solvent_weight`.
    pub(crate) fn new(
        parameters: &RenrtlParameters,
        temperature: D,
        solvent_flow: D,
        moles: &Array1<D>,
        unhydrated_fractions: &Array1<D>,
        solvent_weight: D,
    ) -> Self {
        let p = parameters;
        let s = p.solvent();
        let solvent_molar_density = p.density[0].molar_density(temperature, p.molarweight[s]);

        // excess of the intrinsic over the partial molar volume at infinite dilution
        let excess =
            |i: usize| intrinsic_volume(p.ionic_radius[i]) - p.partial_molar_volume[i] * 1e-6;
        let xp = unhydrated_fractions;
        let sxp = sum(p.ions.iter().map(|&i| xp[i]));
        let correction = sum(p.ions.iter().map(|&k| xp[k] * excess(k)));

        let solution = solvent_flow / solvent_molar_density
            + sum(p.ions.iter().map(|&i| {
                moles[i] * (sxp * excess(i) + p.partial_molar_volume[i] * 1e-6)
            }));

        let mut partial_molar = Array1::from_elem(moles.len(), D::zero());
        for &i in p.ions.iter() {
            partial_molar[i] = sxp * excess(i)
                + p.partial_molar_volume[i] * 1e-6
                + correction * (-sxp + 1.0);
        }
        partial_molar[s] = solvent_molar_density.recip() - correction * solvent_weight;

        Self {
            solvent_molar_density,
            solution,
            partial_molar,
        }
    }
}

/// Mean relative permittivity of the solvents at the given effective mole fractions.
pub(crate) fn solvent_permittivity<D: DualNum<f64> + Copy>(
    parameters: &RenrtlParameters,
    temperature: D,
    effective_molefracs: &Array1<D>,
) -> D {
    let permittivities = relative_permittivities(&parameters.permittivity, temperature);
    let x: Vec<_> = parameters
        .solvents
        .iter()
        .map(|&s| effective_molefracs[s])
        .collect();
    let mw: Vec<_> = parameters
        .solvents
        .iter()
        .map(|&s| parameters.molarweight[s])
        .collect();
    mean_relative_permittivity(&permittivities, &x, &mw)
}

/// `sqrt(2 F² / (eps0 eps R T))` in (m/mol)^(1/2).
pub(crate) fn inverse_length_scale<D: DualNum<f64> + Copy>(temperature: D, permittivity: D) -> D {
    ((permittivity * temperature).recip() * (2.0 * FARADAY.powi(2) / (EPSILON_0 * RGAS))).sqrt()
}

/// Long-range contribution of the Pitzer-Debye-Hückel model.
#[derive(Clone, Debug)]
pub struct LongRange<D> {
    /// Relative permittivity of the solvent
    pub permittivity: D,
    /// Ionic strength in mol/m³
    pub ionic_strength: D,
    /// Distance of closest approach in m
    pub closest_approach: D,
    /// Closest approach parameter `b` in (m³/mol)^(1/2)
    pub debye_parameter: D,
    /// Debye-Hückel parameter `A`
    pub debye_huckel: D,
    /// Long-range contribution to the logarithmic activity coefficients
    pub ln_gamma: Array1<D>,
}

impl<D: DualNum<f64> + Copy> LongRange<D> {
    pub(crate) fn new(
        parameters: &RenrtlParameters,
        temperature: D,
        permittivity: D,
        ionic_strength: D,
        closest_approach: D,
        partial_molar_volumes: &Array1<D>,
    ) -> RenrtlResult<Self> {
        if ionic_strength.re() < 0.0 {
            return Err(RenrtlError::DegenerateState(format!(
                "negative ionic strength ({})",
                ionic_strength.re()
            )));
        }
        let scale = inverse_length_scale(temperature, permittivity);
        let debye_huckel = scale.powi(3) / (16.0 * PI * AVOGADRO);
        let b = scale * closest_approach;

        let sqrt_i = ionic_strength.sqrt();
        let x = b * sqrt_i + 1.0;
        let f = x - x.recip() - x.ln() * 2.0;
        let volume_term = debye_huckel * 2.0 / b.powi(3) * f;
        let charge_term = debye_huckel * sqrt_i / x;

        let ln_gamma = Array1::from_shape_fn(partial_molar_volumes.len(), |i| {
            let z = parameters.charge[i] as f64;
            partial_molar_volumes[i] * volume_term - charge_term * z.powi(2)
        });

        Ok(Self {
            permittivity,
            ionic_strength,
            closest_approach,
            debye_parameter: b,
            debye_huckel,
            ln_gamma,
        })
    }
}
