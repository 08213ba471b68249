//! Hydrated moles, effective mole fractions and charge fractions.
use crate::parameters::RenrtlParameters;
use ndarray::Array1;
use num_dual::DualNum;
use renrtl_core::{RenrtlError, RenrtlResult};

/// Composition of a solution on the basis of hydrated species.
#[derive(Clone, Debug)]
pub struct Composition<D> {
    /// Total hydration number
    pub total_hydration: D,
    /// Moles of the true species after the hydration of the ions
    pub moles: Array1<D>,
    /// Effective mole fractions `X = |z| n / sum(n)`
    pub effective_molefracs: Array1<D>,
    /// Charge fractions of the ions within their charge sign (0 for molecules)
    pub charge_fractions: Array1<D>,
    /// Sum of the effective mole fractions of all cations
    pub cation_fraction: D,
    /// Sum of the effective mole fractions of all anions
    pub anion_fraction: D,
}

impl<D: DualNum<f64> + Copy> Composition<D> {
    pub(crate) fn new(
        parameters: &RenrtlParameters,
        total_hydration: D,
        moles: Array1<D>,
    ) -> RenrtlResult<Self> {
        let total = moles.sum();
        if total.re() <= 0.0 {
            return Err(RenrtlError::DegenerateState(
                "the sum of the hydrated moles has to be positive".into(),
            ));
        }
        let s = parameters.solvent();
        if moles[s].re() <= 0.0 {
            return Err(RenrtlError::DegenerateState(format!(
                "the hydration shells bind more {} than available",
                parameters.name(s)
            )));
        }

        let z = parameters.charge_weights();
        let effective_molefracs = Array1::from_shape_fn(moles.len(), |i| moles[i] * z[i] / total);
        let cation_fraction = sum(parameters.cations.iter().map(|&c| effective_molefracs[c]));
        let anion_fraction = sum(parameters.anions.iter().map(|&a| effective_molefracs[a]));

        let mut charge_fractions = Array1::from_elem(moles.len(), D::zero());
        for (set, fraction) in [
            (&parameters.cations, cation_fraction),
            (&parameters.anions, anion_fraction),
        ] {
            if let [i] = set.as_slice() {
                charge_fractions[*i] = D::one();
            } else {
                for &i in set.iter() {
                    charge_fractions[i] = effective_molefracs[i] / fraction;
                }
            }
        }

        Ok(Self {
            total_hydration,
            moles,
            effective_molefracs,
            charge_fractions,
            cation_fraction,
            anion_fraction,
        })
    }

    /// Sum of all hydrated moles.
    pub fn total_moles(&self) -> D {
        self.moles.sum()
    }
}

pub(crate) fn sum<D: DualNum<f64> + Copy, I: Iterator<Item = D>>(iter: I) -> D {
    iter.fold(D::zero(), |acc, x| acc + x)
}
