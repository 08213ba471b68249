use super::composition::{sum, Composition};
use super::interaction::InteractionTables;
use super::local_composition::LocalComposition;
use super::long_range::{inverse_length_scale, solvent_permittivity, LongRange, Volumes};
use super::{Diagnostics, Evaluation, Screening};
use crate::parameters::{HydrationModel, RenrtlParameters};
use crate::rules::{AlphaRule, ConstantAlpha, ConstantTau, TauRule};
use itertools::Itertools;
use ndarray::Array1;
use num_dual::DualNum;
use quantity::Pressure;
use renrtl_core::{ActivityModel, RenrtlError, RenrtlResult, SolutionState};
use std::sync::Arc;

/// r-eNRTL model of a solvent with several electrolytes that share ions.
///
/// The flows of the ions are the flows of the free ions in solution. Only
/// the constant hydration model is available.
pub struct MultiElectrolyte<A = ConstantAlpha, T = ConstantTau> {
    parameters: Arc<RenrtlParameters>,
    alpha: A,
    tau: T,
}

impl MultiElectrolyte {
    /// Multi electrolyte model with the alpha and tau values of the binary records.
    pub fn new(parameters: Arc<RenrtlParameters>) -> RenrtlResult<Self> {
        let alpha = ConstantAlpha::new(&parameters)?;
        let tau = ConstantTau::new(&parameters)?;
        Self::with_rules(parameters, alpha, tau)
    }
}

impl<A: AlphaRule, T: TauRule> MultiElectrolyte<A, T> {
    pub fn with_rules(parameters: Arc<RenrtlParameters>, alpha: A, tau: T) -> RenrtlResult<Self> {
        if parameters.hydration_model != HydrationModel::ConstantHydration {
            return Err(RenrtlError::IncompatibleParameters(format!(
                "the multi electrolyte model is not available for {}",
                parameters.hydration_model
            )));
        }
        Ok(Self {
            parameters,
            alpha,
            tau,
        })
    }

    pub fn parameters(&self) -> &Arc<RenrtlParameters> {
        &self.parameters
    }

    pub fn evaluate<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<Evaluation<D>> {
        let p = &*self.parameters;
        state.validate(p.components())?;
        let s = p.solvent();
        let t = state.temperature;
        let flows = &state.flows;
        let z = &p.charge_weights();

        let total_hydration = sum(p.ions.iter().map(|&i| flows[i] * p.hydration_number[i]));
        let mut moles = flows.clone();
        moles[s] = flows[s] - total_hydration;
        let composition = Composition::new(p, total_hydration, moles)?;
        let n = &composition.moles;

        let ion_flow = sum(p.ions.iter().map(|&i| flows[i]));
        let mut xp = Array1::from_elem(p.components(), D::zero());
        for &i in p.ions.iter() {
            xp[i] = flows[i] / (flows[s] + ion_flow);
        }
        let sxp = sum(p.ions.iter().map(|&i| xp[i]));
        let volumes = Volumes::new(p, t, flows[s], n, &xp, sxp);

        // ionic strength from the charge weighted ion pairs
        let charge_moles = sum(p.ions.iter().map(|&i| n[i] * z[i]));
        let ion_pairs = || p.cations.iter().cartesian_product(p.anions.iter());
        let pairs = sum(ion_pairs().map(|(&c, &a)| n[c] * z[c] * n[a] * z[a] * (z[c] + z[a])));
        let ionic_strength = pairs / charge_moles / volumes.solution;

        // closest approach averaged over the ion pairs of the electrolytes
        let closest_approach = sum(
            p.electrolytes
                .iter()
                .map(|e| n[e.cation] * n[e.anion] * e.closest_approach),
        ) / sum(ion_pairs().map(|(&c, &a)| n[c] * n[a]));

        let x = &composition.effective_molefracs;
        let permittivity = solvent_permittivity(p, t, x);
        let long_range = LongRange::new(
            p,
            t,
            permittivity,
            ionic_strength,
            closest_approach,
            &volumes.partial_molar,
        )?;

        let kappa = inverse_length_scale(t, permittivity) * ionic_strength.sqrt();
        let ka = kappa * closest_approach;
        let prefactor = ka.powi(3).recip() * 3.0;
        let screening = Screening {
            kappa,
            sigma: prefactor * (ka + 1.0 - (ka + 1.0).recip() - (ka + 1.0).ln() * 2.0),
            tau: prefactor * ((ka + 1.0).ln() - ka + ka.powi(2) * 0.5),
        };

        let tables = InteractionTables::new(
            p,
            &self.alpha,
            &self.tau,
            &composition.charge_fractions,
            t,
        );
        let local = LocalComposition::new(p, &composition, &tables);
        let ln_gamma = &long_range.ln_gamma + &local.ln_gamma;

        let ln_xs = x[s].ln() + local.ln_gamma[s];
        let ln_dilution = ((flows[s] + ion_flow - total_hydration) / flows[s]).ln();
        let mut ln_gamma_apparent = Array1::from_elem(p.electrolytes.len(), D::zero());
        let mut electrolyte_hydration = ln_gamma_apparent.clone();
        let mut ln_gamma_molal = ln_gamma_apparent.clone();
        for (k, e) in p.electrolytes.iter().enumerate() {
            let (c, a) = (e.cation, e.anion);
            let ne = n[c] + n[a];
            let he = (n[c] * p.hydration_number[c] + n[a] * p.hydration_number[a]) / ne;
            let ml = (ln_gamma[c] * n[c] + ln_gamma[a] * n[a]) / ne;
            ln_gamma_apparent[k] = ml;
            electrolyte_hydration[k] = he;
            ln_gamma_molal[k] = ml - he * ln_xs - ln_dilution;
        }

        Ok(Evaluation {
            composition,
            volumes,
            long_range,
            tables,
            local,
            ln_gamma,
            ln_gamma_apparent,
            ln_gamma_molal,
            electrolyte_hydration,
            hydration_residual: None,
            screening: Some(screening),
        })
    }

    pub fn osmotic_pressure(&self, state: &SolutionState) -> RenrtlResult<Pressure> {
        Ok(self
            .evaluate(state)?
            .osmotic_pressure(&self.parameters, state))
    }

    pub fn diagnostics(&self, state: &SolutionState) -> RenrtlResult<Diagnostics> {
        Ok(self.evaluate(state)?.diagnostics())
    }
}

impl<A: AlphaRule, T: TauRule> ActivityModel for MultiElectrolyte<A, T> {
    fn components(&self) -> usize {
        self.parameters.components()
    }

    fn apparent_components(&self) -> usize {
        self.parameters.electrolytes.len()
    }

    fn ln_gamma<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<Array1<D>> {
        Ok(self.evaluate(state)?.ln_gamma)
    }

    fn ln_gamma_molal<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<Array1<D>> {
        Ok(self.evaluate(state)?.ln_gamma_molal)
    }
}
