use super::composition::{sum, Composition};
use super::interaction::InteractionTables;
use super::local_composition::LocalComposition;
use super::long_range::{solvent_permittivity, LongRange, Volumes};
use super::{Diagnostics, Evaluation};
use crate::parameters::{HydrationModel, RenrtlParameters};
use crate::rules::{AlphaRule, ConstantAlpha, ConstantTau, TauRule};
use ndarray::{arr1, Array1};
use num_dual::{Dual64, DualNum};
use quantity::Pressure;
use renrtl_core::{
    log_iter, log_result, ActivityModel, RenrtlError, RenrtlResult, SolutionState, SolverOptions,
    Verbosity,
};
use std::sync::Arc;

const MAX_ITER_HYDRATION: usize = 50;
const TOL_HYDRATION: f64 = 1e-10;

/// r-eNRTL model of a solvent with a single dissociated electrolyte.
///
/// The flows of the two ions are the flow of the electrolyte, the
/// stoichiometric coefficients are applied by the model. For the stepwise
/// hydration model, the total hydration number is an additional unknown that
/// has to be set in the [SolutionState]; [SingleElectrolyte::hydration_residual]
/// provides the corresponding equation.
pub struct SingleElectrolyte<A = ConstantAlpha, T = ConstantTau> {
    parameters: Arc<RenrtlParameters>,
    alpha: A,
    tau: T,
}

impl SingleElectrolyte {
    /// Single electrolyte model with the alpha and tau values of the binary records.
    pub fn new(parameters: Arc<RenrtlParameters>) -> RenrtlResult<Self> {
        let alpha = ConstantAlpha::new(&parameters)?;
        let tau = ConstantTau::new(&parameters)?;
        Self::with_rules(parameters, alpha, tau)
    }
}

impl<A: AlphaRule, T: TauRule> SingleElectrolyte<A, T> {
    pub fn with_rules(parameters: Arc<RenrtlParameters>, alpha: A, tau: T) -> RenrtlResult<Self> {
        if parameters.electrolytes.len() != 1 {
            return Err(RenrtlError::IncompatibleParameters(format!(
                "the single electrolyte model requires exactly one electrolyte, {} given",
                parameters.electrolytes.len()
            )));
        }
        if parameters.cations.len() != 1 || parameters.anions.len() != 1 {
            return Err(RenrtlError::IncompatibleParameters(
                "the single electrolyte model requires exactly one cation and one anion".into(),
            ));
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

    /// Total hydration number `sum(nu_i h_i)` of the electrolyte.
    ///
    /// Exact for the constant hydration model and an initial value for the
    /// stepwise hydration model.
    pub fn initial_total_hydration(&self) -> f64 {
        let p = &self.parameters;
        p.electrolytes[0]
            .ions()
            .iter()
            .map(|&(i, nu)| nu * p.hydration_number[i])
            .sum()
    }

    fn total_hydration<D: DualNum<f64> + Copy>(&self, state: &SolutionState<D>) -> RenrtlResult<D> {
        match self.parameters.hydration_model {
            HydrationModel::ConstantHydration => Ok(D::from(self.initial_total_hydration())),
            HydrationModel::StepwiseHydration => state.total_hydration.ok_or_else(|| {
                RenrtlError::Error(
                    "The stepwise hydration model requires the total hydration number of the state."
                        .into(),
                )
            }),
        }
    }

    pub fn evaluate<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<Evaluation<D>> {
        let p = &*self.parameters;
        state.validate(p.components())?;
        let e = &p.electrolytes[0];
        let (c, a, s) = (e.cation, e.anion, p.solvent());
        let vca = e.nu();
        let t = state.temperature;
        let flows = &state.flows;
        let h = self.total_hydration(state)?;

        // hydrated moles and ion fractions on the unhydrated basis
        let mut moles = Array1::from_elem(p.components(), D::zero());
        let mut xp = moles.clone();
        for (i, nu) in e.ions() {
            moles[i] = flows[i] * nu;
            xp[i] = flows[i] * nu / (flows[s] + flows[i] * vca);
        }
        moles[s] = flows[s] - h * flows[c];
        let composition = Composition::new(p, h, moles)?;
        let volumes = Volumes::new(p, t, flows[s], &composition.moles, &xp, D::one());

        let n = &composition.moles;
        let ionic_strength = sum(p.ions.iter().map(|&i| n[i] * (p.charge[i] as f64).powi(2)))
            * 0.5
            / volumes.solution;
        let x = &composition.effective_molefracs;
        let permittivity = solvent_permittivity(p, t, x);
        let long_range = LongRange::new(
            p,
            t,
            permittivity,
            ionic_strength,
            D::from(e.closest_approach),
            &volumes.partial_molar,
        )?;

        let tables = InteractionTables::new(
            p,
            &self.alpha,
            &self.tau,
            &composition.charge_fractions,
            t,
        );
        let local = LocalComposition::new(p, &composition, &tables);
        let ln_gamma = &long_range.ln_gamma + &local.ln_gamma;

        let ln_gamma_apparent = (ln_gamma[c] * e.nu_cation + ln_gamma[a] * e.nu_anion) / vca;
        // solvent activity from the local composition contribution only
        let ln_xs = x[s].ln() + local.ln_gamma[s];
        let (ln_gamma_molal, hydration_residual) = match p.hydration_model {
            HydrationModel::ConstantHydration => {
                let molal = ln_gamma_apparent
                    - h / vca * ln_xs
                    - ((-h + vca) / (flows[s] / flows[c]) + 1.0).ln();
                (molal, None)
            }
            HydrationModel::StepwiseHydration => {
                let k = e.hydration_constant;
                let xs = ln_xs.exp();
                let mut molal = (flows[s] / composition.total_moles()).ln() * vca;
                let mut residual = h;
                for (i, nu) in e.ions() {
                    // only the cation has hydration sites in equilibrium
                    let active = if p.is_cation(i) { 1.0 } else { 0.0 };
                    let ak = active * k;
                    let hmin = p.min_hydration_number[i];
                    let sites = nu * (p.number_sites[i] - active * hmin);
                    molal += ln_xs * (-nu * hmin)
                        + ((xs * ak + 1.0).recip() * (ak + 1.0)).ln() * sites;
                    residual -= xs * ak / (xs * ak + 1.0) * sites + nu * hmin;
                }
                (ln_gamma_apparent + molal / vca, Some(residual))
            }
        };

        Ok(Evaluation {
            composition,
            volumes,
            long_range,
            tables,
            local,
            ln_gamma,
            ln_gamma_apparent: arr1(&[ln_gamma_apparent]),
            ln_gamma_molal: arr1(&[ln_gamma_molal]),
            electrolyte_hydration: arr1(&[h]),
            hydration_residual,
            screening: None,
        })
    }

    /// Residual of the stepwise hydration equation for the total hydration
    /// number of the state.
    pub fn hydration_residual<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<D> {
        self.evaluate(state)?.hydration_residual.ok_or_else(|| {
            RenrtlError::Error(
                "The hydration residual is only defined for the stepwise hydration model.".into(),
            )
        })
    }

    /// Solve the stepwise hydration equation with a Newton iteration.
    ///
    /// The total hydration number of the state is used as initial value,
    /// if it is not set, [SingleElectrolyte::initial_total_hydration] is used.
    pub fn solve_total_hydration(
        &self,
        state: &SolutionState,
        options: SolverOptions,
    ) -> RenrtlResult<f64> {
        if self.parameters.hydration_model != HydrationModel::StepwiseHydration {
            return Err(RenrtlError::Error(
                "The total hydration number is only solved for the stepwise hydration model."
                    .into(),
            ));
        }
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER_HYDRATION, TOL_HYDRATION);
        let mut h = state
            .total_hydration
            .unwrap_or_else(|| self.initial_total_hydration());
        let state = SolutionState::new(
            Dual64::from(state.temperature),
            Dual64::from(state.pressure),
            state.flows.mapv(Dual64::from),
        );

        log_iter!(verbosity, " iter |    residual    | total hydration ");
        log_iter!(verbosity, "{:-<36}", "");
        log_iter!(verbosity, " {:4} |                | {:14.10}", 0, h);

        for i in 1..=max_iter {
            let state = state.clone().with_total_hydration(Dual64::from(h).derivative());
            let residual = self.hydration_residual(&state)?;
            if !residual.re.is_finite() || residual.eps == 0.0 || !residual.eps.is_finite() {
                return Err(RenrtlError::IterationFailed(String::from(
                    "solve_total_hydration",
                )));
            }
            h -= residual.re / residual.eps;

            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:14.10}",
                i,
                residual.re.abs(),
                h
            );

            if residual.re.abs() < tol {
                log_result!(
                    verbosity,
                    "Total hydration number converged in {} step(s)\n",
                    i
                );
                return Ok(h);
            }
        }
        Err(RenrtlError::NotConverged(String::from(
            "solve_total_hydration",
        )))
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

impl<A: AlphaRule, T: TauRule> ActivityModel for SingleElectrolyte<A, T> {
    fn components(&self) -> usize {
        self.parameters.components()
    }

    fn apparent_components(&self) -> usize {
        1
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::utils::sodium_chloride;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    fn model(hydration_model: HydrationModel) -> RenrtlResult<SingleElectrolyte> {
        SingleElectrolyte::new(Arc::new(sodium_chloride(hydration_model)?))
    }

    fn state(flow: f64) -> SolutionState {
        SolutionState::new(298.15, 101325.0, arr1(&[flow, flow, 55.5]))
    }

    #[test]
    fn constant_hydration() -> RenrtlResult<()> {
        let model = model(HydrationModel::ConstantHydration)?;
        assert_relative_eq!(model.initial_total_hydration(), 2.01);
        let eval = model.evaluate(&state(0.1))?;
        assert_relative_eq!(
            eval.ln_gamma_apparent[0],
            -0.2553685207648024,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            eval.ln_gamma_molal[0],
            -0.2517204510048787,
            max_relative = 1e-8
        );
        assert_relative_eq!(eval.ln_gamma[0], -0.25557934393719045, max_relative = 1e-8);
        assert_relative_eq!(eval.ln_gamma[1], -0.2551576975924143, max_relative = 1e-8);
        assert_relative_eq!(eval.ln_gamma[2], 0.00025070909304984626, max_relative = 1e-7);
        assert!(eval.hydration_residual.is_none());

        let eval = model.evaluate(&state(1.0))?;
        assert_relative_eq!(
            eval.ln_gamma_molal[0],
            -0.4231714126521181,
            max_relative = 1e-8
        );
        Ok(())
    }

    #[test]
    fn stepwise_hydration() -> RenrtlResult<()> {
        let model = model(HydrationModel::StepwiseHydration)?;
        assert!(model.evaluate(&state(0.1)).is_err());

        let residual = model.hydration_residual(&state(0.1).with_total_hydration(2.01))?;
        assert_relative_eq!(residual, -1.1179783171293907, max_relative = 1e-8);

        for (flow, h, molal) in [
            (0.1, 3.1279733502541536, -0.25100104334767304),
            (1.0, 3.1048332870096003, -0.42054016723349247),
        ] {
            let state = state(flow).with_total_hydration(h);
            let eval = model.evaluate(&state)?;
            assert_relative_eq!(eval.ln_gamma_molal[0], molal, max_relative = 1e-8);
            assert!(eval.hydration_residual.map_or(false, |r| r.abs() < 1e-8));
        }
        Ok(())
    }

    #[test]
    fn solve_total_hydration() -> RenrtlResult<()> {
        let model = model(HydrationModel::StepwiseHydration)?;
        let options = SolverOptions::new().verbosity(Verbosity::Iter);
        let h = model.solve_total_hydration(&state(0.1), options)?;
        assert_relative_eq!(h, 3.1279733502541536, max_relative = 1e-8);

        let model = self::model(HydrationModel::ConstantHydration)?;
        assert!(model
            .solve_total_hydration(&state(0.1), SolverOptions::default())
            .is_err());
        Ok(())
    }

    #[test]
    fn derivatives() -> RenrtlResult<()> {
        let model = model(HydrationModel::ConstantHydration)?;
        let f = |flow: Dual64| -> RenrtlResult<Dual64> {
            let flows = arr1(&[flow, flow, Dual64::from(55.5)]);
            let state = SolutionState::new(Dual64::from(298.15), Dual64::from(101325.0), flows);
            Ok(model.ln_gamma_molal(&state)?[0])
        };
        let g = f(Dual64::from(0.1).derivative())?;
        let h = 1e-6;
        let fd = (model.ln_gamma_molal(&state(0.1 + h))?[0]
            - model.ln_gamma_molal(&state(0.1 - h))?[0])
            / (2.0 * h);
        assert_relative_eq!(g.re, -0.2517204510048787, max_relative = 1e-8);
        assert_relative_eq!(g.eps, fd, max_relative = 1e-6);
        Ok(())
    }

    #[test]
    fn idempotence() -> RenrtlResult<()> {
        let model = model(HydrationModel::ConstantHydration)?;
        let state = state(0.5);
        assert_eq!(model.ln_gamma(&state)?, model.ln_gamma(&state)?);
        assert_eq!(model.ln_gamma_molal(&state)?, model.ln_gamma_molal(&state)?);
        Ok(())
    }

    #[test]
    fn diagnostics() -> RenrtlResult<()> {
        let model = model(HydrationModel::ConstantHydration)?;
        let d = model.diagnostics(&state(0.1))?;
        assert_relative_eq!(
            d.closest_approach.convert_into(quantity::ANGSTROM),
            4.28828306780021,
            max_relative = 1e-12
        );
        assert!(d.ionic_strength > 0.0 * quantity::MOL / quantity::METER.powi::<typenum::P3>());
        let pi = model.osmotic_pressure(&state(0.1))?;
        assert!(pi > 0.0 * quantity::PASCAL);
        Ok(())
    }

    #[test]
    fn more_than_one_electrolyte() -> RenrtlResult<()> {
        let p = Arc::new(crate::parameters::utils::sodium_chloride_sulfate()?);
        assert!(matches!(
            SingleElectrolyte::new(p),
            Err(RenrtlError::IncompatibleParameters(_))
        ));
        Ok(())
    }
}
