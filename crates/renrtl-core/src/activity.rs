use crate::errors::RenrtlResult;
use crate::state::SolutionState;
use ndarray::Array1;
use num_dual::DualNum;

/// An activity coefficient model for liquid electrolyte solutions.
///
/// Activity coefficients of the true species (solvents and free ions) are
/// defined on the mole fraction scale, those of the apparent species
/// (electrolytes) on the molal scale. All methods are pure functions of the
/// state and the fixed parameters of the model, so they can be evaluated
/// with dual numbers to obtain exact derivatives.
pub trait ActivityModel {
    /// Number of true species.
    fn components(&self) -> usize;

    /// Number of apparent (dissociating) species.
    fn apparent_components(&self) -> usize;

    /// Natural logarithm of the activity coefficients of all true species.
    fn ln_gamma<D: DualNum<f64> + Copy>(&self, state: &SolutionState<D>)
        -> RenrtlResult<Array1<D>>;

    /// Natural logarithm of the molal mean ionic activity coefficients of
    /// all apparent species.
    fn ln_gamma_molal<D: DualNum<f64> + Copy>(
        &self,
        state: &SolutionState<D>,
    ) -> RenrtlResult<Array1<D>>;

    /// Activity coefficients of all true species.
    fn activity_coefficients(&self, state: &SolutionState) -> RenrtlResult<Array1<f64>> {
        Ok(self.ln_gamma(state)?.mapv(f64::exp))
    }

    /// Activities `x_i * gamma_i` of all true species.
    fn activities(&self, state: &SolutionState) -> RenrtlResult<Array1<f64>> {
        Ok(state.molefracs() * self.activity_coefficients(state)?)
    }

    /// Molal mean ionic activity coefficients of all apparent species.
    fn molal_activity_coefficients(&self, state: &SolutionState) -> RenrtlResult<Array1<f64>> {
        Ok(self.ln_gamma_molal(state)?.mapv(f64::exp))
    }
}
