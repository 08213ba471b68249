//! Description of a liquid solution state.
//!
//! A state consists of
//! * a temperature,
//! * a pressure and
//! * the flow (or amount) of every true species.
//!
//! Only ratios of flows enter the activity coefficients, therefore flows
//! given in mol/s and amounts given in mol lead to identical results.
use crate::errors::{RenrtlError, RenrtlResult};
use ndarray::Array1;
use num_dual::DualNum;
use quantity::{Moles, Pressure, Temperature, KELVIN, MOL, PASCAL};
use std::fmt;

/// State of a liquid solution in reduced (SI base unit) values.
#[derive(Clone, Debug)]
pub struct SolutionState<D = f64> {
    /// Temperature in K
    pub temperature: D,
    /// Pressure in Pa
    pub pressure: D,
    /// Flows of the true species in mol/s (or amounts in mol)
    pub flows: Array1<D>,
    /// Total hydration number, an additional unknown of the stepwise hydration model
    pub total_hydration: Option<D>,
}

impl<D: DualNum<f64> + Copy> SolutionState<D> {
    pub fn new(temperature: D, pressure: D, flows: Array1<D>) -> Self {
        Self {
            temperature,
            pressure,
            flows,
            total_hydration: None,
        }
    }

    /// Specify the total hydration number of the stepwise hydration model.
    pub fn with_total_hydration(mut self, total_hydration: D) -> Self {
        self.total_hydration = Some(total_hydration);
        self
    }

    /// Sum of all flows.
    pub fn total_flow(&self) -> D {
        self.flows.sum()
    }

    /// Mole fractions of the true species.
    pub fn molefracs(&self) -> Array1<D> {
        let total = self.total_flow();
        self.flows.mapv(|f| f / total)
    }

    /// Check that the state can be evaluated by a model with `components` true species.
    pub fn validate(&self, components: usize) -> RenrtlResult<()> {
        if self.flows.len() != components {
            return Err(RenrtlError::IncompatibleComponents(
                components,
                self.flows.len(),
            ));
        }
        if self.temperature.re() <= 0.0 || !self.temperature.re().is_finite() {
            return Err(RenrtlError::InvalidState(
                "SolutionState".into(),
                "temperature".into(),
                self.temperature.re(),
            ));
        }
        if let Some(f) = self.flows.iter().find(|f| f.re() < 0.0 || !f.re().is_finite()) {
            return Err(RenrtlError::InvalidState(
                "SolutionState".into(),
                "flow".into(),
                f.re(),
            ));
        }
        if self.total_flow().re() <= 0.0 {
            return Err(RenrtlError::DegenerateState(
                "the total flow has to be positive".into(),
            ));
        }
        Ok(())
    }
}

impl SolutionState<f64> {
    /// Create a state from quantities with units.
    pub fn from_quantities(
        temperature: Temperature,
        pressure: Pressure,
        flows: &Moles<Array1<f64>>,
    ) -> Self {
        Self::new(
            (temperature / KELVIN).into_value(),
            (pressure / PASCAL).into_value(),
            (flows / MOL).into_value(),
        )
    }

    /// Temperature with units.
    pub fn temperature(&self) -> Temperature {
        self.temperature * KELVIN
    }

    /// Pressure with units.
    pub fn pressure(&self) -> Pressure {
        self.pressure * PASCAL
    }
}

impl fmt::Display for SolutionState<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T = {:.5} K, p = {:.5} Pa, flows = {}",
            self.temperature, self.pressure, self.flows
        )?;
        if let Some(h) = self.total_hydration {
            write!(f, ", h = {h:.5}")?;
        }
        Ok(())
    }
}
