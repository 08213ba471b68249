//! Refined electrolyte NRTL (r-eNRTL) activity coefficient models.
//!
//! The models combine a Pitzer-Debye-Hückel long-range contribution with a
//! local composition contribution of hydrated ions and solvents.
//!
//! # Example: molal activity coefficient of NaCl in water
//!
//! ```no_run
//! # use renrtl_core::RenrtlError;
//! use renrtl::{HydrationModel, RenrtlParameters, SingleElectrolyte};
//! use renrtl_core::parameter::IdentifierOption;
//! use renrtl_core::{ActivityModel, SolutionState};
//! use ndarray::arr1;
//! use std::sync::Arc;
//!
//! let parameters = RenrtlParameters::from_json(
//!     &["Na+", "Cl-", "H2O"],
//!     "tests/renrtl/nacl/pure.json",
//!     "tests/renrtl/nacl/electrolytes.json",
//!     Some("tests/renrtl/nacl/binary_constant.json"),
//!     IdentifierOption::Name,
//!     HydrationModel::ConstantHydration,
//! )?;
//! let model = SingleElectrolyte::new(Arc::new(parameters))?;
//!
//! let state = SolutionState::new(298.15, 101325.0, arr1(&[0.1, 0.1, 55.5]));
//! let gamma = model.molal_activity_coefficients(&state)?;
//! println!("gamma(NaCl) = {}", gamma[0]);
//! # Ok::<(), RenrtlError>(())
//! ```
#![warn(clippy::all)]

mod engine;
mod parameters;
mod rules;
mod solvent;

pub use engine::{
    Composition, Diagnostics, Evaluation, InteractionTables, LocalComposition, LongRange,
    MultiElectrolyte, Screening, SingleElectrolyte, Volumes,
};
pub use parameters::{
    beta, Electrolyte, ElectrolyteRecord, HydrationModel, NrtlBinaryRecord, RenrtlParameters,
    RenrtlRecord,
};
pub use rules::{AlphaRule, ConstantAlpha, ConstantTau, Interactant, TauRule, DEFAULT_ALPHA};
pub use solvent::{mean_relative_permittivity, DensityRecord, PermittivityRecord};
