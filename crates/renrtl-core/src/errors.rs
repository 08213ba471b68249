use std::io;
use thiserror::Error;

/// Error type for inconsistent parameter sets and degenerate solution states.
#[derive(Error, Debug)]
pub enum RenrtlError {
    // generic error with custom message
    #[error("{0}")]
    Error(String),

    // errors related to the solution state
    #[error("Model is initialized for {0} species while the input specifies {1} species.")]
    IncompatibleComponents(usize, usize),
    #[error("Invalid state in {0}: {1} = {2}.")]
    InvalidState(String, String, f64),
    #[error("Degenerate state: {0}.")]
    DegenerateState(String),

    // errors related to algorithms
    #[error("`{0}` did not converge within the maximum number of iterations.")]
    NotConverged(String),
    #[error("`{0}` encountered illegal values during the iteration.")]
    IterationFailed(String),

    // errors related to file handling
    #[error(transparent)]
    FileIO(#[from] io::Error),

    // json errors
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    // errors related to parameter handling
    #[error("The following component(s) were not found: {0}")]
    ComponentsNotFound(String),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
    #[error("Missing parameter '{parameter}' for {component}.")]
    MissingParameter { component: String, parameter: String },
    #[error("Parameter '{parameter}' given for {component} is not used by this model.")]
    UnknownParameter { component: String, parameter: String },
    #[error("Wrong units for '{parameter}' of {component}. Expected {expected}, got {given}.")]
    WrongUnits {
        component: String,
        parameter: String,
        expected: String,
        given: String,
    },
    #[error(
        "'{0}' is not a supported hydration model. Use 'constant_hydration' or 'stepwise_hydration'."
    )]
    UnknownHydrationModel(String),
    #[error("No beta constant known for a cation with charge +{0} and an anion with charge -{1}.")]
    UnsupportedChargeType(u32, u32),
}

/// Convenience type for `Result<T, RenrtlError>`.
pub type RenrtlResult<T> = Result<T, RenrtlError>;

impl RenrtlError {
    pub fn missing(component: &str, parameter: &str) -> Self {
        Self::MissingParameter {
            component: component.into(),
            parameter: parameter.into(),
        }
    }
}
