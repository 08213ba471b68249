//! Structures that are used to build model parameters from json files.
mod identifier;
mod model_record;
mod value;

pub use identifier::{Identifier, IdentifierOption};
pub use model_record::{BinaryRecord, PureRecord};
pub use value::{required, ParameterUnit, ParameterValue};
