use crate::errors::{RenrtlError, RenrtlResult};
use quantity::{Length, MolarVolume, ANGSTROM, CENTI, LITER, METER, MOL, NANO, PICO};
use serde::{Deserialize, Serialize};
use std::fmt;
use typenum::P3;

/// Default unit of a model parameter.
///
/// Parameters are stored as plain numbers in their default unit. A value
/// that is supplied together with a different unit of the same dimension is
/// converted, units of any other dimension are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterUnit {
    Angstrom,
    CubicCentimeterPerMole,
    Dimensionless,
}

impl ParameterUnit {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Angstrom => "angstrom",
            Self::CubicCentimeterPerMole => "cm^3/mol",
            Self::Dimensionless => "dimensionless",
        }
    }

    /// Value of one `unit` in the default unit, if `unit` is known and has
    /// the dimension of the parameter.
    fn factor(&self, unit: &str) -> Option<f64> {
        let unit = unit.trim();
        match self {
            Self::Angstrom => {
                let length: Length = match unit {
                    "angstrom" | "Å" | "A" => ANGSTROM,
                    "pm" => PICO * METER,
                    "nm" => NANO * METER,
                    "m" => METER,
                    _ => return None,
                };
                Some(length.convert_into(ANGSTROM))
            }
            Self::CubicCentimeterPerMole => {
                let cm3 = (CENTI * METER).powi::<P3>();
                let volume: MolarVolume = match unit {
                    "cm^3/mol" | "cm**3/mol" | "cm3/mol" | "cm³/mol" => cm3 / MOL,
                    "L/mol" | "l/mol" | "dm^3/mol" => LITER / MOL,
                    "m^3/mol" | "m**3/mol" | "m3/mol" | "m³/mol" => METER.powi::<P3>() / MOL,
                    _ => return None,
                };
                Some(volume.convert_into(cm3 / MOL))
            }
            Self::Dimensionless => matches!(unit, "dimensionless" | "" | "-").then_some(1.0),
        }
    }
}

impl fmt::Display for ParameterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Value of a model parameter, optionally tagged with its unit.
///
/// In json files a parameter is either written as a number, `1.02`,
/// or as a pair of value and unit, `[1.02, "angstrom"]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParameterValue {
    Value(f64),
    WithUnit(f64, String),
}

impl ParameterValue {
    /// Return the value in the default unit of the parameter.
    pub fn value(&self, unit: ParameterUnit, component: &str, parameter: &str) -> RenrtlResult<f64> {
        match self {
            Self::Value(v) => Ok(*v),
            Self::WithUnit(v, u) => unit.factor(u).map(|f| v * f).ok_or_else(|| {
                RenrtlError::WrongUnits {
                    component: component.into(),
                    parameter: parameter.into(),
                    expected: unit.to_string(),
                    given: u.clone(),
                }
            }),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::WithUnit(v, u) => write!(f, "{v} {u}"),
        }
    }
}

/// Read an optional parameter that is required by the model.
pub fn required(
    value: &Option<ParameterValue>,
    unit: ParameterUnit,
    component: &str,
    parameter: &str,
) -> RenrtlResult<f64> {
    value
        .as_ref()
        .ok_or_else(|| RenrtlError::missing(component, parameter))?
        .value(unit, component, parameter)
}
