//! Temperature correlations of pure solvent properties.
use num_dual::DualNum;
use renrtl_core::{RenrtlError, RenrtlResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative permittivity of a pure solvent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum PermittivityRecord {
    Constant {
        permittivity: f64,
    },
    /// `eps = a + b (1/T - 1/T_ref)`
    ReciprocalTemperature {
        a: f64,
        b: f64,
        reference_temperature: f64,
    },
    /// Pairs of temperature (K) and permittivity, ordered by temperature.
    ExperimentalData {
        data: Vec<(f64, f64)>,
    },
}

impl fmt::Display for PermittivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { permittivity } => {
                write!(f, "PermittivityRecord(permittivity={permittivity})")
            }
            Self::ReciprocalTemperature {
                a,
                b,
                reference_temperature,
            } => write!(
                f,
                "PermittivityRecord(a={a}, b={b}, reference_temperature={reference_temperature})"
            ),
            Self::ExperimentalData { data } => write!(f, "PermittivityRecord(data={data:?})"),
        }
    }
}

impl PermittivityRecord {
    pub(crate) fn validate(&self, component: &str) -> RenrtlResult<()> {
        if let Self::ExperimentalData { data } = self {
            if data.is_empty() {
                return Err(RenrtlError::MissingParameter {
                    component: component.into(),
                    parameter: "permittivity data".into(),
                });
            }
            if data.windows(2).any(|w| w[0].0 >= w[1].0) {
                return Err(RenrtlError::IncompatibleParameters(format!(
                    "permittivity data of {component} has to be ordered by temperature"
                )));
            }
        }
        Ok(())
    }

    /// Relative permittivity at the given temperature in K.
    pub fn relative_permittivity<D: DualNum<f64> + Copy>(&self, temperature: D) -> D {
        match self {
            Self::Constant { permittivity } => D::from(*permittivity),
            Self::ReciprocalTemperature {
                a,
                b,
                reference_temperature,
            } => (temperature.recip() - reference_temperature.recip()) * *b + *a,
            Self::ExperimentalData { data } => interpolate(data, temperature),
        }
    }
}

/// Piecewise linear interpolation that extrapolates with the outermost intervals.
fn interpolate<D: DualNum<f64> + Copy>(points: &[(f64, f64)], temperature: D) -> D {
    let n = points.len();
    if n == 1 {
        return D::from(points[0].1);
    }
    let i = points
        .binary_search_by(|&(ti, _)| ti.total_cmp(&temperature.re()))
        .unwrap_or_else(|i| i);
    let (l, u) = match i {
        0 => (points[0], points[1]),
        i if i >= n => (points[n - 2], points[n - 1]),
        _ => (points[i - 1], points[i]),
    };
    (temperature - l.0) / (u.0 - l.0) * (u.1 - l.1) + l.1
}

/// Liquid density of a pure solvent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum DensityRecord {
    /// Molar density in mol/m³
    Constant { molar_density: f64 },
    /// `rho = rho_ref - c (T - T_ref)^2` with the mass density in kg/m³
    QuadraticMass {
        mass_density: f64,
        coefficient: f64,
        reference_temperature: f64,
    },
}

impl fmt::Display for DensityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { molar_density } => {
                write!(f, "DensityRecord(molar_density={molar_density})")
            }
            Self::QuadraticMass {
                mass_density,
                coefficient,
                reference_temperature,
            } => write!(
                f,
                "DensityRecord(mass_density={mass_density}, coefficient={coefficient}, reference_temperature={reference_temperature})"
            ),
        }
    }
}

impl DensityRecord {
    /// Molar density in mol/m³ at the given temperature in K.
    ///
    /// The molar weight is given in g/mol.
    pub fn molar_density<D: DualNum<f64> + Copy>(&self, temperature: D, molarweight: f64) -> D {
        match self {
            Self::Constant { molar_density } => D::from(*molar_density),
            Self::QuadraticMass {
                mass_density,
                coefficient,
                reference_temperature,
            } => {
                let dt = temperature - *reference_temperature;
                (-dt * dt * *coefficient + *mass_density) / (molarweight * 1e-3)
            }
        }
    }
}

/// Mean relative permittivity of a solvent mixture.
///
/// The permittivities of the pure solvents are weighted with their mole
/// fractions times molar weights.
pub fn mean_relative_permittivity<D: DualNum<f64> + Copy>(
    permittivities: &[D],
    molefracs: &[D],
    molarweights: &[f64],
) -> D {
    if permittivities.len() == 1 {
        return permittivities[0];
    }
    let mut num = D::zero();
    let mut den = D::zero();
    for ((&eps, &x), &mw) in permittivities.iter().zip(molefracs).zip(molarweights) {
        num += eps * x * mw;
        den += x * mw;
    }
    num / den
}

/// Relative permittivities of all solvents at the given temperature.
pub(crate) fn relative_permittivities<D: DualNum<f64> + Copy>(
    records: &[PermittivityRecord],
    temperature: D,
) -> Vec<D> {
    records
        .iter()
        .map(|r| r.relative_permittivity(temperature))
        .collect()
}
