//! Non-randomness (`alpha`) and interaction energy (`tau`) rules.
//!
//! Binary NRTL parameters are only ever supplied between molecules and
//! ion pairs. The rules are strategy objects that are passed to the models
//! at construction and answer every lookup of a binary parameter.
use crate::parameters::RenrtlParameters;
use num_dual::DualNum;
use renrtl_core::{RenrtlError, RenrtlResult};
use std::collections::HashMap;
use std::fmt;

/// Non-randomness factor used whenever no explicit value is given.
pub const DEFAULT_ALPHA: f64 = 0.2;

/// Participant of a binary NRTL interaction: either a molecular species or
/// a (cation, anion) pair. Indices refer to true species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interactant {
    Molecule(usize),
    Pair { cation: usize, anion: usize },
}

impl Interactant {
    pub fn pair(cation: usize, anion: usize) -> Self {
        Self::Pair { cation, anion }
    }

    /// Resolve an identifier like `"H2O"` or `"Na+, Cl-"`.
    pub fn parse(id: &str, parameters: &RenrtlParameters) -> RenrtlResult<Self> {
        match id.split_once(',') {
            Some((c, a)) => {
                let cation = parameters.index_of(c.trim())?;
                let anion = parameters.index_of(a.trim())?;
                if !parameters.is_cation(cation) || !parameters.is_anion(anion) {
                    return Err(RenrtlError::IncompatibleParameters(format!(
                        "'{id}' is not a pair of a cation and an anion"
                    )));
                }
                Ok(Self::pair(cation, anion))
            }
            None => {
                let i = parameters.index_of(id.trim())?;
                if !parameters.is_molecule(i) {
                    return Err(RenrtlError::IncompatibleParameters(format!(
                        "binary parameters of the ion '{id}' have to be given for an ion pair"
                    )));
                }
                Ok(Self::Molecule(i))
            }
        }
    }

    /// Display name using the identifiers of the parameter set.
    pub fn name(&self, parameters: &RenrtlParameters) -> String {
        match self {
            Self::Molecule(i) => parameters.name(*i).to_string(),
            Self::Pair { cation, anion } => {
                format!("{}, {}", parameters.name(*cation), parameters.name(*anion))
            }
        }
    }
}

/// Rule for the non-randomness factors `alpha`.
pub trait AlphaRule {
    fn alpha<D: DualNum<f64> + Copy>(&self, i: Interactant, j: Interactant, temperature: D) -> D;
}

/// Rule for the interaction energies `tau`.
pub trait TauRule {
    fn tau<D: DualNum<f64> + Copy>(&self, i: Interactant, j: Interactant, temperature: D) -> D;
}

/// Temperature independent, symmetric non-randomness factors.
///
/// Pairs without a value, including identical interactants, use
/// [DEFAULT_ALPHA].
#[derive(Clone, Debug, Default)]
pub struct ConstantAlpha {
    alpha: HashMap<(Interactant, Interactant), f64>,
}

impl ConstantAlpha {
    pub fn new(parameters: &RenrtlParameters) -> RenrtlResult<Self> {
        let mut alpha = HashMap::new();
        for record in parameters.binary_records.iter() {
            if let Some(a) = record.model_record.alpha {
                let i = Interactant::parse(&record.id1, parameters)?;
                let j = Interactant::parse(&record.id2, parameters)?;
                if let Some(&other) = alpha.get(&(j, i)) {
                    if other != a {
                        return Err(RenrtlError::IncompatibleParameters(format!(
                            "alpha between '{}' and '{}' is given with two different values",
                            record.id1, record.id2
                        )));
                    }
                }
                alpha.insert((i, j), a);
                alpha.insert((j, i), a);
            }
        }
        Ok(Self { alpha })
    }
}

impl AlphaRule for ConstantAlpha {
    fn alpha<D: DualNum<f64> + Copy>(&self, i: Interactant, j: Interactant, _: D) -> D {
        D::from(*self.alpha.get(&(i, j)).unwrap_or(&DEFAULT_ALPHA))
    }
}

/// Temperature independent, directional interaction energies.
///
/// Values between every solvent and every electrolyte are required in both
/// directions. Identical interactants and all other pairs without a value
/// have `tau = 0`.
#[derive(Clone, Debug, Default)]
pub struct ConstantTau {
    tau: HashMap<(Interactant, Interactant), f64>,
}

impl ConstantTau {
    pub fn new(parameters: &RenrtlParameters) -> RenrtlResult<Self> {
        let mut tau = HashMap::new();
        for record in parameters.binary_records.iter() {
            let i = Interactant::parse(&record.id1, parameters)?;
            let j = Interactant::parse(&record.id2, parameters)?;
            if tau.insert((i, j), record.model_record.tau).is_some() {
                return Err(RenrtlError::IncompatibleParameters(format!(
                    "tau from '{}' to '{}' is given more than once",
                    record.id1, record.id2
                )));
            }
        }

        // interactions between solvents and electrolytes are needed in both directions
        for e in parameters.electrolytes.iter() {
            let pair = Interactant::pair(e.cation, e.anion);
            for &s in parameters.solvents.iter() {
                let s = Interactant::Molecule(s);
                for (i, j) in [(s, pair), (pair, s)] {
                    if !tau.contains_key(&(i, j)) {
                        return Err(RenrtlError::MissingParameter {
                            component: format!("'{}'", i.name(parameters)),
                            parameter: format!("tau to '{}'", j.name(parameters)),
                        });
                    }
                }
            }
        }
        Ok(Self { tau })
    }
}

impl TauRule for ConstantTau {
    fn tau<D: DualNum<f64> + Copy>(&self, i: Interactant, j: Interactant, _: D) -> D {
        if i == j {
            return D::zero();
        }
        D::from(*self.tau.get(&(i, j)).unwrap_or(&0.0))
    }
}

impl fmt::Display for ConstantTau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstantTau({} values)", self.tau.len())
    }
}

/// Interaction factor `G = exp(-alpha tau)` between two interactants.
pub(crate) fn g_binary<D, A, T>(alpha: &A, tau: &T, i: Interactant, j: Interactant, t: D) -> D
where
    D: DualNum<f64> + Copy,
    A: AlphaRule,
    T: TauRule,
{
    if i == j {
        return D::one();
    }
    (-alpha.alpha(i, j, t) * tau.tau(i, j, t)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::utils::sodium_chloride;
    use crate::parameters::HydrationModel;
    use approx::assert_relative_eq;

    #[test]
    fn constant_rules() -> RenrtlResult<()> {
        let p = sodium_chloride(HydrationModel::ConstantHydration)?;
        let alpha = ConstantAlpha::new(&p)?;
        let tau = ConstantTau::new(&p)?;
        let w = Interactant::Molecule(p.index_of("H2O")?);
        let nacl = Interactant::parse("Na+, Cl-", &p)?;
        assert_eq!(nacl.name(&p), "Na+, Cl-");
        assert_relative_eq!(tau.tau(w, nacl, 298.15), 7.951);
        assert_relative_eq!(tau.tau(nacl, w, 298.15), -3.984);
        assert_relative_eq!(tau.tau(nacl, nacl, 298.15), 0.0);
        assert_relative_eq!(alpha.alpha(w, nacl, 298.15), 0.2);
        assert_relative_eq!(alpha.alpha(nacl, nacl, 298.15), 0.2);
        assert_relative_eq!(
            g_binary(&alpha, &tau, w, nacl, 298.15),
            (-0.2f64 * 7.951).exp()
        );
        assert_relative_eq!(g_binary(&alpha, &tau, w, w, 298.15), 1.0);
        Ok(())
    }

    #[test]
    fn missing_solvent_pair_tau() -> RenrtlResult<()> {
        let p = sodium_chloride(HydrationModel::ConstantHydration)?;

        let mut one_direction = p.clone();
        one_direction.binary_records.retain(|r| r.id1 == "H2O");
        let err = ConstantTau::new(&one_direction).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing parameter 'tau to 'H2O'' for 'Na+, Cl-'."
        );

        let mut no_records = p;
        no_records.binary_records.clear();
        assert!(matches!(
            ConstantTau::new(&no_records),
            Err(RenrtlError::MissingParameter { .. })
        ));
        Ok(())
    }

    #[test]
    fn ions_are_not_interactants() -> RenrtlResult<()> {
        let p = sodium_chloride(HydrationModel::ConstantHydration)?;
        assert!(Interactant::parse("Na+", &p).is_err());
        assert!(Interactant::parse("Cl-, Na+", &p).is_err());
        assert!(Interactant::parse("K+, Cl-", &p).is_err());
        Ok(())
    }
}
