//! Extension of the binary NRTL parameters to all pairs of true species.
//!
//! Binary parameters are only known between molecules and ion pairs. The
//! three-index tables contain the parameters between two true species as
//! charge fraction weighted averages over the possible counter ions. The
//! four-index tables describe a species in the environment of a central
//! cation or anion surrounded by a specific counter ion.
use super::composition::sum;
use crate::parameters::RenrtlParameters;
use crate::rules::{g_binary, AlphaRule, Interactant, TauRule, DEFAULT_ALPHA};
use ndarray::{Array1, Array2, Array3};
use num_dual::DualNum;

/// Role of a true species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Species {
    Molecule(usize),
    /// Cation with its position in the cation set
    Cation(usize),
    /// Anion with its position in the anion set
    Anion(usize),
}

pub(crate) fn species(parameters: &RenrtlParameters) -> Vec<Species> {
    (0..parameters.components())
        .map(|i| {
            if let Some(k) = parameters.cations.iter().position(|&c| c == i) {
                Species::Cation(k)
            } else if let Some(k) = parameters.anions.iter().position(|&a| a == i) {
                Species::Anion(k)
            } else {
                Species::Molecule(i)
            }
        })
        .collect()
}

/// NRTL parameters of all pairs of true species.
///
/// The three-index tables are indexed by two true species. Entries between
/// ions of the same sign are not defined; they hold `alpha = 0.2`, `tau = 0`
/// and `G = 1`.
///
/// The four-index tables are stored as `[i, c, a]` with the true species
/// `i`, and the positions `c` and `a` of a cation and an anion in their
/// sets. The cation tables describe species `i` around the central cation
/// `c` with the counter anion `a`, the anion tables species `i` around the
/// central anion `a` with the counter cation `c`. The pair tables hold the
/// parameters between the ion pair `(c, a)` and the solvent at position
/// `m`, stored as `[c, a, m]`.
#[derive(Clone, Debug)]
pub struct InteractionTables<D> {
    pub alpha: Array2<D>,
    pub tau: Array2<D>,
    pub g: Array2<D>,
    pub alpha_pair: Array3<D>,
    pub g_pair: Array3<D>,
    pub alpha_cation: Array3<D>,
    pub tau_cation: Array3<D>,
    pub g_cation: Array3<D>,
    pub alpha_anion: Array3<D>,
    pub tau_anion: Array3<D>,
    pub g_anion: Array3<D>,
}

impl<D: DualNum<f64> + Copy> InteractionTables<D> {
    pub(crate) fn new<A: AlphaRule, T: TauRule>(
        parameters: &RenrtlParameters,
        alpha_rule: &A,
        tau_rule: &T,
        charge_fractions: &Array1<D>,
        temperature: D,
    ) -> Self {
        let p = parameters;
        let n = p.components();
        let (nc, na, nm) = (p.cations.len(), p.anions.len(), p.solvents.len());
        let y = charge_fractions;
        let kinds = species(p);

        let pair = |c: usize, a: usize| Interactant::pair(p.cations[c], p.anions[a]);
        let alpha = |i, j| alpha_rule.alpha(i, j, temperature);
        let tau = |i, j| tau_rule.tau(i, j, temperature);
        let g = |i, j| g_binary(alpha_rule, tau_rule, i, j, temperature);
        let y_cation = |c: usize| y[p.cations[c]];
        let y_anion = |a: usize| y[p.anions[a]];

        // three-index tables
        let mut alpha3 = Array2::from_elem((n, n), D::from(DEFAULT_ALPHA));
        let mut tau3 = Array2::from_elem((n, n), D::zero());
        let mut g3 = Array2::from_elem((n, n), D::one());
        for (i, &ki) in kinds.iter().enumerate() {
            for (j, &kj) in kinds.iter().enumerate() {
                let (a_ij, g_ij) = match (ki, kj) {
                    (Species::Molecule(mi), Species::Molecule(mj)) => {
                        let (mi, mj) = (Interactant::Molecule(mi), Interactant::Molecule(mj));
                        alpha3[[i, j]] = alpha(mi, mj);
                        tau3[[i, j]] = tau(mi, mj);
                        g3[[i, j]] = g(mi, mj);
                        continue;
                    }
                    (Species::Cation(c), Species::Molecule(m)) => {
                        let m = Interactant::Molecule(m);
                        (
                            sum((0..na).map(|a| y_anion(a) * alpha(pair(c, a), m))),
                            sum((0..na).map(|a| y_anion(a) * g(pair(c, a), m))),
                        )
                    }
                    (Species::Molecule(m), Species::Cation(c)) => {
                        let m = Interactant::Molecule(m);
                        (
                            sum((0..na).map(|a| y_anion(a) * alpha(pair(c, a), m))),
                            sum((0..na).map(|a| y_anion(a) * g(m, pair(c, a)))),
                        )
                    }
                    (Species::Anion(a), Species::Molecule(m)) => {
                        let m = Interactant::Molecule(m);
                        (
                            sum((0..nc).map(|c| y_cation(c) * alpha(pair(c, a), m))),
                            sum((0..nc).map(|c| y_cation(c) * g(pair(c, a), m))),
                        )
                    }
                    (Species::Molecule(m), Species::Anion(a)) => {
                        let m = Interactant::Molecule(m);
                        (
                            sum((0..nc).map(|c| y_cation(c) * alpha(pair(c, a), m))),
                            sum((0..nc).map(|c| y_cation(c) * g(m, pair(c, a)))),
                        )
                    }
                    (Species::Cation(c), Species::Anion(a)) if nc > 1 => (
                        sum((0..nc).map(|k| y_cation(k) * alpha(pair(c, a), pair(k, a)))),
                        sum((0..nc).map(|k| y_cation(k) * g(pair(c, a), pair(k, a)))),
                    ),
                    (Species::Anion(a), Species::Cation(c)) if na > 1 => (
                        sum((0..na).map(|k| y_anion(k) * alpha(pair(c, a), pair(c, k)))),
                        sum((0..na).map(|k| y_anion(k) * g(pair(c, a), pair(c, k)))),
                    ),
                    (Species::Cation(_), Species::Anion(_))
                    | (Species::Anion(_), Species::Cation(_)) => {
                        (D::from(DEFAULT_ALPHA), D::one())
                    }
                    _ => continue,
                };
                alpha3[[i, j]] = a_ij;
                g3[[i, j]] = g_ij;
                tau3[[i, j]] = -g_ij.ln() / a_ij;
            }
        }

        // ion pair - solvent tables
        let mut alpha_pair = Array3::from_elem((nc, na, nm), D::zero());
        let mut g_pair = Array3::from_elem((nc, na, nm), D::zero());
        for c in 0..nc {
            for a in 0..na {
                for (k, &m) in p.solvents.iter().enumerate() {
                    let m = Interactant::Molecule(m);
                    alpha_pair[[c, a, k]] = alpha(pair(c, a), m);
                    g_pair[[c, a, k]] = g(pair(c, a), m);
                }
            }
        }

        // four-index tables
        let shape = (n, nc, na);
        let mut alpha_cation = Array3::from_elem(shape, D::from(DEFAULT_ALPHA));
        let mut tau_cation = Array3::from_elem(shape, D::zero());
        let mut g_cation = Array3::from_elem(shape, D::zero());
        let mut alpha_anion = Array3::from_elem(shape, D::from(DEFAULT_ALPHA));
        let mut tau_anion = Array3::from_elem(shape, D::zero());
        let mut g_anion = Array3::from_elem(shape, D::zero());
        for c in 0..nc {
            for a in 0..na {
                let ca = pair(c, a);
                for (i, &ki) in kinds.iter().enumerate() {
                    let idx = [i, c, a];
                    match ki {
                        Species::Molecule(m) => {
                            let m = Interactant::Molecule(m);
                            // the pair - molecule interaction is corrected by the
                            // mixture of all counter ions of the central ion
                            let shift = tau(m, ca) - tau(ca, m);
                            let g_anions = sum((0..na).map(|k| g(pair(c, k), m) * y_anion(k)));
                            let g_cations = sum((0..nc).map(|k| g(pair(k, a), m) * y_cation(k)));
                            alpha_cation[idx] = alpha(m, ca);
                            tau_cation[idx] = -g_anions.ln() / alpha(ca, m) + shift;
                            alpha_anion[idx] = alpha(m, ca);
                            tau_anion[idx] = -g_cations.ln() / alpha(ca, m) + shift;
                        }
                        Species::Anion(k) if k == a => {
                            g_cation[idx] = D::one();
                            continue;
                        }
                        Species::Anion(k) => {
                            let ck = pair(c, k);
                            alpha_cation[idx] = alpha(ck, ck);
                            tau_cation[idx] = tau(ck, ca);
                            g_cation[idx] = (-alpha_cation[idx] * tau_cation[idx]).exp();
                            continue;
                        }
                        Species::Cation(k) if k == c => {
                            g_anion[idx] = D::one();
                            continue;
                        }
                        Species::Cation(k) => {
                            let ka = pair(k, a);
                            alpha_anion[idx] = alpha(ka, ka);
                            tau_anion[idx] = tau(ka, ca);
                            g_anion[idx] = (-alpha_anion[idx] * tau_anion[idx]).exp();
                            continue;
                        }
                    }
                    g_cation[idx] = (-alpha_cation[idx] * tau_cation[idx]).exp();
                    g_anion[idx] = (-alpha_anion[idx] * tau_anion[idx]).exp();
                }
            }
        }

        Self {
            alpha: alpha3,
            tau: tau3,
            g: g3,
            alpha_pair,
            g_pair,
            alpha_cation,
            tau_cation,
            g_cation,
            alpha_anion,
            tau_anion,
            g_anion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::utils::{sodium_chloride, sodium_chloride_sulfate};
    use crate::parameters::HydrationModel;
    use crate::rules::{ConstantAlpha, ConstantTau};
    use approx::assert_relative_eq;
    use ndarray::arr1;
    use renrtl_core::RenrtlResult;

    #[test]
    fn single_electrolyte() -> RenrtlResult<()> {
        let p = sodium_chloride(HydrationModel::ConstantHydration)?;
        let alpha = ConstantAlpha::new(&p)?;
        let tau = ConstantTau::new(&p)?;
        let y = arr1(&[1.0, 1.0, 0.0]);
        let t = InteractionTables::new(&p, &alpha, &tau, &y, 298.15);

        // solvent - solvent
        assert_relative_eq!(t.tau[[2, 2]], 0.0);
        assert_relative_eq!(t.g[[2, 2]], 1.0);
        // ion - solvent parameters are the ion pair parameters
        assert_relative_eq!(t.tau[[0, 2]], -3.984, max_relative = 1e-14);
        assert_relative_eq!(t.tau[[1, 2]], -3.984, max_relative = 1e-14);
        assert_relative_eq!(t.tau[[2, 0]], 7.951, max_relative = 1e-14);
        assert_relative_eq!(t.g[[2, 1]], (-0.2f64 * 7.951).exp(), max_relative = 1e-14);
        // single cation and anion
        assert_relative_eq!(t.alpha[[0, 1]], 0.2);
        assert_relative_eq!(t.g[[1, 0]], 1.0);
        assert_relative_eq!(t.tau[[1, 0]], 0.0);

        assert_relative_eq!(t.tau_cation[[2, 0, 0]], 7.951, max_relative = 1e-14);
        assert_relative_eq!(t.tau_anion[[2, 0, 0]], 7.951, max_relative = 1e-14);
        assert_relative_eq!(t.g_cation[[1, 0, 0]], 1.0);
        assert_relative_eq!(t.g_cation[[0, 0, 0]], 0.0);
        assert_relative_eq!(t.g_anion[[0, 0, 0]], 1.0);
        assert_relative_eq!(t.g_anion[[1, 0, 0]], 0.0);
        assert_relative_eq!(t.g_pair[[0, 0, 0]], (0.2f64 * 3.984).exp(), max_relative = 1e-14);
        Ok(())
    }

    #[test]
    fn mixed_electrolytes() -> RenrtlResult<()> {
        let p = sodium_chloride_sulfate()?;
        let alpha = ConstantAlpha::new(&p)?;
        let tau = ConstantTau::new(&p)?;
        // H2O, Na+, Cl-, SO4-2
        let y = arr1(&[0.0, 1.0, 0.25, 0.75]);
        let t = InteractionTables::new(&p, &alpha, &tau, &y, 298.15);

        let g_cl = (0.2f64 * 3.984).exp();
        let g_so4 = (0.2f64 * 3.532).exp();
        // cation - solvent averaged over the anions
        assert_relative_eq!(t.g[[1, 0]], 0.25 * g_cl + 0.75 * g_so4, max_relative = 1e-14);
        assert_relative_eq!(
            t.tau[[1, 0]],
            -(0.25 * g_cl + 0.75 * g_so4).ln() / 0.2,
            max_relative = 1e-14
        );
        // anion - cation averaged over the anions with the same cation
        let g = 0.25 * (-0.2f64 * 0.27889951).exp() + 0.75;
        assert_relative_eq!(t.g[[3, 1]], g, max_relative = 1e-14);
        assert_relative_eq!(
            t.g[[2, 1]],
            0.25 + 0.75 * (0.2f64 * 0.27889951).exp(),
            max_relative = 1e-14
        );

        // cross anion in the environment of Na+ and Cl-
        assert_relative_eq!(t.tau_cation[[3, 0, 0]], 0.27889951, max_relative = 1e-14);
        assert_relative_eq!(t.tau_cation[[2, 0, 1]], -0.27889951, max_relative = 1e-14);
        assert_relative_eq!(t.g_cation[[3, 0, 1]], 1.0);
        // solvent around Na+ with counter ion Cl-
        let tau_w = -(0.25 * g_cl + 0.75 * g_so4).ln() / 0.2 + 3.984 + 7.951;
        assert_relative_eq!(t.tau_cation[[0, 0, 0]], tau_w, max_relative = 1e-14);
        assert_relative_eq!(t.g_cation[[0, 0, 0]], (-0.2 * tau_w).exp(), max_relative = 1e-14);
        // a single cation leaves the solvent around the anions uncorrected
        assert_relative_eq!(t.tau_anion[[0, 0, 1]], 7.578, max_relative = 1e-14);
        Ok(())
    }
}
