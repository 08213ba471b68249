//! Local composition (short-range) contribution of the r-eNRTL model.
use super::composition::{sum, Composition};
use super::interaction::InteractionTables;
use crate::parameters::RenrtlParameters;
use ndarray::{Array1, Array3};
use num_dual::DualNum;

/// Local composition contribution to the logarithmic activity coefficients.
#[derive(Clone, Debug)]
pub struct LocalComposition<D> {
    /// Contribution relative to the reference state of every species
    /// (infinite dilution in the solvent for ions, pure liquid for the solvent)
    pub ln_gamma: Array1<D>,
    /// Contribution at infinite dilution in the solvent (0 for the solvent)
    pub ln_gamma_inf: Array1<D>,
}

impl<D: DualNum<f64> + Copy> LocalComposition<D> {
    pub(crate) fn new(
        parameters: &RenrtlParameters,
        composition: &Composition<D>,
        tables: &InteractionTables<D>,
    ) -> Self {
        let p = parameters;
        let t = tables;
        let x = &composition.effective_molefracs;
        let (sc, sa) = (composition.cation_fraction, composition.anion_fraction);
        let z = p.charge_weights();
        let n = x.len();
        let (nc, na) = (p.cations.len(), p.anions.len());
        let solvents = p.solvents.iter().copied().enumerate();

        // sums over all species in the environment of the solvents
        let shells: Vec<_> = p
            .solvents
            .iter()
            .map(|&m| {
                let s = sum((0..n).map(|i| x[i] * t.g[[i, m]]));
                let st = sum((0..n).map(|i| x[i] * t.g[[i, m]] * t.tau[[i, m]]));
                (s, st / s)
            })
            .collect();

        // sums over the environment of a central cation (c, a) and a central anion (a, c)
        let environment =
            |g: &Array3<D>, tau: &Array3<D>, c: usize, a: usize, species: &[usize]| {
                let q = sum(species.iter().map(|&i| x[i] * g[[i, c, a]]));
                let qt = sum(species.iter().map(|&i| x[i] * g[[i, c, a]] * tau[[i, c, a]]));
                (q, qt / q)
            };
        let all: Vec<_> = (0..n).collect();
        let no_cations: Vec<_> = (0..n).filter(|&i| !p.is_cation(i)).collect();
        let no_anions: Vec<_> = (0..n).filter(|&i| !p.is_anion(i)).collect();

        let mut ln_gamma = Array1::from_elem(n, D::zero());
        let mut ln_gamma_inf = Array1::from_elem(n, D::zero());

        for (ci, &c) in p.cations.iter().enumerate() {
            let mut t1 = D::zero();
            for (k, m) in solvents.clone() {
                let (s, r) = shells[k];
                let mut term = t.g[[c, m]] * (t.tau[[c, m]] - r);
                for (ai, &a) in p.anions.iter().enumerate() {
                    let alpha = t.alpha_pair[[ci, ai, k]];
                    let dg = t.g_pair[[ci, ai, k]] - t.g[[a, m]];
                    term += x[a] / (alpha * sc) * dg * (alpha * t.tau[[a, m]] - 1.0)
                        - x[a] / sc * dg * r;
                }
                t1 += x[m] / s * term;
            }

            let t2 = sum(p.anions.iter().enumerate().map(|(ai, &a)| {
                let (_, r) = environment(&t.g_cation, &t.tau_cation, ci, ai, &no_cations);
                x[a] / sa * r
            }));

            let mut t3 = D::zero();
            for (ai, &a) in p.anions.iter().enumerate() {
                let env: Vec<_> = (0..nc)
                    .map(|k| environment(&t.g_anion, &t.tau_anion, k, ai, &no_anions))
                    .collect();
                let mut inner = D::zero();
                let mut mean = D::zero();
                for (ck, &cp) in p.cations.iter().enumerate() {
                    let (q, r) = env[ck];
                    let mut term = t.g_anion[[c, ck, ai]] * (t.tau_anion[[c, ck, ai]] - r);
                    for (k, m) in solvents.clone() {
                        let sm = sum((0..nc).map(|cc| x[p.cations[cc]] * t.g_pair[[cc, ai, k]]));
                        let gm = t.g_anion[[m, ck, ai]];
                        let dg = t.g_pair[[ci, ai, k]] - t.g[[a, m]];
                        term += x[m] / (t.alpha_pair[[ck, ai, k]] * sm)
                            * gm
                            * dg
                            * (t.alpha_pair[[ci, ai, k]] * t.tau_anion[[m, ck, ai]] - 1.0)
                            - x[m] / sm * gm * dg * r;
                    }
                    inner += x[cp] / sc / q * term;
                    mean += x[cp] / sc * r;
                }
                inner += (env[ci].1 - mean) / sc;
                t3 += x[a] * inner;
            }
            ln_gamma[c] = (t1 + t2 + t3) * z[c];
        }

        for (ai, &a) in p.anions.iter().enumerate() {
            let mut t1 = D::zero();
            for (k, m) in solvents.clone() {
                let (s, r) = shells[k];
                let mut term = t.g[[a, m]] * (t.tau[[a, m]] - r);
                for (ci, &c) in p.cations.iter().enumerate() {
                    let alpha = t.alpha_pair[[ci, ai, k]];
                    let dg = t.g_pair[[ci, ai, k]] - t.g[[c, m]];
                    term += x[c] / (alpha * sa) * dg * (alpha * t.tau[[c, m]] - 1.0)
                        - x[c] / sa * dg * r;
                }
                t1 += x[m] / s * term;
            }

            let t2 = sum(p.cations.iter().enumerate().map(|(ci, &c)| {
                let (_, r) = environment(&t.g_anion, &t.tau_anion, ci, ai, &no_anions);
                x[c] / sc * r
            }));

            let mut t3 = D::zero();
            for (ci, &c) in p.cations.iter().enumerate() {
                let env: Vec<_> = (0..na)
                    .map(|k| environment(&t.g_cation, &t.tau_cation, ci, k, &no_cations))
                    .collect();
                let mut inner = D::zero();
                let mut mean = D::zero();
                for (ak, &ap) in p.anions.iter().enumerate() {
                    let (q, r) = env[ak];
                    let mut term = t.g_cation[[a, ci, ak]] * (t.tau_cation[[a, ci, ak]] - r);
                    for (k, m) in solvents.clone() {
                        let sm = sum((0..na).map(|aa| x[p.anions[aa]] * t.g_pair[[ci, aa, k]]));
                        let gm = t.g_cation[[m, ci, ak]];
                        let dg = t.g_pair[[ci, ai, k]] - t.g[[c, m]];
                        let alpha = t.alpha_pair[[ci, ak, k]];
                        term += x[m] / (alpha * sm)
                            * gm
                            * dg
                            * (alpha * t.tau_cation[[m, ci, ak]] - 1.0)
                            - x[m] / sm * gm * dg * r;
                    }
                    inner += x[ap] / sa / q * term;
                    mean += x[ap] / sa * r;
                }
                inner += (env[ai].1 - mean) / sa;
                t3 += x[c] * inner;
            }
            ln_gamma[a] = (t1 + t2 + t3) * z[a];
        }

        for (k, m) in solvents.clone() {
            let (_, r) = shells[k];
            let mut lng = r;
            for (kk, mm) in solvents.clone() {
                let (s, r) = shells[kk];
                lng += x[mm] * t.g[[m, mm]] / s * (t.tau[[m, mm]] - r);
            }
            for (ci, &c) in p.cations.iter().enumerate() {
                for (ai, &a) in p.anions.iter().enumerate() {
                    let (q, r) = environment(&t.g_cation, &t.tau_cation, ci, ai, &all);
                    lng += x[a] / sa * x[c] * t.g_cation[[m, ci, ai]] / q
                        * (t.tau_cation[[m, ci, ai]] - r);
                    let (q, r) = environment(&t.g_anion, &t.tau_anion, ci, ai, &all);
                    lng += x[c] / sc * x[a] * t.g_anion[[m, ci, ai]] / q
                        * (t.tau_anion[[m, ci, ai]] - r);
                }
            }
            ln_gamma[m] = lng;
        }

        // infinite dilution in the solvent
        let w = p.solvent();
        let wk = 0;
        for (ci, &c) in p.cations.iter().enumerate() {
            let mut inf = t.g[[c, w]] * t.tau[[c, w]];
            for (ai, &a) in p.anions.iter().enumerate() {
                let alpha = t.alpha_pair[[ci, ai, wk]];
                let dg = t.g_pair[[ci, ai, wk]] - t.g[[a, w]];
                let sm = sum((0..nc).map(|cc| x[p.cations[cc]] * t.g_pair[[cc, ai, wk]]));
                let mean = sum(
                    p.cations
                        .iter()
                        .enumerate()
                        .map(|(ck, &cp)| x[cp] / sc * t.tau_anion[[w, ck, ai]]),
                );
                inf += x[a] / sa * t.tau_cation[[w, ci, ai]]
                    + x[a] / sc * dg * (alpha * t.tau[[a, w]] - 1.0) / alpha
                    - x[a] * (-dg / (alpha * sm) + (t.tau_anion[[w, ci, ai]] - mean) / sc);
            }
            ln_gamma_inf[c] = inf * z[c];
        }
        for (ai, &a) in p.anions.iter().enumerate() {
            let mut inf = t.g[[a, w]] * t.tau[[a, w]];
            for (ci, &c) in p.cations.iter().enumerate() {
                let alpha = t.alpha_pair[[ci, ai, wk]];
                let dg = t.g_pair[[ci, ai, wk]] - t.g[[c, w]];
                let sm = sum((0..na).map(|aa| x[p.anions[aa]] * t.g_pair[[ci, aa, wk]]));
                let mean = sum(
                    p.anions
                        .iter()
                        .enumerate()
                        .map(|(ak, &ap)| x[ap] / sa * t.tau_cation[[w, ci, ak]]),
                );
                inf += x[c] / sc * t.tau_anion[[w, ci, ai]]
                    + x[c] / sa * dg * (alpha * t.tau[[c, w]] - 1.0) / alpha
                    + x[c] * (-dg / (alpha * sm) + (t.tau_cation[[w, ci, ai]] - mean) / sa);
            }
            ln_gamma_inf[a] = inf * z[a];
        }

        for &i in p.ions.iter() {
            ln_gamma[i] -= ln_gamma_inf[i];
        }
        Self {
            ln_gamma,
            ln_gamma_inf,
        }
    }
}
