use approx::assert_relative_eq;
use ndarray::arr1;
use renrtl::{HydrationModel, MultiElectrolyte, RenrtlParameters, SingleElectrolyte};
use renrtl_core::parameter::IdentifierOption;
use renrtl_core::{ActivityModel, RenrtlError, SolutionState};
use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

fn parameters(substances: &[&str]) -> Result<Arc<RenrtlParameters>, RenrtlError> {
    Ok(Arc::new(RenrtlParameters::from_json(
        substances,
        "tests/renrtl/nacl_na2so4/pure.json",
        "tests/renrtl/nacl_na2so4/electrolytes.json",
        Some("tests/renrtl/nacl_na2so4/binary.json"),
        IdentifierOption::Name,
        HydrationModel::ConstantHydration,
    )?))
}

fn state(nacl: f64, na2so4: f64) -> SolutionState {
    SolutionState::new(
        298.15,
        101325.0,
        arr1(&[55.5, nacl + 2.0 * na2so4, nacl, na2so4]),
    )
}

/// Reference point of the NaCl + Na2SO4 system. The species of the local
/// composition entries are ordered Na+, Cl-, SO4-2, H2O.
#[derive(Deserialize)]
struct ReferencePoint {
    nacl: f64,
    na2so4: f64,
    gamma: [f64; 2],
    ln_gamma_lc: [f64; 4],
    ln_gamma_inf: [f64; 4],
    tau_cation: [f64; 2],
}

#[test]
fn test_mixed_electrolytes() -> Result<(), Box<dyn Error>> {
    let parameters = parameters(&["H2O", "Na+", "Cl-", "SO4-2"])?;
    assert_eq!(parameters.electrolytes.len(), 2);
    assert_eq!(parameters.binary_records.len(), 6);
    let model = MultiElectrolyte::new(parameters)?;

    let file = File::open("tests/renrtl/nacl_na2so4/reference.json")?;
    let points: Vec<ReferencePoint> = serde_json::from_reader(BufReader::new(file))?;
    assert_eq!(points.len(), 40);
    let species = [1, 2, 3, 0];
    for point in points {
        let state = state(point.nacl, point.na2so4);
        let gamma = model.molal_activity_coefficients(&state)?;
        assert_relative_eq!(gamma[0], point.gamma[0], max_relative = 1e-9);
        assert_relative_eq!(gamma[1], point.gamma[1], max_relative = 1e-9);

        let eval = model.evaluate(&state)?;
        for (k, &i) in species.iter().enumerate() {
            assert_relative_eq!(eval.local.ln_gamma[i], point.ln_gamma_lc[k], epsilon = 1e-7);
            assert_relative_eq!(eval.local.ln_gamma_inf[i], point.ln_gamma_inf[k], epsilon = 1e-6);
        }
        // water around Na+ with the counter ions Cl- and SO4-2
        for (a, &tau) in point.tau_cation.iter().enumerate() {
            assert_relative_eq!(eval.tables.tau_cation[[0, 0, a]], tau, epsilon = 1e-7);
        }
    }
    Ok(())
}

#[test]
fn test_diagnostics() -> Result<(), Box<dyn Error>> {
    let model = MultiElectrolyte::new(parameters(&["H2O", "Na+", "Cl-", "SO4-2"])?)?;
    let d = model.diagnostics(&state(0.1, 0.0))?;
    assert_relative_eq!(
        d.ionic_strength
            .convert_into(quantity::MOL / quantity::METER.powi::<typenum::P3>()),
        99.54943328164069,
        max_relative = 1e-10
    );
    assert_relative_eq!(
        d.solution_volume
            .convert_into(quantity::METER.powi::<typenum::P3>()),
        0.001004526060104075,
        max_relative = 1e-10
    );
    assert_relative_eq!(
        d.closest_approach.convert_into(quantity::METER),
        4.2879932127265835e-10,
        max_relative = 1e-10
    );
    Ok(())
}

#[test]
fn test_single_electrolyte_limit() -> Result<(), Box<dyn Error>> {
    let multi = MultiElectrolyte::new(parameters(&["H2O", "Na+", "Cl-"])?)?;
    let single = SingleElectrolyte::new(parameters(&["Na+", "Cl-", "H2O"])?)?;
    for m in [1e-3, 0.1, 1.0, 4.0] {
        let ln_gamma_multi =
            multi.ln_gamma_molal(&SolutionState::new(298.15, 101325.0, arr1(&[55.5, m, m])))?;
        let ln_gamma_single =
            single.ln_gamma_molal(&SolutionState::new(298.15, 101325.0, arr1(&[m, m, 55.5])))?;
        assert_relative_eq!(ln_gamma_multi[0], ln_gamma_single[0], max_relative = 1e-10);
    }
    Ok(())
}

#[test]
fn test_osmotic_pressure_increases_with_concentration() -> Result<(), Box<dyn Error>> {
    let model = MultiElectrolyte::new(parameters(&["H2O", "Na+", "Cl-", "SO4-2"])?)?;
    let mut previous = 0.0 * quantity::PASCAL;
    for m in [0.1, 0.5, 1.0, 2.0] {
        let pi = model.osmotic_pressure(&state(m, 0.0))?;
        assert!(pi > previous);
        previous = pi;
    }
    Ok(())
}
