use approx::assert_relative_eq;
use ndarray::arr1;
use quantity::{ANGSTROM, BAR, CENTI, KELVIN, METER, MOL};
use renrtl::{
    DensityRecord, ElectrolyteRecord, HydrationModel, NrtlBinaryRecord, PermittivityRecord,
    RenrtlParameters, RenrtlRecord, SingleElectrolyte,
};
use renrtl_core::parameter::{BinaryRecord, Identifier, IdentifierOption, PureRecord};
use renrtl_core::{ActivityModel, RenrtlError, SolutionState, SolverOptions};
use std::error::Error;
use std::sync::Arc;
use typenum::P3;

fn sodium_chloride(model: HydrationModel) -> Result<SingleElectrolyte, RenrtlError> {
    let binary = match model {
        HydrationModel::ConstantHydration => "tests/renrtl/nacl/binary_constant.json",
        HydrationModel::StepwiseHydration => "tests/renrtl/nacl/binary_stepwise.json",
    };
    let parameters = RenrtlParameters::from_json(
        &["Na+", "Cl-", "H2O"],
        "tests/renrtl/nacl/pure.json",
        "tests/renrtl/nacl/electrolytes.json",
        Some(binary),
        IdentifierOption::Name,
        model,
    )?;
    SingleElectrolyte::new(Arc::new(parameters))
}

fn state(flow: f64) -> SolutionState {
    SolutionState::from_quantities(
        298.15 * KELVIN,
        1.01325 * BAR,
        &(arr1(&[flow, flow, 55.5]) * MOL),
    )
}

#[test]
fn test_molal_activity_coefficient() -> Result<(), Box<dyn Error>> {
    let model = sodium_chloride(HydrationModel::ConstantHydration)?;
    let parameters = model.parameters();
    assert_eq!(parameters.index_of("H2O")?, 2);
    assert_eq!(parameters.binary_records.len(), 2);

    let ln_gamma = model.ln_gamma_molal(&state(0.1))?;
    assert_relative_eq!(ln_gamma[0], -0.2517204510048787, max_relative = 1e-6);
    let gamma = model.molal_activity_coefficients(&state(1.0))?;
    assert_relative_eq!(gamma[0], (-0.4231714126521181f64).exp(), max_relative = 1e-6);
    Ok(())
}

#[test]
fn test_true_species() -> Result<(), Box<dyn Error>> {
    let model = sodium_chloride(HydrationModel::ConstantHydration)?;
    let state = state(0.1);
    let ln_gamma = model.ln_gamma(&state)?;
    assert_relative_eq!(ln_gamma[0], -0.25557934393719045, max_relative = 1e-8);
    assert_relative_eq!(ln_gamma[1], -0.2551576975924143, max_relative = 1e-8);
    assert_relative_eq!(ln_gamma[2], 0.00025070909304984626, max_relative = 1e-7);

    let activities = model.activities(&state)?;
    let x = state.molefracs();
    for i in 0..3 {
        assert_relative_eq!(activities[i], x[i] * ln_gamma[i].exp(), max_relative = 1e-14);
    }
    Ok(())
}

#[test]
fn test_stepwise_hydration() -> Result<(), Box<dyn Error>> {
    let model = sodium_chloride(HydrationModel::StepwiseHydration)?;
    assert_relative_eq!(model.initial_total_hydration(), 2.01);
    for (flow, h, molal) in [
        (0.1, 3.1279733502541536, -0.25100104334767304),
        (1.0, 3.1048332870096003, -0.42054016723349247),
    ] {
        let h_solved = model.solve_total_hydration(&state(flow), SolverOptions::default())?;
        assert_relative_eq!(h_solved, h, max_relative = 1e-8);
        let state = state(flow).with_total_hydration(h_solved);
        assert_relative_eq!(model.ln_gamma_molal(&state)?[0], molal, max_relative = 1e-6);
    }
    Ok(())
}

#[test]
fn test_osmotic_pressure() -> Result<(), Box<dyn Error>> {
    let model = sodium_chloride(HydrationModel::ConstantHydration)?;
    let state = state(0.1);
    let eval = model.evaluate(&state)?;
    let ln_activity = state.molefracs()[2].ln() + eval.ln_gamma[2];
    let expected = -ln_activity * 8.314462618 * 298.15 * 55555.55555555556;
    let pi = model.osmotic_pressure(&state)?;
    assert_relative_eq!(pi.convert_into(quantity::PASCAL), expected, max_relative = 1e-8);
    Ok(())
}

#[test]
fn test_diagnostics() -> Result<(), Box<dyn Error>> {
    let model = sodium_chloride(HydrationModel::ConstantHydration)?;
    let d = model.diagnostics(&state(0.1))?;
    assert_relative_eq!(
        d.closest_approach.convert_into(ANGSTROM),
        4.28828306780021,
        max_relative = 1e-12
    );
    assert_relative_eq!(d.permittivity, 78.54003, max_relative = 1e-2);
    assert!(d.debye_huckel > 0.0);
    Ok(())
}

/// NaCl with all hydration parameters set to zero.
fn unhydrated(model: HydrationModel) -> Result<SingleElectrolyte, RenrtlError> {
    let cm3 = (CENTI * METER).powi::<P3>() / MOL;
    let pure_records = vec![
        PureRecord::new(
            Identifier::new("Na+", None, None),
            22.98977,
            RenrtlRecord::ion(1, 1.02 * ANGSTROM, -6.7 * cm3, 0.0).with_stepwise_hydration(0.0, 0.0),
        ),
        PureRecord::new(
            Identifier::new("Cl-", None, None),
            35.453,
            RenrtlRecord::ion(-1, 1.81 * ANGSTROM, 23.3 * cm3, 0.0).with_stepwise_hydration(0.0, 0.0),
        ),
        PureRecord::new(
            Identifier::new("H2O", None, None),
            18.01528,
            RenrtlRecord::solvent(
                PermittivityRecord::Constant { permittivity: 78.54 },
                DensityRecord::Constant {
                    molar_density: 55345.0,
                },
            ),
        ),
    ];
    let binary_records = vec![
        BinaryRecord::new("H2O", "Na+, Cl-", NrtlBinaryRecord::new(7.951, Some(0.2))),
        BinaryRecord::new("Na+, Cl-", "H2O", NrtlBinaryRecord::new(-3.984, None)),
    ];
    let parameters = RenrtlParameters::from_records(
        pure_records,
        vec![ElectrolyteRecord::new(
            "NaCl",
            &[("Na+", 1.0), ("Cl-", 1.0)],
            3.6,
        )],
        binary_records,
        model,
    )?;
    SingleElectrolyte::new(Arc::new(parameters))
}

#[test]
fn test_hydration_models_coincide_without_hydration() -> Result<(), Box<dyn Error>> {
    let constant = unhydrated(HydrationModel::ConstantHydration)?;
    let stepwise = unhydrated(HydrationModel::StepwiseHydration)?;
    for flow in [0.01, 0.1, 1.0, 3.0] {
        let state = state(flow);
        let h = stepwise.solve_total_hydration(&state, SolverOptions::default())?;
        assert_relative_eq!(h, 0.0, epsilon = 1e-12);
        let ln_gamma_constant = constant.ln_gamma_molal(&state)?;
        let ln_gamma_stepwise = stepwise.ln_gamma_molal(&state.clone().with_total_hydration(h))?;
        assert_relative_eq!(
            ln_gamma_constant[0],
            ln_gamma_stepwise[0],
            max_relative = 1e-10
        );
    }
    Ok(())
}

#[test]
fn test_missing_parameters() {
    let parameters = RenrtlParameters::from_json(
        &["Na+", "Cl-", "H2O"],
        "tests/renrtl/nacl_na2so4/pure.json",
        "tests/renrtl/nacl_na2so4/electrolytes.json",
        None,
        IdentifierOption::Name,
        HydrationModel::StepwiseHydration,
    );
    assert!(matches!(
        parameters,
        Err(RenrtlError::MissingParameter { .. })
    ));
}

#[test]
fn test_missing_binary_parameters() -> Result<(), Box<dyn Error>> {
    let parameters = RenrtlParameters::from_json(
        &["Na+", "Cl-", "H2O"],
        "tests/renrtl/nacl/pure.json",
        "tests/renrtl/nacl/electrolytes.json",
        None,
        IdentifierOption::Name,
        HydrationModel::ConstantHydration,
    )?;
    assert!(matches!(
        SingleElectrolyte::new(Arc::new(parameters)),
        Err(RenrtlError::MissingParameter { .. })
    ));
    Ok(())
}
