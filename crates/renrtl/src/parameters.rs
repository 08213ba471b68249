//! Parameter registry of the r-eNRTL models.
//!
//! The registry collects the pure species records (solvent and ions), the
//! electrolyte records that describe the dissociation of the apparent
//! species and the binary NRTL records. On construction it derives the
//! index sets of the true species and validates everything that the
//! selected hydration model needs, so that evaluations never fail because
//! of an incomplete parameter set.
use crate::solvent::{DensityRecord, PermittivityRecord};
use indexmap::IndexMap;
use quantity::{Length, MolarVolume, ANGSTROM, CENTI, METER, MOL};
use renrtl_core::parameter::{
    required, BinaryRecord, Identifier, IdentifierOption, ParameterUnit, ParameterValue,
    PureRecord,
};
use renrtl_core::{RenrtlError, RenrtlResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;
use typenum::P3;

/// Hydration model of the ions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HydrationModel {
    /// Hydration numbers are fixed parameters.
    ConstantHydration,
    /// The total hydration number follows from the hydration equilibria
    /// of the individual hydration sites.
    StepwiseHydration,
}

impl FromStr for HydrationModel {
    type Err = RenrtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant_hydration" => Ok(Self::ConstantHydration),
            "stepwise_hydration" => Ok(Self::StepwiseHydration),
            _ => Err(RenrtlError::UnknownHydrationModel(s.into())),
        }
    }
}

impl fmt::Display for HydrationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantHydration => write!(f, "constant_hydration"),
            Self::StepwiseHydration => write!(f, "stepwise_hydration"),
        }
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// r-eNRTL parameters of a pure species.
///
/// Solvents have a charge of zero and carry the correlations for their
/// permittivity and density, ions carry the size and hydration parameters.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RenrtlRecord {
    /// Charge number
    #[serde(default, skip_serializing_if = "is_zero")]
    pub charge: i32,
    /// Ionic radius in units of Angstrom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ionic_radius: Option<ParameterValue>,
    /// Partial molar volume at infinite dilution in units of cm³/mol
    #[serde(
        default,
        rename = "partial_vol_mol",
        skip_serializing_if = "Option::is_none"
    )]
    pub partial_molar_volume: Option<ParameterValue>,
    /// Hydration number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_number: Option<ParameterValue>,
    /// Minimum hydration number (stepwise hydration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hydration_number: Option<ParameterValue>,
    /// Number of hydration sites (stepwise hydration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_sites: Option<ParameterValue>,
    /// Relative permittivity of a solvent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permittivity: Option<PermittivityRecord>,
    /// Liquid density of a solvent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityRecord>,
    #[serde(flatten, skip_serializing)]
    unknown: IndexMap<String, serde_json::Value>,
}

impl RenrtlRecord {
    /// Parameters of an ion for the constant hydration model.
    pub fn ion(
        charge: i32,
        ionic_radius: Length,
        partial_molar_volume: MolarVolume,
        hydration_number: f64,
    ) -> Self {
        let cm3_per_mol = (CENTI * METER).powi::<P3>() / MOL;
        Self {
            charge,
            ionic_radius: Some((ionic_radius / ANGSTROM).into_value().into()),
            partial_molar_volume: Some((partial_molar_volume / cm3_per_mol).into_value().into()),
            hydration_number: Some(hydration_number.into()),
            ..Default::default()
        }
    }

    /// Add the parameters of the stepwise hydration model.
    pub fn with_stepwise_hydration(mut self, min_hydration_number: f64, number_sites: f64) -> Self {
        self.min_hydration_number = Some(min_hydration_number.into());
        self.number_sites = Some(number_sites.into());
        self
    }

    /// Parameters of a solvent.
    pub fn solvent(permittivity: PermittivityRecord, density: DensityRecord) -> Self {
        Self {
            permittivity: Some(permittivity),
            density: Some(density),
            ..Default::default()
        }
    }
}

/// Dissociation of an apparent species into its ions.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ElectrolyteRecord {
    pub name: String,
    /// Stoichiometric coefficients of the ions
    pub dissociation: IndexMap<String, f64>,
    /// Equilibrium constant of the stepwise hydration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_constant: Option<ParameterValue>,
}

impl ElectrolyteRecord {
    pub fn new(name: &str, dissociation: &[(&str, f64)], hydration_constant: f64) -> Self {
        Self {
            name: name.into(),
            dissociation: dissociation.iter().map(|&(i, nu)| (i.into(), nu)).collect(),
            hydration_constant: Some(hydration_constant.into()),
        }
    }

    /// Read all electrolyte records from a json file.
    pub fn from_json<P: AsRef<Path>>(file: P) -> RenrtlResult<Vec<Self>> {
        Ok(serde_json::from_reader(BufReader::new(File::open(file)?))?)
    }
}

impl fmt::Display for ElectrolyteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElectrolyteRecord(name={}, dissociation={{", self.name)?;
        for (k, (ion, nu)) in self.dissociation.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ion}: {nu}")?;
        }
        write!(f, "}}")?;
        if let Some(k) = &self.hydration_constant {
            write!(f, ", hydration_constant={k}")?;
        }
        write!(f, ")")
    }
}

/// Binary NRTL parameters between molecules and ion pairs.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NrtlBinaryRecord {
    /// Interaction energy from `id1` to `id2`
    pub tau: f64,
    /// Non-randomness factor (symmetric)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl NrtlBinaryRecord {
    pub fn new(tau: f64, alpha: Option<f64>) -> Self {
        Self { tau, alpha }
    }
}

/// Interaction constant `beta` tabulated for the charge type
/// `(|z_cation|, |z_anion|)` of an electrolyte.
const BETA: [((u32, u32), f64); 5] = [
    ((1, 1), 0.9695492),
    ((2, 1), 0.9192301707),
    ((1, 2), 0.8144420812),
    ((2, 2), 0.1245007),
    ((3, 1), 0.7392229),
];

/// Look up `beta` for the charge numbers of a cation and an anion.
pub fn beta(cation_charge: u32, anion_charge: u32) -> RenrtlResult<f64> {
    BETA.iter()
        .find(|(k, _)| *k == (cation_charge, anion_charge))
        .map(|(_, b)| *b)
        .ok_or(RenrtlError::UnsupportedChargeType(
            cation_charge,
            anion_charge,
        ))
}

/// Distance between a solute and a solvent molecule in Å.
const SOLVENT_DISTANCE: f64 = 1.9277;

/// An apparent species that dissociates into one cation and one anion.
#[derive(Clone, Debug)]
pub struct Electrolyte {
    pub name: String,
    /// Index of the cation
    pub cation: usize,
    /// Index of the anion
    pub anion: usize,
    /// Stoichiometric coefficient of the cation
    pub nu_cation: f64,
    /// Stoichiometric coefficient of the anion
    pub nu_anion: f64,
    /// Equilibrium constant of the stepwise hydration
    pub hydration_constant: f64,
    /// Interaction constant of the charge type
    pub beta: f64,
    /// Distance of closest approach in m
    pub closest_approach: f64,
}

impl Electrolyte {
    /// Number of ions formed by one formula unit.
    pub fn nu(&self) -> f64 {
        self.nu_cation + self.nu_anion
    }

    /// Stoichiometric coefficient of the species `i` (0 if `i` is not part
    /// of the electrolyte).
    pub fn stoichiometry(&self, i: usize) -> f64 {
        if i == self.cation {
            self.nu_cation
        } else if i == self.anion {
            self.nu_anion
        } else {
            0.0
        }
    }

    /// The ions of the electrolyte with their stoichiometric coefficients.
    pub fn ions(&self) -> [(usize, f64); 2] {
        [(self.cation, self.nu_cation), (self.anion, self.nu_anion)]
    }
}

/// Parameters of an r-eNRTL model.
///
/// All per species arrays are indexed by the true species in the order of
/// the pure records. Parameters that are undefined for a species (e.g. the
/// ionic radius of the solvent) are stored as zero.
#[derive(Clone, Debug)]
pub struct RenrtlParameters {
    pub hydration_model: HydrationModel,
    pub identifiers: Vec<Identifier>,
    /// Molar weights in g/mol
    pub molarweight: Vec<f64>,
    /// Signed charge numbers
    pub charge: Vec<i32>,
    pub solvents: Vec<usize>,
    pub cations: Vec<usize>,
    pub anions: Vec<usize>,
    pub ions: Vec<usize>,
    /// Ionic radii in Å
    pub ionic_radius: Vec<f64>,
    /// Partial molar volumes at infinite dilution in cm³/mol
    pub partial_molar_volume: Vec<f64>,
    pub hydration_number: Vec<f64>,
    pub min_hydration_number: Vec<f64>,
    pub number_sites: Vec<f64>,
    /// Permittivity correlations of the solvents
    pub permittivity: Vec<PermittivityRecord>,
    /// Density correlations of the solvents
    pub density: Vec<DensityRecord>,
    pub electrolytes: Vec<Electrolyte>,
    pub pure_records: Vec<PureRecord<RenrtlRecord>>,
    pub electrolyte_records: Vec<ElectrolyteRecord>,
    pub binary_records: Vec<BinaryRecord<NrtlBinaryRecord>>,
}

impl RenrtlParameters {
    /// Build and validate the parameters from records.
    pub fn from_records(
        pure_records: Vec<PureRecord<RenrtlRecord>>,
        electrolyte_records: Vec<ElectrolyteRecord>,
        binary_records: Vec<BinaryRecord<NrtlBinaryRecord>>,
        hydration_model: HydrationModel,
    ) -> RenrtlResult<Self> {
        let n = pure_records.len();
        let identifiers: Vec<_> = pure_records.iter().map(|r| r.identifier.clone()).collect();
        let names: HashSet<_> = identifiers.iter().map(|i| i.name.as_str()).collect();
        if names.len() != n {
            return Err(RenrtlError::IncompatibleParameters(
                "A species was defined more than once.".into(),
            ));
        }

        let mut parameters = Self {
            hydration_model,
            identifiers,
            molarweight: pure_records.iter().map(|r| r.molarweight).collect(),
            charge: pure_records.iter().map(|r| r.model_record.charge).collect(),
            solvents: Vec::new(),
            cations: Vec::new(),
            anions: Vec::new(),
            ions: Vec::new(),
            ionic_radius: vec![0.0; n],
            partial_molar_volume: vec![0.0; n],
            hydration_number: vec![0.0; n],
            min_hydration_number: vec![0.0; n],
            number_sites: vec![0.0; n],
            permittivity: Vec::new(),
            density: Vec::new(),
            electrolytes: Vec::with_capacity(electrolyte_records.len()),
            pure_records: Vec::new(),
            electrolyte_records: Vec::new(),
            binary_records,
        };

        for (i, record) in pure_records.iter().enumerate() {
            let name = record.identifier.name.as_str();
            let r = &record.model_record;
            if let Some(key) = r.unknown.keys().next() {
                return Err(RenrtlError::UnknownParameter {
                    component: name.into(),
                    parameter: key.clone(),
                });
            }
            if r.charge == 0 {
                parameters.solvents.push(i);
                let permittivity = r
                    .permittivity
                    .clone()
                    .ok_or_else(|| RenrtlError::missing(name, "permittivity"))?;
                permittivity.validate(name)?;
                parameters.permittivity.push(permittivity);
                parameters.density.push(
                    r.density
                        .clone()
                        .ok_or_else(|| RenrtlError::missing(name, "density"))?,
                );
                continue;
            }

            if r.charge > 0 {
                parameters.cations.push(i);
            } else {
                parameters.anions.push(i);
            }
            parameters.ions.push(i);
            parameters.ionic_radius[i] =
                required(&r.ionic_radius, ParameterUnit::Angstrom, name, "ionic_radius")?;
            parameters.partial_molar_volume[i] = required(
                &r.partial_molar_volume,
                ParameterUnit::CubicCentimeterPerMole,
                name,
                "partial_vol_mol",
            )?;
            parameters.hydration_number[i] = required(
                &r.hydration_number,
                ParameterUnit::Dimensionless,
                name,
                "hydration_number",
            )?;
            if hydration_model == HydrationModel::StepwiseHydration {
                parameters.min_hydration_number[i] = required(
                    &r.min_hydration_number,
                    ParameterUnit::Dimensionless,
                    name,
                    "min_hydration_number",
                )?;
                parameters.number_sites[i] = required(
                    &r.number_sites,
                    ParameterUnit::Dimensionless,
                    name,
                    "number_sites",
                )?;
            }
        }

        if parameters.solvents.len() != 1 {
            return Err(RenrtlError::IncompatibleParameters(format!(
                "exactly one solvent is required, {} were given",
                parameters.solvents.len()
            )));
        }
        if parameters.cations.is_empty() || parameters.anions.is_empty() {
            return Err(RenrtlError::IncompatibleParameters(
                "at least one cation and one anion are required".into(),
            ));
        }

        for record in electrolyte_records.iter() {
            let electrolyte = parameters.electrolyte(record)?;
            parameters.electrolytes.push(electrolyte);
        }
        if parameters.electrolytes.is_empty() {
            return Err(RenrtlError::IncompatibleParameters(
                "no electrolyte dissociates into the given ions".into(),
            ));
        }

        parameters.pure_records = pure_records;
        parameters.electrolyte_records = electrolyte_records;
        Ok(parameters)
    }

    fn electrolyte(&self, record: &ElectrolyteRecord) -> RenrtlResult<Electrolyte> {
        let name = record.name.as_str();
        let mut cation = None;
        let mut anion = None;
        for (ion, &nu) in record.dissociation.iter() {
            let i = self.index_of(ion)?;
            if nu <= 0.0 {
                return Err(RenrtlError::IncompatibleParameters(format!(
                    "the stoichiometric coefficient of {ion} in {name} has to be positive"
                )));
            }
            let slot = if self.is_cation(i) {
                &mut cation
            } else if self.is_anion(i) {
                &mut anion
            } else {
                return Err(RenrtlError::IncompatibleParameters(format!(
                    "{name} dissociates into the solvent {ion}"
                )));
            };
            if slot.replace((i, nu)).is_some() {
                return Err(RenrtlError::IncompatibleParameters(format!(
                    "{name} has to dissociate into exactly one cation and one anion"
                )));
            }
        }
        let ((c, nu_c), (a, nu_a)) = cation.zip(anion).ok_or_else(|| {
            RenrtlError::IncompatibleParameters(format!(
                "{name} has to dissociate into exactly one cation and one anion"
            ))
        })?;

        let (zc, za) = (self.charge[c], self.charge[a]);
        if (nu_c * zc as f64 + nu_a * za as f64).abs() > 1e-12 {
            return Err(RenrtlError::IncompatibleParameters(format!(
                "the dissociation of {name} is not electroneutral"
            )));
        }
        let beta = beta(zc.unsigned_abs(), za.unsigned_abs())?;
        let hydration_constant = required(
            &record.hydration_constant,
            ParameterUnit::Dimensionless,
            name,
            "hydration_constant",
        )?;

        // the average hydration number enters only if it is positive
        let hydration = (self.hydration_number[c] + self.hydration_number[a]) * 0.5;
        let shell = hydration.max(0.0) * (beta * SOLVENT_DISTANCE).powi(3);
        let closest_approach = [c, a]
            .iter()
            .map(|&i| (shell + self.ionic_radius[i].powi(3)).cbrt())
            .sum::<f64>()
            * 1e-10;

        Ok(Electrolyte {
            name: name.into(),
            cation: c,
            anion: a,
            nu_cation: nu_c,
            nu_anion: nu_a,
            hydration_constant,
            beta,
            closest_approach,
        })
    }

    /// Read the parameters of the given species from json files.
    ///
    /// All electrolytes in `electrolyte_path` whose ions are among the
    /// `substances` are used.
    pub fn from_json<P, S>(
        substances: &[S],
        pure_path: P,
        electrolyte_path: P,
        binary_path: Option<P>,
        identifier_option: IdentifierOption,
        hydration_model: HydrationModel,
    ) -> RenrtlResult<Self>
    where
        P: AsRef<Path>,
        S: Deref<Target = str>,
    {
        let pure_records = PureRecord::from_json(substances, pure_path, identifier_option)?;
        let names: HashSet<_> = pure_records
            .iter()
            .map(|r| r.identifier.name.clone())
            .collect();
        let electrolyte_records = ElectrolyteRecord::from_json(electrolyte_path)?
            .into_iter()
            .filter(|e| e.dissociation.keys().all(|ion| names.contains(ion)))
            .collect();
        let binary_records = match binary_path {
            Some(path) => BinaryRecord::from_json(path)?
                .into_iter()
                .filter(|br: &BinaryRecord<NrtlBinaryRecord>| {
                    [&br.id1, &br.id2]
                        .iter()
                        .all(|id| id.split(',').all(|s| names.contains(s.trim())))
                })
                .collect(),
            None => Vec::new(),
        };
        Self::from_records(
            pure_records,
            electrolyte_records,
            binary_records,
            hydration_model,
        )
    }

    /// Number of true species.
    pub fn components(&self) -> usize {
        self.identifiers.len()
    }

    /// Index of the species with the given name.
    pub fn index_of(&self, name: &str) -> RenrtlResult<usize> {
        self.identifiers
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| RenrtlError::ComponentsNotFound(name.into()))
    }

    pub fn name(&self, i: usize) -> &str {
        &self.identifiers[i].name
    }

    pub fn is_cation(&self, i: usize) -> bool {
        self.charge[i] > 0
    }

    pub fn is_anion(&self, i: usize) -> bool {
        self.charge[i] < 0
    }

    pub fn is_molecule(&self, i: usize) -> bool {
        self.charge[i] == 0
    }

    /// Absolute charge numbers, 1 for molecules.
    pub fn charge_weights(&self) -> Vec<f64> {
        self.charge
            .iter()
            .map(|&z| if z == 0 { 1.0 } else { z.unsigned_abs() as f64 })
            .collect()
    }

    /// The only solvent of the solution.
    pub fn solvent(&self) -> usize {
        self.solvents[0]
    }
}

impl fmt::Display for RenrtlParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RenrtlParameters({})", self.hydration_model)?;
        for r in self.pure_records.iter() {
            writeln!(f, "  {r}")?;
        }
        for (r, e) in self.electrolyte_records.iter().zip(&self.electrolytes) {
            writeln!(f, "  {r}, beta={}", e.beta)?;
        }
        for r in self.binary_records.iter() {
            writeln!(f, "  {r}")?;
        }
        Ok(())
    }
}
