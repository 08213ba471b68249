use super::{Identifier, IdentifierOption};
use crate::errors::{RenrtlError, RenrtlResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::Deref;
use std::path::Path;

/// A collection of parameters of a pure species.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PureRecord<M> {
    pub identifier: Identifier,
    /// Molar weight in units of g/mol
    #[serde(default)]
    pub molarweight: f64,
    #[serde(flatten)]
    pub model_record: M,
}

impl<M> PureRecord<M> {
    /// Create a new `PureRecord`.
    pub fn new(identifier: Identifier, molarweight: f64, model_record: M) -> Self {
        Self {
            identifier,
            molarweight,
            model_record,
        }
    }

    /// Create pure species parameters from a json file.
    ///
    /// The records are returned in the order of `substances`.
    pub fn from_json<P, S>(
        substances: &[S],
        file: P,
        identifier_option: IdentifierOption,
    ) -> RenrtlResult<Vec<Self>>
    where
        P: AsRef<Path>,
        S: Deref<Target = str>,
        M: DeserializeOwned,
    {
        let mut queried: HashSet<&str> = substances.iter().map(|s| s.deref()).collect();
        if queried.len() != substances.len() {
            return Err(RenrtlError::IncompatibleParameters(
                "A species was defined more than once.".to_string(),
            ));
        }

        let reader = BufReader::new(File::open(file)?);
        let file_records: Vec<Self> = serde_json::from_reader(reader)?;
        let mut records: HashMap<&str, Self> = HashMap::with_capacity(substances.len());

        // build map, draining the queried species in the process
        for record in file_records {
            if let Some(id) = record.identifier.as_str(identifier_option) {
                if let Some(id) = queried.take(id) {
                    records.insert(id, record);
                }
            }
            if queried.is_empty() {
                break;
            }
        }

        if !queried.is_empty() {
            let mut missing: Vec<_> = queried.into_iter().collect();
            missing.sort_unstable();
            return Err(RenrtlError::ComponentsNotFound(missing.join(", ")));
        };

        substances
            .iter()
            .map(|s| {
                records
                    .remove(s.deref())
                    .ok_or_else(|| RenrtlError::ComponentsNotFound(s.to_string()))
            })
            .collect()
    }
}

impl<M: Serialize> fmt::Display for PureRecord<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(&self.model_record).map_err(|_| fmt::Error)?;
        let s = s.replace('"', "").replace(',', ", ").replace(':', ": ");
        write!(
            f,
            "PureRecord(name={}, molarweight={}",
            self.identifier.name, self.molarweight
        )?;
        if s.len() > 2 {
            write!(f, ", {}", &s[1..s.len() - 1])?;
        }
        write!(f, ")")
    }
}

/// A collection of parameters that model interactions between two species.
///
/// The identifiers refer to species names or to ion pairs written as
/// `"cation, anion"`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BinaryRecord<B> {
    /// Identifier of the first species
    pub id1: String,
    /// Identifier of the second species
    pub id2: String,
    /// Binary interaction parameter(s)
    #[serde(flatten)]
    pub model_record: B,
}

impl<B> BinaryRecord<B> {
    /// Crates a new `BinaryRecord`.
    pub fn new(id1: &str, id2: &str, model_record: B) -> Self {
        Self {
            id1: id1.into(),
            id2: id2.into(),
            model_record,
        }
    }

    /// Read a list of `BinaryRecord`s from a json file.
    pub fn from_json<P: AsRef<Path>>(file: P) -> RenrtlResult<Vec<Self>>
    where
        B: DeserializeOwned,
    {
        Ok(serde_json::from_reader(BufReader::new(File::open(file)?))?)
    }
}

impl<B: Serialize> fmt::Display for BinaryRecord<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        let s = s.replace('"', "").replace(',', ", ").replace(':', ": ");
        write!(f, "BinaryRecord({})", &s[1..s.len() - 1])
    }
}
