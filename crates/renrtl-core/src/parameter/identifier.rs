use serde::{Deserialize, Serialize};
use std::fmt;

/// Possible variants to identify a species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierOption {
    #[default]
    Name,
    Cas,
    Formula,
}

impl fmt::Display for IdentifierOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            IdentifierOption::Name => "name",
            IdentifierOption::Cas => "CAS",
            IdentifierOption::Formula => "formula",
        };
        write!(f, "{str}")
    }
}

/// Identifiers of a solvent or an ion.
///
/// Ions are identified by names that include their charge, e.g. `Na+` or
/// `SO4-2`. The name is also used to refer to a species in dissociation
/// maps and binary records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Name of the species
    pub name: String,
    /// CAS number
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    /// Chemical formula
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Identifier {
    pub fn new(name: &str, cas: Option<&str>, formula: Option<&str>) -> Self {
        Self {
            name: name.into(),
            cas: cas.map(Into::into),
            formula: formula.map(Into::into),
        }
    }

    pub fn as_str(&self, option: IdentifierOption) -> Option<&str> {
        match option {
            IdentifierOption::Name => Some(&self.name),
            IdentifierOption::Cas => self.cas.as_deref(),
            IdentifierOption::Formula => self.formula.as_deref(),
        }
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name, None, None)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier(name={}", self.name)?;
        if let Some(cas) = &self.cas {
            write!(f, ", cas={cas}")?;
        }
        if let Some(formula) = &self.formula {
            write!(f, ", formula={formula}")?;
        }
        write!(f, ")")
    }
}
