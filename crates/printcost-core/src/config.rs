use std::fs;
use std::path::Path;

use printcost_parser::PrinterFamily;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_F370_FLAT_FEE: f64 = 16.25;
pub const DEFAULT_J826_FLAT_FEE: f64 = 7.22;

/// Fixed per-job service charge for each printer family.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatFees {
    pub f370: f64,
    pub j826: f64,
}

impl Default for FlatFees {
    fn default() -> Self {
        Self {
            f370: DEFAULT_F370_FLAT_FEE,
            j826: DEFAULT_J826_FLAT_FEE,
        }
    }
}

impl FlatFees {
    pub fn for_family(&self, family: PrinterFamily) -> f64 {
        match family {
            PrinterFamily::F370 => self.f370,
            PrinterFamily::J826 => self.j826,
        }
    }
}

/// Billing settings read from an optional TOML file:
///
/// ```toml
/// [flat_fees]
/// f370 = 16.25
/// j826 = 7.22
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BillingConfig {
    pub flat_fees: FlatFees,
}

impl BillingConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str::<BillingConfig>(toml_str)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
