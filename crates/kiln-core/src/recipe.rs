//! Recipe input records.
//!
//! A recipe is the structured shape the upstream scenario loader hands to the
//! kernel: a named composition with a basis flag and an overall size. The
//! loader itself (XML/JSON/YAML) is out of scope; this module only defines the
//! serde-ready record and the conversion into a composition map.

use serde::{Deserialize, Serialize};

use crate::error::NuclideError;
use crate::nuclide::{CompMap, Nuclide};

/// Whether a recipe's abundances and total are atom counts or masses.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Abundances are masses; `total` is kilograms.
    #[default]
    Mass,
    /// Abundances are atom counts; `total` is atoms.
    Atom,
}

/// One nuclide line of a recipe. The id may use any accepted spelling
/// (canonical integer, legacy `ZZAAA`, or symbolic like `"U-235"`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipeNuclide {
    pub id: String,
    pub comp: f64,
}

/// A named material recipe as delivered by the scenario loader.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub basis: Basis,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_total")]
    pub total: f64,
    pub nuclides: Vec<RecipeNuclide>,
}

fn default_units() -> String {
    "kg".to_string()
}

fn default_total() -> f64 {
    1.0
}

impl Recipe {
    /// Parse every nuclide id and return the raw (unnormalized) composition
    /// map. Later ids override earlier duplicates.
    pub fn comp_map(&self) -> Result<CompMap, NuclideError> {
        let mut map = CompMap::new();
        for entry in &self.nuclides {
            map.insert(Nuclide::parse(&entry.id)?, entry.comp);
        }
        Ok(map)
    }
}
