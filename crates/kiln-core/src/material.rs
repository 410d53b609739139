//! The isotopic material object.
//!
//! A [`Material`] tracks the composition of a quantity of nuclear material
//! with dual accounting: the canonical store is atom counts per nuclide, and
//! masses are derived from the registry on every query, so the two views can
//! never drift apart. Cached totals are refreshed after each mutation by
//! `rationalize`, which also drops entries below the mass-conservation
//! tolerance.
//!
//! Materials are exclusively owned and not safe for concurrent mutation.
//! `absorb` moves inventory between materials, leaving the donor empty but
//! valid. Time evolution is delegated to an injected [`DecayDynamics`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{DecayError, MaterialError};
use crate::nuclide::{CompMap, Nuclide};
use crate::params::SimParams;
use crate::recipe::{Basis, Recipe};
use crate::registry;
use crate::traits::{DecayDynamics, InventoryRecorder, InventorySnapshot};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Normalize a composition map to unit sum.
///
/// Divides by the larger of the map's sum and `eps`, so an empty (or
/// effectively empty) map normalizes to itself instead of dividing by zero.
pub fn normalize(map: &CompMap, eps: f64) -> CompMap {
    let sum: f64 = map.values().sum();
    let denom = sum.max(eps);
    map.iter().map(|(&n, &q)| (n, q / denom)).collect()
}

/// A quantity of nuclear material with atom/mass dual accounting.
#[derive(Clone)]
pub struct Material {
    serial: u64,
    name: String,
    units: String,
    /// Canonical basis: atom count per nuclide.
    atoms: CompMap,
    total_atoms: f64,
    total_mass_kg: f64,
    /// Months; timestamp of the latest mutation.
    last_update: f64,
    params: SimParams,
    recorder: Option<Arc<dyn InventoryRecorder>>,
}

impl Material {
    /// An empty material with default labels.
    pub fn empty(params: SimParams) -> Self {
        Self {
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            name: String::new(),
            units: "kg".to_string(),
            atoms: CompMap::new(),
            total_atoms: 0.0,
            total_mass_kg: 0.0,
            last_update: 0.0,
            params,
            recorder: None,
        }
    }

    /// Build a material from a composition map.
    ///
    /// The map is normalized to unit sum and scaled: with [`Basis::Mass`] the
    /// entries and `scale` are kilograms, with [`Basis::Atom`] they are atom
    /// counts. Negative abundances are rejected.
    pub fn new(
        comp: &CompMap,
        units: &str,
        name: &str,
        scale: f64,
        basis: Basis,
        params: SimParams,
    ) -> Result<Self, MaterialError> {
        for (&nuclide, &value) in comp {
            if value < 0.0 {
                return Err(MaterialError::ConservationViolated { nuclide, atoms: value });
            }
        }

        let normalized = normalize(comp, params.eps_kg);
        let atoms: CompMap = normalized
            .iter()
            .map(|(&n, &frac)| {
                let count = match basis {
                    Basis::Mass => registry::atoms_of_kg(n, frac * scale),
                    Basis::Atom => frac * scale,
                };
                (n, count)
            })
            .collect();

        let mut material = Self {
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            units: units.to_string(),
            atoms,
            total_atoms: 0.0,
            total_mass_kg: 0.0,
            last_update: 0.0,
            params,
            recorder: None,
        };
        material.rationalize();
        Ok(material)
    }

    /// Build a material from an upstream recipe record.
    pub fn from_recipe(recipe: &Recipe, params: SimParams) -> Result<Self, MaterialError> {
        let comp = recipe.comp_map()?;
        Self::new(&comp, &recipe.units, &recipe.name, recipe.total, recipe.basis, params)
    }

    // --- queries ---

    /// Process-unique serial id.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Recipe name this material was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit label; `absorb`/`extract` partners must match it.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Timestamp of the latest mutation, in months.
    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Total mass in kilograms.
    pub fn total_mass_kg(&self) -> f64 {
        self.total_mass_kg
    }

    /// Total atom count.
    pub fn total_atoms(&self) -> f64 {
        self.total_atoms
    }

    /// Atom count of one nuclide; zero if absent.
    pub fn atoms_of(&self, nuclide: Nuclide) -> f64 {
        self.atoms.get(&nuclide).copied().unwrap_or(0.0)
    }

    /// Mass in kg of one nuclide; zero if absent.
    pub fn mass_of(&self, nuclide: Nuclide) -> f64 {
        registry::mass_kg(nuclide, self.atoms_of(nuclide))
    }

    /// Mass in kg of every isotope of element `z` combined.
    pub fn element_mass(&self, z: u32) -> f64 {
        self.atoms
            .iter()
            .filter(|(n, _)| n.z() == z)
            .map(|(&n, &q)| registry::mass_kg(n, q))
            .sum()
    }

    /// The atom map scaled to the given fraction of this material.
    ///
    /// Stoichiometry is held constant, so the fraction reads equally as a
    /// mass or an atom fraction. `frac` is expected in `[0, 1]`.
    pub fn frac_comp(&self, frac: f64) -> CompMap {
        self.atoms.iter().map(|(&n, &q)| (n, q * frac)).collect()
    }

    /// Unit-sum atom fractions.
    pub fn normalized(&self) -> CompMap {
        normalize(&self.atoms, self.params.eps_kg)
    }

    /// The raw atom map.
    pub fn comp(&self) -> &CompMap {
        &self.atoms
    }

    /// True when the totals sit below the conservation tolerance.
    pub fn is_empty(&self) -> bool {
        self.total_mass_kg < self.params.eps_kg
    }

    // --- mutations ---

    /// Install the outbound recorder; subsequent mutations emit snapshots.
    pub fn set_recorder(&mut self, recorder: Arc<dyn InventoryRecorder>) {
        self.recorder = Some(recorder);
    }

    /// Adjust the atom count of one nuclide by `delta_atoms` at `time`.
    ///
    /// A negative delta that would leave the entry below `-eps` in
    /// mass-equivalent terms fails with `ConservationViolated` and leaves the
    /// material untouched; within tolerance the entry clamps to zero.
    pub fn change(
        &mut self,
        nuclide: Nuclide,
        delta_atoms: f64,
        time: f64,
    ) -> Result<(), MaterialError> {
        let have = self.atoms_of(nuclide);
        let next = have + delta_atoms;
        if next < 0.0 && registry::mass_kg(nuclide, -next) > self.params.eps_kg {
            return Err(MaterialError::ConservationViolated { nuclide, atoms: next });
        }
        if next > 0.0 {
            self.atoms.insert(nuclide, next);
        } else {
            self.atoms.remove(&nuclide);
        }
        self.last_update = time;
        self.rationalize();
        self.emit();
        Ok(())
    }

    /// Move the entire inventory of `other` into `self`.
    ///
    /// `other` is left empty but valid. Unit labels must match.
    pub fn absorb(&mut self, other: &mut Material) -> Result<(), MaterialError> {
        if self.units != other.units {
            return Err(MaterialError::UnitMismatch {
                mine: self.units.clone(),
                theirs: other.units.clone(),
            });
        }
        for (&nuclide, &count) in &other.atoms {
            *self.atoms.entry(nuclide).or_insert(0.0) += count;
        }
        other.atoms.clear();
        other.rationalize();
        other.emit();

        self.last_update = self.last_update.max(other.last_update);
        self.rationalize();
        self.emit();
        Ok(())
    }

    /// Subtract the composition of `other` from `self`.
    ///
    /// Every nuclide in `other` must be present with at least the requested
    /// atoms, up to the conservation tolerance; otherwise nothing is removed
    /// and `InsufficientInventory` names the shortfall.
    pub fn extract(&mut self, other: &Material) -> Result<(), MaterialError> {
        if self.units != other.units {
            return Err(MaterialError::UnitMismatch {
                mine: self.units.clone(),
                theirs: other.units.clone(),
            });
        }
        for (&nuclide, &need) in &other.atoms {
            let have = self.atoms_of(nuclide);
            let deficit = need - have;
            if deficit > 0.0 && registry::mass_kg(nuclide, deficit) > self.params.eps_kg {
                return Err(MaterialError::InsufficientInventory { nuclide, have, need });
            }
        }
        for (&nuclide, &need) in &other.atoms {
            let next = self.atoms_of(nuclide) - need;
            if next > 0.0 {
                self.atoms.insert(nuclide, next);
            } else {
                self.atoms.remove(&nuclide);
            }
        }
        self.rationalize();
        self.emit();
        Ok(())
    }

    /// Split off `kg` kilograms with the same normalized composition.
    ///
    /// Returns a fresh owned material; `self` is decremented in place. The
    /// offspring inherits the unit label, name, and recorder handle.
    pub fn extract_mass(&mut self, kg: f64) -> Result<Material, MaterialError> {
        if kg > self.total_mass_kg + self.params.eps_kg {
            return Err(MaterialError::InsufficientMass {
                have: self.total_mass_kg,
                need: kg,
            });
        }
        let frac = if self.total_mass_kg > self.params.eps_kg {
            (kg / self.total_mass_kg).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut child = Material {
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            name: self.name.clone(),
            units: self.units.clone(),
            atoms: self.frac_comp(frac),
            total_atoms: 0.0,
            total_mass_kg: 0.0,
            last_update: self.last_update,
            params: self.params,
            recorder: self.recorder.clone(),
        };
        for count in self.atoms.values_mut() {
            *count *= 1.0 - frac;
        }

        child.rationalize();
        child.emit();
        self.rationalize();
        self.emit();
        Ok(child)
    }

    /// Decay this material forward by `months`.
    pub fn decay(
        &mut self,
        months: f64,
        dynamics: &dyn DecayDynamics,
    ) -> Result<(), MaterialError> {
        if months < 0.0 {
            return Err(DecayError::NegativeDuration { months }.into());
        }
        self.atoms = dynamics.evolve(&self.atoms, months)?;
        self.last_update += months;
        self.rationalize();
        self.emit();
        Ok(())
    }

    /// Decay this material up to the absolute timestamp `now` (months),
    /// covering whatever has elapsed since the last mutation.
    pub fn decay_to(
        &mut self,
        now: f64,
        dynamics: &dyn DecayDynamics,
    ) -> Result<(), MaterialError> {
        self.decay(now - self.last_update, dynamics)
    }

    // --- internals ---

    /// Re-derive the cached totals from the canonical atom map, dropping
    /// entries whose mass-equivalent sits below the tolerance.
    fn rationalize(&mut self) {
        let eps = self.params.eps_kg;
        self.atoms.retain(|&n, q| registry::mass_kg(n, *q) >= eps);
        self.total_atoms = self.atoms.values().sum();
        self.total_mass_kg = self
            .atoms
            .iter()
            .map(|(&n, &q)| registry::mass_kg(n, q))
            .sum();
    }

    fn emit(&self) {
        if let Some(recorder) = &self.recorder {
            recorder.record(InventorySnapshot {
                serial: self.serial,
                time: self.last_update,
                total_mass_kg: self.total_mass_kg,
                total_atoms: self.total_atoms,
            });
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("serial", &self.serial)
            .field("name", &self.name)
            .field("units", &self.units)
            .field("total_mass_kg", &self.total_mass_kg)
            .field("total_atoms", &self.total_atoms)
            .field("nuclides", &self.atoms.len())
            .finish()
    }
}
