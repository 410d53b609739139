//! Trait interfaces for the kiln kernel.
//!
//! These traits define the contracts between crates:
//! - [`DecayDynamics`] — time evolution of a composition (kiln-decay implements)
//! - [`InventoryRecorder`] — outbound mutation events (the host's recording
//!   backend implements; optional)

use crate::error::DecayError;
use crate::nuclide::CompMap;

/// Time evolution of an atom-count composition under radioactive decay.
///
/// Implementations own the decay data; materials only hand over their atom
/// map and a duration. Nuclides the implementation does not track must pass
/// through unchanged, and `evolve(v, 0)` must return `v` exactly.
pub trait DecayDynamics: Send + Sync {
    /// Evolve `atoms` forward by `months` and return the new composition.
    ///
    /// `months` must be non-negative. The returned map never holds more total
    /// atoms than the input beyond numerical noise.
    fn evolve(&self, atoms: &CompMap, months: f64) -> Result<CompMap, DecayError>;
}

/// Snapshot emitted after each material mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventorySnapshot {
    /// Serial id of the mutated material.
    pub serial: u64,
    /// Material timestamp in months at the time of the mutation.
    pub time: f64,
    /// Total mass in kg after the mutation.
    pub total_mass_kg: f64,
    /// Total atom count after the mutation.
    pub total_atoms: f64,
}

/// Sink for material mutation events.
///
/// Materials with a recorder installed emit one snapshot per mutation; with
/// none installed, mutations proceed silently. Implemented by the host's
/// recording backend (out of scope here).
pub trait InventoryRecorder: Send + Sync {
    /// Accept one mutation snapshot.
    fn record(&self, snapshot: InventorySnapshot);
}
