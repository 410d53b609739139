//! Error types for the kiln kernel.
use thiserror::Error;

use crate::nuclide::Nuclide;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NuclideError {
    #[error("invalid nuclide id: {0}")] InvalidId(u32),
    #[error("unparseable nuclide: {0:?}")] Unparseable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    #[error("duplicate parent {nuclide} at line {line}")] DuplicateParent { nuclide: Nuclide, line: usize },
    #[error("branch ratios for {parent} sum to {sum} at line {line}")] BranchSumInvalid { parent: Nuclide, sum: f64, line: usize },
    #[error("malformed decay record at line {line}: {reason}")] Malformed { line: usize, reason: String },
    #[error("bad nuclide at line {line}: {source}")] BadNuclide { line: usize, source: NuclideError },
    #[error("decay data unreadable: {0}")] Io(String),
    #[error("solver produced {atoms} atoms of {nuclide}")] NonPhysical { nuclide: Nuclide, atoms: f64 },
    #[error("negative decay duration: {months} months")] NegativeDuration { months: f64 },
    #[error("decay operator is degenerate")] Degenerate,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("unit mismatch: {mine:?} vs {theirs:?}")] UnitMismatch { mine: String, theirs: String },
    #[error("insufficient inventory of {nuclide}: have {have} atoms, need {need}")] InsufficientInventory { nuclide: Nuclide, have: f64, need: f64 },
    #[error("insufficient mass: have {have} kg, need {need} kg")] InsufficientMass { have: f64, need: f64 },
    #[error("operation leaves {atoms} atoms of {nuclide}")] ConservationViolated { nuclide: Nuclide, atoms: f64 },
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Nuclide(#[from] NuclideError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KilnError {
    #[error(transparent)] Nuclide(#[from] NuclideError),
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Material(#[from] MaterialError),
}
