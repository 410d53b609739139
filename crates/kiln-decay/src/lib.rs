//! # kiln-decay — Bateman decay engine.
//!
//! Evolves isotopic compositions forward in time under chained radioactive
//! decay, `dv/dt = A·v`:
//! - **[`DecayData`]** loads the parent → daughters database from the
//!   line-oriented decay datafile and rescales half-lives into per-month
//!   decay constants.
//! - **[`DecayMatrix`]** assembles the sparse decay-transition operator `A`
//!   (diagonal `-λ`, off-diagonal `+b·λ`), immutable once built.
//! - **[`BatemanSolver`]** computes `exp(A·t)·v` by Padé(6,6) scaling and
//!   squaring on the reachable-support submatrix, and implements the
//!   kiln-core [`DecayDynamics`](kiln_core::traits::DecayDynamics) seam.
//!
//! [`DecayData`]: chains::DecayData
//! [`DecayMatrix`]: matrix::DecayMatrix
//! [`BatemanSolver`]: solver::BatemanSolver

pub mod chains;
pub mod matrix;
pub mod solver;

pub use chains::DecayData;
pub use matrix::DecayMatrix;
pub use solver::{install_shared, shared, BatemanSolver};
