//! # kiln-core
//! Foundation types for the kiln fuel-cycle simulation kernel.
//!
//! This crate owns the pieces every other crate builds on: the nuclide
//! identifier codec, the builtin atomic-mass registry, the simulation-wide
//! tolerances, the error taxonomy, the trait seams toward the decay engine
//! and the recording backend, and [`Material`] — the isotopic composition
//! object with dual atom/mass accounting.
//!
//! [`Material`]: material::Material

pub mod constants;
pub mod error;
pub mod material;
pub mod nuclide;
pub mod params;
pub mod recipe;
pub mod registry;
pub mod traits;
