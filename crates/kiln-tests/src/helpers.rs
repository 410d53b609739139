//! Shared helpers for the integration and property tests.

use std::sync::{Arc, LazyLock};

use kiln_core::material::Material;
use kiln_core::nuclide::{CompMap, Nuclide};
use kiln_core::params::SimParams;
use kiln_core::recipe::Basis;
use kiln_decay::{BatemanSolver, DecayData, DecayMatrix};

/// The decay datafile shipped with kiln-decay.
pub const DECAY_DAT: &str = include_str!("../../kiln-decay/data/decay.dat");

static SOLVER: LazyLock<Arc<BatemanSolver>> = LazyLock::new(|| {
    let data = DecayData::from_reader(DECAY_DAT.as_bytes()).expect("shipped decay data parses");
    Arc::new(BatemanSolver::new(Arc::new(DecayMatrix::from_data(&data))))
});

/// Solver over the shipped decay data, built once per test binary.
pub fn shipped_solver() -> Arc<BatemanSolver> {
    SOLVER.clone()
}

/// Parse a nuclide spelling, panicking on typos in test data.
pub fn nuc(text: &str) -> Nuclide {
    Nuclide::parse(text).expect("test nuclide spelling")
}

/// A mass-basis material from `(spelling, mass_fraction)` pairs.
pub fn material_of(entries: &[(&str, f64)], total_kg: f64) -> Material {
    let mut comp = CompMap::new();
    for &(text, frac) in entries {
        comp.insert(nuc(text), frac);
    }
    Material::new(&comp, "kg", "test", total_kg, Basis::Mass, SimParams::default())
        .expect("test composition is well-formed")
}

/// Natural uranium at the conventional 0.720 wt% enrichment.
pub fn natural_uranium(total_kg: f64) -> Material {
    material_of(&[("U-235", 0.00720), ("U-238", 0.99280)], total_kg)
}
