//! Matrix-exponential decay solver.
//!
//! [`BatemanSolver`] computes `v' = exp(A·t)·v` for the decay-transition
//! operator `A` and an atom-count composition `v`. The full operator spans
//! every nuclide in the database, but each call only densifies the reachable
//! support of its input — the nuclides present in `v` plus everything their
//! decay chains can feed — so the dense work stays proportional to the
//! composition, not the database.
//!
//! The dense block is exponentiated by scaling and squaring with an order
//! (6,6) Padé approximant: one LU solve, then `s` squarings where
//! `s = max(0, ⌈log₂‖Â·t‖∞⌉)`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use kiln_core::error::DecayError;
use kiln_core::nuclide::CompMap;
use kiln_core::params::SimParams;
use kiln_core::registry;
use kiln_core::traits::DecayDynamics;

use crate::matrix::DecayMatrix;

/// Padé (6,6) numerator coefficients; the denominator reuses them with
/// alternating signs via the even/odd split.
const PADE: [f64; 7] = [
    1.0,
    1.0 / 2.0,
    5.0 / 44.0,
    1.0 / 66.0,
    1.0 / 792.0,
    1.0 / 15_840.0,
    1.0 / 665_280.0,
];

/// Bateman-equation solver over a fixed decay matrix.
#[derive(Debug, Clone)]
pub struct BatemanSolver {
    matrix: Arc<DecayMatrix>,
    eps_kg: f64,
}

impl BatemanSolver {
    /// Wrap a decay matrix with the default conservation tolerance.
    pub fn new(matrix: Arc<DecayMatrix>) -> Self {
        Self::with_params(matrix, SimParams::default())
    }

    /// Wrap a decay matrix using the host simulator's tolerances.
    pub fn with_params(matrix: Arc<DecayMatrix>, params: SimParams) -> Self {
        Self { matrix, eps_kg: params.eps_kg }
    }

    /// The decay operator this solver evolves with.
    pub fn matrix(&self) -> &DecayMatrix {
        &self.matrix
    }

    /// Dense `exp(M)` of the scaled block via Padé (6,6).
    fn pade_exp(m: &DMatrix<f64>) -> Result<DMatrix<f64>, DecayError> {
        let dim = m.nrows();
        let ident = DMatrix::identity(dim, dim);
        let m2 = m * m;
        let m4 = &m2 * &m2;

        let odd = m * (ident.scale(PADE[1]) + m2.scale(PADE[3]) + m4.scale(PADE[5]));
        let even =
            ident.scale(PADE[0]) + m2.scale(PADE[2]) + m4.scale(PADE[4]) + (&m2 * &m4).scale(PADE[6]);

        let numerator = &even + &odd;
        let denominator = even - odd;
        denominator
            .lu()
            .solve(&numerator)
            .ok_or(DecayError::Degenerate)
    }
}

impl DecayDynamics for BatemanSolver {
    fn evolve(&self, atoms: &CompMap, months: f64) -> Result<CompMap, DecayError> {
        if months < 0.0 {
            return Err(DecayError::NegativeDuration { months });
        }
        if months == 0.0 {
            return Ok(atoms.clone());
        }

        // Nuclides outside the database are stable: pass through untouched.
        let mut out = CompMap::new();
        let mut seeds: Vec<usize> = Vec::new();
        let mut seed_counts: Vec<(usize, f64)> = Vec::new();
        for (&nuclide, &count) in atoms {
            match self.matrix.row_of(nuclide) {
                Some(row) if count != 0.0 => {
                    seeds.push(row);
                    seed_counts.push((row, count));
                }
                _ => {
                    out.insert(nuclide, count);
                }
            }
        }
        if seeds.is_empty() {
            return Ok(out);
        }

        let support = self.matrix.reachable_support(&seeds);
        let local: HashMap<usize, usize> =
            support.iter().enumerate().map(|(l, &g)| (g, l)).collect();
        let dim = support.len();

        let mut block = DMatrix::<f64>::zeros(dim, dim);
        for (l_col, &g_col) in support.iter().enumerate() {
            for &(g_row, value) in self.matrix.column(g_col) {
                block[(local[&g_row], l_col)] += value;
            }
        }
        let mut vector = DVector::<f64>::zeros(dim);
        for &(g_row, count) in &seed_counts {
            vector[local[&g_row]] += count;
        }

        let scaled_op = block.scale(months);
        let norm = inf_norm(&scaled_op);
        let squarings = if norm > 1.0 { norm.log2().ceil() as u32 } else { 0 };
        let step = scaled_op.scale(0.5_f64.powi(squarings as i32));

        let mut exponential = Self::pade_exp(&step)?;
        for _ in 0..squarings {
            exponential = &exponential * &exponential;
        }
        let evolved = exponential * vector;

        for (l_row, &g_row) in support.iter().enumerate() {
            let count = evolved[l_row];
            let nuclide = self.matrix.nuclide_at(g_row);
            if count < 0.0 {
                if registry::mass_kg(nuclide, -count) > self.eps_kg {
                    return Err(DecayError::NonPhysical { nuclide, atoms: count });
                }
                continue;
            }
            if count > 0.0 {
                out.insert(nuclide, count);
            }
        }
        Ok(out)
    }
}

/// Maximum absolute row sum.
fn inf_norm(m: &DMatrix<f64>) -> f64 {
    (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)].abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

static SHARED: OnceLock<Arc<BatemanSolver>> = OnceLock::new();

/// Install the process-wide solver, once.
///
/// The first call wins; later calls are no-ops that log a warning and return
/// the already-installed handle. Prefer passing solvers explicitly — this
/// exists for hosts that initialize decay data during bootstrap and read it
/// from many places afterwards.
pub fn install_shared(solver: BatemanSolver) -> Arc<BatemanSolver> {
    let handle = Arc::new(solver);
    match SHARED.set(handle.clone()) {
        Ok(()) => handle,
        Err(_) => {
            warn!("decay solver already installed; keeping the existing one");
            SHARED
                .get()
                .cloned()
                .expect("a failed set means the slot is occupied")
        }
    }
}

/// The installed process-wide solver, if any.
pub fn shared() -> Option<Arc<BatemanSolver>> {
    SHARED.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::DecayData;
    use approx::assert_relative_eq;
    use kiln_core::nuclide::Nuclide;

    fn nuc(text: &str) -> Nuclide {
        Nuclide::parse(text).unwrap()
    }

    fn solver_from(text: &str) -> BatemanSolver {
        let data = DecayData::from_reader(text.as_bytes()).unwrap();
        BatemanSolver::new(Arc::new(DecayMatrix::from_data(&data)))
    }

    /// Sr-90 -> Y-90 -> Zr-90 with a 345.58-month first half-life.
    fn strontium_solver() -> BatemanSolver {
        solver_from(
            "\
Sr-90 908798400 1
Y-90  1.0
Y-90  230400 1
Zr-90 1.0
",
        )
    }

    fn single(text: &str, count: f64) -> CompMap {
        let mut map = CompMap::new();
        map.insert(nuc(text), count);
        map
    }

    const SR90_HALF_LIFE_MONTHS: f64 = 908_798_400.0 / 2_629_800.0;

    // --- contracts ---

    #[test]
    fn zero_months_is_bitwise_identity() {
        let solver = strontium_solver();
        let comp = single("Sr-90", 1.0e24);
        let out = solver.evolve(&comp, 0.0).unwrap();
        assert_eq!(out, comp);
    }

    #[test]
    fn negative_months_rejected() {
        let solver = strontium_solver();
        let err = solver.evolve(&single("Sr-90", 1.0), -3.0).unwrap_err();
        assert!(matches!(err, DecayError::NegativeDuration { .. }));
    }

    #[test]
    fn untracked_nuclides_pass_through() {
        let solver = strontium_solver();
        let mut comp = single("Sr-90", 1.0e24);
        comp.insert(nuc("U-238"), 5.0e23);
        let out = solver.evolve(&comp, 100.0).unwrap();
        assert_eq!(out[&nuc("U-238")], 5.0e23);
        assert!(out[&nuc("Sr-90")] < 1.0e24);
    }

    #[test]
    fn atoms_never_increase() {
        let solver = strontium_solver();
        let comp = single("Sr-90", 1.0e24);
        for months in [0.5, 12.0, 345.58, 10_000.0] {
            let out = solver.evolve(&comp, months).unwrap();
            let total: f64 = out.values().sum();
            assert!(
                total <= 1.0e24 * (1.0 + 1e-12),
                "{months} months grew the total to {total}"
            );
        }
    }

    #[test]
    fn single_step_matches_analytic_exponential() {
        let solver = strontium_solver();
        let out = solver
            .evolve(&single("Sr-90", 1.0e24), SR90_HALF_LIFE_MONTHS)
            .unwrap();
        assert_relative_eq!(out[&nuc("Sr-90")], 0.5e24, max_relative = 1e-9);
    }

    #[test]
    fn chain_end_accumulates() {
        let solver = strontium_solver();
        // Ten first-stage half-lives: nearly everything lands on stable Zr-90
        // because Y-90's half-life is minutes on this scale.
        let out = solver
            .evolve(&single("Sr-90", 1.0e24), 10.0 * SR90_HALF_LIFE_MONTHS)
            .unwrap();
        let zr = out[&nuc("Zr-90")];
        assert_relative_eq!(zr, 1.0e24 * (1.0 - 0.5_f64.powi(10)), max_relative = 1e-6);
    }

    #[test]
    fn semigroup_property_holds() {
        let solver = strontium_solver();
        let comp = single("Sr-90", 1.0e24);
        let (t1, t2) = (123.4, 567.8);

        let step_once = solver.evolve(&comp, t1 + t2).unwrap();
        let step_twice = solver
            .evolve(&solver.evolve(&comp, t1).unwrap(), t2)
            .unwrap();

        for (nuclide, &count) in &step_once {
            let other = step_twice.get(nuclide).copied().unwrap_or(0.0);
            assert_relative_eq!(count, other, max_relative = 1e-9);
        }
    }

    #[test]
    fn branch_ratios_partition_the_daughters() {
        // Synthetic parent with a 0.7 / 0.3 split onto stable daughters.
        let solver = solver_from(
            "\
Cs-137 949252608 2
Ba-137 0.7
Ba-138 0.3
",
        );
        let mole = 6.022_140_76e23;
        let half_life_months = 949_252_608.0 / 2_629_800.0;
        let out = solver
            .evolve(&single("Cs-137", mole), half_life_months)
            .unwrap();

        assert_relative_eq!(out[&nuc("Cs-137")], 0.5 * mole, max_relative = 1e-6);
        let decayed = 0.5 * mole;
        assert_relative_eq!(out[&nuc("Ba-137")], 0.7 * decayed, max_relative = 1e-6);
        assert_relative_eq!(out[&nuc("Ba-138")], 0.3 * decayed, max_relative = 1e-6);
        let ratio = out[&nuc("Ba-137")] / out[&nuc("Ba-138")];
        assert_relative_eq!(ratio, 0.7 / 0.3, max_relative = 1e-6);
    }

    #[test]
    fn long_offsets_stay_stable() {
        let solver = strontium_solver();
        // A thousand years: Sr-90 is numerically extinct, Zr-90 holds it all.
        let out = solver.evolve(&single("Sr-90", 1.0e24), 12_000.0).unwrap();
        let total: f64 = out.values().sum();
        assert_relative_eq!(total, 1.0e24, max_relative = 1e-9);
        assert!(!out.contains_key(&nuc("Sr-90")) || out[&nuc("Sr-90")] < 1.0e14);
    }

    #[test]
    fn cyclic_chains_converge() {
        // A <-> B cycle with different rates still conserves atoms.
        let solver = solver_from(
            "\
Tc-99  1.0e7 1
Ru-99  1.0
Ru-99  5.0e6 1
Tc-99  1.0
",
        );
        let out = solver.evolve(&single("Tc-99", 1.0e24), 50.0).unwrap();
        let total: f64 = out.values().sum();
        assert_relative_eq!(total, 1.0e24, max_relative = 1e-9);
        assert!(out[&nuc("Ru-99")] > 0.0);
    }

    #[test]
    fn empty_composition_stays_empty() {
        let solver = strontium_solver();
        assert!(solver.evolve(&CompMap::new(), 10.0).unwrap().is_empty());
    }

    #[test]
    fn support_restriction_matches_full_evolution() {
        // Evolving only Y-90 must agree with the Y-90 rows of a combined
        // evolution: the restriction never changes the answer.
        let solver = strontium_solver();
        let months = 0.1;
        let only_y = solver.evolve(&single("Y-90", 1.0e20), months).unwrap();

        let mut both = single("Sr-90", 0.0);
        both.insert(nuc("Y-90"), 1.0e20);
        let combined = solver.evolve(&both, months).unwrap();

        assert_relative_eq!(
            only_y[&nuc("Y-90")],
            combined[&nuc("Y-90")],
            max_relative = 1e-12
        );
    }

    // --- shared handle ---

    #[test]
    fn shared_install_is_idempotent() {
        let first = install_shared(strontium_solver());
        let second = install_shared(strontium_solver());
        assert!(Arc::ptr_eq(&first, &second));
        assert!(shared().is_some());
    }
}
