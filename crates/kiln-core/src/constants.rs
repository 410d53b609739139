//! Physical and simulation constants. All masses in kilograms unless a unit
//! suffix says otherwise.

/// Avogadro's number, atoms per mole (2019 SI exact value).
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Seconds in one simulation month.
///
/// The simulator's time unit is months; decay constants read from datafiles
/// are per-second and get rescaled by this factor.
///
/// # Examples
///
/// ```
/// use kiln_core::constants::SECONDS_PER_MONTH;
/// assert_eq!(SECONDS_PER_MONTH, 86_400.0 * 365.25 / 12.0);
/// ```
pub const SECONDS_PER_MONTH: f64 = 86_400.0 * 365.25 / 12.0;

/// Grams per kilogram. Atomic masses are g/mol; material totals are kg.
pub const GRAMS_PER_KG: f64 = 1_000.0;

/// Highest atomic number a nuclide identifier may carry.
pub const MAX_ATOMIC_NUMBER: u32 = 118;

/// Default mass-conservation tolerance in kilograms. Quantities whose
/// mass-equivalent falls below this are treated as zero.
pub const DEFAULT_EPS_KG: f64 = 1e-6;

/// Allowed deviation of a parent's branching-ratio sum from 1.0.
pub const BRANCH_SUM_TOLERANCE: f64 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_month_is_julian() {
        // 365.25-day year split into twelve equal months.
        assert_eq!(SECONDS_PER_MONTH, 2_629_800.0);
    }

    #[test]
    fn tolerances_are_positive() {
        assert!(DEFAULT_EPS_KG > 0.0);
        assert!(BRANCH_SUM_TOLERANCE > 0.0);
    }
}
