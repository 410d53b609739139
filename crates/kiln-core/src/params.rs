//! Simulation-wide numerical parameters.
//!
//! Provides [`SimParams`] with the host simulator's tolerances. The struct is
//! small and `Copy`; constructors thread it through instead of reading an
//! ambient global, so test suites with different tolerances run in parallel.

use crate::constants::DEFAULT_EPS_KG;

/// Tolerances shared by every material operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Mass-conservation tolerance in kg. Quantities below it are zero;
    /// negative components beyond it are conservation violations.
    pub eps_kg: f64,
    /// Resource-exchange tolerance in kg, used by the host's market layer
    /// when comparing offered and requested quantities.
    pub eps_resource_kg: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            eps_kg: DEFAULT_EPS_KG,
            eps_resource_kg: DEFAULT_EPS_KG,
        }
    }
}
