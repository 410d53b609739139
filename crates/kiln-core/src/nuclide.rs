//! Nuclide identifiers.
//!
//! A nuclide is encoded as the integer `ZZZAAASSSS`: atomic number, mass
//! number, and isomeric-state tag. The shorter legacy form `ZZAAA` (no state
//! digits) is accepted everywhere and canonicalized on ingestion. Symbolic
//! spellings like `"U-235"`, `"u235"`, and `"Cs-137m"` parse too.
//!
//! A well-formed identifier satisfies `1 <= Z <= 118` and `A >= Z`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ATOMIC_NUMBER;
use crate::error::NuclideError;

/// Quantities per nuclide: atom counts or masses depending on context.
pub type CompMap = BTreeMap<Nuclide, f64>;

/// Canonical ids have at least seven digits; anything smaller is legacy `ZZAAA`.
const CANONICAL_FLOOR: u32 = 10_000_000;

/// Element symbols indexed by `Z - 1`.
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al",
    "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe",
    "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr",
    "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm",
    "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W",
    "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
    "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// A validated nuclide identifier in canonical `ZZZAAASSSS` form.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Nuclide(u32);

impl Nuclide {
    /// Build from a raw integer id, canonical or legacy.
    ///
    /// Legacy `ZZAAA` values (below 10^7) are promoted to canonical form with
    /// a ground isomeric state.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln_core::nuclide::Nuclide;
    /// let canonical = Nuclide::try_from_id(922350000).unwrap();
    /// let legacy = Nuclide::try_from_id(92235).unwrap();
    /// assert_eq!(canonical, legacy);
    /// ```
    pub fn try_from_id(id: u32) -> Result<Self, NuclideError> {
        let (z, a, state) = if id < CANONICAL_FLOOR {
            (id / 1_000, id % 1_000, 0)
        } else {
            (id / 10_000_000, (id / 10_000) % 1_000, id % 10_000)
        };
        Self::from_zas(z, a, state).map_err(|_| NuclideError::InvalidId(id))
    }

    /// Build from atomic number, mass number, and isomeric state.
    pub fn from_zas(z: u32, a: u32, state: u32) -> Result<Self, NuclideError> {
        let id = z
            .saturating_mul(10_000_000)
            .saturating_add(a.saturating_mul(10_000))
            .saturating_add(state);
        if z == 0 || z > MAX_ATOMIC_NUMBER || a < z || a > 999 || state > 9_999 {
            return Err(NuclideError::InvalidId(id));
        }
        Ok(Self(id))
    }

    /// Parse a numeric or symbolic spelling.
    ///
    /// Accepted: canonical `"922350000"`, legacy `"92235"`, and symbolic
    /// `"U-235"` / `"u235"` / `"Cs-137m"` (case-insensitive, optional dash,
    /// trailing `m` marks the first isomeric state).
    pub fn parse(text: &str) -> Result<Self, NuclideError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(NuclideError::Unparseable(text.to_string()));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let id: u32 = trimmed
                .parse()
                .map_err(|_| NuclideError::Unparseable(text.to_string()))?;
            return Self::try_from_id(id);
        }
        Self::parse_symbolic(trimmed).ok_or_else(|| NuclideError::Unparseable(text.to_string()))
    }

    fn parse_symbolic(text: &str) -> Option<Self> {
        let sym_len = text.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        if sym_len == 0 || sym_len > 2 {
            return None;
        }
        let (sym, rest) = text.split_at(sym_len);
        let rest = rest.strip_prefix('-').unwrap_or(rest);

        let (digits, state) = match rest.strip_suffix(['m', 'M']) {
            Some(stripped) => (stripped, 1),
            None => (rest, 0),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let z = element_by_symbol(sym)?;
        let a: u32 = digits.parse().ok()?;
        Self::from_zas(z, a, state).ok()
    }

    /// Canonical integer id.
    pub fn id(&self) -> u32 {
        self.0
    }

    /// Atomic number Z.
    pub fn z(&self) -> u32 {
        self.0 / 10_000_000
    }

    /// Mass number A.
    pub fn a(&self) -> u32 {
        (self.0 / 10_000) % 1_000
    }

    /// Isomeric-state tag (0 for the ground state).
    pub fn state(&self) -> u32 {
        self.0 % 10_000
    }

    /// The ground-state nuclide with the same Z and A.
    pub fn ground_state(&self) -> Self {
        Self(self.0 - self.state())
    }

    /// Element symbol for this nuclide's Z.
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[(self.z() - 1) as usize]
    }
}

/// Atomic number for a case-insensitive element symbol, if it names one.
pub fn element_by_symbol(symbol: &str) -> Option<u32> {
    SYMBOLS
        .iter()
        .position(|s| s.eq_ignore_ascii_case(symbol))
        .map(|i| i as u32 + 1)
}

/// True when the raw integer encodes a well-formed nuclide.
pub fn is_valid_id(id: u32) -> bool {
    Nuclide::try_from_id(id).is_ok()
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            0 => write!(f, "{}-{}", self.symbol(), self.a()),
            1 => write!(f, "{}-{}m", self.symbol(), self.a()),
            s => write!(f, "{}-{}m{}", self.symbol(), self.a(), s),
        }
    }
}

impl FromStr for Nuclide {
    type Err = NuclideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
