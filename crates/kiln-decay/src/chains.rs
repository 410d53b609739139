//! Decay-chain database loaded from the line-oriented decay datafile.
//!
//! Record grammar, one parent at a time:
//!
//! ```text
//! parent  : <iso>  <half_life_seconds>  <n_daughters>
//! daughter: <iso>  <branch_ratio>
//! ```
//!
//! Blank lines and `#` comments are ignored anywhere; CRLF is tolerated.
//! Nuclide ids may use any spelling [`Nuclide::parse`] accepts. Half-lives
//! are converted to decay constants and rescaled into the simulator's
//! per-month time unit on load. Errors carry 1-based line numbers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;

use kiln_core::constants::{BRANCH_SUM_TOLERANCE, SECONDS_PER_MONTH};
use kiln_core::error::DecayError;
use kiln_core::nuclide::Nuclide;

/// One parent's decay record: its decay constant and daughter branches.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRecord {
    /// Decay constant in inverse months.
    pub lambda_per_month: f64,
    /// Daughter nuclides with branching ratios summing to 1.
    pub daughters: Vec<(Nuclide, f64)>,
}

/// The parent → daughters decay database.
///
/// Parents keep their file order; that order is also the column order of the
/// [`DecayMatrix`](crate::matrix::DecayMatrix) built from this data.
#[derive(Debug, Clone, Default)]
pub struct DecayData {
    parents: IndexMap<Nuclide, ParentRecord>,
}

impl DecayData {
    /// Load the database from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecayError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DecayError::Io(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse the database from any buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, DecayError> {
        let mut parents: IndexMap<Nuclide, ParentRecord> = IndexMap::new();

        let mut lines = reader.lines().enumerate();
        while let Some((idx, line)) = lines.next() {
            let header_line = idx + 1;
            let line = line.map_err(|e| DecayError::Io(e.to_string()))?;
            let Some(tokens) = record_tokens(&line) else {
                continue;
            };

            let &[iso, half_life, count] = tokens.as_slice() else {
                return Err(DecayError::Malformed {
                    line: header_line,
                    reason: format!("expected `<iso> <half_life_s> <n_daughters>`, got {} fields", tokens.len()),
                });
            };
            let parent = Nuclide::parse(iso)
                .map_err(|source| DecayError::BadNuclide { line: header_line, source })?;
            if parents.contains_key(&parent) {
                return Err(DecayError::DuplicateParent { nuclide: parent, line: header_line });
            }

            let half_life_s: f64 = half_life.parse().map_err(|_| DecayError::Malformed {
                line: header_line,
                reason: format!("bad half-life {half_life:?}"),
            })?;
            if !half_life_s.is_finite() || half_life_s <= 0.0 {
                return Err(DecayError::Malformed {
                    line: header_line,
                    reason: format!("half-life must be a finite positive number of seconds, got {half_life_s}"),
                });
            }
            let n_daughters: usize = count.parse().map_err(|_| DecayError::Malformed {
                line: header_line,
                reason: format!("bad daughter count {count:?}"),
            })?;
            if n_daughters == 0 {
                return Err(DecayError::Malformed {
                    line: header_line,
                    reason: "parent declares no daughters".to_string(),
                });
            }

            let mut daughters = Vec::with_capacity(n_daughters);
            while daughters.len() < n_daughters {
                let Some((idx, line)) = lines.next() else {
                    return Err(DecayError::Malformed {
                        line: header_line,
                        reason: format!("end of file inside the record for {parent}"),
                    });
                };
                let daughter_line = idx + 1;
                let line = line.map_err(|e| DecayError::Io(e.to_string()))?;
                let Some(tokens) = record_tokens(&line) else {
                    continue;
                };
                let &[iso, ratio] = tokens.as_slice() else {
                    return Err(DecayError::Malformed {
                        line: daughter_line,
                        reason: format!("expected `<iso> <branch_ratio>`, got {} fields", tokens.len()),
                    });
                };
                let daughter = Nuclide::parse(iso)
                    .map_err(|source| DecayError::BadNuclide { line: daughter_line, source })?;
                let branch: f64 = ratio.parse().map_err(|_| DecayError::Malformed {
                    line: daughter_line,
                    reason: format!("bad branch ratio {ratio:?}"),
                })?;
                if !(branch > 0.0 && branch <= 1.0) {
                    return Err(DecayError::Malformed {
                        line: daughter_line,
                        reason: format!("branch ratio {branch} outside (0, 1]"),
                    });
                }
                daughters.push((daughter, branch));
            }

            let sum: f64 = daughters.iter().map(|(_, b)| b).sum();
            if (sum - 1.0).abs() > BRANCH_SUM_TOLERANCE {
                return Err(DecayError::BranchSumInvalid { parent, sum, line: header_line });
            }

            let lambda_per_month = std::f64::consts::LN_2 / half_life_s * SECONDS_PER_MONTH;
            parents.insert(parent, ParentRecord { lambda_per_month, daughters });
        }

        Ok(Self { parents })
    }

    /// Number of parent records.
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Decay constant of a parent in inverse months; `None` for nuclides the
    /// database treats as stable.
    pub fn lambda_per_month(&self, nuclide: Nuclide) -> Option<f64> {
        self.parents.get(&nuclide).map(|p| p.lambda_per_month)
    }

    /// Daughter branches of a parent.
    pub fn daughters_of(&self, nuclide: Nuclide) -> Option<&[(Nuclide, f64)]> {
        self.parents.get(&nuclide).map(|p| p.daughters.as_slice())
    }

    /// Parents in file order (the matrix column order).
    pub fn parents(&self) -> impl Iterator<Item = (Nuclide, &ParentRecord)> + '_ {
        self.parents.iter().map(|(&n, r)| (n, r))
    }
}

/// Whitespace tokens of one line; `None` for blanks and `#` comments.
fn record_tokens(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.split_whitespace().collect())
}
