//! The sparse decay-transition matrix.
//!
//! Square operator `A` over every nuclide the database mentions, stored
//! column-major: column `j` belongs to nuclide `j`, with `-λ` on the diagonal
//! and `+b·λ` at each daughter's row. Parents occupy the leading indices in
//! file order; daughter-only nuclides follow in first-appearance order and
//! carry empty columns (stable). Immutable once built.

use indexmap::IndexMap;

use kiln_core::nuclide::Nuclide;

use crate::chains::DecayData;

/// Sparse decay-transition operator in units of inverse months.
#[derive(Debug, Clone)]
pub struct DecayMatrix {
    index: IndexMap<Nuclide, usize>,
    parent_count: usize,
    /// Column-major entries `(row, value)`; stable columns are empty.
    cols: Vec<Vec<(usize, f64)>>,
}

impl DecayMatrix {
    /// Assemble the matrix from a loaded decay database.
    pub fn from_data(data: &DecayData) -> Self {
        let mut index: IndexMap<Nuclide, usize> = IndexMap::new();
        for (parent, _) in data.parents() {
            let next = index.len();
            index.insert(parent, next);
        }
        let parent_count = index.len();
        for (_, record) in data.parents() {
            for &(daughter, _) in &record.daughters {
                let next = index.len();
                index.entry(daughter).or_insert(next);
            }
        }

        let mut cols = vec![Vec::new(); index.len()];
        for (parent, record) in data.parents() {
            let col = index[&parent];
            let lambda = record.lambda_per_month;
            let entries = &mut cols[col];
            entries.push((col, -lambda));
            for &(daughter, branch) in &record.daughters {
                entries.push((index[&daughter], branch * lambda));
            }
        }

        Self { index, parent_count, cols }
    }

    /// Matrix dimension: every nuclide appearing as parent or daughter.
    pub fn dim(&self) -> usize {
        self.cols.len()
    }

    /// Number of unstable (parent) nuclides.
    pub fn parent_count(&self) -> usize {
        self.parent_count
    }

    /// Row (and column) index of a nuclide, if tracked.
    pub fn row_of(&self, nuclide: Nuclide) -> Option<usize> {
        self.index.get(&nuclide).copied()
    }

    /// Nuclide occupying a given row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= dim()`.
    pub fn nuclide_at(&self, row: usize) -> Nuclide {
        *self
            .index
            .get_index(row)
            .map(|(n, _)| n)
            .expect("row index within matrix dimension")
    }

    /// Sparse entries of one column as `(row, value)` pairs.
    pub fn column(&self, col: usize) -> &[(usize, f64)] {
        &self.cols[col]
    }

    /// Indices reachable from `seeds` by forward traversal of the daughter
    /// relation, seeds included. Tolerates cycles; the result is sorted.
    pub fn reachable_support(&self, seeds: &[usize]) -> Vec<usize> {
        let mut visited = vec![false; self.dim()];
        let mut stack: Vec<usize> = Vec::new();
        for &seed in seeds {
            if !visited[seed] {
                visited[seed] = true;
                stack.push(seed);
            }
        }
        while let Some(col) = stack.pop() {
            for &(row, _) in &self.cols[col] {
                if !visited[row] {
                    visited[row] = true;
                    stack.push(row);
                }
            }
        }
        (0..self.dim()).filter(|&i| visited[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn nuc(text: &str) -> Nuclide {
        Nuclide::parse(text).unwrap()
    }

    fn strontium_chain() -> DecayMatrix {
        let text = "\
Sr-90 908798400 1
Y-90  1.0
Y-90  230400 1
Zr-90 1.0
";
        DecayMatrix::from_data(&DecayData::from_reader(text.as_bytes()).unwrap())
    }

    // --- structure ---

    #[test]
    fn parents_lead_then_daughters() {
        let m = strontium_chain();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.parent_count(), 2);
        assert_eq!(m.row_of(nuc("Sr-90")), Some(0));
        assert_eq!(m.row_of(nuc("Y-90")), Some(1));
        assert_eq!(m.row_of(nuc("Zr-90")), Some(2));
        assert_eq!(m.nuclide_at(2), nuc("Zr-90"));
        assert_eq!(m.row_of(nuc("U-238")), None);
    }

    #[test]
    fn diagonal_is_negative_lambda() {
        let m = strontium_chain();
        let col = m.column(0);
        let (_, diag) = col.iter().find(|(row, _)| *row == 0).copied().unwrap();
        assert!(diag < 0.0);
        // 28.79-year half-life in months.
        let half_life_months = std::f64::consts::LN_2 / -diag;
        assert_relative_eq!(half_life_months, 345.5, max_relative = 1e-3);
    }

    #[test]
    fn daughter_entry_feeds_next_row() {
        let m = strontium_chain();
        let col = m.column(0);
        let (_, gain) = col.iter().find(|(row, _)| *row == 1).copied().unwrap();
        let (_, loss) = col.iter().find(|(row, _)| *row == 0).copied().unwrap();
        // Single daughter at branch 1.0: gain exactly balances the loss.
        assert_relative_eq!(gain, -loss);
    }

    #[test]
    fn stable_column_is_empty() {
        let m = strontium_chain();
        assert!(m.column(2).is_empty());
    }

    #[test]
    fn branch_ratios_split_the_column() {
        let text = "\
Cs-137  949252608 2
Ba-137m 0.944
Ba-137  0.056
";
        let m = DecayMatrix::from_data(&DecayData::from_reader(text.as_bytes()).unwrap());
        let lambda = -m.column(0).iter().find(|(r, _)| *r == 0).unwrap().1;
        let to_meta = m.column(0).iter().find(|(r, _)| *r == m.row_of(nuc("Ba-137m")).unwrap()).unwrap().1;
        let to_ground = m.column(0).iter().find(|(r, _)| *r == m.row_of(nuc("Ba-137")).unwrap()).unwrap().1;
        assert_relative_eq!(to_meta, 0.944 * lambda, max_relative = 1e-12);
        assert_relative_eq!(to_ground, 0.056 * lambda, max_relative = 1e-12);
    }

    // --- reachability ---

    #[test]
    fn support_follows_the_chain() {
        let m = strontium_chain();
        let sr = m.row_of(nuc("Sr-90")).unwrap();
        assert_eq!(m.reachable_support(&[sr]), vec![0, 1, 2]);
    }

    #[test]
    fn support_from_midchain_excludes_ancestors() {
        let m = strontium_chain();
        let y = m.row_of(nuc("Y-90")).unwrap();
        assert_eq!(m.reachable_support(&[y]), vec![1, 2]);
    }

    #[test]
    fn support_of_stable_seed_is_itself() {
        let m = strontium_chain();
        let zr = m.row_of(nuc("Zr-90")).unwrap();
        assert_eq!(m.reachable_support(&[zr]), vec![2]);
    }

    #[test]
    fn support_tolerates_cycles() {
        // Synthetic two-cycle: A -> B -> A.
        let text = "\
Tc-99  1.0e6 1
Ru-99  1.0
Ru-99  2.0e6 1
Tc-99  1.0
";
        let m = DecayMatrix::from_data(&DecayData::from_reader(text.as_bytes()).unwrap());
        let tc = m.row_of(nuc("Tc-99")).unwrap();
        assert_eq!(m.reachable_support(&[tc]), vec![0, 1]);
    }

    #[test]
    fn empty_seed_set_yields_empty_support() {
        let m = strontium_chain();
        assert!(m.reachable_support(&[]).is_empty());
    }
}
