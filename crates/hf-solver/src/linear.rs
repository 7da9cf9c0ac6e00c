//! Sparse symmetric solve for the head correction system.
//!
//! The nonzero layout depends only on which links join two unknown heads, so
//! it is fixed for a whole solve. Unknowns are renumbered with reverse
//! Cuthill-McKee to keep the Cholesky fill-in small; the symbolic
//! factorization from the first iteration is reused by `refactor`.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;
use nalgebra_sparse::factorization::CscCholesky;

/// Positions of one link's conductance in the value array.
#[derive(Debug, Clone, Copy, Default)]
struct LinkSlots {
    diag_start: Option<usize>,
    diag_end: Option<usize>,
    start_end: Option<usize>,
    end_start: Option<usize>,
}

/// Head matrix `A` of the gradient iteration, in compressed column form.
pub(crate) struct HeadSystem {
    n: usize,
    /// Matrix row of each unknown
    position: Vec<usize>,
    col_offsets: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<f64>,
    slots: Vec<LinkSlots>,
    factor: Option<CscCholesky<f64>>,
}

impl HeadSystem {
    /// Lay out the matrix for `n` unknowns and links with the given unknown
    /// end indices (`None` for a fixed-head end).
    pub(crate) fn new(n: usize, ends: &[(Option<usize>, Option<usize>)]) -> Self {
        let position = reverse_cuthill_mckee(n, ends);

        let mut columns: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        for &(a, b) in ends {
            if let (Some(i), Some(j)) = (a, b) {
                if i != j {
                    let (pi, pj) = (position[i], position[j]);
                    columns[pj].push(pi);
                    columns[pi].push(pj);
                }
            }
        }
        let mut col_offsets = Vec::with_capacity(n + 1);
        let mut row_indices = Vec::new();
        col_offsets.push(0);
        for mut rows in columns {
            rows.sort_unstable();
            rows.dedup();
            row_indices.extend(rows);
            col_offsets.push(row_indices.len());
        }

        let mut system = Self {
            n,
            position,
            values: vec![0.0; row_indices.len()],
            col_offsets,
            row_indices,
            slots: Vec::with_capacity(ends.len()),
            factor: None,
        };
        for &(a, b) in ends {
            let at = |u: Option<usize>| u.map(|u| system.position[u]);
            let (pa, pb) = (at(a), at(b));
            let mut slots = LinkSlots {
                diag_start: pa.and_then(|p| system.entry(p, p)),
                diag_end: pb.and_then(|p| system.entry(p, p)),
                ..LinkSlots::default()
            };
            if let (Some(pa), Some(pb)) = (pa, pb) {
                if pa == pb {
                    slots = LinkSlots::default();
                } else {
                    slots.start_end = system.entry(pa, pb);
                    slots.end_start = system.entry(pb, pa);
                }
            }
            system.slots.push(slots);
        }
        system
    }

    fn entry(&self, row: usize, col: usize) -> Option<usize> {
        let lo = *self.col_offsets.get(col)?;
        let hi = *self.col_offsets.get(col + 1)?;
        self.row_indices[lo..hi]
            .binary_search(&row)
            .ok()
            .map(|k| lo + k)
    }

    pub(crate) fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Add link conductance `p` to the matrix.
    pub(crate) fn stamp(&mut self, link: usize, p: f64) {
        let Some(slots) = self.slots.get(link).copied() else {
            return;
        };
        for (slot, sign) in [
            (slots.diag_start, 1.0),
            (slots.diag_end, 1.0),
            (slots.start_end, -1.0),
            (slots.end_start, -1.0),
        ] {
            if let Some(k) = slot {
                self.values[k] += sign * p;
            }
        }
    }

    /// Solve `A x = b` with `b` indexed by unknown. `None` when the matrix
    /// is not positive definite.
    pub(crate) fn solve(&mut self, b: &[f64]) -> Option<Vec<f64>> {
        if b.len() != self.n {
            return None;
        }
        match self.factor.as_mut() {
            Some(factor) => factor.refactor(&self.values).ok()?,
            None => {
                let a = CscMatrix::try_from_csc_data(
                    self.n,
                    self.n,
                    self.col_offsets.clone(),
                    self.row_indices.clone(),
                    self.values.clone(),
                )
                .ok()?;
                self.factor = Some(CscCholesky::factor(&a).ok()?);
            }
        }
        let factor = self.factor.as_ref()?;

        let mut rhs = DMatrix::<f64>::zeros(self.n, 1);
        for (u, &bu) in b.iter().enumerate() {
            rhs[(self.position[u], 0)] = bu;
        }
        let x = factor.solve(&rhs);
        Some(self.position.iter().map(|&p| x[(p, 0)]).collect())
    }
}

/// Bandwidth-reducing order of the unknowns: `result[u]` is the matrix row
/// of unknown `u`.
fn reverse_cuthill_mckee(n: usize, ends: &[(Option<usize>, Option<usize>)]) -> Vec<usize> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in ends {
        if let (Some(i), Some(j)) = (a, b) {
            if i != j {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }
    for list in &mut adjacency {
        list.sort_unstable();
        list.dedup();
    }

    let mut seen = vec![false; n];
    let mut sequence = Vec::with_capacity(n);
    let mut starts: Vec<usize> = (0..n).collect();
    starts.sort_by_key(|&u| adjacency[u].len());
    for start in starts {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut head = sequence.len();
        sequence.push(start);
        while head < sequence.len() {
            let u = sequence[head];
            head += 1;
            let mut next: Vec<usize> = adjacency[u].iter().copied().filter(|&v| !seen[v]).collect();
            next.sort_by_key(|&v| adjacency[v].len());
            for v in next {
                seen[v] = true;
                sequence.push(v);
            }
        }
    }

    let mut position = vec![0; n];
    for (row, &u) in sequence.iter().rev().enumerate() {
        position[u] = row;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn dense(n: usize, ends: &[(Option<usize>, Option<usize>)], p: &[f64]) -> DMatrix<f64> {
        let mut a = DMatrix::zeros(n, n);
        for (&(s, e), &p) in ends.iter().zip(p) {
            if let Some(i) = s {
                a[(i, i)] += p;
            }
            if let Some(j) = e {
                a[(j, j)] += p;
            }
            if let (Some(i), Some(j)) = (s, e) {
                a[(i, j)] -= p;
                a[(j, i)] -= p;
            }
        }
        a
    }

    #[test]
    fn solves_small_system() {
        let ends = [(None, Some(0)), (Some(0), Some(1)), (Some(1), None)];
        let p = [3.0, 1.0, 2.0];
        let mut system = HeadSystem::new(2, &ends);
        for (li, &pl) in p.iter().enumerate() {
            system.stamp(li, pl);
        }
        let b = [1.0, 2.0];
        let x = system.solve(&b).unwrap();

        let a = dense(2, &ends, &p);
        let residual = &a * DVector::from_vec(x) - DVector::from_row_slice(&b);
        assert!(residual.norm() < 1e-12);
    }

    #[test]
    fn grid_matches_dense_solve_across_refactors() {
        let k = 12;
        let id = |r: usize, c: usize| r * k + c;
        let mut ends = vec![(None, Some(0))];
        for r in 0..k {
            for c in 0..k {
                if c + 1 < k {
                    ends.push((Some(id(r, c)), Some(id(r, c + 1))));
                }
                if r + 1 < k {
                    ends.push((Some(id(r, c)), Some(id(r + 1, c))));
                }
            }
        }
        let n = k * k;
        let mut system = HeadSystem::new(n, &ends);
        let b: Vec<f64> = (0..n).map(|i| -0.001 * (i % 7) as f64).collect();

        for scale in [1.0, 2.5, 0.3] {
            let p: Vec<f64> = (0..ends.len()).map(|li| scale * (1.0 + (li % 5) as f64)).collect();
            system.clear();
            for (li, &pl) in p.iter().enumerate() {
                system.stamp(li, pl);
            }
            let x = DVector::from_vec(system.solve(&b).unwrap());
            let expected = dense(n, &ends, &p).lu().solve(&DVector::from_vec(b.clone())).unwrap();
            assert!((x - expected).amax() < 1e-9);
        }
    }

    #[test]
    fn floating_system_fails() {
        // two unknowns tied only to each other: no reference head
        let ends = [(Some(0), Some(1))];
        let mut system = HeadSystem::new(2, &ends);
        system.stamp(0, 1.0);
        assert!(system.solve(&[1.0, -1.0]).is_none());
    }

    #[test]
    fn ordering_is_a_permutation() {
        let ends = [(Some(0), Some(3)), (Some(3), Some(1)), (None, Some(2)), (Some(2), Some(4))];
        let mut position = reverse_cuthill_mckee(5, &ends);
        position.sort_unstable();
        assert_eq!(position, vec![0, 1, 2, 3, 4]);
    }
}
