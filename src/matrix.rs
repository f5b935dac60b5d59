//! The Cauchy matrix construction: a deterministic map from
//! `(row identifier, column index)` to a field element, and Gauss-Jordan
//! inversion of the square submatrix selected by a set of row
//! identifiers.
//!
//! Column `j` is fixed to `y_j = j`. Row identifier `r` is fixed to
//! `x_r = r`. The entry at `(r, j)` is `1 / (r - j)`, which is always
//! defined for `r >= K` since `r > j` for every column `j < K`. Any
//! square submatrix of a Cauchy matrix is invertible, so any `K` distinct
//! coded-chunk rows (`r >= K`) yield an invertible decode system.
//!
//! Identifiers `0..K` are reserved: row `r < K` is not looked up in the
//! Cauchy formula at all, it is the identity row `e_r`. This lets decode
//! treat "we already hold data block `r`" the same way it treats a coded
//! chunk, without separate bookkeeping.

use crate::error::Error;
use crate::field::FieldElement;

/// A Cauchy matrix over GF(65537) with `k` columns, generated on demand.
pub struct CauchyMatrix {
    k: u32,
}

impl CauchyMatrix {
    pub fn new(k: u32) -> Self {
        Self { k }
    }

    /// The entry `1 / (identifier - col)` for a coded row, i.e.
    /// `identifier >= k`.
    fn coded_entry(&self, identifier: u32, col: u32) -> Result<FieldElement, Error> {
        debug_assert!(identifier >= self.k);
        FieldElement::new(identifier)
            .sub(FieldElement::new(col))
            .reciprocal()
    }

    /// The full row of `k` field elements for the given identifier: the
    /// identity row `e_identifier` if `identifier < k`, otherwise the
    /// Cauchy row `[1/(identifier - 0), .., 1/(identifier - (k-1))]`.
    pub fn row(&self, identifier: u32) -> Result<Vec<FieldElement>, Error> {
        if identifier < self.k {
            let mut row = vec![FieldElement::ZERO; self.k as usize];
            row[identifier as usize] = FieldElement::ONE;
            Ok(row)
        } else {
            (0..self.k)
                .map(|col| self.coded_entry(identifier, col))
                .collect()
        }
    }

    /// Builds the `K x K` submatrix for the given identifiers (in order)
    /// and inverts it by Gauss-Jordan elimination over GF(65537).
    ///
    /// Identifiers must be pairwise distinct; the caller is responsible
    /// for that invariant (the decode path asserts it before calling
    /// in). A singular submatrix, which should not occur for distinct
    /// identifiers, surfaces as [`Error::SingularMatrix`].
    pub fn invert_submatrix(
        &self,
        identifiers: &[u32],
    ) -> Result<Vec<Vec<FieldElement>>, Error> {
        let k = identifiers.len();
        debug_assert_eq!(k, self.k as usize);

        let mut a: Vec<Vec<FieldElement>> = identifiers
            .iter()
            .map(|&id| self.row(id))
            .collect::<Result<_, _>>()?;
        let mut inv: Vec<Vec<FieldElement>> = (0..k)
            .map(|i| {
                let mut row = vec![FieldElement::ZERO; k];
                row[i] = FieldElement::ONE;
                row
            })
            .collect();

        for col in 0..k {
            let pivot_row = (col..k)
                .find(|&r| a[r][col].value() != 0)
                .ok_or(Error::SingularMatrix)?;
            a.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let pivot_inv = a[col][col].reciprocal()?;
            for c in 0..k {
                a[col][c] = a[col][c].mul(pivot_inv);
                inv[col][c] = inv[col][c].mul(pivot_inv);
            }

            for r in 0..k {
                if r == col {
                    continue;
                }
                let factor = a[r][col];
                if factor.value() == 0 {
                    continue;
                }
                for c in 0..k {
                    a[r][c] = a[r][c].sub(factor.mul(a[col][c]));
                    inv[r][c] = inv[r][c].sub(factor.mul(inv[col][c]));
                }
            }
        }

        Ok(inv)
    }
}
