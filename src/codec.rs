//! The encode and decode transforms: data blocks plus a chunk identifier
//! to a coded block, and any `K` distinct coded blocks back to the
//! original `K` data blocks.

use crate::error::Error;
use crate::field::FieldElement;
use crate::matrix::CauchyMatrix;

/// A coded block's payload together with its substitution index, as
/// produced by [`CodecCore::encode`] and required by
/// [`CodecCore::decode`]. `substitution_index` is `v` (the block length)
/// when no substitution occurred, or the single position whose field
/// value was `65536`.
#[derive(Debug, Clone)]
pub struct CodedBlock {
    pub identifier: u32,
    pub substitution_index: usize,
    pub slots: Vec<u16>,
}

/// The encode/decode engine for a fixed `(k, v)` shape: `k` data blocks
/// of `v` field elements each.
pub struct CodecCore {
    k: usize,
    v: usize,
    matrix: CauchyMatrix,
}

impl CodecCore {
    pub fn new(k: usize, v: usize) -> Self {
        Self {
            k,
            v,
            matrix: CauchyMatrix::new(k as u32),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn v(&self) -> usize {
        self.v
    }

    /// Computes one coded block for `identifier` from the `k` data
    /// blocks, each `v` elements long (given here as raw 16-bit slots,
    /// since a data block's values are always below `65536` and so never
    /// need substitution).
    ///
    /// Fails with [`Error::SubstitutionOverflow`] if the linear
    /// combination produces the non-representable residue `65536` at
    /// more than one position; `crate::driver` does not retry with a
    /// different identifier (see `DESIGN.md`).
    pub fn encode(&self, data_blocks: &[Vec<u16>], identifier: u32) -> Result<CodedBlock, Error> {
        debug_assert_eq!(data_blocks.len(), self.k);
        let row = self.matrix.row(identifier)?;

        let mut slots = vec![0u16; self.v];
        let mut substitution_index = self.v;
        for pos in 0..self.v {
            let acc = (0..self.k).fold(FieldElement::ZERO, |acc, j| {
                let term = row[j].mul(FieldElement::from_slot(data_blocks[j][pos]));
                acc.add(term)
            });
            match acc.to_slot() {
                Some(slot) => slots[pos] = slot,
                None => {
                    if substitution_index != self.v {
                        return Err(Error::SubstitutionOverflow);
                    }
                    substitution_index = pos;
                    slots[pos] = 0;
                }
            }
        }

        Ok(CodedBlock {
            identifier,
            substitution_index,
            slots,
        })
    }

    /// Recovers the `k` original data blocks from exactly `k` coded
    /// blocks with pairwise distinct identifiers.
    ///
    /// Returns the blocks in logical order `0..k`, i.e. ready to be
    /// concatenated back into the original byte stream.
    pub fn decode(&self, chunks: &[CodedBlock]) -> Result<Vec<Vec<u16>>, Error> {
        debug_assert_eq!(chunks.len(), self.k);
        let identifiers: Vec<u32> = chunks.iter().map(|c| c.identifier).collect();
        if !all_distinct(&identifiers) {
            return Err(Error::SingularMatrix);
        }

        let inverse = self.matrix.invert_submatrix(&identifiers)?;

        let true_values: Vec<Vec<FieldElement>> = chunks
            .iter()
            .map(|chunk| {
                (0..self.v)
                    .map(|pos| {
                        if pos == chunk.substitution_index {
                            FieldElement::NON_REPRESENTABLE
                        } else {
                            FieldElement::from_slot(chunk.slots[pos])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut data_blocks = vec![vec![0u16; self.v]; self.k];
        for pos in 0..self.v {
            for (i, row) in data_blocks.iter_mut().enumerate() {
                let recovered = (0..self.k).fold(FieldElement::ZERO, |acc, j| {
                    acc.add(inverse[i][j].mul(true_values[j][pos]))
                });
                // Data blocks are sourced directly from raw bytes, so
                // their field values are always below 65536 and always
                // have a slot representation.
                row[pos] = recovered
                    .to_slot()
                    .expect("recovered data value out of representable range");
            }
        }

        Ok(data_blocks)
    }
}

fn all_distinct(identifiers: &[u32]) -> bool {
    let mut sorted = identifiers.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|w| w[0] != w[1])
}
