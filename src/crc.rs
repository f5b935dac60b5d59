//! CRC-32 over the original byte stream, per spec §6: a custom
//! polynomial given in already-reflected form, zero initial register,
//! zero final XOR, bytes processed least-significant-bit first.
//!
//! Built on the `crc` crate's generic, const-constructible digest engine
//! rather than a hand-rolled table, the same way the rest of the ambient
//! stack reaches for an ecosystem crate instead of reimplementing a
//! well-trodden primitive. The `crc` crate takes `poly` in crc-catalog's
//! normal (MSB-first) form regardless of `refin`/`refout`, so the
//! spec's reflected constant is bit-reversed before use below.

use crc::{Algorithm, Crc};

// Spec gives the polynomial in its reflected, bit-serial-LSB-first form
// (`0x8F6E37A0`), but the `crc` crate follows the crc-catalog convention
// of taking `poly` in normal (MSB-first) form even when `refin`/`refout`
// are set. The bit-reversal of the spec's constant is `0x05EC76F1`.
const CPF_ALGORITHM: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x05EC_76F1,
    init: 0x0000_0000,
    refin: true,
    refout: true,
    xorout: 0x0000_0000,
    check: 0x0000_0000,
    residue: 0x0000_0000,
};

static CPF_CRC32: Crc<u32> = Crc::<u32>::new(&CPF_ALGORITHM);

/// Computes the CRC-32 of `bytes` under the chunk format's algorithm.
pub fn crc32(bytes: &[u8]) -> u32 {
    CPF_CRC32.checksum(bytes)
}

/// An incremental digest, for the decode path, which CRCs each
/// recovered block's bytes as they are written rather than buffering the
/// whole output and hashing it in one pass.
pub struct Crc32Digest(crc::Digest<'static, u32>);

impl Crc32Digest {
    pub fn new() -> Self {
        Self(CPF_CRC32.digest())
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    pub fn finalize(self) -> u32 {
        self.0.finalize()
    }
}

impl Default for Crc32Digest {
    fn default() -> Self {
        Self::new()
    }
}
