//! Arithmetic over GF(65537), the prime field used to build the Cauchy
//! matrix and carry out the linear algebra of encode/decode.
//!
//! `65537` is the smallest prime strictly greater than `2^16`, so a field
//! element almost always fits in a 16-bit slot, a product of two elements
//! fits comfortably in 64 bits, and a reciprocal can be obtained with a
//! single Fermat-little-theorem exponentiation. The one element that does
//! not fit in 16 bits, `65536`, is handled by the substitution scheme in
//! [`crate::codec`] rather than by widening the payload alphabet; this
//! module only exposes the conversion between a logical field value and
//! its (possibly absent) 16-bit slot representation.

use crate::error::Error;

/// The modulus of the field, `p = 65537`.
pub const P: u32 = 65537;

/// An element of GF(65537), always held in its canonical `[0, P)` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(u32);

impl FieldElement {
    /// Wraps a raw value, reducing it modulo `P` first.
    pub fn new(value: u32) -> Self {
        Self(value % P)
    }

    pub const ZERO: FieldElement = FieldElement(0);
    pub const ONE: FieldElement = FieldElement(1);

    /// The non-representable residue, `65536`. This is the only field
    /// value with no natural 16-bit slot.
    pub const NON_REPRESENTABLE: FieldElement = FieldElement(P - 1);

    /// The element's canonical value in `[0, P)`.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Reinterprets a 16-bit payload slot as a field element. Every value
    /// in `[0, 65536)` is a valid slot and maps to the identically-valued
    /// field element; `65536` itself never appears in a slot (see
    /// [`to_slot`](Self::to_slot)).
    pub fn from_slot(slot: u16) -> Self {
        Self(u32::from(slot))
    }

    /// Converts back to a 16-bit slot, or `None` if this element is the
    /// one residue, `65536`, that cannot be represented in 16 bits.
    pub fn to_slot(self) -> Option<u16> {
        if self.0 == P - 1 {
            None
        } else {
            Some(self.0 as u16)
        }
    }

    pub fn add(self, other: Self) -> Self {
        let sum = self.0 + other.0;
        Self(if sum >= P { sum - P } else { sum })
    }

    pub fn sub(self, other: Self) -> Self {
        if self.0 >= other.0 {
            Self(self.0 - other.0)
        } else {
            Self(self.0 + P - other.0)
        }
    }

    pub fn mul(self, other: Self) -> Self {
        let product = u64::from(self.0) * u64::from(other.0);
        Self((product % u64::from(P)) as u32)
    }

    /// The multiplicative inverse, computed by Fermat's little theorem
    /// (`a^(P-2) mod P`, since `P` is prime).
    pub fn reciprocal(self) -> Result<Self, Error> {
        if self.0 == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(self.pow(P - 2))
    }

    fn pow(self, mut exponent: u32) -> Self {
        let mut base = self;
        let mut result = Self::ONE;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(base);
            }
            base = base.mul(base);
            exponent >>= 1;
        }
        result
    }
}

impl From<u32> for FieldElement {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
