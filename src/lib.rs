//! `cpf`: Cauchy matrix erasure coding over GF(65537), with a
//! self-describing chunk framing so that any `K` of the `M` chunks
//! produced for a source file are enough to reconstruct it.
//!
//! The crate is layered bottom-up:
//!
//! - [`field`] — arithmetic in GF(65537) and the slot/substitution
//!   convention for the one residue that does not fit in 16 bits.
//! - [`matrix`] — the Cauchy matrix construction and Gauss-Jordan
//!   inversion used to turn any `K` chunk identifiers into a decode
//!   system.
//! - [`codec`] — the encode/decode linear algebra over whole blocks.
//! - [`chunk`] — the on-disk chunk header and payload framing.
//! - [`crc`] — the chunk set's CRC-32 algorithm.
//! - [`driver`] — orchestration: byte slice in, chunks out; chunk
//!   readers in, byte stream out.
//! - [`error`] — the single error enum shared by every layer.

pub mod chunk;
pub mod codec;
pub mod crc;
pub mod driver;
pub mod error;
pub mod field;
pub mod matrix;

pub use error::Error;
