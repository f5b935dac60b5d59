//! Serialization and parsing of the per-chunk header and payload
//! described in spec §4.4: a 16-byte header (magic, splits, identifier,
//! substitution index, original size minus one, CRC-32) followed by `V`
//! little-endian 16-bit payload slots.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec::CodedBlock;
use crate::error::Error;
use crate::field;

/// `CPF`, the three-byte chunk magic.
pub const MAGIC: [u8; 3] = *b"CPF";

/// Size in bytes of the fixed-length chunk header.
pub const HEADER_LEN: usize = 16;

/// Maximum number of data blocks a chunk set may be split into (spec
/// §1/§3: "no support for more than 1024 data blocks").
pub const MAX_SPLITS: u32 = 1024;

/// The largest number of field elements one block may hold (`P - 2`,
/// spec §1/§4.5): a block of `V` field elements plus the substitution
/// sentinel `V` itself must still fit in the `u16` substitution index.
pub const MAX_BLOCK_VALUES: usize = (field::P - 2) as usize;

/// The parsed, validated header of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub splits: u16,
    pub identifier: u16,
    pub substitution_index: u16,
    pub size_minus_one: u32,
    pub crc32: u32,
}

impl ChunkHeader {
    /// `K`, the number of data blocks, i.e. `splits + 1`.
    pub fn k(&self) -> u32 {
        u32::from(self.splits) + 1
    }

    /// The original, unpadded source size in bytes.
    pub fn size(&self) -> u32 {
        self.size_minus_one + 1
    }

    /// `V`, the number of field elements per block, derived from `size`
    /// and `splits` as `ceil(size / (2*K))`.
    pub fn block_values(&self) -> usize {
        block_values(self.size(), self.k()) as usize
    }

    fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_u16::<LittleEndian>(self.splits)?;
        w.write_u16::<LittleEndian>(self.identifier)?;
        w.write_u16::<LittleEndian>(self.substitution_index)?;
        write_u24_le(w, self.size_minus_one)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        Ok(())
    }

    /// Reads and structurally validates a header: magic, `splits < 1024`,
    /// `identifier > splits`, and a derived `V` within the field's
    /// per-block capacity. Returns [`Error::InvalidChunkHeader`] on any
    /// violation, which the driver treats as "skip this chunk".
    fn read_from<R: Read>(r: &mut R) -> Result<Self, Error> {
        let mut magic = [0u8; 3];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::InvalidChunkHeader("bad magic".into()));
        }
        let splits = r.read_u16::<LittleEndian>()?;
        let identifier = r.read_u16::<LittleEndian>()?;
        let substitution_index = r.read_u16::<LittleEndian>()?;
        let size_minus_one = read_u24_le(r)?;
        let crc32 = r.read_u32::<LittleEndian>()?;

        if u32::from(splits) >= MAX_SPLITS {
            return Err(Error::InvalidChunkHeader(format!(
                "splits {splits} exceeds the maximum of {MAX_SPLITS}"
            )));
        }
        if u32::from(identifier) <= u32::from(splits) {
            return Err(Error::InvalidChunkHeader(format!(
                "identifier {identifier} does not exceed splits {splits}"
            )));
        }

        let header = Self {
            splits,
            identifier,
            substitution_index,
            size_minus_one,
            crc32,
        };
        let v = header.block_values();
        if v > MAX_BLOCK_VALUES {
            return Err(Error::InvalidChunkHeader(format!(
                "block length {v} exceeds the field's per-block capacity of {MAX_BLOCK_VALUES}"
            )));
        }

        Ok(header)
    }
}

/// `ceil(size / (2*k))`, the number of field elements in one block.
pub fn block_values(size: u32, k: u32) -> u32 {
    let denom = 2 * k;
    (size + denom - 1) / denom
}

/// A complete chunk: header plus the `V` payload slots of one coded
/// block.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub header: ChunkHeader,
    pub payload: Vec<u16>,
}

impl Chunk {
    /// Builds a chunk from a freshly-encoded block and the shared
    /// metadata that every chunk in a set carries.
    pub fn from_coded_block(
        block: &CodedBlock,
        splits: u16,
        size: u32,
        crc32: u32,
    ) -> Result<Self, Error> {
        let identifier: u16 = block
            .identifier
            .try_into()
            .map_err(|_| Error::InvalidChunkHeader("identifier exceeds 16 bits".into()))?;
        let substitution_index: u16 = block
            .substitution_index
            .try_into()
            .map_err(|_| Error::InvalidChunkHeader("substitution index exceeds 16 bits".into()))?;
        let header = ChunkHeader {
            splits,
            identifier,
            substitution_index,
            size_minus_one: size - 1,
            crc32,
        };
        Ok(Self {
            header,
            payload: block.slots.clone(),
        })
    }

    pub fn to_coded_block(&self) -> CodedBlock {
        CodedBlock {
            identifier: u32::from(self.header.identifier),
            substitution_index: self.header.substitution_index as usize,
            slots: self.payload.clone(),
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.header.write_to(w)?;
        for &slot in &self.payload {
            w.write_u16::<LittleEndian>(slot)?;
        }
        Ok(())
    }

    /// Reads and validates one chunk's header, then reads exactly
    /// `header.block_values()` payload slots.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, Error> {
        let header = ChunkHeader::read_from(r)?;
        let v = header.block_values();
        let mut payload = vec![0u16; v];
        for slot in &mut payload {
            *slot = r.read_u16::<LittleEndian>()?;
        }
        Ok(Self { header, payload })
    }
}

fn write_u24_le<W: Write>(w: &mut W, value: u32) -> std::io::Result<()> {
    debug_assert!(value <= 0x00FF_FFFF);
    let bytes = value.to_le_bytes();
    w.write_all(&bytes[0..3])
}

fn read_u24_le<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes[0..3])?;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_round_trips_through_bytes() {
        // splits = 3 => k = 4; size = 40 => block_values(40, 4) = 5,
        // matching the 5-slot payload below.
        let header = ChunkHeader {
            splits: 3,
            identifier: 9,
            substitution_index: 5,
            size_minus_one: 39,
            crc32: 0xDEAD_BEEF,
        };
        let coded = CodedBlock {
            identifier: u32::from(header.identifier),
            substitution_index: header.substitution_index as usize,
            slots: vec![1, 2, 3, 4, 5],
        };
        let chunk = Chunk::from_coded_block(&coded, header.splits, header.size(), header.crc32)
            .unwrap();

        let mut buf = Vec::new();
        chunk.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_LEN + 2 * chunk.payload.len());

        let parsed = Chunk::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed.header.splits, header.splits);
        assert_eq!(parsed.header.identifier, header.identifier);
        assert_eq!(parsed.header.substitution_index, header.substitution_index);
        assert_eq!(parsed.header.crc32, header.crc32);
        assert_eq!(parsed.payload, chunk.payload);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = vec![b'X', b'Y', b'Z'];
        buf.extend_from_slice(&[0u8; HEADER_LEN - 3]);
        assert!(matches!(
            Chunk::read_from(&mut &buf[..]),
            Err(Error::InvalidChunkHeader(_))
        ));
    }

    #[test]
    fn identifier_not_exceeding_splits_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&3u16.to_le_bytes()); // splits = 3
        buf.extend_from_slice(&2u16.to_le_bytes()); // identifier = 2 <= splits
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&[0u8; 3]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            Chunk::read_from(&mut &buf[..]),
            Err(Error::InvalidChunkHeader(_))
        ));
    }

    #[test]
    fn oversized_block_values_is_rejected() {
        // splits = 0 => k = 1, so block_values = ceil(size / 2); pick a
        // size_minus_one that pushes V past MAX_BLOCK_VALUES.
        let size_minus_one = (2 * (MAX_BLOCK_VALUES + 1) - 1) as u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&0u16.to_le_bytes()); // splits = 0
        buf.extend_from_slice(&1u16.to_le_bytes()); // identifier = 1
        buf.extend_from_slice(&0u16.to_le_bytes()); // substitution_index
        buf.extend_from_slice(&size_minus_one.to_le_bytes()[0..3]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            Chunk::read_from(&mut &buf[..]),
            Err(Error::InvalidChunkHeader(_))
        ));
    }

    #[test]
    fn block_values_matches_ceiling_division() {
        assert_eq!(block_values(1, 1), 1);
        assert_eq!(block_values(256, 4), 32);
        assert_eq!(block_values(257, 4), 33);
    }
}
