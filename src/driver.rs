//! Orchestration: turning a byte slice into a set of chunks on encode,
//! and any `K` admissible chunk readers back into the original bytes on
//! decode. File paths, argument parsing, and opening streams are left to
//! the `encode`/`decode` binaries; this module only deals in byte
//! slices and `Read`/`Write` implementors, matching spec §1's framing of
//! file I/O as a thin external collaborator.

use std::collections::HashSet;
use std::io::{Read, Write};

use crate::chunk::{self, Chunk};
use crate::codec::{CodecCore, CodedBlock};
use crate::crc::{self, Crc32Digest};
use crate::error::Error;

/// The 24-bit `size_minus_one` header field bounds the source to 16 MiB.
pub const MAX_INPUT_BYTES: u64 = 16_777_216;

/// The largest number of field elements one block may hold (`P - 2`,
/// spec §1/§4.5). Mirrors the header-level check in
/// [`chunk::ChunkHeader::read_from`].
pub const MAX_BLOCK_LEN: usize = chunk::MAX_BLOCK_VALUES;

/// The outcome of a successful encode: the computed block count and the
/// chunks ready to be written out, in identifier order.
pub struct EncodeOutcome {
    pub k: usize,
    pub chunks: Vec<Chunk>,
}

/// Computes `K` and `V` for a source of `input_len` bytes at the given
/// per-chunk byte budget, splits the source into `K` data blocks, and
/// produces `chunk_count` coded chunks with identifiers `K..K+chunk_count`.
///
/// Does not retry on [`Error::SubstitutionOverflow`] (see `DESIGN.md`
/// for why): the original reference does not re-roll identifiers
/// either, and spec §9 only mandates detection, not a recovery
/// strategy.
pub fn encode(
    input: &[u8],
    chunk_byte_size: usize,
    chunk_count: usize,
) -> Result<EncodeOutcome, Error> {
    let input_len = input.len();
    if input_len as u64 > MAX_INPUT_BYTES {
        return Err(Error::InputTooLarge);
    }

    // Need room for the header plus at least one payload slot.
    if chunk_byte_size < chunk::HEADER_LEN + 2 {
        return Err(Error::ChunkTooSmall);
    }
    let avail_bytes = (chunk_byte_size - chunk::HEADER_LEN) & !1;
    if avail_bytes > MAX_BLOCK_LEN * 2 {
        return Err(Error::ChunkTooSmall);
    }

    let block_count = input_len.div_ceil(avail_bytes).max(1);
    if block_count > chunk::MAX_SPLITS as usize {
        return Err(Error::TooManyBlocks);
    }
    if chunk_count < block_count {
        return Err(Error::TooFewChunksRequested {
            needed: block_count,
            requested: chunk_count,
        });
    }

    let k = block_count;
    let v = chunk::block_values(input_len as u32, k as u32) as usize;

    let mut padded = vec![0u8; 2 * k * v];
    padded[..input_len].copy_from_slice(input);
    let slots: Vec<u16> = padded
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let data_blocks: Vec<Vec<u16>> = slots.chunks(v).map(<[u16]>::to_vec).collect();

    let source_crc = crc::crc32(input);
    let codec = CodecCore::new(k, v);

    let mut chunks = Vec::with_capacity(chunk_count);
    for i in 0..chunk_count {
        let identifier = (k + i) as u32;
        let coded: CodedBlock = codec.encode(&data_blocks, identifier)?;
        let chunk = Chunk::from_coded_block(&coded, (k - 1) as u16, input_len as u32, source_crc)?;
        chunks.push(chunk);
    }

    Ok(EncodeOutcome { k, chunks })
}

/// Reads chunks from `readers` in order, admitting the first `K`
/// structurally valid, mutually consistent, distinctly-identified ones,
/// decodes them, and writes the recovered bytes (truncated to the
/// original size) to `output`.
///
/// Individual malformed or inconsistent chunks are logged and skipped
/// rather than aborting the whole decode, per spec §7's propagation
/// policy; only running out of candidates before reaching `K` is fatal.
pub fn decode<R: Read>(
    readers: &mut [R],
    mut output: impl Write,
) -> Result<(), Error> {
    let mut seen_ids: HashSet<u16> = HashSet::new();
    let mut admitted: Vec<Chunk> = Vec::new();
    let mut shared: Option<(u32, u32, u32)> = None; // (k, size, crc32)

    for reader in readers.iter_mut() {
        let chunk = match Chunk::read_from(reader) {
            Ok(chunk) => chunk,
            Err(err) => {
                log::warn!("skipping chunk: {err}");
                continue;
            }
        };
        let header = &chunk.header;
        if seen_ids.contains(&header.identifier) {
            log::warn!("skipping chunk: {}", Error::DuplicateIdentifier(header.identifier));
            continue;
        }
        let fingerprint = (header.k(), header.size(), header.crc32);
        match shared {
            None => shared = Some(fingerprint),
            Some(expected) if expected != fingerprint => {
                log::warn!("skipping chunk: {}", Error::InconsistentChunkSet);
                continue;
            }
            _ => {}
        }
        seen_ids.insert(header.identifier);
        admitted.push(chunk);
        if admitted.len() as u32 == fingerprint.0 {
            break;
        }
    }

    let (k, size, expected_crc32) = shared.unwrap_or((0, 0, 0));
    if admitted.len() < k as usize {
        return Err(Error::InsufficientChunks {
            needed: k as usize,
            available: admitted.len(),
        });
    }

    let v = admitted[0].header.block_values();
    let codec = CodecCore::new(k as usize, v);
    let coded_blocks: Vec<CodedBlock> = admitted.iter().map(Chunk::to_coded_block).collect();
    let data_blocks = codec.decode(&coded_blocks)?;

    let mut digest = Crc32Digest::new();
    let mut remaining = u64::from(size);
    for block in &data_blocks {
        let mut bytes = Vec::with_capacity(block.len() * 2);
        for &slot in block {
            bytes.extend_from_slice(&slot.to_le_bytes());
        }
        let take = (bytes.len() as u64).min(remaining) as usize;
        output.write_all(&bytes[..take])?;
        digest.update(&bytes[..take]);
        remaining -= take as u64;
    }

    let actual_crc32 = digest.finalize();
    if actual_crc32 != expected_crc32 {
        return Err(Error::CrcMismatch {
            expected: expected_crc32,
            actual: actual_crc32,
        });
    }
    Ok(())
}
