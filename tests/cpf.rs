//! End-to-end exercises of the encode/decode round trip through the
//! public `cpf` API, covering the scenarios a chunk set must hold up
//! against: arbitrary subsets, corruption, duplicate and inconsistent
//! chunks, and running out of chunks entirely.

use std::io::Cursor;

use cpf::chunk::Chunk;
use cpf::driver;
use cpf::error::Error;
use rand::Rng;

fn chunk_bytes(chunk: &Chunk) -> Vec<u8> {
    let mut buf = Vec::new();
    chunk.write_to(&mut buf).unwrap();
    buf
}

fn readers_for(indices: &[usize], chunks: &[Chunk]) -> Vec<Cursor<Vec<u8>>> {
    indices
        .iter()
        .map(|&i| Cursor::new(chunk_bytes(&chunks[i])))
        .collect()
}

/// A single byte, K = M = 1.
#[test]
fn single_byte_single_block_round_trips() {
    let data = vec![0x41u8];
    let outcome = driver::encode(&data, 64, 1).unwrap();
    assert_eq!(outcome.k, 1);
    assert_eq!(outcome.chunks.len(), 1);

    let header = outcome.chunks[0].header;
    assert_eq!(header.splits, 0);
    assert_eq!(header.identifier, 1);
    assert_eq!(header.size_minus_one, 0);
    assert_eq!(header.crc32, cpf::crc::crc32(&data));

    let mut readers = readers_for(&[0], &outcome.chunks);
    let mut output = Vec::new();
    driver::decode(&mut readers, &mut output).unwrap();
    assert_eq!(output, data);
}

/// K = 4, M = 6 over a 256-byte source: every 4-of-6 subset must decode.
#[test]
fn every_k_of_m_subset_decodes() {
    let data: Vec<u8> = (0u16..256).map(|b| b as u8).collect();
    let outcome = driver::encode(&data, 96, 6).unwrap();
    assert_eq!(outcome.k, 4);
    assert_eq!(outcome.chunks.len(), 6);

    // A representative sample of 4-of-6 subsets, not all 15, to keep this
    // test fast; the underlying property (any K distinct coded rows
    // invert) already has exhaustive coverage in matrix::test.
    let subsets: [[usize; 4]; 5] = [
        [0, 1, 2, 3],
        [0, 1, 2, 4],
        [1, 2, 4, 5],
        [0, 3, 4, 5],
        [2, 3, 4, 5],
    ];
    for subset in subsets {
        let mut readers = readers_for(&subset, &outcome.chunks);
        let mut output = Vec::new();
        driver::decode(&mut readers, &mut output).unwrap();
        assert_eq!(output, data, "subset {subset:?} failed to round-trip");
    }
}

/// K = 10, M = 20 over a megabyte of pseudo-random data: any 10 survive,
/// 11 deletions does not.
#[test]
fn large_random_payload_tolerates_up_to_m_minus_k_deletions() {
    let mut rng = rand::rng();
    let data: Vec<u8> = (0..1_000_000).map(|_| rng.random::<u8>()).collect();

    let outcome = driver::encode(&data, 100_016, 20).unwrap();
    assert_eq!(outcome.k, 10);
    assert_eq!(outcome.chunks.len(), 20);

    // Deleting any 10 chunks still leaves 10 to decode with.
    let surviving: Vec<usize> = (10..20).collect();
    let mut readers = readers_for(&surviving, &outcome.chunks);
    let mut output = Vec::new();
    driver::decode(&mut readers, &mut output).unwrap();
    assert_eq!(output, data);

    // Deleting 11 leaves only 9: not enough.
    let surviving: Vec<usize> = (11..20).collect();
    let mut readers = readers_for(&surviving, &outcome.chunks);
    let mut output = Vec::new();
    let err = driver::decode(&mut readers, &mut output).unwrap_err();
    assert!(matches!(err, Error::InsufficientChunks { needed: 10, available: 9 }));
}

/// Corrupting one chunk's payload among K+1 candidates surfaces as a CRC
/// mismatch when that chunk is used, and succeeds when it's skipped.
#[test]
fn corrupted_chunk_among_k_plus_one_is_rejected_by_crc() {
    let data = b"a message long enough to span a few data blocks of its own".to_vec();
    let outcome = driver::encode(&data, 40, 4).unwrap(); // K=3, M=4 => K+1 candidates

    let mut corrupted = chunk_bytes(&outcome.chunks[0]);
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;

    let mut readers = vec![
        Cursor::new(corrupted),
        Cursor::new(chunk_bytes(&outcome.chunks[1])),
        Cursor::new(chunk_bytes(&outcome.chunks[2])),
    ];
    let mut output = Vec::new();
    let err = driver::decode(&mut readers, &mut output).unwrap_err();
    assert!(matches!(err, Error::CrcMismatch { .. }));

    // Omitting the corrupted chunk and using the spare succeeds instead.
    let mut readers = readers_for(&[1, 2, 3], &outcome.chunks);
    let mut output = Vec::new();
    driver::decode(&mut readers, &mut output).unwrap();
    assert_eq!(output, data);
}

/// Two chunks sharing an identifier: the second is skipped as a
/// duplicate, and decode proceeds with the remaining distinct chunks.
#[test]
fn duplicate_identifier_is_skipped() {
    let data = b"duplicate identifier test payload".to_vec();
    let outcome = driver::encode(&data, 48, 3).unwrap(); // K=2, M=3

    let mut readers = vec![
        Cursor::new(chunk_bytes(&outcome.chunks[0])),
        Cursor::new(chunk_bytes(&outcome.chunks[0])), // duplicate of the first
        Cursor::new(chunk_bytes(&outcome.chunks[1])),
    ];
    let mut output = Vec::new();
    driver::decode(&mut readers, &mut output).unwrap();
    assert_eq!(output, data);
}

/// A chunk whose header disagrees with the first admitted chunk (here: a
/// different crc32, as if it belonged to a different chunk set
/// altogether) is skipped rather than admitted.
#[test]
fn inconsistent_chunk_is_skipped_in_favor_of_the_first_admitted_set() {
    let data_a = b"first chunk set's payload, which is what we want back".to_vec();
    let outcome_a = driver::encode(&data_a, 48, 3).unwrap();

    let data_b = b"second, unrelated chunk set with a different crc32!!".to_vec();
    let outcome_b = driver::encode(&data_b, 48, 3).unwrap();

    let mut readers = vec![
        Cursor::new(chunk_bytes(&outcome_a.chunks[0])),
        Cursor::new(chunk_bytes(&outcome_b.chunks[0])), // inconsistent, skipped
        Cursor::new(chunk_bytes(&outcome_a.chunks[1])),
    ];
    let mut output = Vec::new();
    driver::decode(&mut readers, &mut output).unwrap();
    assert_eq!(output, data_a);
}
