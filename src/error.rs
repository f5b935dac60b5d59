//! The error kinds surfaced by every layer of the crate, following the
//! teacher's convention of a single `thiserror`-derived enum with small
//! descriptive variants rather than per-module error types.

/// Errors that can occur while encoding or decoding a Cauchy prime field
/// chunk set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attempted to take the reciprocal of zero in GF(65537).
    #[error("division by zero in GF(65537)")]
    DivisionByZero,

    /// A coded block's linear combination produced the non-representable
    /// residue `65536` at more than one position.
    #[error("encode produced the non-representable field value at more than one position")]
    SubstitutionOverflow,

    /// The Cauchy submatrix selected by a set of chunk identifiers turned
    /// out to be singular. Should not occur for pairwise distinct
    /// identifiers; surfaced defensively.
    #[error("cauchy submatrix is singular for the given identifiers")]
    SingularMatrix,

    /// A chunk's header failed structural validation (bad magic, splits
    /// out of range, identifier not exceeding splits, ...).
    #[error("invalid chunk header: {0}")]
    InvalidChunkHeader(String),

    /// A chunk's (splits, size, crc32) disagreed with the first admitted
    /// chunk in the same decode.
    #[error("chunk set is inconsistent with the first admitted chunk")]
    InconsistentChunkSet,

    /// Two admitted chunks shared the same identifier.
    #[error("duplicate chunk identifier {0}")]
    DuplicateIdentifier(u16),

    /// Fewer than `K` admissible chunks were available to decode.
    #[error("insufficient chunks: need {needed}, found {available}")]
    InsufficientChunks { needed: usize, available: usize },

    /// The encode side was asked to produce fewer chunks than the
    /// computed block count requires.
    #[error("need at least {needed} chunks, only {requested} were requested")]
    TooFewChunksRequested { needed: usize, requested: usize },

    /// The CRC-32 of the reconstructed bytes did not match the header's
    /// recorded value.
    #[error("crc32 mismatch: header says {expected:#010x}, recovered data is {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    /// An I/O operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The requested chunk size cannot even hold a header and one symbol.
    #[error("chunk size too small")]
    ChunkTooSmall,

    /// The source, at this chunk size, would need more than 1024 data
    /// blocks.
    #[error("chunk size too small, source would need more than 1024 blocks")]
    TooManyBlocks,

    /// The source exceeds the 16 MiB limit imposed by the 24-bit size
    /// field.
    #[error("input file is too large (limit is 16,777,216 bytes)")]
    InputTooLarge,
}
