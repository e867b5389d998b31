//! Validation and hashing of L2 bytecode published as factory dependencies.

use alloy_primitives::B256;
use sha2::{Digest, Sha256};

/// Size of a bytecode word in bytes.
pub const BYTECODE_WORD_SIZE: usize = 32;

/// Largest bytecode length in words; the length must fit in the two length bytes of the hash.
pub const MAX_BYTECODE_LEN_WORDS: usize = (1 << 16) - 1;

/// Largest bytecode length in bytes.
pub const MAX_BYTECODE_LEN_BYTES: usize = MAX_BYTECODE_LEN_WORDS * BYTECODE_WORD_SIZE;

/// Version byte heading every bytecode hash.
pub const BYTECODE_HASH_VERSION: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BytecodeError {
    #[error("bytecode length {0} is not a multiple of {BYTECODE_WORD_SIZE} bytes")]
    NotChunkable(usize),
    #[error("bytecode of {0} words exceeds the maximum of {MAX_BYTECODE_LEN_WORDS}")]
    TooLong(usize),
    #[error("bytecode length in words ({0}) must be odd")]
    EvenWordCount(usize),
}

/// Checks the shape of an L2 bytecode and returns its length in words.
///
/// The checks run in a fixed order: chunkability, then maximum length, then word parity.
pub fn validate_bytecode(bytecode: &[u8]) -> Result<usize, BytecodeError> {
    if bytecode.len() % BYTECODE_WORD_SIZE != 0 {
        return Err(BytecodeError::NotChunkable(bytecode.len()));
    }

    let words = bytecode.len() / BYTECODE_WORD_SIZE;
    if words > MAX_BYTECODE_LEN_WORDS {
        return Err(BytecodeError::TooLong(words));
    }
    if words % 2 == 0 {
        return Err(BytecodeError::EvenWordCount(words));
    }

    Ok(words)
}

/// Versioned hash of an L2 bytecode.
///
/// Layout: `version (1) || 0x00 || length in words (2, big endian) || sha256(bytecode)[4..]`.
pub fn hash_l2_bytecode(bytecode: &[u8]) -> Result<B256, BytecodeError> {
    let words = validate_bytecode(bytecode)?;

    let mut hash: [u8; 32] = Sha256::digest(bytecode).into();
    hash[0] = BYTECODE_HASH_VERSION;
    hash[1] = 0;
    // `validate_bytecode` bounds the length by `u16::MAX`.
    hash[2..4].copy_from_slice(&(words as u16).to_be_bytes());

    Ok(B256::from(hash))
}

/// Length in words encoded in a bytecode hash.
pub fn bytecode_len_in_words(hash: &B256) -> u16 {
    u16::from_be_bytes([hash[2], hash[3]])
}
