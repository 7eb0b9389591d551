//! Base58Check encoding for legacy P2PKH and P2SH addresses.
//!
//! An address is `base58(version || hash160 || checksum)` where the checksum is
//! the first four bytes of `SHA-256(SHA-256(version || hash160))`.

use crate::{AddressError, HASH160_LENGTH, Hash160};
use sha2::{Digest as ShaDigest, Sha256};

/// Length of the trailing checksum.
pub const CHECKSUM_LENGTH: usize = 4;

/// Decoded length of a legacy address: version byte, hash and checksum.
pub const PAYLOAD_LENGTH: usize = 1 + HASH160_LENGTH + CHECKSUM_LENGTH;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}

/// Encode a version byte and hash as a Base58Check string.
#[must_use]
pub fn encode(version: u8, hash: &Hash160) -> String {
    let mut payload = Vec::with_capacity(PAYLOAD_LENGTH);
    payload.push(version);
    payload.extend_from_slice(hash);
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    bs58::encode(payload).into_string()
}

/// Decode a Base58Check string into its version byte and hash.
///
/// # Errors
/// - `InvalidCharacter` for characters outside the Base58 alphabet
/// - `InvalidChecksum` if the trailing four bytes do not match
/// - `InvalidLength` if the payload is not exactly 25 bytes
pub fn decode(address: &str) -> Result<(u8, Hash160), AddressError> {
    let payload = bs58::decode(address)
        .into_vec()
        .map_err(|e| map_bs58_error(address, e))?;

    if payload.len() < CHECKSUM_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: PAYLOAD_LENGTH,
            got: payload.len(),
        });
    }

    let (data, check) = payload.split_at(payload.len() - CHECKSUM_LENGTH);
    if checksum(data).as_slice() != check {
        return Err(AddressError::InvalidChecksum);
    }

    if payload.len() != PAYLOAD_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: PAYLOAD_LENGTH,
            got: payload.len(),
        });
    }

    let mut hash = [0u8; HASH160_LENGTH];
    hash.copy_from_slice(&data[1..]);
    Ok((data[0], hash))
}

fn map_bs58_error(address: &str, err: bs58::decode::Error) -> AddressError {
    match err {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            AddressError::InvalidCharacter { character, index }
        }
        // index points at the first non-ascii byte, which always starts a char
        bs58::decode::Error::NonAsciiCharacter { index } => AddressError::InvalidCharacter {
            character: address
                .get(index..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            index,
        },
        other => AddressError::Base58(other),
    }
}
