//! CashAddr encoding and decoding.
//!
//! Implements the format described in
//! <https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/cashaddr.md>.
//!
//! CashAddr shares the base32 alphabet with Bech32 but nothing else: the
//! prefix is joined with `:` and may be omitted, the prefix expands to the
//! lower 5 bits of each character, the checksum is a 40-bit polymod over five
//! generators, and non-zero padding is rejected. Only [`Fe32`] is taken from the
//! `bech32` crate; bit packing and checksumming are done here.
//!
//! The first payload byte is the version byte:
//! - bit 7: reserved, must be zero
//! - bits 3..=6: type (0 = P2PKH, 1 = P2SH)
//! - bits 0..=2: hash size class (0 = 160 bits)

use crate::{AddressError, AddressType, HASH160_LENGTH, Hash160};
use bech32::Fe32;

/// Number of 5-bit checksum characters.
pub const CHECKSUM_LENGTH: usize = 8;

/// Length of the part after `prefix:` for a 160-bit hash.
pub const BODY_LENGTH: usize = 42;

/// Separator between prefix and payload.
pub const SEPARATOR: char = ':';

const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

const SIZE_CLASS_160: u8 = 0;

/// The parts of a decoded CashAddr string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCashAddr {
    /// Lowercase prefix, either embedded or the supplied default
    pub prefix: String,
    pub address_type: AddressType,
    pub hash: Hash160,
}

fn type_bits(address_type: AddressType) -> u8 {
    match address_type {
        AddressType::P2pkh => 0,
        AddressType::P2sh => 1,
    }
}

/// # Panics
///
/// Never in practice: the value is masked to 5 bits first.
fn fe(value: u8) -> Fe32 {
    Fe32::try_from(value & 0x1f).expect("masked to 5 bits")
}

/// Pack bytes into 5-bit groups, zero-padding the final group.
fn bytes_to_fes(data: &[u8]) -> Vec<Fe32> {
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity((data.len() * 8).div_ceil(5));

    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            result.push(fe((acc >> bits) as u8));
        }
    }

    if bits > 0 {
        result.push(fe((acc << (5 - bits)) as u8));
    }

    result
}

/// Unpack 5-bit groups into bytes. Leftover bits must be fewer than 5 and all zero.
fn fes_to_bytes(fes: &[Fe32]) -> Result<Vec<u8>, AddressError> {
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity(fes.len() * 5 / 8);

    for &fe in fes {
        acc = (acc << 5) | u32::from(fe.to_u8());
        bits += 5;
        while bits >= 8 {
            bits -= 8;
            result.push((acc >> bits) as u8);
        }
    }

    if bits >= 5 || (acc & ((1 << bits) - 1)) != 0 {
        return Err(AddressError::InvalidPadding);
    }

    Ok(result)
}

/// Lower 5 bits of each prefix character followed by a zero separator.
fn expand_prefix(prefix: &str) -> impl Iterator<Item = u8> + '_ {
    prefix.bytes().map(|b| b & 0x1f).chain(std::iter::once(0))
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u64 {
    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

fn encode_payload(prefix: &str, payload: &[u8]) -> String {
    let data = bytes_to_fes(payload);

    let checksum = polymod(
        expand_prefix(prefix)
            .chain(data.iter().map(|fe| fe.to_u8()))
            .chain([0u8; CHECKSUM_LENGTH]),
    );
    let checksum_fes = (0..CHECKSUM_LENGTH).map(|i| fe((checksum >> (5 * (7 - i))) as u8));

    let mut encoded = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LENGTH);
    encoded.push_str(prefix);
    encoded.push(SEPARATOR);
    encoded.extend(data.iter().copied().chain(checksum_fes).map(Fe32::to_char));
    encoded
}

/// Encode a hash as `prefix:payload`.
///
/// The prefix is used as given; callers pass the lowercase registry prefix.
#[must_use]
pub fn encode(prefix: &str, address_type: AddressType, hash: &Hash160) -> String {
    let mut payload = Vec::with_capacity(1 + HASH160_LENGTH);
    payload.push((type_bits(address_type) << 3) | SIZE_CLASS_160);
    payload.extend_from_slice(hash);
    encode_payload(prefix, &payload)
}

/// Decode a CashAddr string that carries its own `prefix:`.
///
/// # Errors
/// `MissingPrefix` if there is no prefix, plus everything
/// [`decode_with_default_prefix`] can return.
pub fn decode(address: &str) -> Result<DecodedCashAddr, AddressError> {
    decode_inner(address, None)
}

/// Decode a CashAddr string, checksumming against `default_prefix` when the
/// input has no prefix of its own.
///
/// # Errors
/// - `MixedCase` if the input mixes upper and lower case
/// - `InvalidCharacter` for characters outside the base32 alphabet
/// - `InvalidLength` if the payload is too short to hold a checksum
/// - `ChecksumMismatch` if the polymod is non-zero
/// - `InvalidPadding`, `UnknownAddressType`, `UnsupportedHashSize`,
///   `InvalidHashLength` for a malformed payload
pub fn decode_with_default_prefix(
    address: &str,
    default_prefix: &str,
) -> Result<DecodedCashAddr, AddressError> {
    decode_inner(address, Some(default_prefix))
}

fn decode_inner(
    address: &str,
    default_prefix: Option<&str>,
) -> Result<DecodedCashAddr, AddressError> {
    let has_lower = address.chars().any(char::is_lowercase);
    let has_upper = address.chars().any(char::is_uppercase);
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }

    let address = address.to_lowercase();
    let (prefix, body) = match address.split_once(SEPARATOR) {
        Some((prefix, body)) => (prefix.to_string(), body),
        None => (
            default_prefix
                .ok_or(AddressError::MissingPrefix)?
                .to_lowercase(),
            address.as_str(),
        ),
    };
    if prefix.is_empty() {
        return Err(AddressError::MissingPrefix);
    }

    if body.len() <= CHECKSUM_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: BODY_LENGTH,
            got: body.len(),
        });
    }

    // positions are reported relative to the full input
    let offset = address.len() - body.len();
    let fes = body
        .char_indices()
        .map(|(i, c)| {
            Fe32::from_char(c).map_err(|_| AddressError::InvalidCharacter {
                character: c,
                index: offset + i,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if polymod(expand_prefix(&prefix).chain(fes.iter().map(|fe| fe.to_u8()))) != 0 {
        return Err(AddressError::ChecksumMismatch);
    }

    let payload = fes_to_bytes(&fes[..fes.len() - CHECKSUM_LENGTH])?;
    let (&version, hash) = payload.split_first().ok_or(AddressError::InvalidLength {
        expected: BODY_LENGTH,
        got: body.len(),
    })?;

    if version & 0x80 != 0 {
        return Err(AddressError::UnknownAddressType(version));
    }
    let address_type = match (version >> 3) & 0x0f {
        0 => AddressType::P2pkh,
        1 => AddressType::P2sh,
        _ => return Err(AddressError::UnknownAddressType(version)),
    };

    let size_class = version & 0x07;
    if size_class != SIZE_CLASS_160 {
        return Err(AddressError::UnsupportedHashSize(size_class));
    }

    let hash = Hash160::try_from(hash).map_err(|_| AddressError::InvalidHashLength {
        expected: HASH160_LENGTH,
        got: hash.len(),
    })?;

    Ok(DecodedCashAddr {
        prefix,
        address_type,
        hash,
    })
}
