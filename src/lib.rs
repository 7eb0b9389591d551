//! Conversion between legacy Base58Check, CashAddr and raw hash160 addresses.
//!
//! This crate supports:
//! - Mainnet, Testnet and Regtest via an injected [`Registry`] of version bytes and prefixes.
//! - Base58Check encode/decode with double SHA-256 checksum.
//! - CashAddr encode/decode with the BCH polymod checksum.
//! - Format, network and type detection on top of one canonical decoded record.
//!
//! ```
//! use cash_address::AddressConverter;
//!
//! let converter = AddressConverter::default();
//! let cash = converter.to_cash_address("1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu")?;
//! assert_eq!(cash, "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a");
//! assert!(converter.decoder().is_mainnet(&cash)?);
//! # Ok::<(), cash_address::AddressError>(())
//! ```

pub mod base58check;
mod batch;
pub mod cashaddr;
mod convert;
mod decoder;
mod derive;
mod detect;
mod error;
mod network;
pub mod script;

pub use batch::AddressBatch;
pub use convert::{AddressConverter, CashAddrOptions};
pub use decoder::{
    AddressDecoder, CanonicalAddress, CashAddrStrategy, DecodeStrategy, LegacyStrategy,
};
pub use derive::{DEFAULT_XPRIV_PATH, DEFAULT_XPUB_PATH, KeyDerivation};
pub use error::AddressError;
pub use network::{Network, NetworkParams, Registry};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a hash160 payload.
pub const HASH160_LENGTH: usize = 20;

/// Length of a hash160 rendered as hex.
pub const HASH160_HEX_LENGTH: usize = HASH160_LENGTH * 2;

/// A 160-bit public-key or script hash, the payload shared by every address format.
pub type Hash160 = [u8; HASH160_LENGTH];

/// What the hash inside an address commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Pay to public key hash.
    #[default]
    P2pkh,
    /// Pay to script hash.
    P2sh,
}

impl AddressType {
    /// Every address type, in registry order.
    pub const ALL: [AddressType; 2] = [AddressType::P2pkh, AddressType::P2sh];

    /// Lowercase name, as reported by `detect_type`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2sh => "p2sh",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p2pkh" | "P2PKH" => Ok(AddressType::P2pkh),
            "p2sh" | "P2SH" => Ok(AddressType::P2sh),
            other => Err(AddressError::UnknownAddressTypeName(other.to_string())),
        }
    }
}

/// The textual encoding an address was decoded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    /// Base58Check with a version byte.
    Legacy,
    /// CashAddr with a network prefix.
    CashAddr,
}

impl AddressFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressFormat::Legacy => "legacy",
            AddressFormat::CashAddr => "cashaddr",
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an input to `decode_hash160` was a bare hash or a full address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hash160Format {
    /// A raw 40 character hex hash.
    Hash160,
    /// A decodable legacy or CashAddr address.
    NonHash160,
}

/// Both renderings of one hash, produced by `decode_hash160`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hash160Record {
    pub legacy_address: String,
    pub cash_address: String,
    pub format: Hash160Format,
}

/// Parse a hex string into exactly [`HASH160_LENGTH`] bytes.
///
/// # Errors
/// `InvalidHex` when the input is not hex, `InvalidHashLength` when it decodes
/// to anything but 20 bytes.
pub fn parse_hash160(hex_str: &str) -> Result<Hash160, AddressError> {
    let bytes = hex::decode(hex_str)?;
    Hash160::try_from(bytes.as_slice()).map_err(|_| AddressError::InvalidHashLength {
        expected: HASH160_LENGTH,
        got: bytes.len(),
    })
}
