use thiserror::Error;

/// Errors that can occur while decoding, encoding or converting addresses.
#[derive(Error, Debug)]
pub enum AddressError {
    /// Character outside the Base58 or CashAddr alphabet
    #[error("invalid character {character:?} at position {index}")]
    InvalidCharacter { character: char, index: usize },

    /// Base58Check payload is not `version + hash160 + checksum`
    #[error("invalid payload length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Trailing Base58Check checksum does not match the payload
    #[error("invalid Base58Check checksum")]
    InvalidChecksum,

    /// Base58 failure not covered by the variants above
    #[error("Base58 error: {0}")]
    Base58(bs58::decode::Error),

    /// CashAddr polymod over prefix and payload is non-zero
    #[error("CashAddr checksum mismatch")]
    ChecksumMismatch,

    /// CashAddr size class other than 160 bits
    #[error("unsupported CashAddr hash size class: {0}")]
    UnsupportedHashSize(u8),

    /// CashAddr input mixes lower and upper case
    #[error("mixed case CashAddr address")]
    MixedCase,

    /// Non-zero bits left over after 5-bit to 8-bit conversion
    #[error("invalid CashAddr padding")]
    InvalidPadding,

    /// CashAddr version byte with unknown type bits
    #[error("unknown CashAddr type in version byte 0x{0:02x}")]
    UnknownAddressType(u8),

    /// CashAddr without a `prefix:` and no default prefix to try
    #[error("CashAddr address has no prefix")]
    MissingPrefix,

    /// CashAddr prefix not present in the registry
    #[error("unknown CashAddr prefix: {0}")]
    UnknownPrefix(String),

    /// Base58Check version byte not present in the registry
    #[error("unknown version byte: 0x{0:02x}")]
    UnknownVersionByte(u8),

    /// No decode strategy accepted the input
    #[error("unsupported address format: {0}")]
    UnsupportedAddressFormat(String),

    /// Hash is not exactly 20 bytes
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    /// Hash string is not hex
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Network label or extended key prefix not recognised
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// Address type label not recognised
    #[error("unknown address type: {0}")]
    UnknownAddressTypeName(String),

    /// Output script is neither P2PKH nor P2SH
    #[error("unsupported output script: only P2PKH and P2SH are supported")]
    UnsupportedScript,

    /// Registry table violates its uniqueness rules
    #[error("invalid network registry: {0}")]
    InvalidRegistry(String),

    /// The key derivation collaborator failed
    #[error("key derivation failed: {0}")]
    Derivation(#[source] Box<dyn std::error::Error + Send + Sync>),
}
