//! P2PKH and P2SH output scripts.

use crate::{AddressError, AddressType, HASH160_LENGTH, Hash160};

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_PUSHBYTES_20: u8 = 0x14;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const OP_EQUAL: u8 = 0x87;

/// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
pub const P2PKH_LENGTH: usize = 25;
/// `OP_HASH160 <20> OP_EQUAL`
pub const P2SH_LENGTH: usize = 23;

/// Build the output script paying to `hash`.
#[must_use]
pub fn build(address_type: AddressType, hash: &Hash160) -> Vec<u8> {
    match address_type {
        AddressType::P2pkh => {
            let mut script = Vec::with_capacity(P2PKH_LENGTH);
            script.extend_from_slice(&[OP_DUP, OP_HASH160, OP_PUSHBYTES_20]);
            script.extend_from_slice(hash);
            script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
            script
        }
        AddressType::P2sh => {
            let mut script = Vec::with_capacity(P2SH_LENGTH);
            script.extend_from_slice(&[OP_HASH160, OP_PUSHBYTES_20]);
            script.extend_from_slice(hash);
            script.push(OP_EQUAL);
            script
        }
    }
}

/// Recognise a P2PKH or P2SH output script.
///
/// # Errors
/// `UnsupportedScript` for any other script.
pub fn parse(script: &[u8]) -> Result<(AddressType, Hash160), AddressError> {
    let (address_type, hash) = match script {
        [OP_DUP, OP_HASH160, OP_PUSHBYTES_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG]
            if hash.len() == HASH160_LENGTH =>
        {
            (AddressType::P2pkh, hash)
        }
        [OP_HASH160, OP_PUSHBYTES_20, hash @ .., OP_EQUAL] if hash.len() == HASH160_LENGTH => {
            (AddressType::P2sh, hash)
        }
        _ => return Err(AddressError::UnsupportedScript),
    };

    let hash = Hash160::try_from(hash).map_err(|_| AddressError::UnsupportedScript)?;
    Ok((address_type, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> Hash160 {
        crate::parse_hash160("76a04053bda0a88bda5177b86a15c3b29f559873").unwrap()
    }

    #[test]
    fn builds_standard_scripts() {
        assert_eq!(
            hex::encode(build(AddressType::P2pkh, &hash())),
            "76a91476a04053bda0a88bda5177b86a15c3b29f55987388ac"
        );
        assert_eq!(
            hex::encode(build(AddressType::P2sh, &hash())),
            "a91476a04053bda0a88bda5177b86a15c3b29f55987387"
        );
    }

    #[test]
    fn parses_what_it_builds() {
        for address_type in AddressType::ALL {
            let script = build(address_type, &hash());
            assert_eq!(parse(&script).unwrap(), (address_type, hash()));
        }
    }

    #[test]
    fn rejects_other_scripts() {
        // P2WPKH
        let p2wpkh = hex::decode("001476a04053bda0a88bda5177b86a15c3b29f559873").unwrap();
        assert!(matches!(parse(&p2wpkh), Err(AddressError::UnsupportedScript)));

        let mut truncated = build(AddressType::P2pkh, &hash());
        truncated.remove(10);
        assert!(matches!(parse(&truncated), Err(AddressError::UnsupportedScript)));

        assert!(matches!(parse(&[]), Err(AddressError::UnsupportedScript)));
    }
}
