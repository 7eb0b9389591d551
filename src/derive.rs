//! Addresses derived from BIP-32 extended keys.
//!
//! Derivation itself belongs to an HD-wallet library; this crate only picks
//! the network and re-encodes the derived legacy address as CashAddr.

use crate::{AddressConverter, AddressError, Network};

/// Default derivation path for extended public keys.
pub const DEFAULT_XPUB_PATH: &str = "0/0";

/// Default derivation path for extended private keys.
pub const DEFAULT_XPRIV_PATH: &str = "0'/0";

/// An HD-wallet library able to derive a legacy address from an extended key.
pub trait KeyDerivation {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Derive the legacy address at `path` below `extended_key`.
    fn derive_address(
        &self,
        extended_key: &str,
        path: &str,
        network: Network,
    ) -> Result<String, Self::Error>;
}

impl AddressConverter {
    /// CashAddr address at `path` below an extended public key.
    ///
    /// # Errors
    /// `UnknownNetwork` for a key not starting with `x` or `t`, `Derivation`
    /// if the deriver fails, or any decode error for the address it returns.
    pub fn xpub_to_cash_address<D: KeyDerivation>(
        &self,
        deriver: &D,
        xpub: &str,
        path: &str,
    ) -> Result<String, AddressError> {
        self.extended_key_to_cash_address(deriver, xpub, path)
    }

    /// CashAddr address at `path` below an extended private key.
    ///
    /// # Errors
    /// As [`AddressConverter::xpub_to_cash_address`].
    pub fn xpriv_to_cash_address<D: KeyDerivation>(
        &self,
        deriver: &D,
        xpriv: &str,
        path: &str,
    ) -> Result<String, AddressError> {
        self.extended_key_to_cash_address(deriver, xpriv, path)
    }

    fn extended_key_to_cash_address<D: KeyDerivation>(
        &self,
        deriver: &D,
        extended_key: &str,
        path: &str,
    ) -> Result<String, AddressError> {
        let network = Network::from_extended_key(extended_key)?;
        let legacy = deriver
            .derive_address(extended_key, path, network)
            .map_err(|e| AddressError::Derivation(Box::new(e)))?;
        self.to_cash_address(&legacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressType;
    use std::cell::RefCell;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("bad path {0}")]
    struct BadPath(String);

    /// Renders a fixed hash for the requested network and records each call.
    #[derive(Default)]
    struct FixedDeriver {
        calls: RefCell<Vec<(String, Network)>>,
    }

    impl KeyDerivation for FixedDeriver {
        type Error = BadPath;

        fn derive_address(
            &self,
            _extended_key: &str,
            path: &str,
            network: Network,
        ) -> Result<String, Self::Error> {
            if path.contains('x') {
                return Err(BadPath(path.to_string()));
            }
            self.calls.borrow_mut().push((path.to_string(), network));
            let converter = AddressConverter::default();
            converter
                .hash160_to_legacy(
                    "76a04053bda0a88bda5177b86a15c3b29f559873",
                    network,
                    AddressType::P2pkh,
                )
                .map_err(|e| BadPath(e.to_string()))
        }
    }

    #[test]
    fn xpub_derives_mainnet_cash_address() {
        let converter = AddressConverter::default();
        let deriver = FixedDeriver::default();
        let address = converter
            .xpub_to_cash_address(&deriver, "xpub661MyMwAqRbcF", DEFAULT_XPUB_PATH)
            .unwrap();
        assert_eq!(
            address,
            "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a"
        );
        assert_eq!(
            deriver.calls.borrow().as_slice(),
            &[("0/0".to_string(), Network::Mainnet)]
        );
    }

    #[test]
    fn tprv_derives_testnet_cash_address() {
        let converter = AddressConverter::default();
        let deriver = FixedDeriver::default();
        let address = converter
            .xpriv_to_cash_address(&deriver, "tprv8ZgxMBicQKsPd", DEFAULT_XPRIV_PATH)
            .unwrap();
        assert!(address.starts_with("bchtest:q"));
        assert_eq!(deriver.calls.borrow()[0], ("0'/0".to_string(), Network::Testnet));
    }

    #[test]
    fn unknown_key_prefix_is_rejected_before_derivation() {
        let converter = AddressConverter::default();
        let deriver = FixedDeriver::default();
        let err = converter
            .xpub_to_cash_address(&deriver, "zpub6rFR7y4Q2Aij", DEFAULT_XPUB_PATH)
            .unwrap_err();
        assert!(matches!(err, AddressError::UnknownNetwork(_)));
        assert!(deriver.calls.borrow().is_empty());
    }

    #[test]
    fn derivation_errors_are_wrapped() {
        let converter = AddressConverter::default();
        let err = converter
            .xpub_to_cash_address(&FixedDeriver::default(), "xpub661MyMwAqRbcF", "x/1")
            .unwrap_err();
        assert!(matches!(&err, AddressError::Derivation(source) if source.to_string() == "bad path x/1"));
    }
}
