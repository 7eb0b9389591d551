//! Conversions between legacy, CashAddr and hash160 renderings.

use crate::{
    AddressDecoder, AddressError, AddressType, Network, Registry, parse_hash160, script,
};

/// How [`AddressConverter::to_cash_address_with`] renders its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CashAddrOptions {
    /// Keep the `prefix:` part
    pub include_prefix: bool,
    /// Use the regtest prefix whatever network the input decoded to
    pub force_regtest: bool,
}

impl Default for CashAddrOptions {
    fn default() -> Self {
        Self {
            include_prefix: true,
            force_regtest: false,
        }
    }
}

/// The conversion API: decode in any format, re-encode in the requested one.
#[derive(Debug, Default)]
pub struct AddressConverter {
    decoder: AddressDecoder,
}

impl AddressConverter {
    #[must_use]
    pub fn new(decoder: AddressDecoder) -> Self {
        Self { decoder }
    }

    /// Converter over a custom registry with the default decode chain.
    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Self::new(AddressDecoder::new(registry))
    }

    /// The decoder, for detection predicates and raw decoding.
    #[must_use]
    pub fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        self.decoder.registry()
    }

    /// Re-encode any address as Base58Check.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn to_legacy_address(&self, address: &str) -> Result<String, AddressError> {
        Ok(self.decoder.decode(address)?.to_legacy(self.registry()))
    }

    /// Re-encode any address as prefixed CashAddr.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn to_cash_address(&self, address: &str) -> Result<String, AddressError> {
        self.to_cash_address_with(address, CashAddrOptions::default())
    }

    /// Re-encode any address as CashAddr.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn to_cash_address_with(
        &self,
        address: &str,
        options: CashAddrOptions,
    ) -> Result<String, AddressError> {
        let decoded = self.decoder.decode(address)?;
        let network = if options.force_regtest {
            Network::Regtest
        } else {
            decoded.network
        };

        let encoded = self
            .registry()
            .encode_cashaddr(network, decoded.address_type, &decoded.hash);
        if options.include_prefix {
            return Ok(encoded);
        }
        Ok(match encoded.split_once(crate::cashaddr::SEPARATOR) {
            Some((_, body)) => body.to_string(),
            None => encoded,
        })
    }

    /// Lowercase hex hash of any address.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn legacy_to_hash160(&self, address: &str) -> Result<String, AddressError> {
        Ok(self.decoder.decode(address)?.hash_hex())
    }

    /// Lowercase hex hash of any address.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn cash_to_hash160(&self, address: &str) -> Result<String, AddressError> {
        Ok(self.decoder.decode(address)?.hash_hex())
    }

    /// Render a hex hash as Base58Check.
    ///
    /// `Network::default()` and `AddressType::default()` give mainnet P2PKH.
    ///
    /// # Errors
    /// `InvalidHex` or `InvalidHashLength` from [`parse_hash160`].
    pub fn hash160_to_legacy(
        &self,
        hash160: &str,
        network: Network,
        address_type: AddressType,
    ) -> Result<String, AddressError> {
        let hash = parse_hash160(hash160)?;
        Ok(self.registry().encode_legacy(network, address_type, &hash))
    }

    /// Render a hex hash as prefixed CashAddr; `regtest` overrides `network`.
    ///
    /// # Errors
    /// `InvalidHex` or `InvalidHashLength` from [`parse_hash160`].
    pub fn hash160_to_cash(
        &self,
        hash160: &str,
        network: Network,
        address_type: AddressType,
        regtest: bool,
    ) -> Result<String, AddressError> {
        let hash = parse_hash160(hash160)?;
        let network = if regtest { Network::Regtest } else { network };
        Ok(self.registry().encode_cashaddr(network, address_type, &hash))
    }

    /// Legacy address paid to by a P2PKH or P2SH output script.
    ///
    /// # Errors
    /// `UnsupportedScript` for any other script.
    pub fn output_script_to_legacy(
        &self,
        script: &[u8],
        network: Network,
    ) -> Result<String, AddressError> {
        let (address_type, hash) = script::parse(script)?;
        Ok(self.registry().encode_legacy(network, address_type, &hash))
    }

    /// Output script paying to any decodable address.
    ///
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn to_output_script(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        let decoded = self.decoder.decode(address)?;
        Ok(script::build(decoded.address_type, &decoded.hash))
    }
}
