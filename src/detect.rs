//! Format, network and type predicates.
//!
//! Each one decodes and projects a single field, so each fails exactly as
//! [`AddressDecoder::decode`] does.

use crate::{AddressDecoder, AddressError, AddressFormat, AddressType, Hash160Format, Network};

impl AddressDecoder {
    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn detect_format(&self, address: &str) -> Result<AddressFormat, AddressError> {
        Ok(self.decode(address)?.format)
    }

    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn detect_network(&self, address: &str) -> Result<Network, AddressError> {
        Ok(self.decode(address)?.network)
    }

    /// # Errors
    /// Whatever [`AddressDecoder::decode`] returns.
    pub fn detect_type(&self, address: &str) -> Result<AddressType, AddressError> {
        Ok(self.decode(address)?.address_type)
    }

    /// # Errors
    /// Whatever [`AddressDecoder::decode_hash160`] returns.
    pub fn detect_hash160_format(&self, input: &str) -> Result<Hash160Format, AddressError> {
        Ok(self.decode_hash160(input)?.format)
    }

    pub fn is_legacy(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_format(address)? == AddressFormat::Legacy)
    }

    pub fn is_cash_address(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_format(address)? == AddressFormat::CashAddr)
    }

    pub fn is_hash160(&self, input: &str) -> Result<bool, AddressError> {
        Ok(self.detect_hash160_format(input)? == Hash160Format::Hash160)
    }

    pub fn is_mainnet(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_network(address)? == Network::Mainnet)
    }

    pub fn is_testnet(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_network(address)? == Network::Testnet)
    }

    pub fn is_regtest(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_network(address)? == Network::Regtest)
    }

    pub fn is_p2pkh(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_type(address)? == AddressType::P2pkh)
    }

    pub fn is_p2sh(&self, address: &str) -> Result<bool, AddressError> {
        Ok(self.detect_type(address)? == AddressType::P2sh)
    }
}
