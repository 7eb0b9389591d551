//! Network identifiers and the version byte / prefix registry.

use crate::{AddressError, AddressType, Hash160, base58check, cashaddr};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which network an address belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    /// Every network, in CashAddr fallback order.
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Regtest];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    fn index(self) -> usize {
        match self {
            Network::Mainnet => 0,
            Network::Testnet => 1,
            Network::Regtest => 2,
        }
    }

    /// Network of a BIP-32 extended key, from its leading character.
    ///
    /// # Errors
    /// `UnknownNetwork` for anything but `x` (mainnet) or `t` (testnet). Only
    /// the leading character is echoed back, never the key.
    pub fn from_extended_key(key: &str) -> Result<Self, AddressError> {
        match key.chars().next() {
            Some('x') => Ok(Network::Mainnet),
            Some('t') => Ok(Network::Testnet),
            Some(other) => Err(AddressError::UnknownNetwork(format!(
                "extended key prefix {other:?}"
            ))),
            None => Err(AddressError::UnknownNetwork("empty extended key".to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(AddressError::UnknownNetwork(other.to_string())),
        }
    }
}

fn owns_by_default() -> bool {
    true
}

/// Encoding parameters of one network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub network: Network,
    /// Base58Check version byte for P2PKH
    pub pub_key_hash: u8,
    /// Base58Check version byte for P2SH
    pub script_hash: u8,
    /// CashAddr prefix, without the `:`
    pub cashaddr_prefix: String,
    /// Whether legacy addresses with these version bytes decode to this
    /// network. A network that borrows another's bytes (regtest borrowing
    /// testnet's) still encodes with them.
    #[serde(default = "owns_by_default")]
    pub owns_legacy_versions: bool,
}

impl NetworkParams {
    /// Parameters for a network that owns its version bytes.
    pub fn new(
        network: Network,
        pub_key_hash: u8,
        script_hash: u8,
        cashaddr_prefix: impl Into<String>,
    ) -> Self {
        Self {
            network,
            pub_key_hash,
            script_hash,
            cashaddr_prefix: cashaddr_prefix.into(),
            owns_legacy_versions: true,
        }
    }

    /// Mark the version bytes as borrowed from another network.
    #[must_use]
    pub fn borrowing_legacy_versions(mut self) -> Self {
        self.owns_legacy_versions = false;
        self
    }

    #[must_use]
    pub fn version_byte(&self, address_type: AddressType) -> u8 {
        match address_type {
            AddressType::P2pkh => self.pub_key_hash,
            AddressType::P2sh => self.script_hash,
        }
    }
}

/// Immutable lookup tables between networks, version bytes and prefixes.
///
/// Built once and handed to the decoder; every lookup afterwards is read-only,
/// so a registry can be shared across threads freely.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<NetworkParams>", into = "Vec<NetworkParams>")]
pub struct Registry {
    /// One entry per network, ordered as [`Network::ALL`]
    entries: Vec<NetworkParams>,
    by_version: HashMap<u8, (Network, AddressType)>,
    by_prefix: HashMap<String, Network>,
}

impl Registry {
    /// Build a registry, panicking if the table is ambiguous.
    ///
    /// # Panics
    ///
    /// If [`Registry::try_new`] rejects the table. A built-in table that fails
    /// here is a programming error.
    #[must_use]
    pub fn new(entries: Vec<NetworkParams>) -> Self {
        Self::try_new(entries).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build a registry from a table that may come from configuration.
    ///
    /// # Errors
    /// `InvalidRegistry` unless:
    /// - every network appears exactly once
    /// - no version byte is owned by two (network, type) pairs
    /// - every borrowed version byte is owned elsewhere with the same type
    /// - prefixes are non-empty, alphanumeric and unique
    pub fn try_new(mut entries: Vec<NetworkParams>) -> Result<Self, AddressError> {
        entries.sort_by_key(|params| params.network);
        for network in Network::ALL {
            let count = entries.iter().filter(|p| p.network == network).count();
            if count != 1 {
                return Err(AddressError::InvalidRegistry(format!(
                    "expected exactly one entry for {network}, found {count}"
                )));
            }
        }

        let mut by_version = HashMap::new();
        for params in entries.iter().filter(|p| p.owns_legacy_versions) {
            for address_type in AddressType::ALL {
                let byte = params.version_byte(address_type);
                if let Some((network, other_type)) =
                    by_version.insert(byte, (params.network, address_type))
                {
                    return Err(AddressError::InvalidRegistry(format!(
                        "version byte 0x{byte:02x} is claimed by {network} {other_type} and {} {address_type}",
                        params.network
                    )));
                }
            }
        }

        for params in entries.iter().filter(|p| !p.owns_legacy_versions) {
            for address_type in AddressType::ALL {
                let byte = params.version_byte(address_type);
                match by_version.get(&byte) {
                    Some((_, owner_type)) if *owner_type == address_type => {}
                    _ => {
                        return Err(AddressError::InvalidRegistry(format!(
                            "{} borrows version byte 0x{byte:02x} for {address_type} but no network owns it",
                            params.network
                        )));
                    }
                }
            }
        }

        let mut by_prefix = HashMap::new();
        for params in &mut entries {
            params.cashaddr_prefix = params.cashaddr_prefix.to_lowercase();
            let prefix = &params.cashaddr_prefix;
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AddressError::InvalidRegistry(format!(
                    "invalid CashAddr prefix {prefix:?} for {}",
                    params.network
                )));
            }
            if let Some(network) = by_prefix.insert(prefix.clone(), params.network) {
                return Err(AddressError::InvalidRegistry(format!(
                    "CashAddr prefix {prefix:?} is claimed by {network} and {}",
                    params.network
                )));
            }
        }

        Ok(Self {
            entries,
            by_version,
            by_prefix,
        })
    }

    /// Bitcoin Cash parameters.
    ///
    /// Regtest has no version bytes of its own: legacy regtest addresses are
    /// rendered with testnet bytes and decode as testnet.
    #[must_use]
    pub fn bitcoin_cash() -> Self {
        Self::new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "bchtest"),
            NetworkParams::new(Network::Regtest, 0x6f, 0xc4, "bchreg").borrowing_legacy_versions(),
        ])
    }

    #[must_use]
    pub fn params(&self, network: Network) -> &NetworkParams {
        &self.entries[network.index()]
    }

    /// All entries in fallback order.
    #[must_use]
    pub fn entries(&self) -> &[NetworkParams] {
        &self.entries
    }

    #[must_use]
    pub fn version_byte(&self, network: Network, address_type: AddressType) -> u8 {
        self.params(network).version_byte(address_type)
    }

    #[must_use]
    pub fn prefix(&self, network: Network) -> &str {
        &self.params(network).cashaddr_prefix
    }

    /// Reverse lookup of a legacy version byte.
    ///
    /// # Errors
    /// `UnknownVersionByte` if no network owns the byte.
    pub fn resolve_version(&self, version: u8) -> Result<(Network, AddressType), AddressError> {
        self.by_version
            .get(&version)
            .copied()
            .ok_or(AddressError::UnknownVersionByte(version))
    }

    /// Reverse lookup of a CashAddr prefix, ignoring case.
    ///
    /// # Errors
    /// `UnknownPrefix` if no network uses the prefix.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<Network, AddressError> {
        self.by_prefix
            .get(&prefix.to_lowercase())
            .copied()
            .ok_or_else(|| AddressError::UnknownPrefix(prefix.to_string()))
    }

    #[must_use]
    pub fn encode_legacy(
        &self,
        network: Network,
        address_type: AddressType,
        hash: &Hash160,
    ) -> String {
        base58check::encode(self.version_byte(network, address_type), hash)
    }

    #[must_use]
    pub fn encode_cashaddr(
        &self,
        network: Network,
        address_type: AddressType,
        hash: &Hash160,
    ) -> String {
        cashaddr::encode(self.prefix(network), address_type, hash)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::bitcoin_cash()
    }
}

impl TryFrom<Vec<NetworkParams>> for Registry {
    type Error = AddressError;

    fn try_from(entries: Vec<NetworkParams>) -> Result<Self, Self::Error> {
        Self::try_new(entries)
    }
}

impl From<Registry> for Vec<NetworkParams> {
    fn from(registry: Registry) -> Self {
        registry.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitcoin_cash_lookups() {
        let registry = Registry::bitcoin_cash();
        assert_eq!(registry.version_byte(Network::Mainnet, AddressType::P2pkh), 0x00);
        assert_eq!(registry.version_byte(Network::Mainnet, AddressType::P2sh), 0x05);
        assert_eq!(registry.version_byte(Network::Testnet, AddressType::P2pkh), 0x6f);
        assert_eq!(registry.version_byte(Network::Regtest, AddressType::P2sh), 0xc4);
        assert_eq!(registry.prefix(Network::Mainnet), "bitcoincash");
        assert_eq!(registry.prefix(Network::Testnet), "bchtest");
        assert_eq!(registry.prefix(Network::Regtest), "bchreg");
    }

    #[test]
    fn reverse_lookups() {
        let registry = Registry::bitcoin_cash();
        assert_eq!(
            registry.resolve_version(0x05).unwrap(),
            (Network::Mainnet, AddressType::P2sh)
        );
        assert_eq!(
            registry.resolve_version(0x6f).unwrap(),
            (Network::Testnet, AddressType::P2pkh)
        );
        assert!(matches!(
            registry.resolve_version(0x30),
            Err(AddressError::UnknownVersionByte(0x30))
        ));

        assert_eq!(registry.resolve_prefix("bchreg").unwrap(), Network::Regtest);
        assert_eq!(registry.resolve_prefix("BCHTEST").unwrap(), Network::Testnet);
        assert!(matches!(
            registry.resolve_prefix("ecash"),
            Err(AddressError::UnknownPrefix(p)) if p == "ecash"
        ));
    }

    #[test]
    fn entries_are_in_fallback_order() {
        let registry = Registry::try_new(vec![
            NetworkParams::new(Network::Regtest, 0x10, 0x11, "reg"),
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "main"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "test"),
        ])
        .unwrap();
        let order: Vec<Network> = registry.entries().iter().map(|p| p.network).collect();
        assert_eq!(order, Network::ALL.to_vec());
        assert_eq!(registry.prefix(Network::Regtest), "reg");
    }

    #[test]
    #[should_panic(expected = "version byte 0x6f")]
    fn duplicate_version_byte_panics() {
        let _ = Registry::new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "bchtest"),
            NetworkParams::new(Network::Regtest, 0x6f, 0xc4, "bchreg"),
        ]);
    }

    #[test]
    fn same_byte_for_both_types_is_rejected() {
        let err = Registry::try_new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x00, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "bchtest"),
            NetworkParams::new(Network::Regtest, 0x6f, 0xc4, "bchreg").borrowing_legacy_versions(),
        ])
        .unwrap_err();
        assert!(matches!(err, AddressError::InvalidRegistry(_)));
    }

    #[test]
    fn unowned_borrowed_byte_is_rejected() {
        let err = Registry::try_new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "bchtest"),
            NetworkParams::new(Network::Regtest, 0x6f, 0x99, "bchreg").borrowing_legacy_versions(),
        ])
        .unwrap_err();
        assert!(matches!(err, AddressError::InvalidRegistry(msg) if msg.contains("0x99")));
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let err = Registry::try_new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "BitcoinCash"),
            NetworkParams::new(Network::Regtest, 0x6f, 0xc4, "bchreg").borrowing_legacy_versions(),
        ])
        .unwrap_err();
        assert!(matches!(err, AddressError::InvalidRegistry(msg) if msg.contains("bitcoincash")));
    }

    #[test]
    fn missing_network_is_rejected() {
        let err = Registry::try_new(vec![
            NetworkParams::new(Network::Mainnet, 0x00, 0x05, "bitcoincash"),
            NetworkParams::new(Network::Testnet, 0x6f, 0xc4, "bchtest"),
        ])
        .unwrap_err();
        assert!(matches!(err, AddressError::InvalidRegistry(msg) if msg.contains("regtest")));
    }

    #[test]
    fn loads_from_json_config() {
        let json = r#"[
            {"network": "mainnet", "pub_key_hash": 0, "script_hash": 5, "cashaddr_prefix": "bitcoincash"},
            {"network": "testnet", "pub_key_hash": 111, "script_hash": 196, "cashaddr_prefix": "bchtest"},
            {"network": "regtest", "pub_key_hash": 111, "script_hash": 196, "cashaddr_prefix": "bchreg",
             "owns_legacy_versions": false}
        ]"#;
        let registry: Registry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.entries(), Registry::bitcoin_cash().entries());

        let round_trip = serde_json::to_string(&registry).unwrap();
        let again: Registry = serde_json::from_str(&round_trip).unwrap();
        assert_eq!(again.entries(), registry.entries());
    }

    #[test]
    fn invalid_json_config_is_an_error() {
        let json = r#"[
            {"network": "mainnet", "pub_key_hash": 0, "script_hash": 5, "cashaddr_prefix": "bitcoincash"}
        ]"#;
        assert!(serde_json::from_str::<Registry>(json).is_err());
    }

    #[test]
    fn network_labels_match_exhaustively() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("regtest".parse::<Network>().unwrap(), Network::Regtest);
        assert!(matches!(
            "bitcoincash".parse::<Network>(),
            Err(AddressError::UnknownNetwork(label)) if label == "bitcoincash"
        ));
        assert!(matches!(
            "".parse::<Network>(),
            Err(AddressError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn extended_key_network() {
        assert_eq!(Network::from_extended_key("xpub6C").unwrap(), Network::Mainnet);
        assert_eq!(Network::from_extended_key("tprv8Z").unwrap(), Network::Testnet);
        let err = Network::from_extended_key("yprvSECRET").unwrap_err();
        assert!(matches!(&err, AddressError::UnknownNetwork(msg) if !msg.contains("SECRET")));
        assert!(Network::from_extended_key("").is_err());
    }
}
