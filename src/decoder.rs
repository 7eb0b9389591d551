//! Decoding any supported address into one canonical record.

use crate::{
    AddressError, AddressFormat, AddressType, HASH160_HEX_LENGTH, Hash160, Hash160Format,
    Hash160Record, Network, Registry, base58check, cashaddr, parse_hash160,
};
use tracing::{debug, trace};

/// The decoded components of an address, whatever format it came in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalAddress {
    pub network: Network,
    pub address_type: AddressType,
    pub hash: Hash160,
    pub format: AddressFormat,
}

impl CanonicalAddress {
    /// The hash as lowercase hex
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Render as Base58Check using the registry's version byte.
    #[must_use]
    pub fn to_legacy(&self, registry: &Registry) -> String {
        registry.encode_legacy(self.network, self.address_type, &self.hash)
    }

    /// Render as CashAddr with the registry's prefix.
    #[must_use]
    pub fn to_cash_address(&self, registry: &Registry) -> String {
        registry.encode_cashaddr(self.network, self.address_type, &self.hash)
    }
}

/// One step of the decoder's ordered fallback chain.
pub trait DecodeStrategy: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Try to decode `address`.
    ///
    /// Returns `None` when the strategy does not apply to this input at all,
    /// so the decoder moves on without recording a failure.
    fn decode(
        &self,
        registry: &Registry,
        address: &str,
    ) -> Option<Result<CanonicalAddress, AddressError>>;
}

/// Base58Check with a registry version byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyStrategy;

impl DecodeStrategy for LegacyStrategy {
    fn name(&self) -> &str {
        "legacy"
    }

    fn decode(
        &self,
        registry: &Registry,
        address: &str,
    ) -> Option<Result<CanonicalAddress, AddressError>> {
        Some(base58check::decode(address).and_then(|(version, hash)| {
            let (network, address_type) = registry.resolve_version(version)?;
            Ok(CanonicalAddress {
                network,
                address_type,
                hash,
                format: AddressFormat::Legacy,
            })
        }))
    }
}

/// CashAddr, either self-prefixed or checked against one default prefix.
#[derive(Clone, Copy, Debug)]
pub struct CashAddrStrategy {
    default_network: Option<Network>,
}

impl CashAddrStrategy {
    /// Applies only to inputs carrying their own `prefix:`.
    #[must_use]
    pub fn prefixed() -> Self {
        Self {
            default_network: None,
        }
    }

    /// Applies only to bare inputs, assuming the prefix of `network`.
    #[must_use]
    pub fn assuming(network: Network) -> Self {
        Self {
            default_network: Some(network),
        }
    }
}

impl DecodeStrategy for CashAddrStrategy {
    fn name(&self) -> &str {
        match self.default_network {
            None => "cashaddr",
            Some(Network::Mainnet) => "cashaddr (mainnet prefix)",
            Some(Network::Testnet) => "cashaddr (testnet prefix)",
            Some(Network::Regtest) => "cashaddr (regtest prefix)",
        }
    }

    fn decode(
        &self,
        registry: &Registry,
        address: &str,
    ) -> Option<Result<CanonicalAddress, AddressError>> {
        let prefixed = address.contains(cashaddr::SEPARATOR);
        let decoded = match self.default_network {
            None if prefixed => cashaddr::decode(address),
            Some(network) if !prefixed => {
                cashaddr::decode_with_default_prefix(address, registry.prefix(network))
            }
            _ => return None,
        };

        Some(decoded.and_then(|decoded| {
            Ok(CanonicalAddress {
                network: registry.resolve_prefix(&decoded.prefix)?,
                address_type: decoded.address_type,
                hash: decoded.hash,
                format: AddressFormat::CashAddr,
            })
        }))
    }
}

/// Decodes addresses by trying an ordered list of strategies.
///
/// The default chain is: Base58Check, self-prefixed CashAddr, then bare
/// CashAddr against the mainnet, testnet and regtest prefixes in that order.
/// The first strategy that succeeds wins.
pub struct AddressDecoder {
    registry: Registry,
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl AddressDecoder {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        let mut strategies: Vec<Box<dyn DecodeStrategy>> =
            vec![Box::new(LegacyStrategy), Box::new(CashAddrStrategy::prefixed())];
        for params in registry.entries() {
            strategies.push(Box::new(CashAddrStrategy::assuming(params.network)));
        }

        Self {
            registry,
            strategies,
        }
    }

    /// Append a strategy after the built-in ones.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl DecodeStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Names of the strategies, in the order they are tried.
    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    /// Decode an address in any supported format.
    ///
    /// # Errors
    /// `UnsupportedAddressFormat`, carrying the input, if no strategy accepts it.
    /// Individual strategy failures are only logged.
    pub fn decode(&self, address: &str) -> Result<CanonicalAddress, AddressError> {
        for strategy in &self.strategies {
            match strategy.decode(&self.registry, address) {
                None => {}
                Some(Ok(decoded)) => {
                    trace!(
                        strategy = strategy.name(),
                        network = %decoded.network,
                        address_type = %decoded.address_type,
                        "address decoded"
                    );
                    return Ok(decoded);
                }
                Some(Err(error)) => {
                    debug!(strategy = strategy.name(), %error, "decode strategy rejected address");
                }
            }
        }

        debug!(input = address, "no decode strategy accepted address");
        Err(AddressError::UnsupportedAddressFormat(address.to_string()))
    }

    /// Decode either a raw 40 character hex hash or a full address into both
    /// renderings of its hash.
    ///
    /// A raw hash is rendered as mainnet P2PKH.
    ///
    /// # Errors
    /// `UnsupportedAddressFormat` if the input is neither.
    pub fn decode_hash160(&self, input: &str) -> Result<Hash160Record, AddressError> {
        if input.len() == HASH160_HEX_LENGTH {
            if let Ok(hash) = parse_hash160(input) {
                return Ok(Hash160Record {
                    legacy_address: self.registry.encode_legacy(
                        Network::Mainnet,
                        AddressType::P2pkh,
                        &hash,
                    ),
                    cash_address: self.registry.encode_cashaddr(
                        Network::Mainnet,
                        AddressType::P2pkh,
                        &hash,
                    ),
                    format: Hash160Format::Hash160,
                });
            }
        }

        let decoded = self.decode(input)?;
        Ok(Hash160Record {
            legacy_address: decoded.to_legacy(&self.registry),
            cash_address: decoded.to_cash_address(&self.registry),
            format: Hash160Format::NonHash160,
        })
    }
}

impl Default for AddressDecoder {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl std::fmt::Debug for AddressDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressDecoder")
            .field("registry", &self.registry)
            .field("strategies", &self.strategy_names().collect::<Vec<_>>())
            .finish()
    }
}
