//! Bitcoin network parameters and the registry that resolves them.
//!
//! Keys and addresses hold a resolved `NetworkParams` rather than a raw
//! identifier. Resolution goes through the `NetworkRegistry` trait; the
//! builtin registry knows livenet and testnet, and custom registries can be
//! loaded from JSON.

use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Identifier of the network used when the caller does not name one.
pub const DEFAULT_NETWORK: &str = "livenet";

/// Constants that distinguish one Bitcoin network from another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Canonical network name.
    pub name: String,
    /// Alternative identifiers that resolve to this network.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Version byte of P2PKH addresses.
    pub pubkeyhash: u8,
    /// Version byte of P2SH addresses.
    pub scripthash: u8,
    /// Version byte of WIF-encoded private keys.
    pub wif_prefix: u8,
}

impl NetworkParams {
    /// Bitcoin main network.
    pub fn livenet() -> Self {
        NetworkParams {
            name: "livenet".to_string(),
            aliases: vec!["mainnet".to_string(), "bitcoin".to_string()],
            pubkeyhash: 0x00,
            scripthash: 0x05,
            wif_prefix: 0x80,
        }
    }

    /// Bitcoin test network.
    pub fn testnet() -> Self {
        NetworkParams {
            name: "testnet".to_string(),
            aliases: vec!["testnet3".to_string()],
            pubkeyhash: 0x6f,
            scripthash: 0xc4,
            wif_prefix: 0xef,
        }
    }

    /// Whether `identifier` is this network's name or one of its aliases.
    pub fn matches(&self, identifier: &str) -> bool {
        self.name == identifier || self.aliases.iter().any(|a| a == identifier)
    }

    fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Errors from network resolution and registry loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// No network has the given attribute value.
    #[error("no network with an attribute '{key}' of value {value}")]
    UnknownNetwork {
        /// Attribute that was searched (`name`, `pubkeyhash`, `wif_prefix`).
        key: &'static str,
        /// The value that matched nothing.
        value: String,
    },

    /// A custom registry could not be loaded.
    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),
}

/// Resolves network identifiers and version bytes to `NetworkParams`.
pub trait NetworkRegistry {
    /// Resolve a network by name or alias.
    fn resolve(&self, identifier: &str) -> Result<NetworkParams, NetworkError>;

    /// Find the network whose P2PKH address version byte is `version`.
    fn find_by_pubkeyhash(&self, version: u8) -> Result<NetworkParams, NetworkError>;

    /// Find the network whose WIF version byte is `prefix`.
    fn find_by_wif_prefix(&self, prefix: u8) -> Result<NetworkParams, NetworkError>;
}

/// A resolved network resolves only to itself.
impl NetworkRegistry for NetworkParams {
    fn resolve(&self, identifier: &str) -> Result<NetworkParams, NetworkError> {
        if self.matches(identifier) {
            Ok(self.clone())
        } else {
            Err(unknown("name", identifier.to_string()))
        }
    }

    fn find_by_pubkeyhash(&self, version: u8) -> Result<NetworkParams, NetworkError> {
        if self.pubkeyhash == version {
            Ok(self.clone())
        } else {
            Err(unknown("pubkeyhash", format_byte(version)))
        }
    }

    fn find_by_wif_prefix(&self, prefix: u8) -> Result<NetworkParams, NetworkError> {
        if self.wif_prefix == prefix {
            Ok(self.clone())
        } else {
            Err(unknown("wif_prefix", format_byte(prefix)))
        }
    }
}

/// An ordered set of networks with unique identifiers.
///
/// Lookups by version byte return the first matching network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Networks {
    networks: Vec<NetworkParams>,
}

lazy_static! {
    static ref BUILTIN: Networks = Networks {
        networks: vec![NetworkParams::livenet(), NetworkParams::testnet()],
    };
}

impl Networks {
    /// Build a registry, rejecting empty lists and duplicate identifiers.
    pub fn new(networks: Vec<NetworkParams>) -> Result<Self, NetworkError> {
        if networks.is_empty() {
            return Err(NetworkError::InvalidConfig(
                "registry must define at least one network".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for network in &networks {
            for id in network.identifiers() {
                if !seen.insert(id.to_string()) {
                    return Err(NetworkError::InvalidConfig(format!(
                        "duplicate network identifier '{}'",
                        id
                    )));
                }
            }
        }
        Ok(Networks { networks })
    }

    /// The process-wide builtin registry (livenet and testnet).
    pub fn builtin() -> &'static Networks {
        &BUILTIN
    }

    /// Load a registry from a JSON array of network definitions.
    ///
    /// # Arguments
    /// * `text` - JSON such as
    ///   `[{"name": "regtest", "pubkeyhash": 111, "scripthash": 196, "wif_prefix": 239}]`.
    ///
    /// # Returns
    /// The registry, or `InvalidConfig` if the JSON is malformed or the
    /// definitions conflict.
    pub fn from_json(text: &str) -> Result<Self, NetworkError> {
        let networks: Vec<NetworkParams> =
            serde_json::from_str(text).map_err(|e| NetworkError::InvalidConfig(e.to_string()))?;
        let registry = Self::new(networks)?;
        tracing::debug!(networks = registry.networks.len(), "loaded network registry");
        Ok(registry)
    }

    /// The network named by `DEFAULT_NETWORK`.
    ///
    /// Custom registries that do not define it fail with `UnknownNetwork`.
    pub fn default_network(&self) -> Result<NetworkParams, NetworkError> {
        self.resolve(DEFAULT_NETWORK)
    }

    /// Iterate over the registered networks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NetworkParams> {
        self.networks.iter()
    }

    fn find<F>(&self, key: &'static str, value: String, pred: F) -> Result<NetworkParams, NetworkError>
    where
        F: Fn(&NetworkParams) -> bool,
    {
        match self.networks.iter().find(|n| pred(n)) {
            Some(network) => {
                tracing::trace!(key, %value, network = %network.name, "resolved network");
                Ok(network.clone())
            }
            None => Err(unknown(key, value)),
        }
    }
}

impl NetworkRegistry for Networks {
    fn resolve(&self, identifier: &str) -> Result<NetworkParams, NetworkError> {
        self.find("name", identifier.to_string(), |n| n.matches(identifier))
    }

    fn find_by_pubkeyhash(&self, version: u8) -> Result<NetworkParams, NetworkError> {
        self.find("pubkeyhash", format_byte(version), |n| n.pubkeyhash == version)
    }

    fn find_by_wif_prefix(&self, prefix: u8) -> Result<NetworkParams, NetworkError> {
        self.find("wif_prefix", format_byte(prefix), |n| n.wif_prefix == prefix)
    }
}

fn unknown(key: &'static str, value: String) -> NetworkError {
    NetworkError::UnknownNetwork { key, value }
}

fn format_byte(b: u8) -> String {
    format!("0x{:02x}", b)
}
