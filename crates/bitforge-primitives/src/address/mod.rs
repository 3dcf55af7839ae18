/// Bitcoin P2PKH addresses.
///
/// An address is the hash160 of a SEC-encoded public key, prefixed with the
/// network's `pubkeyhash` version byte and Base58Check encoded.

use std::fmt;
use std::str::FromStr;

use crate::base58::{self, Base58Error};
use crate::ec::PublicKey;
use crate::hash::hash160;
use crate::network::{NetworkError, NetworkParams, NetworkRegistry, Networks};

/// Length of a public key hash in bytes.
pub const HASH_LEN: usize = 20;

/// Decoded address payload length: version byte plus hash.
const PAYLOAD_LEN: usize = 1 + HASH_LEN;

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The string is not valid Base58Check.
    #[error(transparent)]
    Base58(#[from] Base58Error),

    /// The decoded payload is not 21 bytes.
    #[error("the address {string} decodes to {length} bytes, expected 21")]
    InvalidLength {
        /// The address string.
        string: String,
        /// Length of its decoded payload.
        length: usize,
    },

    /// No network uses the address version byte.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// A P2PKH address bound to a network.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    hash: [u8; HASH_LEN],
    network: NetworkParams,
}

impl Address {
    /// Derive the address of `key` on the key's network.
    ///
    /// The hash covers the key's SEC bytes in its own compression form, so
    /// compressed and uncompressed keys for one secret have different
    /// addresses.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Address {
            hash: hash160(&key.to_bytes()),
            network: key.network().clone(),
        }
    }

    /// Create an address from a raw 20-byte public key hash.
    pub fn from_public_key_hash(hash: [u8; HASH_LEN], network: NetworkParams) -> Self {
        Address { hash, network }
    }

    /// Parse an address, finding its network in the builtin registry.
    pub fn from_string(s: &str) -> Result<Self, AddressError> {
        Self::from_string_in(Networks::builtin(), s)
    }

    /// Parse a Base58Check address string.
    ///
    /// # Arguments
    /// * `registry` - Registry searched for the version byte.
    /// * `s` - The address string.
    ///
    /// # Returns
    /// The address, or an error for bad Base58Check, a payload that is not
    /// 21 bytes, or an unknown version byte.
    pub fn from_string_in<R>(registry: &R, s: &str) -> Result<Self, AddressError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let payload = base58::check_decode(s)?;
        if payload.len() != PAYLOAD_LEN {
            return Err(AddressError::InvalidLength {
                string: s.to_string(),
                length: payload.len(),
            });
        }
        let network = registry.find_by_pubkeyhash(payload[0])?;
        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&payload[1..]);
        Ok(Address { hash, network })
    }

    /// The 20-byte public key hash.
    pub fn public_key_hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }

    /// The network this address belongs to.
    pub fn network(&self) -> &NetworkParams {
        &self.network
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(PAYLOAD_LEN);
        payload.push(self.network.pubkeyhash);
        payload.extend_from_slice(&self.hash);
        write!(f, "{}", base58::check_encode(&payload))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    /// Parsing a known address recovers its hash and network.
    #[test]
    fn test_from_string() {
        let addr = Address::from_string("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap();
        assert_eq!(
            hex::encode(addr.public_key_hash()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(addr.network().name, "livenet");
        assert_eq!(addr.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    /// A key's address parses back to an equal address.
    #[test]
    fn test_public_key_roundtrip() {
        let key = PublicKey::from_hex(GENERATOR_COMPRESSED, "testnet").unwrap();
        let addr = key.to_address();
        let text = addr.to_string();
        assert!(text.starts_with('m') || text.starts_with('n'));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    /// Payloads of the wrong length are rejected with their length.
    #[test]
    fn test_invalid_length() {
        let s = base58::check_encode(&[0x00; 10]);
        assert_eq!(
            Address::from_string(&s).unwrap_err(),
            AddressError::InvalidLength { string: s.clone(), length: 10 }
        );
    }

    /// Unknown version bytes and bad checksums are rejected.
    #[test]
    fn test_invalid_network_and_checksum() {
        let s = base58::check_encode(&[0x42; PAYLOAD_LEN]);
        assert!(matches!(Address::from_string(&s), Err(AddressError::Network(_))));
        assert!(matches!(
            Address::from_string("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ"),
            Err(AddressError::Base58(_))
        ));
    }
}
