//! secp256k1 private key bound to a network and a compression preference.
//!
//! Wraps a k256 signing key and adds raw, hex and WIF encodings. The WIF
//! payload is `wif_prefix || secret || [0x01 if compressed]`, Base58Check
//! encoded.

use std::fmt;

use k256::ecdsa::SigningKey;
use k256::NonZeroScalar;
use rand::rngs::OsRng;

use crate::base58;
use crate::ec::error::KeyError;
use crate::ec::public_key::PublicKey;
use crate::network::{NetworkParams, NetworkRegistry, Networks};

/// Length of a raw private key in bytes.
pub const SECRET_LEN: usize = 32;

/// Byte appended to the WIF payload when the public key is compressed.
const COMPRESSION_MARKER: u8 = 0x01;

/// Decoded WIF payload lengths: prefix + secret, with and without the marker.
const WIF_UNCOMPRESSED_LEN: usize = 1 + SECRET_LEN;
const WIF_COMPRESSED_LEN: usize = 1 + SECRET_LEN + 1;

/// A secp256k1 private key.
///
/// Carries the network its encodings belong to and whether its public key
/// should be serialized compressed.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
    network: NetworkParams,
    compressed: bool,
}

impl PrivateKey {
    /// Generate a random private key using the OS random number generator.
    ///
    /// # Arguments
    /// * `network` - A resolved network.
    /// * `compressed` - Whether the public key serializes compressed.
    pub fn random(network: NetworkParams, compressed: bool) -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
            network,
            compressed,
        }
    }

    /// Create a private key from a raw 32-byte secret, resolving `network`
    /// in the builtin registry.
    pub fn from_bytes(secret: &[u8], network: &str, compressed: bool) -> Result<Self, KeyError> {
        Self::from_bytes_in(Networks::builtin(), secret, network, compressed)
    }

    /// Create a private key from a raw 32-byte secret.
    ///
    /// # Arguments
    /// * `registry` - Registry used to resolve `network`.
    /// * `secret` - Big-endian scalar, exactly 32 bytes.
    /// * `network` - Network name or alias.
    /// * `compressed` - Whether the public key serializes compressed.
    ///
    /// # Returns
    /// The key, or `InvalidSecretLength`, `InvalidSecret` or `UnknownNetwork`.
    pub fn from_bytes_in<R>(
        registry: &R,
        secret: &[u8],
        network: &str,
        compressed: bool,
    ) -> Result<Self, KeyError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let network = registry.resolve(network)?;
        Self::with_network(secret, network, compressed)
    }

    /// Create a private key from a hex-encoded 32-byte secret.
    pub fn from_hex(text: &str, network: &str, compressed: bool) -> Result<Self, KeyError> {
        let secret = hex::decode(text).map_err(|_| KeyError::InvalidHex {
            text: text.to_string(),
        })?;
        Self::from_bytes(&secret, network, compressed)
    }

    /// Decode a WIF string, finding its network in the builtin registry.
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        Self::from_wif_in(Networks::builtin(), wif)
    }

    /// Decode a WIF string.
    ///
    /// The network is found by the payload's version byte; compression is
    /// implied by the payload length.
    ///
    /// # Returns
    /// The key, or an error for bad Base58, a bad checksum, a payload that
    /// is not 33 or 34 bytes, a missing compression marker, or an unknown
    /// version byte.
    pub fn from_wif_in<R>(registry: &R, wif: &str) -> Result<Self, KeyError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let payload = base58::check_decode(wif)?;
        let compressed = match payload.len() {
            WIF_UNCOMPRESSED_LEN => false,
            WIF_COMPRESSED_LEN => {
                if payload[WIF_COMPRESSED_LEN - 1] != COMPRESSION_MARKER {
                    return Err(KeyError::InvalidCompressionByte {
                        string: wif.to_string(),
                    });
                }
                true
            }
            length => {
                return Err(KeyError::InvalidWifLength {
                    string: wif.to_string(),
                    length,
                });
            }
        };
        let network = registry.find_by_wif_prefix(payload[0])?;
        Self::with_network(&payload[1..1 + SECRET_LEN], network, compressed)
    }

    fn with_network(
        secret: &[u8],
        network: NetworkParams,
        compressed: bool,
    ) -> Result<Self, KeyError> {
        if secret.len() != SECRET_LEN {
            return Err(KeyError::InvalidSecretLength {
                string: hex::encode(secret),
                length: secret.len(),
            });
        }
        let inner = SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidSecret {
            string: hex::encode(secret),
        })?;
        Ok(PrivateKey {
            inner,
            network,
            compressed,
        })
    }

    /// Encode as WIF for this key's network.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(WIF_COMPRESSED_LEN);
        payload.push(self.network.wif_prefix);
        payload.extend_from_slice(&self.to_bytes());
        if self.compressed {
            payload.push(COMPRESSION_MARKER);
        }
        base58::check_encode(&payload)
    }

    /// The secret as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; SECRET_LEN] {
        let mut out = [0u8; SECRET_LEN];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// The secret as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> Result<PublicKey, KeyError> {
        PublicKey::from_private_key(self)
    }

    /// The network this key belongs to.
    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    /// Whether the public key serializes compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub(crate) fn scalar(&self) -> &NonZeroScalar {
        self.inner.as_nonzero_scalar()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
            && self.network == other.network
            && self.compressed == other.compressed
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret omitted.
        write!(
            f,
            "<PrivateKey: network: {}, compressed: {}>",
            self.network.name, self.compressed
        )
    }
}
